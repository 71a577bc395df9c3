//! # Suite Initialization Module / 套件初始化模块
//!
//! This module writes a starter `Scenarios.toml`, either from built-in
//! templates (`--non-interactive`) or through an interactive wizard that asks
//! for the executable, the working directory, the timeout and which template
//! scenarios to include.
//!
//! 此模块生成初始的 `Scenarios.toml`：可以直接使用内置模板（`--non-interactive`），
//! 也可以通过交互式向导询问可执行文件、工作目录、超时时间以及要包含的模板场景。
//!
//! ## Templates / 模板
//!
//! - **epd-compat**: EPD book output still works
//! - **pgn-output**: PGN book output carries headers, moves and move numbers
//! - **pgn-variant**: the variant header, checked only if the book was written
//! - **uci-handshake**: the engine answers `uci` with `uciok`
//!
//! - **epd-compat**: EPD 开局库输出仍然可用
//! - **pgn-output**: PGN 开局库输出包含头信息、着法和回合编号
//! - **pgn-variant**: 变体头信息，仅在开局库文件生成时检查
//! - **uci-handshake**: 引擎对 `uci` 回复 `uciok`

use anyhow::{Context, Result, bail};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{Assertion, Scenario, Subject, SuiteConfig};
use crate::t;

const DEFAULT_EXECUTABLE: &str = "./src/stockfish";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn epd_compat() -> Scenario {
    Scenario::new(
        "epd-compat",
        [
            "setoption name BookFormat value epd",
            "setoption name EPDPath value test_epd_compat.epd",
            "position startpos",
            "generate 2 depth 1",
            "save",
            "quit",
        ],
    )
    .with_description("EPD book output still works")
    .with_artifact("test_epd_compat.epd")
    .with_assertion(Assertion::exit_code(0))
    .with_assertion(Assertion::nonempty(Subject::Artifact))
    .with_assertion(Assertion::contains_all(Subject::Artifact, ["rnbqkbnr"]))
}

fn pgn_output() -> Scenario {
    Scenario::new(
        "pgn-output",
        [
            "setoption name BookFormat value pgn",
            "setoption name BookPath value test_pgn_output",
            "position startpos",
            "generate 2 depth 1",
            "save",
            "quit",
        ],
    )
    .with_description("PGN book output carries headers, moves and move numbers")
    .with_artifact("test_pgn_output.pgn")
    .with_assertion(Assertion::exit_code(0))
    .with_assertion(Assertion::contains_all(
        Subject::Artifact,
        ["[Event", "[Site", "[White", "[Black", "[Result", "[Variant"],
    ))
    .with_assertion(Assertion::contains_all(Subject::Artifact, ["e2e3", "e7e6"]))
    .with_assertion(Assertion::contains_all(Subject::Artifact, ["1."]))
}

fn pgn_variant() -> Scenario {
    Scenario::new(
        "pgn-variant",
        [
            "setoption name UCI_Variant value chess",
            "setoption name BookFormat value pgn",
            "setoption name BookPath value test_variant",
            "position startpos",
            "generate 2 depth 1",
            "save",
            "quit",
        ],
    )
    .with_description("Variant header, checked only when the book was written")
    .with_artifact("test_variant.pgn")
    .with_assertion(Assertion::exit_code(0))
    .with_assertion(Assertion::contains_all(
        Subject::ArtifactOptional,
        ["[Variant \"chess\"]"],
    ))
}

fn uci_handshake() -> Scenario {
    Scenario::new("uci-handshake", ["uci", "isready", "quit"])
        .with_description("The engine completes the UCI handshake")
        .with_assertion(Assertion::exit_code(0))
        .with_assertion(Assertion::contains_all(Subject::Stdout, ["uciok", "readyok"]))
}

/// The suite written by `init --non-interactive`.
/// `init --non-interactive` 写入的套件。
pub fn default_suite() -> SuiteConfig {
    SuiteConfig {
        language: None,
        executable: PathBuf::from(DEFAULT_EXECUTABLE),
        working_dir: PathBuf::from("."),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        scenarios: vec![epd_compat(), pgn_output(), pgn_variant()],
    }
}

/// Runs the interactive wizard, or writes the default suite when `non_interactive` is set.
///
/// 运行交互式向导；设置 `non_interactive` 时直接写入默认套件。
pub fn run_init_wizard(language: &str, non_interactive: bool, output: &Path) -> Result<()> {
    if non_interactive {
        return write_suite(output, &default_suite(), language);
    }

    let theme = ColorfulTheme::default();
    println!("\n{}", t!("init.welcome", locale = language).cyan().bold());
    println!("{}", t!("init.description", locale = language));

    if output.exists() {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", locale = language, path = output.display()))
            .default(false)
            .interact()
            .context(t!("init.user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    let executable: String = Input::with_theme(&theme)
        .with_prompt(t!("init.executable_prompt", locale = language))
        .default(DEFAULT_EXECUTABLE.to_string())
        .interact_text()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;
    let working_dir: String = Input::with_theme(&theme)
        .with_prompt(t!("init.working_dir_prompt", locale = language))
        .default(".".to_string())
        .interact_text()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;
    let timeout_secs: u64 = Input::with_theme(&theme)
        .with_prompt(t!("init.timeout_prompt", locale = language))
        .default(DEFAULT_TIMEOUT_SECS)
        .validate_with(|secs: &u64| -> Result<(), String> {
            if *secs == 0 {
                Err(t!("init.timeout_invalid", locale = language).to_string())
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;

    let options = [
        t!("init.template_epd_compat", locale = language),
        t!("init.template_pgn_output", locale = language),
        t!("init.template_pgn_variant", locale = language),
        t!("init.template_uci_handshake", locale = language),
    ];
    let selections = MultiSelect::with_theme(&theme)
        .with_prompt(t!("init.scenario_selection_prompt", locale = language))
        .items(&options)
        .defaults(&[true, true, true, false])
        .interact()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;

    let scenarios: Vec<Scenario> = selections
        .into_iter()
        .filter_map(|i| match i {
            0 => Some(epd_compat()),
            1 => Some(pgn_output()),
            2 => Some(pgn_variant()),
            3 => Some(uci_handshake()),
            _ => None,
        })
        .collect();

    let suite = if scenarios.is_empty() {
        println!("{}", t!("init.no_scenarios_selected", locale = language).yellow());
        SuiteConfig {
            executable: PathBuf::from(executable),
            working_dir: PathBuf::from(working_dir),
            timeout_secs,
            ..default_suite()
        }
    } else {
        SuiteConfig {
            language: Some(language.to_string()),
            executable: PathBuf::from(executable),
            working_dir: PathBuf::from(working_dir),
            timeout_secs,
            scenarios,
        }
    };

    write_suite(output, &suite, language)
}

/// Serializes `suite` as TOML and writes it to `path`.
fn write_suite(path: &Path, suite: &SuiteConfig, language: &str) -> Result<()> {
    if let Err(e) = suite.validate() {
        bail!("{}: {e:#}", t!("init.invalid_suite", locale = language));
    }
    let toml_string = render_suite(suite)
        .context(t!("init.serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string)
        .with_context(|| t!("init.write_failed", locale = language, path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint", locale = language, path = path.display()));

    Ok(())
}

/// Renders a suite as TOML.
/// 将套件渲染为 TOML。
pub fn render_suite(suite: &SuiteConfig) -> Result<String> {
    Ok(toml::to_string_pretty(suite)?)
}
