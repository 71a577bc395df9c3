// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::{
    commands::{self, run::RunArgs},
    infra::logging,
    t,
};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>` or `--lang=<VALUE>`.
fn pre_parse_language<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            return args.next();
        }
        if let Some(lang) = arg.strip_prefix("--lang=") {
            return Some(lang.to_string());
        }
    }
    None
}

fn build_cli(locale: &str) -> Command {
    Command::new("scenario-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli.verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::Count),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about", locale = locale).to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value("Scenarios.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("executable")
                        .short('e')
                        .long("executable")
                        .help(t!("cli.arg_executable", locale = locale).to_string())
                        .value_name("EXECUTABLE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("working-dir")
                        .long("working-dir")
                        .help(t!("cli.arg_working_dir", locale = locale).to_string())
                        .value_name("DIR")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .help(t!("cli.arg_timeout", locale = locale).to_string())
                        .value_name("SECS")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .help(t!("cli.arg_filter", locale = locale).to_string())
                        .value_name("TEXT")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("total-runners")
                        .long("total-runners")
                        .help(t!("cli.arg_total_runners", locale = locale).to_string())
                        .value_name("TOTAL_RUNNERS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("runner-index"),
                )
                .arg(
                    Arg::new("runner-index")
                        .long("runner-index")
                        .help(t!("cli.arg_runner_index", locale = locale).to_string())
                        .value_name("RUNNER_INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("total-runners"),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("cli.arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("cli.arg_json", locale = locale).to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_output", locale = locale).to_string())
                        .value_name("PATH")
                        .default_value("Scenarios.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
}

fn run_args(matches: &ArgMatches, language: Option<String>) -> RunArgs {
    RunArgs {
        config: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("Scenarios.toml")),
        executable: matches.get_one::<PathBuf>("executable").cloned(),
        working_dir: matches.get_one::<PathBuf>("working-dir").cloned(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        filter: matches.get_one::<String>("filter").cloned(),
        total_runners: matches.get_one::<usize>("total-runners").copied(),
        runner_index: matches.get_one::<usize>("runner-index").copied(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
        language,
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let explicit_language = pre_parse_language(env::args().skip(1));
    let language = match &explicit_language {
        Some(lang) => crate::resolve_locale(lang),
        None => crate::detect_locale(),
    };
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    logging::init_cli(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            commands::run::execute(run_args(run_matches, explicit_language), &language).await?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("Scenarios.toml"));

            // Show language detection message if it was auto-detected
            if explicit_language.is_none() && !non_interactive {
                println!(
                    "🌐 {}",
                    t!("init.system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::run_init_wizard(&language, non_interactive, &output)?;
        }
        // `subcommand_required` makes clap exit before reaching this arm.
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pre_parse_language() {
        assert_eq!(
            pre_parse_language(args(&["run", "--lang", "zh-CN"])),
            Some("zh-CN".to_string())
        );
        assert_eq!(
            pre_parse_language(args(&["--lang=en", "init"])),
            Some("en".to_string())
        );
        assert_eq!(pre_parse_language(args(&["run", "-c", "Scenarios.toml"])), None);
        assert_eq!(pre_parse_language(args(&["run", "--lang"])), None);
    }

    #[test]
    fn test_run_arguments_are_collected() {
        let matches = build_cli("en").get_matches_from([
            "scenario-runner",
            "run",
            "-c",
            "books.toml",
            "--timeout",
            "5",
            "--filter",
            "pgn",
            "--total-runners",
            "2",
            "--runner-index",
            "1",
        ]);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        let parsed = run_args(sub, None);
        assert_eq!(parsed.config, PathBuf::from("books.toml"));
        assert_eq!(parsed.timeout_secs, Some(5));
        assert_eq!(parsed.filter.as_deref(), Some("pgn"));
        assert_eq!(parsed.total_runners, Some(2));
        assert_eq!(parsed.runner_index, Some(1));
        assert_eq!(parsed.executable, None);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = build_cli("en").try_get_matches_from(["scenario-runner", "run", "--timeout", "0"]);
        assert!(result.is_err());
    }
}
