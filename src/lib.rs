//! # Scenario Runner Library / Scenario Runner 库
//!
//! This library drives line-oriented command-line programs (such as UCI chess
//! engines) through scripted stdin sessions and verifies their exit code,
//! their output and the files they produce against declarative assertions.
//!
//! 此库通过脚本化的 stdin 会话驱动面向行的命令行程序（例如 UCI 国际象棋引擎），
//! 并根据声明式断言验证其退出码、输出以及生成的文件。
//!
//! ## Modules / 模块
//!
//! - `core` - Suite configuration, result models, assertions and the scenario runner
//! - `infra` - Process driving, artifact inspection, logging
//! - `reporting` - Console, HTML and JSON reports
//! - `cli` / `commands` - Command-line interface and subcommands
//!
//! - `core` - 套件配置、结果模型、断言和场景运行器
//! - `infra` - 进程驱动、产物检查、日志
//! - `reporting` - 控制台、HTML 和 JSON 报告
//! - `cli` / `commands` - 命令行接口和子命令
//!
//! ## Example / 示例
//!
//! ```no_run
//! use scenario_runner::core::{Assertion, RunnerSettings, Scenario, ScenarioRunner, Subject};
//!
//! # async fn demo() {
//! let scenario = Scenario::new("epd-compat", ["position startpos", "save", "quit"])
//!     .with_artifact("test_epd_compat.epd")
//!     .with_assertion(Assertion::contains_all(Subject::Artifact, ["rnbqkbnr"]));
//! let runner = ScenarioRunner::new(RunnerSettings::new("./src/stockfish", "."));
//! let summary = runner.run_all(&[scenario]).await;
//! assert!(summary.all_passed());
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

pub use infra::t;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

/// Maps a requested locale onto one the application ships.
///
/// It tries the full locale first (e.g., "zh-CN"), then just the language
/// code (e.g., "en" from "en-US"), and finally falls back to "en".
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }
    requested
        .split(['-', '_'])
        .next()
        .and_then(|lang_code| {
            available_locales
                .iter()
                .find(|available| available.split('-').next() == Some(lang_code))
        })
        .map(|lang| lang.to_string())
        .unwrap_or_else(|| "en".to_string())
}

/// Detects the system locale and resolves it against the shipped locales.
pub fn detect_locale() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    resolve_locale(&locale)
}

/// Initializes the application's internationalization (i18n) based on the system locale.
pub fn init() {
    rust_i18n::set_locale(&detect_locale());
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_locale() {
        assert_eq!(resolve_locale("zh-CN"), "zh-CN");
        assert_eq!(resolve_locale("en-US"), "en");
        assert_eq!(resolve_locale("zh_TW"), "zh-CN");
        assert_eq!(resolve_locale("fr-FR"), "en");
    }
}
