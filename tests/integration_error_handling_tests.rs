//! # Error Handling Integration Tests / 错误处理集成测试
//!
//! Suite files that cannot be used must be rejected with a readable error
//! before any process is started; odd but valid suites must still run.
//!
//! 无法使用的套件文件必须在启动任何进程之前以可读的错误被拒绝；
//! 不常见但合法的套件仍然必须能够运行。
#![cfg(unix)]

mod common;

use common::FakeEngine;
use scenario_runner::config::{load_suite, parse_suite};
use scenario_runner::core::{RunnerSettings, Scenario, ScenarioRunner};
use std::fs;
use std::time::Duration;

#[cfg(test)]
mod suite_file_errors {
    use super::*;

    #[test]
    fn test_invalid_toml() {
        let err = parse_suite("executable = \"./engine\"\n[[scenarios]\nname = ").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse suite TOML"));
    }

    #[test]
    fn test_empty_file() {
        // 空文件缺少 executable 字段
        assert!(parse_suite("").is_err());
    }

    #[test]
    fn test_suite_without_scenarios() {
        let err = parse_suite("executable = \"./engine\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("no scenarios"));
    }

    #[test]
    fn test_unknown_assertion_kind() {
        let content = r#"
executable = "./engine"

[[scenarios]]
name = "x"
script = ["quit"]

[[scenarios.assertions]]
kind = "matches_regex"
subject = "stdout"
"#;
        assert!(parse_suite(content).is_err());
    }

    #[test]
    fn test_zero_scenario_timeout() {
        let content = r#"
executable = "./engine"

[[scenarios]]
name = "x"
script = ["quit"]
timeout_secs = 0
"#;
        let err = parse_suite(content).unwrap_err();
        assert!(format!("{err:#}").contains("timeout_secs must be greater than zero"));
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load_suite(&path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }

    #[test]
    fn test_unicode_scenario_names() {
        let content = r#"
executable = "./engine"

[[scenarios]]
name = "开局库-EPD-兼容"
script = ["quit"]
"#;
        let suite = parse_suite(content).unwrap();
        assert_eq!(suite.scenarios[0].name, "开局库-EPD-兼容");
    }

    #[test]
    fn test_load_suite_from_disk() {
        let engine = FakeEngine::new();
        let path = engine.artifact("Scenarios.toml");
        fs::write(&path, common::book_suite(&engine.executable)).unwrap();

        let suite = load_suite(&path).unwrap();
        assert_eq!(suite.scenarios.len(), 3);
        assert_eq!(suite.timeout_secs, 10);
    }
}

#[cfg(test)]
mod runtime_edge_cases {
    use super::*;

    #[tokio::test]
    async fn test_empty_script_still_runs() {
        let engine = FakeEngine::new();
        let runner = ScenarioRunner::new(
            RunnerSettings::new(&engine.executable, engine.working_dir())
                .with_default_timeout(Duration::from_secs(10)),
        );
        let empty: [&str; 0] = [];

        let result = runner.run_scenario(&Scenario::new("silent", empty)).await;

        assert!(result.passed(), "{:?}", result.failure_messages());
    }

    #[tokio::test]
    async fn test_missing_working_dir_is_a_launch_failure() {
        let engine = FakeEngine::new();
        let runner = ScenarioRunner::new(RunnerSettings::new(
            &engine.executable,
            engine.working_dir().join("does-not-exist"),
        ));

        let result = runner.run_scenario(&Scenario::new("handshake", ["uci", "quit"])).await;

        assert!(!result.passed());
        assert_eq!(result.failures.len(), 1);
        assert!(result.failure_messages()[0].contains("failed to launch process"));
    }
}
