//! # Process Driver Unit Tests / 进程驱动单元测试
//!
//! Exercises `ProcessDriver` against ordinary system programs.
//!
//! 使用常见的系统程序测试 `ProcessDriver`。
#![cfg(unix)]

use scenario_runner::infra::command::{ProcessDriver, render_script};
use scenario_runner::models::{TIMEOUT_EXIT_CODE, TIMEOUT_MESSAGE};
use std::io::ErrorKind;
use std::time::Duration;

#[cfg(test)]
mod run_tests {
    use super::*;

    #[tokio::test]
    async fn test_script_reaches_stdin_in_order() {
        // cat 原样回显 stdin，并在输入结束时退出
        let driver = ProcessDriver::new("cat", ".");
        let script = ["uci", "isready", "quit"];

        let output = driver.run(&script, Duration::from_secs(10)).await.unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, render_script(&script));
        assert!(output.stderr.is_empty());
        assert!(!output.timed_out);
    }

    #[tokio::test]
    async fn test_empty_script_closes_stdin_immediately() {
        let driver = ProcessDriver::new("cat", ".");
        let empty: [&str; 0] = [];

        let output = driver.run(&empty, Duration::from_secs(10)).await.unwrap();

        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_nonexistent_executable_is_an_error() {
        // 不存在的可执行文件应该返回错误，而不是结果
        let driver = ProcessDriver::new("this_command_does_not_exist_12345", ".");

        let err = driver
            .run(&["quit"], Duration::from_secs(10))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported() {
        let driver = ProcessDriver::new("false", ".");

        let output = driver.run(&["quit"], Duration::from_secs(10)).await.unwrap();

        assert_eq!(output.exit_code, 1);
        assert!(!output.timed_out);
    }

    #[tokio::test]
    async fn test_stderr_is_captured_separately() {
        // sh 从 stdin 读取命令
        let driver = ProcessDriver::new("sh", ".");

        let output = driver
            .run(&["echo info string ready", "echo engine warning >&2", "exit 3"], Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, "info string ready\n");
        assert_eq!(output.stderr, "engine warning\n");
        assert!(output.transcript.contains("info string ready"));
        assert!(output.transcript.contains("engine warning"));
    }

    #[tokio::test]
    async fn test_timeout_kills_the_process() {
        let driver = ProcessDriver::new("sh", ".");

        let output = driver
            .run(&["echo searching", "exec sleep 30"], Duration::from_millis(300))
            .await
            .unwrap();

        assert!(output.timed_out);
        assert_eq!(output.exit_code, TIMEOUT_EXIT_CODE);
        assert!(output.stdout.contains("searching"));
        assert!(output.stderr.ends_with(&format!("{TIMEOUT_MESSAGE}\n")));
        assert!(output.duration < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_relative_program_resolves_against_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        let driver = ProcessDriver::new("./bin/missing-engine", dir.path());

        assert_eq!(driver.program(), dir.path().join("./bin/missing-engine"));
        let err = driver.run(&["quit"], Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_large_output_does_not_block() {
        // 输出远大于管道缓冲区
        let driver = ProcessDriver::new("cat", ".");
        let script: Vec<String> = (0..20_000)
            .map(|i| format!("info depth 1 seldepth 1 multipv 1 score cp {i}"))
            .collect();

        let output = driver.run(&script, Duration::from_secs(30)).await.unwrap();

        assert!(!output.timed_out);
        assert_eq!(output.stdout.lines().count(), 20_000);
    }
}
