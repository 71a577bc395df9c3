//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures produced by a run: the raw
//! observation of a driven process, the per-scenario `RunResult` with its
//! categorized failures, and the aggregated `TestSummary` consumed by reporting.
//!
//! 此模块定义了运行过程中产生的核心数据结构：被驱动进程的原始观测结果、
//! 带有分类失败信息的单场景 `RunResult`，以及供报告层使用的汇总 `TestSummary`。

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Exit code reported for a process that had to be killed after its timeout.
/// 进程因超时被终止时报告的退出码。
pub const TIMEOUT_EXIT_CODE: i32 = 1;

/// Message appended to stderr when a process is killed after its timeout.
/// 进程因超时被终止时追加到 stderr 的消息。
pub const TIMEOUT_MESSAGE: &str = "Command timed out";

/// Enumerates the possible reasons for a scenario failure.
/// This helps in categorizing errors for reporting and handling.
/// 枚举场景失败的可能原因。
/// 这有助于对错误进行分类，以便报告和处理。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The executable could not be started.
    /// 可执行文件无法启动。
    Launch,
    /// The process exceeded its timeout and was killed.
    /// 进程超出超时时间并被终止。
    Timeout,
    /// An assertion did not hold.
    /// 断言不成立。
    Assertion,
    /// The expected artifact file was not produced.
    /// 预期的产物文件未生成。
    ArtifactMissing,
    /// The artifact exists but could not be read.
    /// 产物存在但无法读取。
    ArtifactUnreadable,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Launch => "launch",
            FailureKind::Timeout => "timeout",
            FailureKind::Assertion => "assertion",
            FailureKind::ArtifactMissing => "artifact_missing",
            FailureKind::ArtifactUnreadable => "artifact_unreadable",
        }
    }
}

/// One human-readable failure entry of a scenario.
/// 场景的一条可读的失败记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Assertion, message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What the driver observed from a single process invocation.
/// 驱动器从单次进程调用中观测到的内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// stdout and stderr interleaved in arrival order.
    /// 按到达顺序交错的 stdout 和 stderr。
    pub transcript: String,
    pub timed_out: bool,
    pub duration: Duration,
}

/// Represents the final result of a single scenario execution.
/// A scenario passed if and only if `failures` is empty.
///
/// 表示单个场景执行的最终结果。
/// 当且仅当 `failures` 为空时场景通过。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub scenario_name: String,
    /// `false` when the executable could not be started at all.
    /// 当可执行文件完全无法启动时为 `false`。
    pub launched: bool,
    pub exit_code: i32,
    pub stdout_text: String,
    pub stderr_text: String,
    #[serde(skip)]
    pub transcript: String,
    pub timed_out: bool,
    /// Text of the artifact, `None` when no artifact is declared or the file is absent.
    /// 产物文本；未声明产物或文件不存在时为 `None`。
    pub artifact_text: Option<String>,
    pub failures: Vec<Failure>,
    pub duration: Duration,
}

impl RunResult {
    /// The result of a scenario whose executable never started.
    pub fn launch_failed(scenario_name: &str, error: &std::io::Error) -> Self {
        Self {
            scenario_name: scenario_name.to_string(),
            launched: false,
            exit_code: -1,
            stdout_text: String::new(),
            stderr_text: String::new(),
            transcript: String::new(),
            timed_out: false,
            artifact_text: None,
            failures: vec![Failure::new(
                FailureKind::Launch,
                format!("failed to launch process: {error}"),
            )],
            duration: Duration::ZERO,
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failure descriptions, in the order they were recorded.
    /// 按记录顺序排列的失败描述。
    pub fn failure_messages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.message.as_str()).collect()
    }

    pub fn has_failure(&self, kind: FailureKind) -> bool {
        self.failures.iter().any(|f| f.kind == kind)
    }
}

/// Aggregated outcome of a batch of scenarios.
/// 一批场景的汇总结果。
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub results: Vec<RunResult>,
    /// Artifact files removed by the post-run cleanup.
    /// 运行后清理所删除的产物文件。
    pub cleaned_artifacts: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TestSummary {
    pub fn new(
        results: Vec<RunResult>,
        cleaned_artifacts: Vec<PathBuf>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        Self {
            total: results.len(),
            passed,
            results,
            cleaned_artifacts,
            started_at,
            finished_at,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Wall-clock time between the start and the end of the batch.
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, failures: Vec<Failure>) -> RunResult {
        RunResult {
            scenario_name: name.to_string(),
            launched: true,
            exit_code: 0,
            stdout_text: String::new(),
            stderr_text: String::new(),
            transcript: String::new(),
            timed_out: false,
            artifact_text: None,
            failures,
            duration: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_summary_counts() {
        let now = Utc::now();
        let summary = TestSummary::new(
            vec![
                result("a", vec![]),
                result("b", vec![Failure::assertion("stdout_text is empty")]),
                result("c", vec![]),
            ],
            vec![],
            now,
            now,
        );
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_passed());
        let failed: Vec<_> = summary.failures().map(|r| r.scenario_name.as_str()).collect();
        assert_eq!(failed, vec!["b"]);
    }

    #[test]
    fn test_launch_failed_result() {
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let result = RunResult::launch_failed("missing-engine", &error);
        assert!(!result.passed());
        assert!(!result.launched);
        assert!(result.has_failure(FailureKind::Launch));
        assert_eq!(
            result.failure_messages(),
            vec!["failed to launch process: No such file or directory"]
        );
    }
}
