//! # Scenario Execution Engine Module / 场景执行引擎模块
//!
//! This module runs scenarios: it drives the executable with each scenario's
//! script, inspects the artifact the process left behind, evaluates every
//! assertion and removes the artifacts once the batch is over.
//!
//! 此模块负责运行场景：使用每个场景的脚本驱动可执行文件，检查进程留下的产物，
//! 评估所有断言，并在整批运行结束后删除产物。

use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::core::assertions::{self, ArtifactState, Observation};
use crate::core::config::{RunnerSettings, Scenario};
use crate::core::models::{Failure, FailureKind, RunResult, TestSummary};
use crate::infra::command::ProcessDriver;
use crate::infra::fs::ArtifactInspector;

/// Runs scenarios one after another against a single executable.
/// 针对单个可执行文件逐个运行场景。
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    settings: RunnerSettings,
    driver: ProcessDriver,
    inspector: ArtifactInspector,
}

impl ScenarioRunner {
    pub fn new(settings: RunnerSettings) -> Self {
        let driver = ProcessDriver::new(&settings.executable, &settings.working_dir);
        let inspector = ArtifactInspector::new(&settings.working_dir);
        Self {
            settings,
            driver,
            inspector,
        }
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Executes one scenario and evaluates all of its assertions.
    ///
    /// # Arguments
    /// * `scenario` - The scenario to run
    ///
    /// # Returns
    /// Exactly one `RunResult`. Problems with the process or its artifact are
    /// recorded as failures, never returned as errors.
    ///
    /// 执行一个场景并评估其全部断言。
    /// 进程或产物的问题会记录为失败，而不会作为错误返回。
    pub async fn run_scenario(&self, scenario: &Scenario) -> RunResult {
        let timeout = self.settings.timeout_for(scenario);
        info!(scenario = %scenario.name, timeout_secs = timeout.as_secs(), "running scenario");

        let output = match self.driver.run(&scenario.script, timeout).await {
            Ok(output) => output,
            Err(e) => {
                warn!(scenario = %scenario.name, error = %e, "failed to launch process");
                return RunResult::launch_failed(&scenario.name, &e);
            }
        };

        let mut failures = Vec::new();
        if output.timed_out {
            failures.push(Failure::new(
                FailureKind::Timeout,
                format!("process timed out after {}s", timeout.as_secs_f64()),
            ));
        }

        let mut unreadable = false;
        let artifact_text = match &scenario.artifact {
            Some(path) => match self.inspector.read_if_exists(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(scenario = %scenario.name, error = %format!("{e:#}"), "artifact unreadable");
                    unreadable = true;
                    None
                }
            },
            None => None,
        };

        let artifact = match (scenario.artifact.as_deref(), artifact_text.as_deref()) {
            (None, _) => ArtifactState::NotDeclared,
            (Some(_), Some(text)) => ArtifactState::Present(text),
            (Some(path), None) if unreadable => ArtifactState::Unreadable(path),
            (Some(path), None) => ArtifactState::Missing(path),
        };

        // Artifact problems nobody asserts on still fail the scenario.
        if !scenario.inspects_artifact() {
            match artifact {
                ArtifactState::Missing(path) => failures.push(Failure::new(
                    FailureKind::ArtifactMissing,
                    format!("artifact not produced: {}", path.display()),
                )),
                ArtifactState::Unreadable(path) => failures.push(Failure::new(
                    FailureKind::ArtifactUnreadable,
                    format!("artifact unreadable: {}", path.display()),
                )),
                ArtifactState::NotDeclared | ArtifactState::Present(_) => {}
            }
        }

        let observation = Observation {
            exit_code: output.exit_code,
            stdout: &output.stdout,
            stderr: &output.stderr,
            artifact,
        };
        failures.extend(assertions::evaluate_all(
            &scenario.effective_assertions(),
            &observation,
        ));

        let result = RunResult {
            scenario_name: scenario.name.clone(),
            launched: true,
            exit_code: output.exit_code,
            stdout_text: output.stdout,
            stderr_text: output.stderr,
            transcript: output.transcript,
            timed_out: output.timed_out,
            artifact_text,
            failures,
            duration: output.duration,
        };

        info!(
            scenario = %result.scenario_name,
            passed = result.passed(),
            failures = result.failures.len(),
            "scenario finished"
        );
        result
    }

    /// Runs a batch of scenarios in order and summarizes the outcome.
    ///
    /// Stale artifacts are removed before the first scenario starts; every
    /// referenced artifact is removed after the last one, whatever the outcome.
    ///
    /// 按顺序运行一批场景并汇总结果。
    /// 第一个场景开始前删除遗留产物；最后一个场景结束后无论结果如何都删除所有引用的产物。
    pub async fn run_all(&self, scenarios: &[Scenario]) -> TestSummary {
        let started_at = Utc::now();
        let stale = self.cleanup(scenarios);
        if !stale.is_empty() {
            info!(count = stale.len(), "removed stale artifacts before the run");
        }

        let mut results = Vec::with_capacity(scenarios.len());
        for (index, scenario) in scenarios.iter().enumerate() {
            debug!(position = index + 1, total = scenarios.len(), scenario = %scenario.name, "next scenario");
            results.push(self.run_scenario(scenario).await);
        }

        let cleaned = self.cleanup(scenarios);
        let finished_at = Utc::now();
        TestSummary::new(results, cleaned, started_at, finished_at)
    }

    /// Deletes every artifact referenced by `scenarios`.
    ///
    /// A file that does not exist is skipped; any other error is logged and the
    /// remaining files are still removed. Calling this twice is harmless.
    ///
    /// # Returns
    /// The resolved paths of the files actually removed.
    ///
    /// 删除 `scenarios` 引用的所有产物。不存在的文件会被跳过；
    /// 其他错误会被记录，其余文件仍会被删除。重复调用是无害的。
    pub fn cleanup(&self, scenarios: &[Scenario]) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for path in scenarios.iter().filter_map(|s| s.artifact.as_deref()) {
            match self.inspector.remove_if_exists(path) {
                Ok(true) => removed.push(self.inspector.resolve(path)),
                Ok(false) => {}
                Err(e) => warn!(error = %format!("{e:#}"), "cleanup failed"),
            }
        }
        removed
    }
}
