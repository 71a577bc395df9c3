//! # Scenario Planner Module / 场景执行计划模块
//!
//! This module decides which scenarios of a suite this invocation runs:
//! an optional name filter, then an optional round-robin split across
//! several CI runners. Suite order is preserved.
//!
//! 此模块决定本次调用运行套件中的哪些场景：
//! 先按名称进行可选过滤，再在多个 CI 运行器之间进行可选的轮询分配。保持套件中的顺序。

use crate::core::config::Scenario;
use anyhow::{Result, bail};

/// The scenarios selected for this invocation.
/// 为本次调用选定的场景。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// Scenarios to run, in suite order.
    /// 要运行的场景，保持套件中的顺序。
    pub scenarios_to_run: Vec<Scenario>,
    /// The number of scenarios whose name did not match the filter.
    /// 名称与过滤条件不匹配的场景数量。
    pub filtered_out_count: usize,
    /// Whether the scenarios are distributed across multiple runners (CI environment).
    /// 场景是否分布在多个运行器上（CI 环境）。
    pub is_distributed: bool,
}

/// Creates an execution plan for the given scenarios.
///
/// # Arguments
/// * `scenarios` - All scenarios of the suite, in suite order
/// * `filter` - Optional substring a scenario name must contain
/// * `total_runners` - Optional total number of runners for distributed execution
/// * `runner_index` - Optional index of this runner (0-based)
///
/// # Returns
/// An `ExecutionPlan`, or an error if the runner options are inconsistent
///
/// 为给定场景创建执行计划。
pub fn plan_execution(
    scenarios: Vec<Scenario>,
    filter: Option<&str>,
    total_runners: Option<usize>,
    runner_index: Option<usize>,
) -> Result<ExecutionPlan> {
    let (selected, filtered_out): (Vec<_>, Vec<_>) = scenarios
        .into_iter()
        .partition(|s| filter.is_none_or(|f| s.name.contains(f)));

    let (scenarios_to_run, is_distributed) = match (total_runners, runner_index) {
        (Some(total), Some(index)) => {
            if total == 0 {
                bail!("--total-runners must be greater than zero.");
            }
            if index >= total {
                bail!("Runner index must be less than total runners.");
            }
            let shard = selected
                .into_iter()
                .enumerate()
                .filter(|(i, _)| i % total == index)
                .map(|(_, scenario)| scenario)
                .collect();
            (shard, true)
        }
        (None, None) => (selected, false),
        _ => bail!("Both --total-runners and --runner-index must be provided."),
    };

    Ok(ExecutionPlan {
        scenarios_to_run,
        filtered_out_count: filtered_out.len(),
        is_distributed,
    })
}
