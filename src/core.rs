//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the scenario runner:
//! the suite configuration, result models, assertion evaluation, planning
//! and the execution engine.
//!
//! 此模块包含场景运行器的核心功能：套件配置、结果模型、断言评估、执行计划和执行引擎。

pub mod assertions;
pub mod config;
pub mod execution;
pub mod models;
pub mod planner;

// Re-exports
pub use config::{Assertion, RunnerSettings, Scenario, Subject, SuiteConfig};
pub use execution::ScenarioRunner;
pub use models::{RunResult, TestSummary};
