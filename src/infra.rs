//! # Infrastructure Module / 基础设施模块
//!
//! This module provides the runner's contact with the outside world: driving
//! processes, inspecting the files they leave behind, logging and i18n.
//!
//! 此模块提供运行器与外部世界的交互：驱动进程、检查其生成的文件、日志和国际化支持。

pub mod command;
pub mod fs;
pub mod logging;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
