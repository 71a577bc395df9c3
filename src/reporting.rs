//! # Reporting Module / 报告模块
//!
//! This module projects a finished `TestSummary` into reports: a colored
//! console summary, a standalone HTML page and a JSON document. Nothing here
//! runs processes or changes results.
//!
//! 此模块将完成的 `TestSummary` 投影为报告：彩色控制台摘要、独立的 HTML 页面和 JSON 文档。
//! 这里不会运行进程，也不会修改结果。

pub mod console;
pub mod html;
pub mod json;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::generate_html_report;
pub use json::generate_json_report;
