//! # JSON Reporting Module / JSON 报告模块
//!
//! Serializes the whole run summary, including every captured stream and
//! failure, for consumption by other tools.
//!
//! 序列化整个运行摘要（包括所有捕获的输出流和失败信息），供其他工具使用。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::models::TestSummary;

/// Renders the summary as pretty-printed JSON.
/// 将摘要渲染为格式化的 JSON。
pub fn render_json_report(summary: &TestSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("Failed to serialize the run summary")
}

/// Writes the JSON report to `output_path`.
/// 将 JSON 报告写入 `output_path`。
pub fn generate_json_report(summary: &TestSummary, output_path: &Path) -> Result<()> {
    let json = render_json_report(summary)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))
}
