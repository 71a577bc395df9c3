//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a run summary as a self-contained HTML page: totals,
//! a results table and, for each failed scenario, a collapsible panel with
//! its failure reasons and captured output.
//!
//! 此模块将运行摘要渲染为独立的 HTML 页面：总计、结果表格，
//! 以及每个失败场景的可折叠面板（包含失败原因和捕获的输出）。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::{RunResult, TestSummary};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Renders the HTML report of a summary.
/// maud escapes all interpolated text, so process output is safe to embed.
///
/// 渲染摘要的 HTML 报告。maud 会转义所有插值文本，因此可以安全嵌入进程输出。
pub fn render_html_report(summary: &TestSummary, locale: &str) -> String {
    let title = t!("html_report.title", locale = locale).into_owned();
    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale).into_owned()) }
                p class="timestamp" {
                    (summary.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    " · "
                    (format!("{:.2}s", summary.elapsed().as_secs_f64()))
                }
                div class="summary-container" {
                    (summary_item(summary.total, "", &t!("html_report.summary.total", locale = locale)))
                    (summary_item(summary.passed, "passed-text", &t!("html_report.summary.passed", locale = locale)))
                    (summary_item(summary.failed(), "failed-text", &t!("html_report.summary.failed", locale = locale)))
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale).into_owned()) }
                            th class="status-col" { (t!("html_report.table.header.status", locale = locale).into_owned()) }
                            th class="exit-cell" { (t!("html_report.table.header.exit_code", locale = locale).into_owned()) }
                            th class="duration-cell" { (t!("html_report.table.header.duration", locale = locale).into_owned()) }
                        }
                    }
                    tbody {
                        @for (i, result) in summary.results.iter().enumerate() {
                            (result_rows(i, result, locale))
                        }
                    }
                }
                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    };
    markup.into_string()
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn result_rows(index: usize, result: &RunResult, locale: &str) -> Markup {
    let output_id = format!("output-{index}");
    let (status_class, status) = if result.passed() {
        ("status-passed", t!("status.passed", locale = locale).into_owned())
    } else {
        ("status-failed", t!("status.failed", locale = locale).into_owned())
    };
    html! {
        tr {
            td { (result.scenario_name) }
            td class="status-col" {
                div class={ "status-cell " (status_class) } { (status) }
                @if !result.passed() {
                    div class="output-toggle" onclick=(format!("toggleOutput('{output_id}')")) {
                        (t!("html_report.toggle_output", locale = locale).into_owned())
                    }
                }
            }
            td class="exit-cell" {
                @if result.launched { (result.exit_code) } @else { "-" }
            }
            td class="duration-cell" { (format!("{:.2}s", result.duration.as_secs_f64())) }
        }
        @if !result.passed() {
            tr id=(output_id) style="display:none;" {
                td colspan="4" {
                    ul class="failure-list" {
                        @for failure in &result.failures {
                            li { span class="failure-kind" { (failure.kind.as_str()) } " " (failure.message) }
                        }
                    }
                    pre class="output-content" { (result.transcript) }
                }
            }
        }
    }
}

/// Generates the HTML report and writes it to `output_path`.
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件则返回错误。
pub fn generate_html_report(summary: &TestSummary, output_path: &Path, locale: &str) -> Result<()> {
    fs::write(output_path, render_html_report(summary, locale))
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Failure;
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_report_escapes_process_output() {
        let failing = RunResult {
            scenario_name: "pgn-output".to_string(),
            launched: true,
            exit_code: 2,
            stdout_text: String::new(),
            stderr_text: "<script>alert(1)</script>".to_string(),
            transcript: "<script>alert(1)</script>".to_string(),
            timed_out: false,
            artifact_text: None,
            failures: vec![Failure::assertion("exit_code expected 0, got 2")],
            duration: Duration::from_millis(50),
        };
        let now = Utc::now();
        let summary = TestSummary::new(vec![failing], vec![], now, now);
        let page = render_html_report(&summary, "en");

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("pgn-output"));
        assert!(page.contains("exit_code expected 0, got 2"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert(1)</script>"));
    }
}
