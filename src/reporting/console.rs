//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints a run's summary to the console: one status line per
//! scenario with its failure reasons, the `passed/total` tally and an overall
//! banner, followed by captured output for the scenarios that failed.
//!
//! 此模块在控制台打印运行摘要：每个场景一行状态及其失败原因、`通过数/总数` 统计
//! 和总体横幅，随后是失败场景的捕获输出。

use colored::*;

use crate::core::assertions::excerpt;
use crate::core::models::{RunResult, TestSummary};
use crate::infra::t;

/// The pass/fail marker and localized status word of a result.
fn status_parts(result: &RunResult, locale: &str) -> (&'static str, String) {
    if result.passed() {
        ("✅", t!("status.passed", locale = locale).to_string())
    } else {
        ("❌", t!("status.failed", locale = locale).to_string())
    }
}

/// Formats the status line of one scenario, with the status word colored.
///
/// ```text
/// ✅ Passed   | epd-compat                               |     0.42s
/// ```
///
/// 格式化单个场景的状态行，状态词带颜色。
pub fn status_line(result: &RunResult, locale: &str) -> String {
    let (marker, status) = status_parts(result, locale);
    let status = if result.passed() {
        status.green()
    } else {
        status.red()
    };
    format!(
        "{} {:<8} | {:<40} | {:>8.2}s",
        marker,
        status,
        result.scenario_name,
        result.duration.as_secs_f64()
    )
}

/// Formats the `passed/total` tally line.
/// 格式化 `通过数/总数` 统计行。
pub fn tally_line(summary: &TestSummary, locale: &str) -> String {
    t!(
        "summary.tally",
        locale = locale,
        passed = summary.passed,
        total = summary.total
    )
    .to_string()
}

/// Prints a formatted summary of scenario results to the console.
///
/// # Arguments / 参数
/// * `summary` - The summary of the batch
///               批次的汇总
/// * `locale` - The language locale to use for messages
///              用于消息的语言区域设置
///
/// # Output Format / 输出格式
/// ```text
/// --- Scenario Summary ---
/// ✅ Passed   | epd-compat                               |     0.42s
/// ❌ Failed   | pgn-output                               |     0.37s
///      - artifact_text missing expected substrings: ["[Variant"]
///
/// Test Results: 1/2 scenarios passed
/// ❌ Some scenarios failed.
/// ```
pub fn print_summary(summary: &TestSummary, locale: &str) {
    println!("\n{}", t!("summary.banner", locale = locale).bold());

    for result in &summary.results {
        println!("{}", status_line(result, locale));
        for failure in &result.failures {
            println!("     - {}", failure.message.yellow());
        }
    }

    if !summary.cleaned_artifacts.is_empty() {
        println!(
            "\n{}",
            t!(
                "summary.cleaned",
                locale = locale,
                count = summary.cleaned_artifacts.len()
            )
            .dimmed()
        );
    }

    println!("\n{}", tally_line(summary, locale).bold());
    if summary.all_passed() {
        println!("{}", t!("summary.all_passed", locale = locale).green().bold());
    } else {
        println!("{}", t!("summary.some_failed", locale = locale).red().bold());
    }
}

/// Prints the captured output of every failed scenario, helping to see what
/// the process actually said.
///
/// 打印每个失败场景的捕获输出，帮助查看进程实际输出的内容。
pub fn print_failure_details(summary: &TestSummary, locale: &str) {
    let failed: Vec<&RunResult> = summary.failures().collect();
    if failed.is_empty() {
        return;
    }

    println!("\n{}", t!("details.banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in failed.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failed.len(),
            t!("details.header", locale = locale).red(),
            result.scenario_name.cyan()
        );
        if !result.launched {
            println!("{}", t!("details.not_launched", locale = locale).yellow());
        } else {
            println!(
                "{}",
                t!("details.exit_code", locale = locale, code = result.exit_code)
            );
            println!("\n--- {} ---", t!("details.output_log", locale = locale).yellow());
            let output = if result.transcript.trim().is_empty() {
                t!("details.no_output", locale = locale).to_string()
            } else {
                excerpt(&result.transcript)
            };
            println!("{}", output);
        }
        println!("\n{}", "-".repeat(80));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Failure;
    use chrono::Utc;
    use std::time::Duration;

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
            duration: Duration::from_millis(420),
        }
    }

    #[test]
    fn test_status_line_marks_pass_and_fail() {
        let passed = status_line(&result("epd-compat", vec![]), "en");
        assert!(passed.starts_with("✅ "));
        assert!(passed.contains("Passed"));
        assert!(passed.contains("epd-compat"));
        assert!(passed.ends_with("0.42s"));

        let failed = status_line(
            &result("pgn-output", vec![Failure::assertion("artifact_text is empty")]),
            "en",
        );
        assert!(failed.starts_with("❌ "));
        assert!(failed.contains("Failed"));
    }

    #[test]
    fn test_tally_line() {
        let now = Utc::now();
        let summary = TestSummary::new(
            vec![
                result("a", vec![]),
                result("b", vec![Failure::assertion("stdout_text is empty")]),
            ],
            vec![],
            now,
            now,
        );
        assert_eq!(tally_line(&summary, "en"), "Test Results: 1/2 scenarios passed");
    }
}
