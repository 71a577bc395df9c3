// src/commands/run.rs

use anyhow::{Context, Result, bail};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    core::{
        config::{RunnerSettings, load_suite},
        execution::ScenarioRunner,
        planner,
    },
    reporting::{
        generate_html_report, generate_json_report, print_failure_details, print_summary,
    },
    t,
};

/// Options of the `run` subcommand. Anything set here overrides the suite file.
/// `run` 子命令的选项。此处设置的值会覆盖套件文件中的值。
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub config: PathBuf,
    pub executable: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub filter: Option<String>,
    pub total_runners: Option<usize>,
    pub runner_index: Option<usize>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// Language given with `--lang`, which wins over the suite's `language`.
    pub language: Option<String>,
}

pub async fn execute(args: RunArgs, detected_locale: &str) -> Result<()> {
    let suite = load_suite(&args.config).with_context(|| {
        t!("run.config_load_failed", locale = detected_locale, path = args.config.display()).to_string()
    })?;

    let locale = match (&args.language, &suite.language) {
        (Some(explicit), _) => crate::resolve_locale(explicit),
        (None, Some(from_suite)) => crate::resolve_locale(from_suite),
        (None, None) => detected_locale.to_string(),
    };
    rust_i18n::set_locale(&locale);

    let base_dir = suite_dir(&args.config);
    let settings = apply_overrides(suite.settings(&base_dir), &args);
    if !settings.working_dir.is_dir() {
        bail!(
            "{}",
            t!(
                "run.working_dir_missing",
                locale = &locale,
                path = settings.working_dir.display()
            )
        );
    }

    println!(
        "{}",
        t!("run.loading_suite", locale = &locale, path = args.config.display())
    );
    println!(
        "{}",
        t!("run.executable", locale = &locale, path = settings.executable.display().to_string().yellow())
    );
    println!(
        "{}",
        t!("run.working_dir", locale = &locale, path = settings.working_dir.display())
    );

    let plan = planner::plan_execution(
        suite.scenarios,
        args.filter.as_deref(),
        args.total_runners,
        args.runner_index,
    )?;

    if plan.filtered_out_count > 0 {
        println!(
            "{}",
            t!(
                "run.filtered_scenarios",
                locale = &locale,
                filtered = plan.filtered_out_count,
                remaining = plan.scenarios_to_run.len()
            )
            .cyan()
        );
    }

    if let (true, Some(total), Some(index)) = (plan.is_distributed, args.total_runners, args.runner_index) {
        println!(
            "{}",
            t!(
                "run.split_runner",
                locale = &locale,
                index = index + 1,
                total = total,
                count = plan.scenarios_to_run.len()
            )
            .bold()
        );
    } else {
        println!(
            "{}",
            t!("run.single_runner", locale = &locale, count = plan.scenarios_to_run.len()).bold()
        );
    }

    if plan.scenarios_to_run.is_empty() {
        println!("{}", t!("run.no_scenarios", locale = &locale).green());
        return Ok(());
    }

    let runner = ScenarioRunner::new(settings);
    let summary = runner.run_all(&plan.scenarios_to_run).await;

    print_summary(&summary, &locale);

    let mut failed_reports = 0usize;
    if let Some(report_path) = &args.html {
        println!(
            "\n{}",
            t!("run.html_report", locale = &locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&summary, report_path, &locale) {
            eprintln!("{} {:#}", t!("run.report_failed", locale = &locale).red(), e);
            failed_reports += 1;
        }
    }
    if let Some(report_path) = &args.json {
        println!(
            "{}",
            t!("run.json_report", locale = &locale, path = report_path.display())
        );
        if let Err(e) = generate_json_report(&summary, report_path) {
            eprintln!("{} {:#}", t!("run.report_failed", locale = &locale).red(), e);
            failed_reports += 1;
        }
    }

    if !summary.all_passed() {
        print_failure_details(&summary, &locale);
        bail!(
            "{}",
            t!(
                "run.scenarios_failed",
                locale = &locale,
                failed = summary.failed(),
                total = summary.total
            )
        );
    }
    if failed_reports > 0 {
        bail!(
            "{}",
            t!("run.reports_not_written", locale = &locale, count = failed_reports)
        );
    }
    Ok(())
}

/// The directory relative suite paths are resolved against.
fn suite_dir(config: &Path) -> PathBuf {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn apply_overrides(mut settings: RunnerSettings, args: &RunArgs) -> RunnerSettings {
    if let Some(executable) = &args.executable {
        settings.executable = executable.clone();
    }
    if let Some(working_dir) = &args.working_dir {
        settings.working_dir = working_dir.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings.default_timeout = Duration::from_secs(secs);
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_dir() {
        assert_eq!(suite_dir(Path::new("Scenarios.toml")), PathBuf::from("."));
        assert_eq!(
            suite_dir(Path::new("suites/books.toml")),
            PathBuf::from("suites")
        );
    }

    #[test]
    fn test_cli_values_override_the_suite() {
        let base = RunnerSettings::new("./src/stockfish", "/srv/bookgen");
        let args = RunArgs {
            executable: Some(PathBuf::from("/opt/engine")),
            timeout_secs: Some(5),
            ..RunArgs::default()
        };
        let settings = apply_overrides(base, &args);
        assert_eq!(settings.executable, PathBuf::from("/opt/engine"));
        assert_eq!(settings.working_dir, PathBuf::from("/srv/bookgen"));
        assert_eq!(settings.default_timeout, Duration::from_secs(5));
    }
}
