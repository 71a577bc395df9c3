//! # Logging Module / 日志模块
//!
//! Structured diagnostics go to stderr through `tracing`, leaving stdout to the
//! report. `RUST_LOG` overrides the level chosen from `--verbose`.
//!
//! 结构化诊断信息通过 `tracing` 输出到 stderr，stdout 留给报告使用。
//! `RUST_LOG` 会覆盖由 `--verbose` 选择的级别。

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// The filter used when `RUST_LOG` is not set.
/// 未设置 `RUST_LOG` 时使用的过滤器。
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "scenario_runner=info,warn",
        1 => "scenario_runner=debug,warn",
        _ => "scenario_runner=trace,info",
    }
}

/// Installs the global subscriber for the command-line tool.
/// A second call is ignored.
///
/// 为命令行工具安装全局订阅者。重复调用会被忽略。
pub fn init_cli(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_the_crate_level() {
        assert_eq!(default_filter(0), "scenario_runner=info,warn");
        assert_eq!(default_filter(1), "scenario_runner=debug,warn");
        assert_eq!(default_filter(7), "scenario_runner=trace,info");
    }
}
