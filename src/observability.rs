use crate::error::Result;
use std::fs;
use svcmon_common::config::{LogConfig, MonitorConfig};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Guard for observability resources (non-blocking log writer)
#[derive(Default)]
pub struct ObservabilityGuard {
    log_guard: Option<WorkerGuard>,
}

impl ObservabilityGuard {
    pub fn has_file_writer(&self) -> bool {
        self.log_guard.is_some()
    }
}

/// Initialize logging based on configuration (console logs go to stdout)
pub fn init_observability(config: &MonitorConfig) -> Result<ObservabilityGuard> {
    init_with_console(config, std::io::stdout)
}

/// Initialize logging for one-shot commands whose stdout carries the result
///
/// Console logs go to stderr so stdout only holds the printed report.
pub fn init_observability_stderr(config: &MonitorConfig) -> Result<ObservabilityGuard> {
    init_with_console(config, std::io::stderr)
}

fn init_with_console<C>(config: &MonitorConfig, console: C) -> Result<ObservabilityGuard>
where
    C: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let mut guard = ObservabilityGuard::default();
    let log_config = &config.observability_config().log;

    match log_config.output.as_str() {
        "file" => {
            fs::create_dir_all(&log_config.path)?;
            let (non_blocking, worker_guard) = build_file_writer(log_config, log_config.rotate)?;
            guard.log_guard = Some(worker_guard);

            init_subscriber_with_writer(non_blocking, false, config);
        }
        _ => {
            init_subscriber_with_writer(console, true, config);
        }
    }

    Ok(guard)
}

/// Create an EnvFilter from config, with RUST_LOG taking precedence
fn create_env_filter(config: &MonitorConfig) -> EnvFilter {
    let directive = config.get_filter_level();

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!(
            "Failed to parse filter directive: {}. Falling back to default: info",
            directive
        );
        EnvFilter::new("info")
    })
}

fn init_subscriber_with_writer<W>(writer: W, use_ansi: bool, config: &MonitorConfig)
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(use_ansi)
        .with_writer(writer);

    // try_init: a second initialization (e.g. in tests) keeps the first subscriber
    tracing_subscriber::registry()
        .with(create_env_filter(config))
        .with(fmt_layer)
        .try_init()
        .ok();
}

fn build_file_writer(log_config: &LogConfig, rotate: bool) -> Result<(NonBlocking, WorkerGuard)> {
    eprintln!("日志写入模式: 文件");
    eprintln!("  - 路径: {}", log_config.path);
    eprintln!("  - 轮转: {}", if rotate { "开启（按天）" } else { "关闭" });

    if rotate {
        let file_appender = tracing_appender::rolling::daily(&log_config.path, "svcmon.log");
        Ok(tracing_appender::non_blocking(file_appender))
    } else {
        let log_file_path = std::path::Path::new(&log_config.path).join("svcmon.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)?;
        Ok(tracing_appender::non_blocking(file))
    }
}
