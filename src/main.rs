//! svcmon 主程序
//!
//! 加载配置，启动状态面板 HTTP 服务，或执行一次性检查

mod cli;
mod error;
mod observability;
mod process;

use clap::Parser;
use observability::{init_observability, init_observability_stderr};
use std::path::{Path, PathBuf};
use svcmon::service::{ServiceManager, StatusService};
use svcmon_common::config::MonitorConfig;
use tracing::{error, info, warn};

use probe::ProbeAggregator;

// 启动阶段的提示输出到 stderr，stdout 只留给命令结果（如 `check` 的报告）
macro_rules! bootstrap_info {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

macro_rules! bootstrap_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

use cli::{Cli, Commands};
use error::{Error, Result};

/// Application launcher utilities
struct ApplicationLauncher;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Test { config_file }) => {
            let config_path =
                ApplicationLauncher::find_config_file(config_file.as_ref().unwrap_or(&cli.config))?;
            ApplicationLauncher::test_config_file(config_path.as_deref())
        }
        Some(Commands::Check) => {
            let config_path = ApplicationLauncher::find_config_file(&cli.config)?;
            let config = ApplicationLauncher::load_config(config_path.as_deref())?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(ApplicationLauncher::run_check_once(config))
        }
        None => {
            let config_path = ApplicationLauncher::find_config_file(&cli.config)?;
            let config = ApplicationLauncher::load_config(config_path.as_deref())?;

            // Create Tokio runtime（before running the application）
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            // Run the asynchronous application
            runtime.block_on(ApplicationLauncher::run_application(config))
        }
    }
}

impl ApplicationLauncher {
    /// Find config file with fallback locations
    ///
    /// An explicitly provided path must exist. Without one, the standard
    /// locations are searched and `None` means "use built-in defaults".
    fn find_config_file(provided_path: &PathBuf) -> Result<Option<PathBuf>> {
        if provided_path != Path::new("config.toml") {
            if provided_path.exists() {
                bootstrap_info!("Using provided config file: {:?}", provided_path);
                return Ok(Some(provided_path.clone()));
            } else {
                bootstrap_error!("Provided config file not found: {:?}", provided_path);
                return Err(Error::custom(format!(
                    "Config file not found: {provided_path:?}"
                )));
            }
        }

        let fallback_paths = vec![
            // 1. Current working directory
            PathBuf::from("config.toml"),
            // 2. System config directory
            PathBuf::from("/etc/svcmon/config.toml"),
        ];

        bootstrap_info!("Searching for config file in default locations...");

        for path in &fallback_paths {
            if path.exists() {
                bootstrap_info!("Found config file: {:?}", path);
                return Ok(Some(path.clone()));
            } else {
                bootstrap_info!("Config not found at: {:?}", path);
            }
        }

        bootstrap_info!("No configuration file found, using built-in defaults");
        Ok(None)
    }

    /// 加载并验证配置
    fn load_config(config_path: Option<&Path>) -> Result<MonitorConfig> {
        let config = match config_path {
            Some(path) => {
                bootstrap_info!("📄 加载配置文件: {:?}", path);
                MonitorConfig::from_file(path).map_err(|e| {
                    bootstrap_error!("❌ 配置加载失败: {}", e);
                    Error::custom(format!("配置加载失败: {e}"))
                })?
            }
            None => MonitorConfig::default(),
        };
        bootstrap_info!("✅ 配置加载成功");

        if let Err(errors) = config.validate() {
            bootstrap_error!("❌ 配置验证发现问题:");
            let mut has_critical_errors = false;
            for (i, err) in errors.iter().enumerate() {
                if err.starts_with("Warning:") {
                    bootstrap_info!("  {}. ⚠️  {}", i + 1, err);
                } else {
                    bootstrap_error!("  {}. ❌ {}", i + 1, err);
                    has_critical_errors = true;
                }
            }
            if has_critical_errors {
                return Err(Error::service_validation("配置验证失败，请修复上述错误"));
            }
        }

        Ok(config)
    }

    /// 测试配置文件是否有效
    fn test_config_file(config_path: Option<&Path>) -> Result<()> {
        // Initialize basic logging for test command
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();

        let config = match config_path {
            Some(path) => match MonitorConfig::from_file(path) {
                Ok(config) => {
                    info!("✅ 配置文件解析成功: {:?}", path);
                    config
                }
                Err(e) => {
                    error!("❌ 配置文件解析失败: {}", e);
                    return Err(Error::service_validation(format!("配置解析失败: {e}")));
                }
            },
            None => {
                info!("未找到配置文件，验证内置默认配置");
                MonitorConfig::default()
            }
        };

        match config.validate() {
            Ok(()) => {
                info!("✅ 配置验证通过");
            }
            Err(errors) => {
                error!("❌ 配置验证发现问题:");
                for (i, err) in errors.iter().enumerate() {
                    if err.starts_with("Warning:") {
                        info!("  {}. ⚠️  {}", i + 1, err);
                    } else {
                        error!("  {}. ❌ {}", i + 1, err);
                    }
                }
                // 检查是否有非警告错误
                let has_errors = errors.iter().any(|e| !e.starts_with("Warning:"));
                if has_errors {
                    return Err(Error::service_validation("配置验证失败"));
                }
            }
        }

        info!("📊 已注册 {} 个检查:", config.checks.len());
        for check in &config.checks {
            info!(
                "  - {} ({}, timeout {:?}): {}",
                check.name,
                check.kind(),
                check.timeout(),
                check.target.describe()
            );
        }
        Ok(())
    }

    /// 执行一次全部检查并输出结果
    async fn run_check_once(config: MonitorConfig) -> Result<()> {
        let _observability_guard = init_observability_stderr(&config)?;

        let aggregator = ProbeAggregator::from_config(&config)?;
        let report = aggregator.generate_report().await;

        println!("Service status at {}", report.timestamp());
        for status in report.iter() {
            println!(
                "  {:<16} {}",
                status.name,
                if status.healthy { "healthy" } else { "UNHEALTHY" }
            );
        }

        let unhealthy = report.len() - report.healthy_count();
        if unhealthy > 0 {
            return Err(Error::Unhealthy {
                unhealthy,
                total: report.len(),
            });
        }
        Ok(())
    }

    /// 运行应用程序的主入口
    async fn run_application(config: MonitorConfig) -> Result<()> {
        // 初始化可观测性系统（日志）
        let _observability_guard = init_observability(&config)?;

        // 写入 PID 文件
        let pid_path = process::ProcessManager::write_pid_file(config.pid.as_deref())?;
        let _pid_guard = process::PidFileGuard::new(pid_path);

        info!("🚀 启动 {} 状态面板", config.name);

        if let Err(e) = svcmon_common::metrics::register_metrics() {
            warn!(
                "Prometheus metrics registration warning (may already be registered): {}",
                e
            );
        }

        let aggregator = ProbeAggregator::from_config(&config)?;
        Self::display_checks(&aggregator);

        // 初始化全局关闭通道
        let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(10);
        setup_ctrl_c_handler(shutdown_tx.clone()).await;

        let service_manager = ServiceManager::new(config.clone(), shutdown_tx.clone());
        let status_service = StatusService::new(config.name.clone(), aggregator);
        let (handle, local_addr) = service_manager
            .start(status_service.build_router())
            .await
            .map_err(|e| Error::service_startup(format!("HTTP 服务启动失败: {e}")))?;

        Self::display_service_info(&local_addr.to_string());

        if let Err(e) = handle.await {
            error!("Service task terminated unexpectedly: {}", e);
            service_manager.stop();
        }

        info!("🛑 服务已安全关闭");
        Ok(())
    }

    /// 显示检查注册表
    fn display_checks(aggregator: &ProbeAggregator) {
        info!(
            "📊 计划检查的服务（{}）:",
            if aggregator.is_concurrent() {
                "并发"
            } else {
                "顺序"
            }
        );
        for check in aggregator.checks() {
            info!(
                "  - {} [{}] {}",
                check.name,
                check.kind(),
                check.target.describe()
            );
        }
    }

    /// 显示服务信息
    fn display_service_info(addr: &str) {
        info!("✅ 状态面板已启动");
        info!("📡 HTTP 服务器监听在: http://{}", addr);
        info!("🔧 可用的端点:");
        info!("  - http://{}/", addr);
        info!("  - http://{}/health", addr);
        info!("  - http://{}/api/status", addr);
        info!("  - http://{}/metrics", addr);
    }
}

/// 设置Ctrl-C信号处理程序
async fn setup_ctrl_c_handler(shutdown_tx: tokio::sync::broadcast::Sender<()>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("无法监听Ctrl-C信号: {}", e);
            return;
        }
        info!("收到Ctrl-C信号，开始优雅关闭...");
        let _ = shutdown_tx.send(());
    });
}
