//! 统一配置管理系统
//!
//! 本模块是 svcmon 配置的"单一真理之源"。
//! 所有配置项的定义、文档、默认值都在这里统一管理。

pub mod bind;
pub mod checks;
pub mod probe;

pub use crate::config::bind::BindConfig;
pub use crate::config::checks::default_checks;
pub use crate::config::probe::ProbeConfig;
use crate::error::{ConfigError, Result};
use crate::monitoring::ServiceCheck;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// svcmon 的主配置结构体
///
/// 配置文件使用 TOML 格式，所有字段都有默认值，
/// 空文件即等价于内置的七项检查 + 0.0.0.0:8083。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitorConfig {
    /// 实例名称
    ///
    /// 显示在状态页标题与日志中，用于区分多个部署。
    #[serde(default = "default_name")]
    pub name: String,

    /// 运行环境标识
    ///
    /// - "dev": 开发环境
    /// - "prod": 生产环境，建议使用文件日志
    /// - "test": 测试环境，用于自动化测试
    #[serde(default = "default_env")]
    pub env: String,

    /// PID 文件路径（可选）
    ///
    /// 配置后启动时写入，退出时删除。
    pub pid: Option<String>,

    /// 网络绑定配置
    #[serde(default)]
    pub bind: BindConfig,

    /// 探测执行配置
    #[serde(default)]
    pub probe: ProbeConfig,

    /// 可观测性配置（日志）
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// 检查注册表
    ///
    /// 按声明顺序执行并展示。省略时使用内置的七项检查
    /// （MariaDB、Redis、NGINX、WordPress、FTP、Adminer、Static Site）。
    #[serde(default = "default_checks")]
    pub checks: Vec<ServiceCheck>,
}

/// 可观测性配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObservabilityConfig {
    /// 过滤级别
    ///
    /// 支持 EnvFilter 语法（如 "info,hyper=warn"）。默认值 "info"。
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    #[serde(default)]
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    /// 日志输出目标
    ///
    /// - "console": 仅输出到控制台（默认）
    /// - "file": 输出到文件
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志轮转开关
    ///
    /// 当 output = "file" 时有效：
    /// - true: 按天轮转日志文件
    /// - false: 追加到单个文件
    #[serde(default)]
    pub rotate: bool,

    /// 日志文件目录
    ///
    /// 当 output = "file" 时有效
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter_level: default_filter_level(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: default_log_output(),
            rotate: false,
            path: default_log_path(),
        }
    }
}

fn default_name() -> String {
    "svcmon".to_string()
}

fn default_env() -> String {
    "dev".to_string()
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs/".to_string()
}

fn default_filter_level() -> String {
    "info".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            env: default_env(),
            pid: None,
            bind: BindConfig::default(),
            probe: ProbeConfig::default(),
            observability: ObservabilityConfig::default(),
            checks: default_checks(),
        }
    }
}

impl MonitorConfig {
    /// 返回可观测性配置引用
    pub fn observability_config(&self) -> &ObservabilityConfig {
        &self.observability
    }

    /// 获取日志过滤级别，优先使用 RUST_LOG
    pub fn get_filter_level(&self) -> String {
        std::env::var("RUST_LOG")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.observability.filter_level.clone())
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::FileNotFound {
                path: path_ref.to_path_buf(),
            });
        }

        if !path_ref.is_file() {
            return Err(ConfigError::NotAFile {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml(&content)
    }

    /// 从 TOML 字符串加载配置
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 将配置序列化为 TOML 字符串
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// 验证配置有效性
    ///
    /// 返回所有发现的问题；以 "Warning:" 开头的条目不阻止启动。
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // 验证实例名称
        if self.name.trim().is_empty() {
            errors.push("Instance name cannot be empty".to_string());
        }

        // 验证环境
        if !["dev", "prod", "test"].contains(&self.env.as_str()) {
            errors.push(format!(
                "Invalid environment '{}', must be one of: dev, prod, test",
                self.env
            ));
        }

        // 验证绑定
        if self.bind.addr().is_err() {
            errors.push(format!(
                "Invalid bind ip '{}', must be a valid IP address",
                self.bind.ip
            ));
        }
        if self.bind.port == 0 {
            errors.push("Bind port cannot be 0".to_string());
        }

        // 验证过滤级别（EnvFilter 语法）
        {
            let main_level = self
                .observability
                .filter_level
                .split(',')
                .next()
                .unwrap_or("")
                .trim();
            if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
                errors.push(format!(
                    "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                    self.observability.filter_level
                ));
            }
        }

        // 验证日志输出
        if !["console", "file"].contains(&self.observability.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.observability.log.output
            ));
        }

        // 验证检查注册表
        if self.checks.is_empty() {
            errors.push("Warning: No checks configured, the status page will be empty".to_string());
        }
        let mut seen = HashSet::new();
        for check in &self.checks {
            let name = check.name.trim();
            if !name.is_empty() && !seen.insert(name) {
                errors.push(format!("Duplicate check name '{name}'"));
            }
            errors.extend(check.validate());
        }

        // 生产环境额外检查
        if self.env == "prod" && self.observability.log.output == "console" {
            errors.push("Warning: Production environment should use file logging (observability.log.output = \"file\")".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::{CheckTarget, ProbeKind};

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.name, "svcmon");
        assert_eq!(config.env, "dev");
        assert_eq!(config.bind.addr().unwrap().to_string(), "0.0.0.0:8083");
        assert!(!config.probe.concurrent);
        assert_eq!(config.checks.len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_builtin_registry() {
        let config = MonitorConfig::from_toml("").unwrap();
        assert_eq!(config.checks, default_checks());
        assert_eq!(config.bind.port, 8083);
    }

    #[test]
    fn test_toml_serialization() {
        let config = MonitorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = MonitorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.checks, config.checks);
        assert_eq!(parsed.name, config.name);
    }

    #[test]
    fn test_custom_checks_replace_defaults() {
        let config = MonitorConfig::from_toml(
            r#"
name = "lab"

[bind]
port = 9000

[probe]
concurrent = true

[[checks]]
name = "cache"
kind = "process"
command = "redis-cli"
args = ["ping"]
expect_stdout = "PONG"

[[checks]]
name = "web"
kind = "http"
url = "https://localhost:8443/"
insecure = true
timeout_secs = 2
"#,
        )
        .unwrap();

        assert_eq!(config.bind.addr().unwrap().to_string(), "0.0.0.0:9000");
        assert!(config.probe.concurrent);
        assert_eq!(config.checks.len(), 2);
        assert_eq!(config.checks[0].kind(), ProbeKind::Process);
        assert_eq!(
            config.checks[1].target,
            CheckTarget::Http {
                url: "https://localhost:8443/".to_string(),
                insecure: true
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ipv6_bind_is_valid_and_resolvable() {
        let config = MonitorConfig::from_toml("[bind]\nip = \"::1\"\nport = 8083\n").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind.addr().unwrap().to_string(), "[::1]:8083");
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut config = MonitorConfig::default();
        config.checks.push(ServiceCheck::tcp_banner("FTP", "ftp2", 21));
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Duplicate check name 'FTP'")));
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let mut config = MonitorConfig::default();
        config.env = "staging".to_string();
        config.bind.port = 0;
        config.observability.log.output = "syslog".to_string();
        config.observability.filter_level = "loud".to_string();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| !e.starts_with("Warning:")));
    }

    #[test]
    fn test_validate_prod_console_warning() {
        let mut config = MonitorConfig::default();
        config.env = "prod".to_string();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Warning:"));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = MonitorConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let err = MonitorConfig::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotAFile { .. }));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "name = \"from-file\"\nenv = \"test\"\n").unwrap();
        let config = MonitorConfig::from_file(&path).unwrap();
        assert_eq!(config.name, "from-file");
        assert_eq!(config.env, "test");
    }

    #[test]
    #[serial_test::serial]
    fn test_rust_log_overrides_filter_level() {
        let mut config = MonitorConfig::default();
        config.observability.filter_level = "warn".to_string();

        unsafe { std::env::remove_var("RUST_LOG") };
        assert_eq!(config.get_filter_level(), "warn");

        unsafe { std::env::set_var("RUST_LOG", " debug,hyper=info ") };
        assert_eq!(config.get_filter_level(), "debug,hyper=info");

        unsafe { std::env::set_var("RUST_LOG", "   ") };
        assert_eq!(config.get_filter_level(), "warn");

        unsafe { std::env::remove_var("RUST_LOG") };
    }
}
