//! 服务检查描述
//!
//! `ServiceCheck` 为一个被监控的服务命名，并描述如何探测它。
//! 配置加载完成后描述不再改变。

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::Display;
use url::Url;

/// 进程与 HTTP 检查的默认超时（秒）
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
/// TCP 横幅检查的默认超时（秒）
pub const DEFAULT_TCP_TIMEOUT_SECS: u64 = 3;
/// 读取横幅时的字节上限
pub const DEFAULT_BANNER_READ_LIMIT: usize = 1024;
/// FTP "service ready" 应答码
pub const DEFAULT_BANNER_PREFIX: &str = "220";

/// 超过该值的超时仍可使用，但会给出警告
pub const TIMEOUT_WARNING_SECS: u64 = 30;

/// 检查的协议类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProbeKind {
    Process,
    TcpBanner,
    Http,
}

/// 各协议的目标参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckTarget {
    /// 执行外部命令：退出码为 0 即健康；
    /// 配置了 `expect_stdout` 时改为判断标准输出是否包含该字面量
    Process {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expect_stdout: Option<String>,
    },

    /// 建立连接并读取服务端主动发送的欢迎横幅
    TcpBanner {
        host: String,
        port: u16,
        #[serde(default = "default_banner_prefix")]
        expect_prefix: String,
        #[serde(default = "default_read_limit")]
        read_limit: usize,
    },

    /// 对 URL 发起 GET，2xx 或 3xx 即健康
    Http {
        url: String,
        /// 跳过 TLS 证书校验（自签名证书）
        #[serde(default)]
        insecure: bool,
    },
}

fn default_banner_prefix() -> String {
    DEFAULT_BANNER_PREFIX.to_string()
}

fn default_read_limit() -> usize {
    DEFAULT_BANNER_READ_LIMIT
}

impl CheckTarget {
    pub fn kind(&self) -> ProbeKind {
        match self {
            CheckTarget::Process { .. } => ProbeKind::Process,
            CheckTarget::TcpBanner { .. } => ProbeKind::TcpBanner,
            CheckTarget::Http { .. } => ProbeKind::Http,
        }
    }

    /// 便于阅读的目标描述，用于日志
    pub fn describe(&self) -> String {
        match self {
            CheckTarget::Process { command, args, .. } => {
                if args.is_empty() {
                    command.clone()
                } else {
                    format!("{} {}", command, args.join(" "))
                }
            }
            CheckTarget::TcpBanner { host, port, .. } => format!("tcp://{host}:{port}"),
            CheckTarget::Http { url, .. } => url.clone(),
        }
    }
}

/// 单个被监控服务的不可变描述
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceCheck {
    /// 显示名称，在注册表内唯一
    pub name: String,

    #[serde(flatten)]
    pub target: CheckTarget,

    /// 单项超时（秒），未设置时使用协议默认值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ServiceCheck {
    pub fn new(name: impl Into<String>, target: CheckTarget) -> Self {
        Self {
            name: name.into(),
            target,
            timeout_secs: None,
        }
    }

    /// 以退出码判断的进程检查
    pub fn process<I, S>(name: impl Into<String>, command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            CheckTarget::Process {
                command: command.into(),
                args: args.into_iter().map(Into::into).collect(),
                expect_stdout: None,
            },
        )
    }

    /// 使用默认 FTP 前缀与读取上限的 TCP 横幅检查
    pub fn tcp_banner(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self::new(
            name,
            CheckTarget::TcpBanner {
                host: host.into(),
                port,
                expect_prefix: default_banner_prefix(),
                read_limit: DEFAULT_BANNER_READ_LIMIT,
            },
        )
    }

    /// 启用证书校验的 HTTP 检查
    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            name,
            CheckTarget::Http {
                url: url.into(),
                insecure: false,
            },
        )
    }

    /// 进程检查改为匹配标准输出
    pub fn expect_stdout(mut self, literal: impl Into<String>) -> Self {
        if let CheckTarget::Process { expect_stdout, .. } = &mut self.target {
            *expect_stdout = Some(literal.into());
        }
        self
    }

    /// 覆盖 TCP 检查期望的横幅前缀
    pub fn expect_prefix(mut self, prefix: impl Into<String>) -> Self {
        if let CheckTarget::TcpBanner { expect_prefix, .. } = &mut self.target {
            *expect_prefix = prefix.into();
        }
        self
    }

    /// HTTP 检查容忍无效证书
    pub fn insecure(mut self) -> Self {
        if let CheckTarget::Http { insecure, .. } = &mut self.target {
            *insecure = true;
        }
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn kind(&self) -> ProbeKind {
        self.target.kind()
    }

    /// 实际生效的超时时间
    pub fn timeout(&self) -> Duration {
        let secs = self.timeout_secs.unwrap_or(match self.kind() {
            ProbeKind::Process => DEFAULT_PROCESS_TIMEOUT_SECS,
            ProbeKind::TcpBanner => DEFAULT_TCP_TIMEOUT_SECS,
            ProbeKind::Http => DEFAULT_HTTP_TIMEOUT_SECS,
        });
        Duration::from_secs(secs)
    }

    /// 收集该检查的配置问题
    ///
    /// 以 "Warning:" 开头的条目不阻止启动。
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let name = self.name.trim();

        if name.is_empty() {
            errors.push("Check name cannot be empty".to_string());
        }

        match self.timeout_secs {
            Some(0) => errors.push(format!("Check '{name}': timeout_secs must be greater than 0")),
            Some(secs) if secs > TIMEOUT_WARNING_SECS => errors.push(format!(
                "Warning: Check '{name}': timeout_secs = {secs} exceeds {TIMEOUT_WARNING_SECS}s, status page latency will suffer"
            )),
            _ => {}
        }

        match &self.target {
            CheckTarget::Process { command, .. } => {
                if command.trim().is_empty() {
                    errors.push(format!("Check '{name}': process command cannot be empty"));
                }
            }
            CheckTarget::TcpBanner {
                host,
                port,
                expect_prefix,
                read_limit,
            } => {
                if host.trim().is_empty() {
                    errors.push(format!("Check '{name}': tcp_banner host cannot be empty"));
                }
                if *port == 0 {
                    errors.push(format!("Check '{name}': tcp_banner port cannot be 0"));
                }
                if expect_prefix.is_empty() {
                    errors.push(format!(
                        "Check '{name}': tcp_banner expect_prefix cannot be empty"
                    ));
                }
                if *read_limit < expect_prefix.len() {
                    errors.push(format!(
                        "Check '{name}': tcp_banner read_limit ({read_limit}) is shorter than expect_prefix"
                    ));
                }
            }
            CheckTarget::Http { url, insecure } => match Url::parse(url) {
                Ok(parsed) => match parsed.scheme() {
                    "https" => {}
                    "http" => {
                        if *insecure {
                            errors.push(format!(
                                "Warning: Check '{name}': insecure has no effect on plain http URL {url}"
                            ));
                        }
                    }
                    other => errors.push(format!(
                        "Check '{name}': unsupported URL scheme '{other}', must be http or https"
                    )),
                },
                Err(e) => errors.push(format!("Check '{name}': invalid URL '{url}': {e}")),
            },
        }

        errors
    }
}
