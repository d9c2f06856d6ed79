//! 统一错误处理模型
//!
//! 提供主应用 svcmon 的顶层错误类型，聚合所有子模块和依赖 crate 的错误

use thiserror::Error;

/// 主应用的统一错误枚举
#[derive(Debug, Error)]
pub enum Error {
    // ========== 配置相关错误 ==========
    /// 配置文件加载或解析错误
    #[error("Configuration error: {0}")]
    Config(#[from] svcmon_common::ConfigError),

    // ========== 探测相关错误 ==========
    /// 探测组件初始化错误（单个检查的失败不会出现在这里）
    #[error("Probe setup error: {0}")]
    Probe(#[from] probe::ProbeError),

    // ========== 系统级错误 ==========
    /// I/O 操作错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 后台任务错误
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    // ========== 业务逻辑错误 ==========
    /// 服务启动失败
    #[error("Service startup failed: {message}")]
    ServiceStartup { message: String },

    /// 服务配置验证失败
    #[error("Service configuration validation failed: {message}")]
    ServiceValidation { message: String },

    /// 一次性检查发现不健康的服务
    #[error("{unhealthy} of {total} services unhealthy")]
    Unhealthy { unhealthy: usize, total: usize },

    // ========== 通用错误 ==========
    /// Anyhow 错误兼容层
    #[error("Internal error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// 自定义错误消息
    #[error("Application error: {message}")]
    Custom { message: String },
}

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 创建自定义错误
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// 创建服务启动失败错误
    pub fn service_startup(message: impl Into<String>) -> Self {
        Self::ServiceStartup {
            message: message.into(),
        }
    }

    /// 创建服务配置验证失败错误
    pub fn service_validation(message: impl Into<String>) -> Self {
        Self::ServiceValidation {
            message: message.into(),
        }
    }
}
