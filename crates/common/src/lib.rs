//! svcmon 基础设施库
//!
//! 为健康聚合面板提供通用组件：配置加载与校验、检查描述、状态报告以及 Prometheus 指标

pub mod config;
pub mod error;
pub mod metrics;
pub mod monitoring;

// Re-export commonly used types for convenience
pub use config::MonitorConfig;
pub use error::{ConfigError, Result};
pub use monitoring::{CheckTarget, ProbeKind, ServiceCheck, ServiceStatus, StatusReport};
