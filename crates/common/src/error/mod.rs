//! 错误处理模块
//!
//! 按概念分离的错误类型定义

mod config_error;

pub use config_error::ConfigError;

/// 配置层统一的 Result 类型
pub type Result<T> = std::result::Result<T, ConfigError>;
