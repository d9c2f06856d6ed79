//! 服务状态定义
//!
//! 单次检查的结果，只保留健康布尔值，不保留失败原因

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub healthy: bool,
}

impl ServiceStatus {
    pub fn new(name: impl Into<String>, healthy: bool) -> Self {
        Self {
            name: name.into(),
            healthy,
        }
    }

    pub fn healthy(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    pub fn unhealthy(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }
}
