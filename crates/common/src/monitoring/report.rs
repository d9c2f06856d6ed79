//! 聚合状态报告
//!
//! 每个注册的检查在报告中恰好对应一个 `ServiceStatus`，顺序与注册顺序一致，
//! 并附带报告开始生成时的本地时间。

use super::ServiceStatus;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

/// 状态页与 JSON 报告共用的时间格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(serialize_with = "serialize_timestamp")]
    pub generated_at: DateTime<Local>,
    pub services: Vec<ServiceStatus>,
}

fn serialize_timestamp<S>(ts: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

impl StatusReport {
    pub fn new(generated_at: DateTime<Local>, services: Vec<ServiceStatus>) -> Self {
        Self {
            generated_at,
            services,
        }
    }

    /// 格式化后的生成时间（本地时间，`YYYY-MM-DD HH:MM:SS`）
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceStatus> {
        self.services.iter()
    }

    pub fn healthy_count(&self) -> usize {
        self.services.iter().filter(|s| s.healthy).count()
    }

    pub fn all_healthy(&self) -> bool {
        self.services.iter().all(|s| s.healthy)
    }

    /// 按名称查询服务健康状态
    pub fn get(&self, name: &str) -> Option<bool> {
        self.services
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.healthy)
    }

    /// 按注册顺序返回健康布尔值
    pub fn outcomes(&self) -> Vec<bool> {
        self.services.iter().map(|s| s.healthy).collect()
    }
}
