//! 服务探测
//!
//! 每种协议一个 [`Probe`] 实现，由 [`ProbeAggregator`] 按注册顺序调度，
//! 产出一份完整的 [`StatusReport`](svcmon_common::StatusReport)。

pub mod aggregator;
pub mod error;
pub mod http;
pub mod process;
pub mod tcp;

// Re-export commonly used types
pub use aggregator::ProbeAggregator;
pub use error::{ProbeError, Result};
pub use http::{HttpClients, HttpProbe};
pub use process::ProcessProbe;
pub use tcp::BannerProbe;

use async_trait::async_trait;
use std::fmt::Debug;
use svcmon_common::metrics::CheckTimer;
use svcmon_common::{ServiceCheck, ServiceStatus};
use tracing::debug;

/// 单个协议检查的核心 trait
///
/// `run` 在服务健康时返回 `Ok(())`。实现只需关注一次请求/响应，
/// 超时由 [`evaluate`] 统一施加；所有资源必须随 future 一起释放。
#[async_trait]
pub trait Probe: Send + Sync + Debug {
    async fn run(&self) -> Result<()>;
}

/// 在检查的超时内执行探测，并把任何失败折叠为 `healthy = false`
pub async fn evaluate(probe: &dyn Probe, check: &ServiceCheck) -> ServiceStatus {
    let timeout = check.timeout();
    let timer = CheckTimer::new(&check.name, &check.kind().to_string());

    let outcome = match tokio::time::timeout(timeout, probe.run()).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout { after: timeout }),
    };

    let healthy = match outcome {
        Ok(()) => {
            debug!(
                "Check '{}' ({}) healthy: {}",
                check.name,
                check.kind(),
                check.target.describe()
            );
            true
        }
        Err(e) => {
            debug!(
                "Check '{}' ({}) unhealthy: {} ({})",
                check.name,
                check.kind(),
                e,
                check.target.describe()
            );
            false
        }
    };

    timer.observe(healthy);
    ServiceStatus::new(&check.name, healthy)
}
