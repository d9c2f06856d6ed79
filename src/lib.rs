//! # svcmon
//!
//! 服务健康聚合面板：按协议探测一组具名基础设施服务，渲染汇总状态页并提供存活探针

pub mod service;

// Re-export commonly used types
pub use probe::ProbeAggregator;
pub use service::{ServiceManager, StatusService};
pub use svcmon_common::MonitorConfig;
