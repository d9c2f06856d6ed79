//! 监控模块
//!
//! 定义检查描述、单次检查结果与聚合状态报告

pub mod check;
pub mod report;
pub mod status;

pub use check::{CheckTarget, ProbeKind, ServiceCheck};
pub use report::{StatusReport, TIMESTAMP_FORMAT};
pub use status::ServiceStatus;
