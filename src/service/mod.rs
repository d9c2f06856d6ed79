//! 服务管理模块
//!
//! - `StatusService`: 状态面板路由与处理函数
//! - `ServiceManager`: HTTP 服务器的启动与优雅关闭
//! - `page`: 状态页 HTML 渲染
//! - `trace`: HTTP 请求追踪层

pub mod manager;
pub mod page;
pub mod status;
pub mod trace;

pub use manager::ServiceManager;
pub use status::StatusService;
