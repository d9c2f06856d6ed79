//! 探测错误类型
//!
//! 仅在单个检查内部使用：所有错误最终都折叠为 `healthy = false`，
//! 只用于日志，不会进入状态报告。

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    // ========== 进程检查 ==========
    /// 无法启动子进程（命令不存在、权限不足等）
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// 子进程以非零状态退出（被信号终止时 code 为 None）
    #[error("Process exited with status {code:?}")]
    ExitStatus { code: Option<i32> },

    /// 标准输出中没有期望的字面量
    #[error("Expected '{expected}' in process output")]
    MissingOutput { expected: String },

    // ========== TCP 横幅检查 ==========
    /// 连接失败（拒绝、DNS 解析失败、不可达）
    #[error("Connection to {address} failed: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// 读取横幅失败
    #[error("Failed to read banner: {0}")]
    Read(#[source] std::io::Error),

    /// 对端未发送任何数据就关闭了连接
    #[error("Connection closed before any banner was received")]
    ConnectionClosed,

    /// 横幅不是合法的 UTF-8
    #[error("Banner is not valid UTF-8: {0}")]
    BannerDecode(#[from] std::str::Utf8Error),

    /// 横幅前缀不匹配
    #[error("Unexpected banner (expected prefix '{expected}'): {banner}")]
    BannerMismatch { expected: String, banner: String },

    // ========== HTTP 检查 ==========
    /// 请求失败或客户端构建失败
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 响应状态不在 2xx–3xx 范围内
    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    // ========== 通用 ==========
    /// 超出检查的超时时间
    #[error("Check timed out after {after:?}")]
    Timeout { after: Duration },
}

pub type Result<T> = std::result::Result<T, ProbeError>;
