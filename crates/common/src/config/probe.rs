use serde::{Deserialize, Serialize};

/// 探测执行配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProbeConfig {
    /// 并发执行检查
    ///
    /// - false（默认）：逐个顺序执行，最坏延迟为所有超时之和
    /// - true：同一份报告内的检查并发执行，延迟取决于最慢的单个检查
    ///
    /// 无论哪种模式，报告中的条目顺序都与注册顺序一致。
    #[serde(default)]
    pub concurrent: bool,
}
