//! Prometheus 监控指标模块
//!
//! 提供全局指标收集和导出功能

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry};
use std::sync::Once;
use std::time::Instant;

static METRICS_INIT: Once = Once::new();

lazy_static! {
    /// 全局 Prometheus Registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ========== 检查指标 ==========

    /// 检查执行次数（按服务与结果分组）
    pub static ref CHECKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("checks_total", "Total number of service checks executed")
            .namespace("svcmon"),
        &["service", "outcome"]
    ).unwrap();

    /// 单个检查耗时（秒）
    pub static ref CHECK_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("check_duration_seconds", "Service check duration in seconds")
            .namespace("svcmon")
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 3.0, 5.0, 10.0]),
        &["service", "kind"]
    ).unwrap();

    /// 最近一次检查结果（1 健康，0 不健康）
    pub static ref SERVICE_HEALTHY: IntGaugeVec = IntGaugeVec::new(
        Opts::new("service_healthy", "Outcome of the latest check (1 healthy, 0 unhealthy)")
            .namespace("svcmon"),
        &["service"]
    ).unwrap();

    // ========== 报告指标 ==========

    /// 报告生成次数
    pub static ref REPORTS_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("reports_total", "Total number of status reports generated")
            .namespace("svcmon")
    ).unwrap();

    /// 报告生成耗时（秒）
    pub static ref REPORT_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("report_duration_seconds", "Status report generation duration in seconds")
            .namespace("svcmon")
            .buckets(vec![0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 20.0, 40.0]),
        &["mode"]
    ).unwrap();
}

/// 注册所有指标到全局 Registry
///
/// This function is idempotent - calling it multiple times is safe.
/// Only the first call will actually register the metrics.
pub fn register_metrics() -> Result<(), prometheus::Error> {
    let mut result = Ok(());

    METRICS_INIT.call_once(|| {
        let register_result = (|| {
            REGISTRY.register(Box::new(CHECKS_TOTAL.clone()))?;
            REGISTRY.register(Box::new(CHECK_DURATION.clone()))?;
            REGISTRY.register(Box::new(SERVICE_HEALTHY.clone()))?;
            REGISTRY.register(Box::new(REPORTS_TOTAL.clone()))?;
            REGISTRY.register(Box::new(REPORT_DURATION.clone()))?;

            Ok::<(), prometheus::Error>(())
        })();

        if let Err(e) = register_result {
            result = Err(e);
        }
    });

    result
}

/// 单个检查计时器
pub struct CheckTimer {
    start: Instant,
    service: String,
    kind: String,
}

impl CheckTimer {
    /// 创建计时器
    pub fn new(service: &str, kind: &str) -> Self {
        Self {
            start: Instant::now(),
            service: service.to_string(),
            kind: kind.to_string(),
        }
    }

    /// 完成计时并记录指标
    pub fn observe(self, healthy: bool) {
        let duration = self.start.elapsed().as_secs_f64();
        let outcome = if healthy { "healthy" } else { "unhealthy" };

        CHECK_DURATION
            .with_label_values(&[&self.service, &self.kind])
            .observe(duration);

        CHECKS_TOTAL
            .with_label_values(&[&self.service, outcome])
            .inc();

        SERVICE_HEALTHY
            .with_label_values(&[&self.service])
            .set(i64::from(healthy));
    }
}

/// 报告计时器
pub struct ReportTimer {
    start: Instant,
    mode: &'static str,
}

impl ReportTimer {
    pub fn new(concurrent: bool) -> Self {
        Self {
            start: Instant::now(),
            mode: if concurrent { "concurrent" } else { "sequential" },
        }
    }

    pub fn observe(self) {
        REPORT_DURATION
            .with_label_values(&[self.mode])
            .observe(self.start.elapsed().as_secs_f64());
        REPORTS_TOTAL.inc();
    }
}

/// 导出 Prometheus 格式的指标
pub fn export_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
