//! 探测聚合器
//!
//! 持有不可变的检查注册表，每次调用都重新执行全部检查并生成一份新报告：
//! 不重试、不缓存，单个检查的失败不会影响其余检查。

use crate::error::Result;
use crate::{BannerProbe, HttpClients, HttpProbe, ProcessProbe, evaluate};
use chrono::Local;
use futures_util::future::join_all;
use std::sync::Arc;
use svcmon_common::metrics::ReportTimer;
use svcmon_common::{CheckTarget, MonitorConfig, ServiceCheck, ServiceStatus, StatusReport};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ProbeAggregator {
    checks: Arc<[ServiceCheck]>,
    clients: HttpClients,
    concurrent: bool,
}

impl ProbeAggregator {
    /// 创建顺序执行的聚合器
    pub fn new(checks: Vec<ServiceCheck>) -> Result<Self> {
        Ok(Self {
            checks: checks.into(),
            clients: HttpClients::new()?,
            concurrent: false,
        })
    }

    /// 按配置中的注册表与执行模式创建
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        Ok(Self::new(config.checks.clone())?.with_concurrency(config.probe.concurrent))
    }

    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn checks(&self) -> &[ServiceCheck] {
        &self.checks
    }

    pub fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    /// 执行全部检查并生成报告
    ///
    /// 报告中每个注册的检查恰好对应一个条目，顺序与注册顺序一致；
    /// 时间戳取生成开始的时刻。
    pub async fn generate_report(&self) -> StatusReport {
        let generated_at = Local::now();
        let timer = ReportTimer::new(self.concurrent);

        let services = if self.concurrent {
            join_all(self.checks.iter().map(|check| self.run_check(check))).await
        } else {
            let mut services = Vec::with_capacity(self.checks.len());
            for check in self.checks.iter() {
                services.push(self.run_check(check).await);
            }
            services
        };

        timer.observe();
        let report = StatusReport::new(generated_at, services);
        info!(
            "Status report generated at {}: {}/{} services healthy",
            report.timestamp(),
            report.healthy_count(),
            report.len()
        );
        report
    }

    /// 执行单个检查
    pub async fn run_check(&self, check: &ServiceCheck) -> ServiceStatus {
        debug!("Running check '{}' ({})", check.name, check.kind());
        match &check.target {
            CheckTarget::Process {
                command,
                args,
                expect_stdout,
            } => {
                let probe = ProcessProbe::new(command, args, expect_stdout.as_deref());
                evaluate(&probe, check).await
            }
            CheckTarget::TcpBanner {
                host,
                port,
                expect_prefix,
                read_limit,
            } => {
                let probe = BannerProbe::new(host, *port, expect_prefix, *read_limit);
                evaluate(&probe, check).await
            }
            CheckTarget::Http { url, insecure } => {
                let probe = HttpProbe::new(self.clients.get(*insecure), url);
                evaluate(&probe, check).await
            }
        }
    }
}
