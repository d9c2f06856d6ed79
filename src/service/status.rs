//! 状态面板 HTTP 服务
//!
//! 固定路由到处理函数的显式映射：
//! - `GET /`           HTML 状态页（始终 200）
//! - `GET /health`     监控进程自身的存活探针（始终 `OK`）
//! - `GET /api/status` JSON 状态报告（始终 200）
//! - `GET /metrics`    Prometheus 指标

use super::page::render_status_page;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::get,
};
use chrono::Local;
use probe::ProbeAggregator;
use std::sync::Arc;
use svcmon_common::{ServiceStatus, StatusReport};
use tracing::{error, info};

#[derive(Debug)]
struct StatusState {
    title: String,
    aggregator: ProbeAggregator,
}

/// 状态面板服务
///
/// 唯一的共享状态是不可变的检查注册表；每个请求都生成一份全新的报告。
#[derive(Debug, Clone)]
pub struct StatusService {
    state: Arc<StatusState>,
}

impl StatusService {
    pub fn new(title: impl Into<String>, aggregator: ProbeAggregator) -> Self {
        Self {
            state: Arc::new(StatusState {
                title: title.into(),
                aggregator,
            }),
        }
    }

    /// 构建axum路由器
    pub fn build_router(&self) -> Router {
        info!("Building status router");
        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/api/status", get(api_status_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(self.state.clone())
    }

    /// 生成一份新报告
    ///
    /// 报告在独立任务中生成：调用方断开连接不会中断已经开始的检查。
    pub async fn generate_report(&self) -> StatusReport {
        fresh_report(&self.state).await
    }
}

async fn fresh_report(state: &Arc<StatusState>) -> StatusReport {
    let aggregator = state.aggregator.clone();
    let started_at = Local::now();

    match tokio::spawn(async move { aggregator.generate_report().await }).await {
        Ok(report) => report,
        Err(e) => {
            error!("Status report task failed: {}", e);
            // 仍然为每个注册的检查给出一个条目
            let services = state
                .aggregator
                .checks()
                .iter()
                .map(|check| ServiceStatus::unhealthy(&check.name))
                .collect();
            StatusReport::new(started_at, services)
        }
    }
}

async fn index_handler(State(state): State<Arc<StatusState>>) -> Html<String> {
    let report = fresh_report(&state).await;
    Html(render_status_page(&state.title, &report))
}

async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "OK",
    )
}

async fn api_status_handler(State(state): State<Arc<StatusState>>) -> Json<StatusReport> {
    Json(fresh_report(&state).await)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> String {
    svcmon_common::metrics::export_metrics()
}
