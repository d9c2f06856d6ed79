//! 服务管理器模块 - 负责 HTTP 服务器的启动与优雅关闭

use super::trace::http_trace_layer;
use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use svcmon_common::config::MonitorConfig;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// 服务管理器，负责 HTTP 服务器的生命周期
#[derive(Debug)]
pub struct ServiceManager {
    shutdown_tx: tokio::sync::broadcast::Sender<()>,
    config: MonitorConfig,
}

impl ServiceManager {
    /// 创建新的服务管理器
    pub fn new(config: MonitorConfig, shutdown_tx: tokio::sync::broadcast::Sender<()>) -> Self {
        Self {
            shutdown_tx,
            config,
        }
    }

    /// 绑定监听地址并在后台运行 HTTP 服务器
    ///
    /// 返回服务器任务句柄与实际绑定的地址（端口为 0 时由系统分配）。
    pub async fn start(&self, router: Router) -> Result<(JoinHandle<()>, SocketAddr)> {
        let addr = self.config.bind.addr().map_err(|e| {
            anyhow::anyhow!("Invalid bind address '{}': {e}", self.config.bind.ip)
        })?;

        // 添加全局中间件层
        let app = router
            .layer(http_trace_layer())
            .layer(CorsLayer::permissive());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to address '{addr}': {e}"))?;
        let local_addr = listener.local_addr()?;

        info!("HTTP server listening on {}", local_addr);

        let shutdown_tx = self.shutdown_tx.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            let server = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("HTTP server error: {}", e);
                let _ = shutdown_tx.send(());
            }
            info!("HTTP server stopped");
        });

        Ok((handle, local_addr))
    }

    /// 广播关闭信号
    pub fn stop(&self) {
        info!("Stopping HTTP server");
        let _ = self.shutdown_tx.send(());
    }
}
