use axum::{Router, routing::get};
use serde_json::Value;
use std::net::SocketAddr;
use svcmon::{MonitorConfig, ProbeAggregator, ServiceManager, StatusService};
use svcmon_common::ServiceCheck;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const NAMES: [&str; 7] = [
    "MariaDB",
    "Redis",
    "NGINX",
    "WordPress",
    "FTP",
    "Adminer",
    "Static Site",
];

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr").port()
}

/// The built-in registry shape, every target unreachable
async fn failing_checks() -> Vec<ServiceCheck> {
    let port = closed_port().await;
    vec![
        ServiceCheck::process("MariaDB", "svcmon-missing-mysqladmin", ["ping"]),
        ServiceCheck::process("Redis", "svcmon-missing-redis-cli", ["ping"]).expect_stdout("PONG"),
        ServiceCheck::http("NGINX", format!("https://127.0.0.1:{port}")).insecure(),
        ServiceCheck::http("WordPress", format!("https://127.0.0.1:{port}/wp-login.php"))
            .insecure(),
        ServiceCheck::tcp_banner("FTP", "127.0.0.1", port),
        ServiceCheck::http("Adminer", format!("http://127.0.0.1:{port}/adminer.php")),
        ServiceCheck::http("Static Site", format!("http://127.0.0.1:{port}")),
    ]
    .into_iter()
    .map(|c| c.with_timeout_secs(1))
    .collect()
}

async fn start_monitor(checks: Vec<ServiceCheck>) -> (SocketAddr, JoinHandle<()>, ServiceManager) {
    start_monitor_on("127.0.0.1", checks).await
}

async fn start_monitor_on(
    ip: &str,
    checks: Vec<ServiceCheck>,
) -> (SocketAddr, JoinHandle<()>, ServiceManager) {
    let mut config = MonitorConfig::default();
    config.name = "svcmon-http-test".to_string();
    config.bind.ip = ip.to_string();
    config.bind.port = 0;
    config.checks = checks;

    let _ = svcmon_common::metrics::register_metrics();

    let aggregator = ProbeAggregator::from_config(&config).expect("aggregator");
    let service = StatusService::new(config.name.clone(), aggregator);

    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(4);
    let manager = ServiceManager::new(config, shutdown_tx);
    let (handle, addr) = manager
        .start(service.build_router())
        .await
        .expect("start monitor");
    (addr, handle, manager)
}

fn is_report_timestamp(value: &str) -> bool {
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
}

#[tokio::test]
async fn health_endpoint_is_always_ok() {
    let (addr, handle, manager) = start_monitor(failing_checks().await).await;

    let resp = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("health request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
    assert_eq!(resp.text().await.expect("body"), "OK");

    manager.stop();
    handle.await.expect("server task");
}

#[tokio::test]
async fn index_renders_200_when_every_check_fails() {
    let (addr, handle, manager) = start_monitor(failing_checks().await).await;

    let resp = reqwest::get(format!("http://{addr}/"))
        .await
        .expect("index request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");

    let body = resp.text().await.expect("body");
    for name in NAMES {
        assert!(
            body.contains(&format!("<td>{name}</td><td>&#10008; Unhealthy</td>")),
            "missing unhealthy row for {name}"
        );
    }
    assert!(body.contains("0 / 7 services healthy"));

    manager.stop();
    handle.await.expect("server task");
}

#[tokio::test]
async fn api_status_reports_every_check_in_order() {
    let (addr, handle, manager) = start_monitor(failing_checks().await).await;

    let value: Value = reqwest::get(format!("http://{addr}/api/status"))
        .await
        .expect("status request")
        .json()
        .await
        .expect("json body");

    let services = value["services"].as_array().expect("services array");
    assert_eq!(services.len(), 7);
    for (entry, name) in services.iter().zip(NAMES) {
        assert_eq!(entry["name"], name);
        assert_eq!(entry["healthy"], false);
    }
    assert!(is_report_timestamp(
        value["generated_at"].as_str().expect("timestamp")
    ));

    manager.stop();
    handle.await.expect("server task");
}

#[tokio::test]
async fn api_status_reflects_healthy_targets() {
    let app = Router::new().route("/", get(|| async { "static" }));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind site");
    let site = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve site");
    });

    let dead = closed_port().await;
    let checks = vec![
        ServiceCheck::http("Static Site", format!("http://{site}/")),
        ServiceCheck::tcp_banner("FTP", "127.0.0.1", dead).with_timeout_secs(1),
    ];
    let (addr, handle, manager) = start_monitor(checks).await;

    let value: Value = reqwest::get(format!("http://{addr}/api/status"))
        .await
        .expect("status request")
        .json()
        .await
        .expect("json body");
    assert_eq!(value["services"][0]["healthy"], true);
    assert_eq!(value["services"][1]["healthy"], false);

    let metrics = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .expect("metrics request")
        .text()
        .await
        .expect("metrics body");
    assert!(metrics.contains("svcmon_checks_total"));
    assert!(metrics.contains("svcmon_reports_total"));

    manager.stop();
    handle.await.expect("server task");
}

#[tokio::test]
async fn monitor_serves_on_ipv6_loopback() {
    // 没有 IPv6 回环的环境直接跳过
    if std::net::TcpListener::bind("[::1]:0").is_err() {
        eprintln!("skipping: IPv6 loopback unavailable");
        return;
    }

    let (addr, handle, manager) = start_monitor_on("::1", Vec::new()).await;
    assert!(addr.is_ipv6());

    let resp = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("health request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "OK");

    manager.stop();
    handle.await.expect("server task");
}
