//! HTTP(S) 端点检查
//!
//! 行为等同 `curl -sf [-k] URL -o /dev/null`：不跟随重定向，
//! 2xx 或 3xx 即健康，响应体直接丢弃。

use crate::Probe;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use reqwest::{Client, redirect};

/// 预先构建的两个客户端：严格校验证书 / 容忍自签名证书
///
/// 不保留空闲连接：每次检查都新建连接，并发报告之间不共享连接状态。
#[derive(Debug, Clone)]
pub struct HttpClients {
    strict: Client,
    insecure: Client,
}

impl HttpClients {
    pub fn new() -> Result<Self> {
        Ok(Self {
            strict: Self::builder().build()?,
            insecure: Self::builder().danger_accept_invalid_certs(true).build()?,
        })
    }

    fn builder() -> reqwest::ClientBuilder {
        Client::builder()
            .redirect(redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .user_agent(concat!("svcmon/", env!("CARGO_PKG_VERSION")))
    }

    pub fn get(&self, insecure: bool) -> &Client {
        if insecure {
            &self.insecure
        } else {
            &self.strict
        }
    }
}

#[derive(Debug)]
pub struct HttpProbe<'a> {
    client: &'a Client,
    url: &'a str,
}

impl<'a> HttpProbe<'a> {
    pub fn new(client: &'a Client, url: &'a str) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Probe for HttpProbe<'_> {
    async fn run(&self) -> Result<()> {
        let response = self.client.get(self.url).send().await?;
        let status = response.status();
        drop(response);

        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(ProbeError::HttpStatus {
                status: status.as_u16(),
            })
        }
    }
}
