//! TCP 横幅检查
//!
//! 连接后读取服务端在任何请求之前发送的欢迎语（FTP `220 ...`）。
//! 只读取一次；横幅必须是合法 UTF-8 并以期望前缀开头。

use crate::Probe;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

#[derive(Debug)]
pub struct BannerProbe<'a> {
    host: &'a str,
    port: u16,
    expect_prefix: &'a str,
    read_limit: usize,
}

impl<'a> BannerProbe<'a> {
    pub fn new(host: &'a str, port: u16, expect_prefix: &'a str, read_limit: usize) -> Self {
        Self {
            host,
            port,
            expect_prefix,
            read_limit,
        }
    }
}

#[async_trait]
impl Probe for BannerProbe<'_> {
    async fn run(&self) -> Result<()> {
        let mut stream = TcpStream::connect((self.host, self.port))
            .await
            .map_err(|source| ProbeError::Connect {
                address: format!("{}:{}", self.host, self.port),
                source,
            })?;

        let mut buffer = vec![0u8; self.read_limit.max(1)];
        let len = stream.read(&mut buffer).await.map_err(ProbeError::Read)?;
        if len == 0 {
            return Err(ProbeError::ConnectionClosed);
        }

        let banner = std::str::from_utf8(&buffer[..len])?;
        if banner.starts_with(self.expect_prefix) {
            Ok(())
        } else {
            Err(ProbeError::BannerMismatch {
                expected: self.expect_prefix.to_string(),
                banner: banner.trim_end().to_string(),
            })
        }
    }
}
