use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, IpAddr, SocketAddr};

/// HTTP 服务绑定配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BindConfig {
    /// 绑定 IP 地址
    ///
    /// 状态面板实际绑定的网络接口 IP 地址。
    /// 通常使用 "0.0.0.0" 监听所有接口。
    #[serde(default = "default_ip")]
    pub ip: String,

    /// 绑定端口
    ///
    /// 状态面板监听的端口号，默认 8083。
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_ip() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8083
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            port: default_port(),
        }
    }
}

impl BindConfig {
    /// 监听地址（IPv6 同样适用）
    pub fn addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.ip.trim().parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_addr() {
        let bind = BindConfig::default();
        assert_eq!(bind.addr().unwrap().to_string(), "0.0.0.0:8083");
    }

    #[test]
    fn test_ipv6_addr_is_bracketed() {
        let bind = BindConfig {
            ip: "::1".to_string(),
            port: 8083,
        };
        let addr = bind.addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.to_string(), "[::1]:8083");
    }

    #[test]
    fn test_invalid_ip_is_error() {
        let bind = BindConfig {
            ip: "not-an-ip".to_string(),
            port: 8083,
        };
        assert!(bind.addr().is_err());
    }
}
