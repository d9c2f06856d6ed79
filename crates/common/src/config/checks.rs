//! 内置检查注册表
//!
//! 未在配置文件中声明 `[[checks]]` 时使用的七个默认检查，
//! 目标均为私有网络内的固定 DNS 名称。

use crate::monitoring::ServiceCheck;

pub fn default_checks() -> Vec<ServiceCheck> {
    vec![
        ServiceCheck::process(
            "MariaDB",
            "mysqladmin",
            ["ping", "-h", "mariadb", "--silent"],
        ),
        ServiceCheck::process("Redis", "redis-cli", ["-h", "redis", "ping"]).expect_stdout("PONG"),
        ServiceCheck::http("NGINX", "https://nginx").insecure(),
        ServiceCheck::http("WordPress", "https://nginx/wp-login.php").insecure(),
        ServiceCheck::tcp_banner("FTP", "ftp", 21),
        ServiceCheck::http("Adminer", "http://adminer:8080/adminer.php"),
        ServiceCheck::http("Static Site", "http://static-site:8082"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::{CheckTarget, ProbeKind};
    use std::time::Duration;

    #[test]
    fn test_default_registry_order() {
        let names: Vec<_> = default_checks().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "MariaDB",
                "Redis",
                "NGINX",
                "WordPress",
                "FTP",
                "Adminer",
                "Static Site"
            ]
        );
    }

    #[test]
    fn test_default_registry_targets() {
        let checks = default_checks();
        assert!(checks.iter().all(|c| c.validate().is_empty()));

        assert_eq!(checks[0].kind(), ProbeKind::Process);
        assert_eq!(checks[4].kind(), ProbeKind::TcpBanner);
        assert_eq!(checks[4].timeout(), Duration::from_secs(3));
        assert_eq!(checks[6].timeout(), Duration::from_secs(5));

        assert!(matches!(
            &checks[1].target,
            CheckTarget::Process { expect_stdout: Some(s), .. } if s == "PONG"
        ));
        assert!(matches!(
            &checks[2].target,
            CheckTarget::Http { insecure: true, .. }
        ));
        assert!(matches!(
            &checks[5].target,
            CheckTarget::Http { insecure: false, .. }
        ));
    }
}
