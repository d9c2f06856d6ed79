//! 状态页渲染
//!
//! 直接拼接字符串，不使用模板引擎

use svcmon_common::StatusReport;

/// 将一份报告渲染为 HTML 状态页
pub fn render_status_page(title: &str, report: &StatusReport) -> String {
    let mut rows = String::new();
    for status in report.iter() {
        let (class, label) = if status.healthy {
            ("up", "&#10004; Healthy")
        } else {
            ("down", "&#10008; Unhealthy")
        };
        rows.push_str(&format!(
            "      <tr class=\"{class}\"><td>{}</td><td>{label}</td></tr>\n",
            escape_html(&status.name)
        ));
    }

    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} - Service Status</title>
  <style>
    body {{ font-family: sans-serif; margin: 2em; }}
    table {{ border-collapse: collapse; }}
    td {{ padding: 0.4em 1.2em; border-bottom: 1px solid #ddd; }}
    tr.up td:last-child {{ color: #1a7f37; }}
    tr.down td:last-child {{ color: #cf222e; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>{healthy} / {total} services healthy</p>
  <table>
    <tbody>
{rows}    </tbody>
  </table>
  <p>Last checked: <time>{timestamp}</time></p>
</body>
</html>
"#,
        healthy = report.healthy_count(),
        total = report.len(),
        timestamp = report.timestamp(),
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use svcmon_common::ServiceStatus;

    #[test]
    fn test_render_rows_and_timestamp() {
        let ts = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let report = StatusReport::new(
            ts,
            vec![
                ServiceStatus::healthy("MariaDB"),
                ServiceStatus::unhealthy("Static Site"),
            ],
        );

        let html = render_status_page("svcmon", &report);
        assert!(html.contains("<td>MariaDB</td><td>&#10004; Healthy</td>"));
        assert!(html.contains("<td>Static Site</td><td>&#10008; Unhealthy</td>"));
        assert!(html.contains("2025-01-02 03:04:05"));
        assert!(html.contains("1 / 2 services healthy"));
    }

    #[test]
    fn test_names_are_escaped() {
        let report = StatusReport::new(Local::now(), vec![ServiceStatus::healthy("<b>&co</b>")]);
        let html = render_status_page("a \"quoted\" title", &report);
        assert!(html.contains("&lt;b&gt;&amp;co&lt;/b&gt;"));
        assert!(html.contains("a &quot;quoted&quot; title"));
        assert!(!html.contains("<b>"));
    }
}
