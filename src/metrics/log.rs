//! 日志数据指标计算
//!
//! 除了常规分布统计外，还做一层错误模式归类：对 ERROR/FATAL 消息按固定
//! 顺序做大小写无关的子串匹配，命中即归入对应模式；都未命中时按组件
//! 归类为 `"<component> errors"`。

use super::{round1, top_n_by_count};
use crate::datafile::{LogEntry, LogLevel};
use crate::report::Metrics;
use serde_json::{json, Value};

/// 错误消息在榜单中的最大长度
const MESSAGE_TRUNCATE_LEN: usize = 100;

/// 错误模式匹配表：按顺序取第一个命中的子串
const ERROR_PATTERNS: [(&str, &str); 5] = [
    ("timeout", "Timeout errors"),
    ("connection", "Connection errors"),
    ("deadlock", "Database deadlock"),
    ("null", "Null pointer errors"),
    ("permission", "Permission errors"),
];

/// 计算日志文件的指标摘要
pub fn compute(entries: &[LogEntry]) -> Result<Metrics, String> {
    if entries.is_empty() {
        return Err("no log entries to compute metrics".to_string());
    }

    let total = entries.len();

    // 五个级别全部出现在分布里，缺失的补零
    let mut level_distribution = Metrics::new();
    for level in LogLevel::ALL {
        let count =
            entries.iter().filter(|e| e.level == level).count();
        let percentage = round1(count as f64 / total as f64 * 100.0);
        level_distribution.insert(
            level.as_str().to_string(),
            json!({ "count": count, "percentage": percentage }),
        );
    }

    let critical: Vec<&LogEntry> =
        entries.iter().filter(|e| e.level.is_critical()).collect();
    let critical_errors_count = critical.len();

    // 高频错误消息（截断到 100 字符）
    let mut message_counts: Vec<(String, u64)> = Vec::new();
    for entry in &critical {
        let message = truncate(&entry.message, MESSAGE_TRUNCATE_LEN);
        match message_counts.iter_mut().find(|(m, _)| m == &message) {
            Some((_, count)) => *count += 1,
            None => message_counts.push((message, 1)),
        }
    }
    let most_frequent_errors: Vec<Value> = top_n_by_count(message_counts, 5)
        .into_iter()
        .map(|(message, count)| {
            json!({ "message": message, "count": count })
        })
        .collect();

    // 错误最多的组件
    let mut component_counts: Vec<(String, u64)> = Vec::new();
    for entry in &critical {
        match component_counts
            .iter_mut()
            .find(|(c, _)| c == &entry.component)
        {
            Some((_, count)) => *count += 1,
            None => component_counts.push((entry.component.clone(), 1)),
        }
    }
    let top_error_components: Vec<Value> =
        top_n_by_count(component_counts, 5)
            .into_iter()
            .map(|(component, count)| {
                json!({ "component": component, "error_count": count })
            })
            .collect();

    // 按小时分布（只列出出现过的小时，升序）
    let mut hour_counts = [0u64; 24];
    for entry in entries {
        hour_counts[entry.hour as usize] += 1;
    }
    let hourly_distribution: Vec<Value> = hour_counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(hour, &count)| json!({ "hour": hour, "count": count }))
        .collect();

    // 错误模式归类，取前三
    let mut pattern_counts: Vec<(String, u64)> = Vec::new();
    for entry in &critical {
        let label = classify_error(&entry.message, &entry.component);
        match pattern_counts.iter_mut().find(|(l, _)| l == &label) {
            Some((_, count)) => *count += 1,
            None => pattern_counts.push((label, 1)),
        }
    }
    let error_patterns: Vec<Value> = top_n_by_count(pattern_counts, 3)
        .into_iter()
        .map(|(pattern, count)| {
            json!({ "pattern": pattern, "count": count })
        })
        .collect();

    let mut metrics = Metrics::new();
    metrics.insert("total_entries".into(), Value::from(total));
    metrics.insert(
        "level_distribution".into(),
        Value::Object(level_distribution),
    );
    metrics.insert(
        "most_frequent_errors".into(),
        Value::from(most_frequent_errors),
    );
    metrics.insert(
        "top_error_components".into(),
        Value::from(top_error_components),
    );
    metrics.insert(
        "hourly_distribution".into(),
        Value::from(hourly_distribution),
    );
    metrics.insert(
        "critical_errors_count".into(),
        Value::from(critical_errors_count),
    );
    metrics.insert("error_patterns".into(), Value::from(error_patterns));

    Ok(metrics)
}

/// 将错误消息归类到固定模式，未命中时落到组件类
fn classify_error(message: &str, component: &str) -> String {
    let lower = message.to_lowercase();
    for (needle, label) in ERROR_PATTERNS {
        if lower.contains(needle) {
            return label.to_string();
        }
    }
    format!("{component} errors")
}

/// 按字符截断（消息可能含多字节字符，不能直接按字节切）
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        hour: u8,
        level: LogLevel,
        component: &str,
        message: &str,
    ) -> LogEntry {
        LogEntry {
            timestamp: format!("2024-03-15 {hour:02}:00:00"),
            level,
            component: component.to_string(),
            message: message.to_string(),
            hour,
        }
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(compute(&[]).is_err());
    }

    #[test]
    fn test_classify_error_ordered_patterns() {
        // "connection timeout" 同时命中两个子串，按顺序取 timeout
        assert_eq!(
            classify_error("Connection timeout on read", "db"),
            "Timeout errors"
        );
        assert_eq!(
            classify_error("CONNECTION refused", "db"),
            "Connection errors"
        );
        assert_eq!(
            classify_error("detected deadlock in txn", "db"),
            "Database deadlock"
        );
        assert_eq!(
            classify_error("null reference at frame 3", "app"),
            "Null pointer errors"
        );
        assert_eq!(
            classify_error("permission denied", "fs"),
            "Permission errors"
        );
        assert_eq!(
            classify_error("disk full", "storage"),
            "storage errors"
        );
    }

    #[test]
    fn test_level_distribution_includes_missing_levels() {
        let entries = vec![
            entry(9, LogLevel::Info, "app", "started"),
            entry(9, LogLevel::Info, "app", "ready"),
            entry(10, LogLevel::Error, "db", "connection refused"),
        ];
        let metrics = compute(&entries).unwrap();

        let dist = metrics["level_distribution"].as_object().unwrap();
        assert_eq!(dist.len(), 5);
        assert_eq!(dist["INFO"]["count"], 2);
        assert_eq!(dist["INFO"]["percentage"], 66.7);
        assert_eq!(dist["ERROR"]["count"], 1);
        assert_eq!(dist["DEBUG"]["count"], 0);
        assert_eq!(dist["DEBUG"]["percentage"], 0.0);
    }

    #[test]
    fn test_critical_and_hourly() {
        let entries = vec![
            entry(8, LogLevel::Debug, "app", "tick"),
            entry(8, LogLevel::Error, "db", "timeout on query"),
            entry(9, LogLevel::Fatal, "db", "timeout on commit"),
            entry(23, LogLevel::Warn, "app", "slow request"),
        ];
        let metrics = compute(&entries).unwrap();

        assert_eq!(metrics["total_entries"], 4);
        assert_eq!(metrics["critical_errors_count"], 2);

        let hourly = metrics["hourly_distribution"].as_array().unwrap();
        assert_eq!(hourly.len(), 3);
        assert_eq!(hourly[0]["hour"], 8);
        assert_eq!(hourly[0]["count"], 2);
        assert_eq!(hourly[2]["hour"], 23);

        let patterns = metrics["error_patterns"].as_array().unwrap();
        assert_eq!(patterns[0]["pattern"], "Timeout errors");
        assert_eq!(patterns[0]["count"], 2);
    }

    #[test]
    fn test_message_truncation() {
        let long_message = "x".repeat(150);
        let entries =
            vec![entry(1, LogLevel::Error, "app", &long_message)];
        let metrics = compute(&entries).unwrap();

        let errors = metrics["most_frequent_errors"].as_array().unwrap();
        let message = errors[0]["message"].as_str().unwrap();
        assert_eq!(message.len(), 100);
    }
}
