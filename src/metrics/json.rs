//! 用户活动指标计算

use super::{round1, top_n_by_count};
use crate::datafile::UserActivity;
use crate::report::Metrics;
use serde_json::{json, Value};

/// 计算用户/会话 JSON 的指标摘要
pub fn compute(activity: &UserActivity) -> Result<Metrics, String> {
    if activity.users.is_empty() && activity.sessions.is_empty() {
        return Err("no users or sessions to compute metrics".to_string());
    }

    let total_users = activity.users.len();
    let active_users =
        activity.users.iter().filter(|u| u.active).count();
    let inactive_users = total_users - active_users;
    let active_percentage = if total_users > 0 {
        round1(active_users as f64 / total_users as f64 * 100.0)
    } else {
        0.0
    };

    let total_sessions = activity.sessions.len();

    // 平均会话时长：忽略缺失值，取整秒
    let durations: Vec<i64> = activity
        .sessions
        .iter()
        .filter_map(|s| s.duration_seconds)
        .collect();
    let avg_session_duration = if durations.is_empty() {
        0
    } else {
        (durations.iter().sum::<i64>() as f64 / durations.len() as f64)
            .round() as i64
    };

    let total_pages_visited: i64 = activity
        .sessions
        .iter()
        .filter_map(|s| s.pages_visited)
        .sum();

    // 操作计数
    let mut action_counts: Vec<(String, u64)> = Vec::new();
    for session in &activity.sessions {
        for action in &session.actions {
            match action_counts.iter_mut().find(|(a, _)| a == action) {
                Some((_, count)) => *count += 1,
                None => action_counts.push((action.clone(), 1)),
            }
        }
    }
    let top_actions: Vec<Value> = top_n_by_count(action_counts, 5)
        .into_iter()
        .map(|(action, count)| json!({ "action": action, "count": count }))
        .collect();

    // 高峰小时：从 inicio 时间戳提取 HH 后计数
    let mut hour_counts = [0u64; 24];
    for session in &activity.sessions {
        if let Some(hour) =
            session.start.as_deref().and_then(extract_hour)
        {
            hour_counts[hour as usize] += 1;
        }
    }
    let (peak_hour, peak_count) = hour_counts
        .iter()
        .enumerate()
        // 严格大于才替换，同数时取较小的小时
        .fold((0usize, 0u64), |(bh, bc), (h, &c)| {
            if c > bc { (h, c) } else { (bh, bc) }
        });

    let mut metrics = Metrics::new();
    metrics.insert("total_users".into(), Value::from(total_users));
    metrics.insert("active_users".into(), Value::from(active_users));
    metrics.insert("inactive_users".into(), Value::from(inactive_users));
    metrics.insert(
        "active_percentage".into(),
        Value::from(active_percentage),
    );
    metrics.insert("total_sessions".into(), Value::from(total_sessions));
    metrics.insert(
        "avg_session_duration".into(),
        Value::from(avg_session_duration),
    );
    metrics.insert(
        "total_pages_visited".into(),
        Value::from(total_pages_visited),
    );
    metrics.insert("top_actions".into(), Value::from(top_actions));
    metrics.insert(
        "peak_hour".into(),
        json!({ "hour": peak_hour, "session_count": peak_count }),
    );

    Ok(metrics)
}

/// 从 ISO 时间戳（`YYYY-MM-DDTHH:MM:SS` 或空格分隔变体）提取小时
fn extract_hour(timestamp: &str) -> Option<u8> {
    let b = timestamp.as_bytes();
    if b.len() < 13 || (b[10] != b'T' && b[10] != b' ') {
        return None;
    }
    let hour: u8 = timestamp.get(11..13)?.parse().ok()?;
    if hour > 23 {
        return None;
    }
    Some(hour)
}
