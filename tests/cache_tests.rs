//! 报告 TTL 缓存集成测试

mod common;

use datafile_analysis::cache::{generate_report_id, ReportCache};
use datafile_analysis::config::EngineOptions;
use datafile_analysis::engine::process_directory;
use std::time::Duration;
use tempfile::TempDir;

fn real_report() -> datafile_analysis::ExecutionReport {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    common::create_mixed_dir(&temp_dir);
    process_directory(
        temp_dir.path(),
        &EngineOptions { show_progress: false, ..Default::default() },
    )
    .unwrap()
}

#[test]
fn test_web_flow_put_then_get() {
    // 模拟 Web 前端流程：处理后存入缓存，稍后用报告 ID 取回
    let cache = ReportCache::new();
    let report = real_report();
    let id = generate_report_id();

    cache.put(&id, report.clone());
    let fetched = cache.get(&id).expect("报告应在 TTL 内可取回");
    assert_eq!(fetched.total_files, report.total_files);
    assert_eq!(fetched.success_count, report.success_count);
}

#[test]
fn test_report_ids_are_unique_and_url_safe() {
    let mut ids = std::collections::HashSet::new();
    for _ in 0..64 {
        let id = generate_report_id();
        assert_eq!(id.len(), 22);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(ids.insert(id), "报告 ID 不应重复");
    }
}

#[test]
fn test_background_sweeper_removes_expired() {
    let cache = ReportCache::with_ttl(Duration::from_millis(30));
    cache.put("a", real_report());
    cache.put("b", real_report());
    cache.spawn_sweeper(Duration::from_millis(50));

    assert_eq!(cache.stats().total, 2);

    // 等待条目过期并被清扫线程移除
    std::thread::sleep(Duration::from_millis(150));
    assert_eq!(cache.stats().total, 0);
}

#[test]
fn test_expired_get_is_miss_with_eviction() {
    let cache = ReportCache::with_ttl(Duration::from_millis(10));
    let id = generate_report_id();
    cache.put(&id, real_report());

    std::thread::sleep(Duration::from_millis(30));
    assert!(cache.get(&id).is_none());
    // 查询已把过期条目淘汰
    assert_eq!(cache.stats().total, 0);
    assert_eq!(cache.stats().expired, 0);
}
