//! 并行模式集成测试：顺序保证、超时隔离、panic 隔离

mod common;

use datafile_analysis::config::EngineOptions;
use datafile_analysis::discovery::FileType;
use datafile_analysis::modes::{run_parallel, run_parallel_with};
use datafile_analysis::progress::{NoopProgress, ProgressSink};
use datafile_analysis::report::{FileResult, Status};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// 记录进度信号的回调实现
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(usize, usize)>>,
    started: Mutex<Option<usize>>,
    stopped: Mutex<bool>,
}

impl ProgressSink for RecordingSink {
    fn start(&self, total: usize) {
        *self.started.lock().unwrap() = Some(total);
    }
    fn update(&self, current: usize, total: usize) {
        self.events.lock().unwrap().push((current, total));
    }
    fn stop(&self) {
        *self.stopped.lock().unwrap() = true;
    }
}

fn dummy_files(count: usize) -> Vec<(FileType, PathBuf)> {
    (0..count)
        .map(|i| (FileType::Log, PathBuf::from(format!("file_{i}.log"))))
        .collect()
}

fn ok_task(file_type: FileType, path: &std::path::Path) -> FileResult {
    let mut result = FileResult::new(file_type, path);
    result.metrics.insert(
        "total_entries".to_string(),
        serde_json::Value::from(1),
    );
    result.normalize_status();
    result
}

#[test]
fn test_results_preserve_input_order() {
    let files = dummy_files(16);
    let options = EngineOptions {
        max_workers: 4,
        timeout_ms: 5_000,
        ..Default::default()
    };

    // 人为让偶数序号的任务慢一些，制造乱序完成
    let results = run_parallel_with(
        &files,
        &options,
        Arc::new(NoopProgress),
        Arc::new(|file_type, path| {
            let index: usize = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_prefix("file_"))
                .and_then(|s| s.parse().ok())
                .unwrap();
            if index % 2 == 0 {
                thread::sleep(Duration::from_millis(30));
            }
            ok_task(file_type, path)
        }),
    );

    assert_eq!(results.len(), 16);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.filename, format!("file_{i}.log"));
    }
}

#[test]
fn test_timeout_isolated_to_one_slot() {
    // 十个任务，其中序号 3 无条件超时；其余九个应全部成功
    let files = dummy_files(10);
    let options = EngineOptions {
        max_workers: 4,
        timeout_ms: 1_000,
        ..Default::default()
    };

    let results = run_parallel_with(
        &files,
        &options,
        Arc::new(NoopProgress),
        Arc::new(|file_type, path| {
            if path.to_str().unwrap().contains("file_3") {
                thread::sleep(Duration::from_millis(3_000));
            }
            ok_task(file_type, path)
        }),
    );

    assert_eq!(results.len(), 10);
    let ok_count =
        results.iter().filter(|r| r.status == Status::Ok).count();
    let error_count =
        results.iter().filter(|r| r.status == Status::Error).count();
    assert_eq!(ok_count, 9);
    assert_eq!(error_count, 1);

    // 出错的槽位正好是输入序号 3，消息与耗时符合约定
    let failed = &results[3];
    assert_eq!(failed.status, Status::Error);
    assert!(failed.errors[0]
        .render()
        .contains("Task crashed or timed out"));
    assert_eq!(failed.duration_ms, 0);

    // 顺序不受完成时间影响
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.filename, format!("file_{i}.log"));
    }
}

#[test]
fn test_panic_isolated_to_one_slot() {
    let files = dummy_files(6);
    let options = EngineOptions {
        max_workers: 3,
        timeout_ms: 5_000,
        ..Default::default()
    };

    let results = run_parallel_with(
        &files,
        &options,
        Arc::new(NoopProgress),
        Arc::new(|file_type, path| {
            if path.to_str().unwrap().contains("file_2") {
                panic!("模拟解析器崩溃");
            }
            ok_task(file_type, path)
        }),
    );

    assert_eq!(results.len(), 6);
    assert_eq!(results[2].status, Status::Error);
    assert!(results[2].errors[0]
        .render()
        .contains("worker process crashed"));

    let ok_count =
        results.iter().filter(|r| r.status == Status::Ok).count();
    assert_eq!(ok_count, 5);
}

#[test]
fn test_progress_ticks_fire_per_completion() {
    let files = dummy_files(8);
    let options = EngineOptions {
        max_workers: 4,
        timeout_ms: 5_000,
        ..Default::default()
    };

    let sink = Arc::new(RecordingSink::default());
    let results = run_parallel_with(
        &files,
        &options,
        Arc::clone(&sink) as Arc<dyn ProgressSink>,
        Arc::new(ok_task),
    );
    assert_eq!(results.len(), 8);

    assert_eq!(*sink.started.lock().unwrap(), Some(8));
    assert!(*sink.stopped.lock().unwrap());

    // 每个完成的任务发一次信号；完成计数最终到达总数
    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 8);
    assert!(events.iter().any(|&(current, _)| current == 8));
}

#[test]
fn test_empty_input_returns_empty() {
    let options = EngineOptions::default();
    let results =
        run_parallel(&[], &options, Arc::new(NoopProgress));
    assert!(results.is_empty());
}

#[test]
fn test_parallel_with_real_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let paths = common::create_mixed_dir(&temp_dir);
    let files: Vec<(FileType, PathBuf)> = vec![
        (FileType::Csv, paths[0].clone()),
        (FileType::Json, paths[1].clone()),
        (FileType::Log, paths[2].clone()),
        (FileType::Xml, paths[3].clone()),
    ];

    let options = EngineOptions {
        max_workers: 2,
        timeout_ms: 30_000,
        ..Default::default()
    };
    let results =
        run_parallel(&files, &options, Arc::new(NoopProgress));

    assert_eq!(results.len(), 4);
    for result in &results {
        assert_eq!(result.status, Status::Ok);
    }
}

#[test]
fn test_worker_count_larger_than_input() {
    let files = dummy_files(2);
    let options = EngineOptions {
        max_workers: 16,
        timeout_ms: 5_000,
        ..Default::default()
    };

    let results = run_parallel_with(
        &files,
        &options,
        Arc::new(NoopProgress),
        Arc::new(ok_task),
    );
    assert_eq!(results.len(), 2);
}
