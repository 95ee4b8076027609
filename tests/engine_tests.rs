//! 引擎门面集成测试：通用不变式与边界行为

mod common;

use datafile_analysis::config::EngineOptions;
use datafile_analysis::discovery::FileType;
use datafile_analysis::engine::{
    process, process_directory, process_file, process_files, EngineInput,
};
use datafile_analysis::modes::ExecutionMode;
use datafile_analysis::report::{ExecutionReport, Status};
use std::path::PathBuf;
use tempfile::TempDir;

fn quiet_options() -> EngineOptions {
    EngineOptions { show_progress: false, ..Default::default() }
}

/// 对任意报告断言通用不变式
fn assert_invariants(report: &ExecutionReport) {
    assert_eq!(report.results.len(), report.total_files);
    assert_eq!(
        report.success_count + report.error_count + report.partial_count,
        report.total_files
    );

    let unknown_count = report
        .results
        .iter()
        .filter(|r| r.file_type == FileType::Unknown)
        .count();
    assert_eq!(
        report.csv_count
            + report.json_count
            + report.log_count
            + report.xml_count
            + unknown_count,
        report.total_files
    );

    for result in &report.results {
        match result.status {
            Status::Ok => {
                assert!(result.errors.is_empty());
                assert!(!result.metrics.is_empty());
            }
            Status::Error => assert!(result.metrics.is_empty()),
            Status::Partial => {
                assert!(!result.errors.is_empty());
                assert!(!result.metrics.is_empty());
            }
        }
    }
}

#[test]
fn test_directory_run_parallel_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    common::create_mixed_dir(&temp_dir);

    let report =
        process_directory(temp_dir.path(), &quiet_options()).unwrap();
    assert_invariants(&report);
    assert_eq!(report.mode, ExecutionMode::Parallel);
    assert_eq!(report.total_files, 4);
    assert_eq!(report.success_count, 4);
    assert_eq!(report.csv_count, 1);
    assert_eq!(report.json_count, 1);
    assert_eq!(report.log_count, 1);
    assert_eq!(report.xml_count, 1);
    assert_eq!(
        report.directory.as_deref(),
        Some(temp_dir.path())
    );
    assert!(!report.start_time.is_empty());
}

#[test]
fn test_empty_file_list_is_error() {
    let paths: Vec<PathBuf> = Vec::new();
    let err = process_files(&paths, &quiet_options()).unwrap_err();
    assert!(err.is_no_files_error());
    assert!(err.to_string().contains("No files to process"));
}

#[test]
fn test_empty_directory_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err =
        process_directory(temp_dir.path(), &quiet_options()).unwrap_err();
    assert!(err.is_no_files_error());
}

#[test]
fn test_single_unsupported_file_yields_synthetic_unknown() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = common::create_test_file(&temp_dir, "notas.txt", "hola");

    // 不支持的输入不会让运行失败，而是产出一个合成 unknown 错误结果
    let report = process_file(&path, &quiet_options()).unwrap();
    assert_invariants(&report);
    assert_eq!(report.total_files, 1);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.results[0].file_type, FileType::Unknown);
    assert_eq!(report.results[0].status, Status::Error);
    assert_eq!(report.results[0].duration_ms, 0);
}

#[test]
fn test_all_failures_still_returns_ok() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bad_csv = common::create_test_file(
        &temp_dir,
        "corrupto.csv",
        &common::corrupt_csv_content(),
    );
    let bad_json = common::create_test_file(
        &temp_dir,
        "roto.json",
        "{not valid json}",
    );

    let report =
        process_files(&[bad_csv, bad_json], &quiet_options()).unwrap();
    assert_invariants(&report);
    assert_eq!(report.total_files, 2);
    assert_eq!(report.error_count, 2);
    assert_eq!(report.success_count, 0);
}

#[test]
fn test_mixed_list_with_skipped_entries() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let good = common::create_test_file(
        &temp_dir,
        "app.log",
        common::SAMPLE_LOG_CONTENT,
    );
    let unsupported =
        common::create_test_file(&temp_dir, "datos.txt", "x");

    let report =
        process_files(&[good, unsupported], &quiet_options()).unwrap();
    assert_invariants(&report);
    assert_eq!(report.total_files, 2);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.error_count, 1);

    // 合成条目附在结果末尾
    let synthetic = report.results.last().unwrap();
    assert_eq!(synthetic.file_type, FileType::Unknown);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    common::create_mixed_dir(&temp_dir);
    common::create_test_file(
        &temp_dir,
        "parcial.log",
        common::PARTIAL_LOG_CONTENT,
    );
    common::create_test_file(
        &temp_dir,
        "roto.json",
        "{not valid json}",
    );

    let sequential_options = EngineOptions {
        mode: ExecutionMode::Sequential,
        show_progress: false,
        ..Default::default()
    };
    let parallel_options = EngineOptions {
        mode: ExecutionMode::Parallel,
        show_progress: false,
        ..Default::default()
    };

    let seq =
        process_directory(temp_dir.path(), &sequential_options).unwrap();
    let par =
        process_directory(temp_dir.path(), &parallel_options).unwrap();

    assert_invariants(&seq);
    assert_invariants(&par);
    assert_eq!(seq.mode, ExecutionMode::Sequential);
    assert_eq!(par.mode, ExecutionMode::Parallel);
    assert_eq!(seq.total_files, par.total_files);

    // 两种模式逐文件等价：状态、指标、错误（顺序也一致）
    for (a, b) in seq.results.iter().zip(par.results.iter()) {
        assert_eq!(a.path, b.path);
        assert_eq!(a.status, b.status);
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.errors, b.errors);
        assert_eq!(a.lines_processed, b.lines_processed);
        assert_eq!(a.lines_failed, b.lines_failed);
    }
}

#[test]
fn test_results_ordered_by_input_index() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let a = common::create_test_file(
        &temp_dir,
        "zz.log",
        common::SAMPLE_LOG_CONTENT,
    );
    let b = common::create_test_file(
        &temp_dir,
        "aa.csv",
        &common::sample_csv_content(),
    );
    let c = common::create_test_file(
        &temp_dir,
        "mm.xml",
        common::SAMPLE_XML_CONTENT,
    );

    // 列表输入保持调用方给定的顺序，而不是字典序
    let report = process(
        EngineInput::Files(vec![a.clone(), b.clone(), c.clone()]),
        &quiet_options(),
    )
    .unwrap();

    assert_eq!(report.results[0].path, a);
    assert_eq!(report.results[1].path, b);
    assert_eq!(report.results[2].path, c);
}

#[test]
fn test_worker_and_timeout_clamps_accepted() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    common::create_mixed_dir(&temp_dir);

    // max_workers = 0 与超小 timeout 都会在引擎内被钳制而不是报错
    let options = EngineOptions {
        max_workers: 0,
        timeout_ms: 10,
        show_progress: false,
        ..Default::default()
    };
    let report = process_directory(temp_dir.path(), &options).unwrap();
    assert_invariants(&report);
    assert_eq!(report.success_count, 4);
}

#[test]
fn test_report_json_serialization() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    common::create_mixed_dir(&temp_dir);

    let report =
        process_directory(temp_dir.path(), &quiet_options()).unwrap();
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["mode"], "parallel");
    assert_eq!(value["total_files"], 4);
    assert_eq!(value["results"].as_array().unwrap().len(), 4);
}
