//! 对比执行模式
//!
//! 在同一输入上先跑顺序模式、再跑并行模式（都关闭进度显示），
//! 记录两次运行的耗时、成功/失败数与峰值内存，并产出对比结论。
//! 聚合器采用的"正式"结果列表取并行那一次的。

use crate::config::EngineOptions;
use crate::discovery::FileType;
use crate::metrics::{round1, round2};
use crate::progress::NoopProgress;
use crate::report::{
    BenchmarkComparison, BenchmarkData, BenchmarkRun, FileResult, Status,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 运行对比模式。
///
/// 返回 `(并行运行的结果, 对比数据, 并行运行的耗时)`。
#[must_use]
pub fn run_benchmark(
    files: &[(FileType, PathBuf)],
    options: &EngineOptions,
) -> (Vec<FileResult>, BenchmarkData, Duration) {
    #[cfg(feature = "logging")]
    tracing::info!("对比模式开始: {} 个文件", files.len());

    // 顺序运行
    let seq_mem_before = peak_rss_kb();
    let seq_start = Instant::now();
    let seq_results =
        super::run_sequential(files, options, &NoopProgress);
    let seq_duration = seq_start.elapsed();
    let seq_mem_after = peak_rss_kb();

    // 并行运行
    let par_mem_before = peak_rss_kb();
    let par_start = Instant::now();
    let par_results =
        super::run_parallel(files, options, Arc::new(NoopProgress));
    let par_duration = par_start.elapsed();
    let par_mem_after = peak_rss_kb();

    let sequential = summarize_run(
        &seq_results,
        seq_duration,
        seq_mem_before.max(seq_mem_after),
    );
    let parallel = summarize_run(
        &par_results,
        par_duration,
        par_mem_before.max(par_mem_after),
    );

    let seq_ms = sequential.duration_ms;
    let par_ms = parallel.duration_ms;

    let speedup_factor = if par_ms == 0 {
        0.0
    } else {
        round2(seq_ms as f64 / par_ms as f64)
    };
    let time_saved_ms = seq_ms as i64 - par_ms as i64;
    let time_saved_percent = if seq_ms == 0 {
        0.0
    } else {
        round1(time_saved_ms as f64 / seq_ms as f64 * 100.0)
    };
    let faster_mode = if par_ms < seq_ms {
        "parallel".to_string()
    } else {
        "sequential".to_string()
    };

    let data = BenchmarkData {
        total_files: files.len(),
        processes_used: files.len(),
        sequential,
        parallel,
        comparison: BenchmarkComparison {
            speedup_factor,
            time_saved_ms,
            time_saved_percent,
            faster_mode,
        },
    };

    #[cfg(feature = "logging")]
    tracing::info!(
        "对比模式完成: 顺序 {} ms, 并行 {} ms, 加速比 {:.2}",
        seq_ms,
        par_ms,
        data.comparison.speedup_factor
    );

    (par_results, data, par_duration)
}

/// 汇总一次运行的度量
fn summarize_run(
    results: &[FileResult],
    duration: Duration,
    memory_kb: u64,
) -> BenchmarkRun {
    let duration_ms = duration.as_millis() as u64;
    let success_count =
        results.iter().filter(|r| r.status == Status::Ok).count();
    let error_count =
        results.iter().filter(|r| r.status == Status::Error).count();
    let avg_time_per_file = if results.is_empty() {
        0.0
    } else {
        round2(duration_ms as f64 / results.len() as f64)
    };

    BenchmarkRun {
        duration_ms,
        duration_sec: round2(duration.as_secs_f64()),
        success_count,
        error_count,
        avg_time_per_file,
        memory_kb,
    }
}

/// 进程的峰值常驻内存（KB）。
///
/// unix 上通过 `getrusage` 读取 max-RSS 高水位；失败或非 unix 平台
/// 返回 0。这是一个粗粒度的报告指标，不是硬性预算。
#[cfg(unix)]
pub fn peak_rss_kb() -> u64 {
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let rc =
        unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return 0;
    }
    let raw = usage.ru_maxrss.max(0) as u64;
    // macOS 报告字节，其余 unix 报告 KiB
    if cfg!(target_os = "macos") { raw / 1024 } else { raw }
}

/// 非 unix 平台没有 getrusage，报告 0
#[cfg(not(unix))]
pub fn peak_rss_kb() -> u64 {
    0
}
