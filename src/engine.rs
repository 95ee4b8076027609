//! 引擎门面
//!
//! 唯一的公共入口：组合 发现 → 执行模式 → 聚合，并把发现阶段被跳过的
//! 输入作为合成错误结果附到报告里。只要至少分类出一个输入（或存在被
//! 跳过的条目），就返回 `Ok(report)`，哪怕所有文件都失败了。

use crate::config::EngineOptions;
use crate::discovery::{self, Discovered};
use crate::error::{AnalysisError, Result};
use crate::modes::{self, ExecutionMode};
use crate::progress::{ConsoleProgress, NoopProgress, ProgressSink};
use crate::report::{aggregate, ExecutionReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// 引擎的三种输入形态
#[derive(Debug, Clone)]
pub enum EngineInput {
    /// 递归扫描一个目录
    Directory(PathBuf),
    /// 处理单个文件
    File(PathBuf),
    /// 处理显式文件列表
    Files(Vec<PathBuf>),
}

/// 处理输入并产出执行报告。
///
/// 进度显示由 `options.show_progress` 决定：开启时使用控制台实现，
/// 关闭时使用空实现。需要自定义进度回调时用 [`process_with_sink`]。
///
/// # Errors
///
/// 只有当分类结果为空且没有任何被跳过的条目时返回
/// `Err(AnalysisError::NoFiles)`；其余失败都体现在单个
/// `FileResult` 中。
pub fn process(
    input: EngineInput,
    options: &EngineOptions,
) -> Result<ExecutionReport> {
    let sink: Arc<dyn ProgressSink> = if options.show_progress {
        Arc::new(ConsoleProgress::new())
    } else {
        Arc::new(NoopProgress)
    };
    process_with_sink(input, options, sink)
}

/// 同 [`process`]，但由调用方注入进度回调。
///
/// # Errors
///
/// 参见 [`process`]。
pub fn process_with_sink(
    input: EngineInput,
    options: &EngineOptions,
    sink: Arc<dyn ProgressSink>,
) -> Result<ExecutionReport> {
    let options = options.normalized();

    let (discovered, directory) = discover_input(&input)?;
    let Discovered { files, skipped } = discovered;

    if files.is_empty() && skipped.is_empty() {
        return Err(AnalysisError::NoFiles(
            "No files to process".to_string(),
        ));
    }

    if options.verbose {
        log::info!(
            "发现阶段: {} 个文件已分类, {} 个被跳过",
            files.len(),
            skipped.len()
        );
        for (file_type, path) in &files {
            log::info!("  [{}] {}", file_type, path.display());
        }
        for (path, reason) in &skipped {
            log::info!("  [跳过] {}: {}", path.display(), reason);
        }
    }

    let start_time = chrono::Local::now().to_rfc3339();
    let mode = options.effective_mode();

    // 进度关闭时把回调降级为空实现
    let sink: Arc<dyn ProgressSink> = if options.show_progress {
        sink
    } else {
        Arc::new(NoopProgress)
    };

    let (results, benchmark_data, duration) = match mode {
        ExecutionMode::Sequential => {
            let start = Instant::now();
            let results =
                modes::run_sequential(&files, &options, sink.as_ref());
            (results, None, start.elapsed())
        }
        ExecutionMode::Parallel => {
            let start = Instant::now();
            let results = modes::run_parallel(&files, &options, sink);
            (results, None, start.elapsed())
        }
        ExecutionMode::Benchmark => {
            let (results, data, par_duration) =
                modes::run_benchmark(&files, &options);
            (results, Some(data), par_duration)
        }
    };

    Ok(aggregate(
        mode,
        start_time,
        directory,
        results,
        &skipped,
        duration,
        benchmark_data,
    ))
}

/// 处理一个目录（[`process`] 的便捷封装）。
///
/// # Errors
///
/// 参见 [`process`]。
pub fn process_directory<P: AsRef<Path>>(
    path: P,
    options: &EngineOptions,
) -> Result<ExecutionReport> {
    process(
        EngineInput::Directory(path.as_ref().to_path_buf()),
        options,
    )
}

/// 处理单个文件（[`process`] 的便捷封装）。
///
/// # Errors
///
/// 参见 [`process`]。
pub fn process_file<P: AsRef<Path>>(
    path: P,
    options: &EngineOptions,
) -> Result<ExecutionReport> {
    process(EngineInput::File(path.as_ref().to_path_buf()), options)
}

/// 处理显式文件列表（[`process`] 的便捷封装）。
///
/// # Errors
///
/// 参见 [`process`]。
pub fn process_files<P: AsRef<Path>>(
    paths: &[P],
    options: &EngineOptions,
) -> Result<ExecutionReport> {
    let paths: Vec<PathBuf> =
        paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    process(EngineInput::Files(paths), options)
}

/// 按输入形态执行发现阶段
fn discover_input(
    input: &EngineInput,
) -> Result<(Discovered, Option<PathBuf>)> {
    match input {
        EngineInput::Directory(dir) => {
            let discovered = match discovery::discover_directory(dir) {
                Ok(d) => d,
                // 目录中没有受支持的文件：统一成引擎层的"无文件"错误
                Err(AnalysisError::NoFiles(_)) => {
                    return Err(AnalysisError::NoFiles(
                        "No files to process".to_string(),
                    ));
                }
                Err(e) => return Err(e),
            };
            Ok((discovered, Some(dir.clone())))
        }
        EngineInput::File(path) => {
            Ok((discovery::discover_file(path), None))
        }
        EngineInput::Files(paths) => {
            Ok((discovery::discover_files(paths), None))
        }
    }
}
