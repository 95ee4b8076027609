//! 单文件处理流水线
//!
//! 把一个已分类的 `(类型, 路径)` 依次送过解析器和指标函数，产出一个
//! [`FileResult`]。本模块对调用方**从不失败**：解析或指标阶段的任何
//! 错误都会被吸收进结果的 `errors` 字段。

use crate::datafile::{parse_datafile, ParseOutcome};
use crate::discovery::FileType;
use crate::metrics::compute_metrics;
use crate::report::{FileError, FileResult};
use std::path::Path;
use std::time::Instant;

/// 处理单个文件，永远返回一个 `FileResult`。
///
/// ## 流程
///
/// 1. 记录单调时钟起点，构造初始结果
/// 2. 分派解析器：`Error` → 终态错误结果；`Partial` → 保留逐行错误；
///    `Ok` → 继续
/// 3. 分派指标函数：`Err` → 追加原因并清空指标；`Ok` → 写入指标
/// 4. 从指标推导 `lines_processed`，`lines_failed` 取解析期错误数
/// 5. 按"有错误/有指标"组合归一化状态
/// 6. 写入耗时
#[must_use]
pub fn process_datafile(file_type: FileType, path: &Path) -> FileResult {
    let start = Instant::now();
    let mut result = FileResult::new(file_type, path);

    #[cfg(feature = "logging")]
    tracing::debug!("开始处理文件: {} ({})", path.display(), file_type);

    let parse_errors;
    match parse_datafile(file_type, path) {
        ParseOutcome::Error(reason) => {
            // 解析整体失败：终态错误，跳过指标阶段
            result.errors.push(FileError::Message(reason));
            result.normalize_status();
            result.duration_ms = start.elapsed().as_millis() as u64;
            #[cfg(feature = "logging")]
            tracing::warn!(
                "文件 {} 解析失败: {}",
                path.display(),
                result.errors[0].render()
            );
            return result;
        }
        ParseOutcome::Partial(data, errors) => {
            parse_errors = errors.len() as u64;
            result.errors = errors;
            attach_metrics(&mut result, &data);
        }
        ParseOutcome::Ok(data) => {
            parse_errors = 0;
            attach_metrics(&mut result, &data);
        }
    }

    result.lines_processed = lines_processed(&result);
    result.lines_failed = parse_errors;
    result.normalize_status();
    result.duration_ms = start.elapsed().as_millis() as u64;

    #[cfg(feature = "logging")]
    tracing::debug!(
        "文件 {} 处理完成: 状态 {:?}, {} 行成功, {} 行失败, 耗时 {} ms",
        path.display(),
        result.status,
        result.lines_processed,
        result.lines_failed,
        result.duration_ms
    );

    result
}

/// 指标阶段：失败时把原因并入错误并保持指标为空
fn attach_metrics(
    result: &mut FileResult,
    data: &crate::datafile::ParsedData,
) {
    match compute_metrics(data) {
        Ok(metrics) => result.metrics = metrics,
        Err(reason) => {
            result.errors.push(FileError::Message(reason));
            result.metrics.clear();
        }
    }
}

/// 从指标映射推导处理的行/记录数（按类型取对应计数键）
fn lines_processed(result: &FileResult) -> u64 {
    let key = match result.file_type {
        FileType::Csv => "total_records",
        FileType::Log => "total_entries",
        FileType::Xml => "total_products",
        FileType::Json => "total_sessions",
        FileType::Unknown => return 0,
    };
    result
        .metrics
        .get(key)
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0)
}
