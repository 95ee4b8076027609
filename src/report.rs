//! 执行报告数据模型与聚合
//!
//! 定义单文件结果 [`FileResult`]、整体报告 [`ExecutionReport`] 以及
//! 对比模式的 [`BenchmarkData`]，并提供把有序结果列表折叠为报告的
//! [`aggregate`] 函数。

use crate::discovery::FileType;
use crate::modes::ExecutionMode;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 指标映射：指标名 → JSON 值
pub type Metrics = serde_json::Map<String, serde_json::Value>;

/// 单文件处理状态（封闭集合）
///
/// `Partial` 表示解析器同时产出了数据和逐行错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
    Partial,
}

/// 文件级错误条目：自由文本消息，或带行号的 `(行, 消息)` 对
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileError {
    /// 自由文本消息
    Message(String),
    /// 带行号的逐行错误
    Line { line: usize, message: String },
}

impl FileError {
    /// 错误的文本内容（不含行号前缀）
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Message(m) => m,
            Self::Line { message, .. } => message,
        }
    }

    /// 渲染为单行文本，带行号时加 `行N:` 前缀
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Message(m) => m.clone(),
            Self::Line { line, message } => {
                format!("line {line}: {message}")
            }
        }
    }
}

/// 单个文件的处理结果
///
/// 不变式：
/// - `status == Ok` 时 `errors` 为空且 `metrics` 非空
/// - `status == Error` 时 `metrics` 为空
/// - `status == Partial` 时二者都非空
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    /// 完整路径
    pub path: PathBuf,
    /// 文件名（basename）
    pub filename: String,
    /// 文件类型
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// 处理状态
    pub status: Status,
    /// 指标映射（失败时为空）
    pub metrics: Metrics,
    /// 错误列表（保持产生顺序）
    pub errors: Vec<FileError>,
    /// 处理该文件花费的墙钟毫秒数
    pub duration_ms: u64,
    /// 成功处理的记录/行数
    pub lines_processed: u64,
    /// 解析失败的行数
    pub lines_failed: u64,
}

impl FileResult {
    /// 创建初始结果（状态 Ok，空指标与错误），供流水线逐步填充
    #[must_use]
    pub fn new(file_type: FileType, path: &Path) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self {
            path: path.to_path_buf(),
            filename,
            file_type,
            status: Status::Ok,
            metrics: Metrics::new(),
            errors: Vec::new(),
            duration_ms: 0,
            lines_processed: 0,
            lines_failed: 0,
        }
    }

    /// 创建终态错误结果（合成结果也走这里）
    #[must_use]
    pub fn error(file_type: FileType, path: &Path, reason: String) -> Self {
        let mut out = Self::new(file_type, path);
        out.status = Status::Error;
        out.errors.push(FileError::Message(reason));
        out
    }

    /// 按"有错误/有指标"组合归一化状态：
    /// 有错误且有指标 → Partial；有错误且无指标 → Error；否则 Ok。
    pub fn normalize_status(&mut self) {
        self.status = match (self.errors.is_empty(), self.metrics.is_empty())
        {
            (false, false) => Status::Partial,
            (false, true) => Status::Error,
            (true, _) => Status::Ok,
        };
    }
}

/// 对比模式中单次运行的度量
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRun {
    pub duration_ms: u64,
    pub duration_sec: f64,
    pub success_count: usize,
    pub error_count: usize,
    pub avg_time_per_file: f64,
    pub memory_kb: u64,
}

/// 顺序与并行两次运行的对比结论
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkComparison {
    /// 加速比 `seq_ms / par_ms`（保留两位小数；par 为 0 时记 0.0）
    pub speedup_factor: f64,
    /// 节省的毫秒数（可能为负）
    pub time_saved_ms: i64,
    /// 节省的百分比（保留一位小数）
    pub time_saved_percent: f64,
    /// 较快的一方（`parallel` 或 `sequential`）
    pub faster_mode: String,
}

/// 对比模式的完整记录
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkData {
    pub total_files: usize,
    pub processes_used: usize,
    pub sequential: BenchmarkRun,
    pub parallel: BenchmarkRun,
    pub comparison: BenchmarkComparison,
}

/// 整次执行的聚合报告
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// 执行模式
    pub mode: ExecutionMode,
    /// 运行开始时间（RFC 3339）
    pub start_time: String,
    /// 输入目录（目录输入时存在）
    pub directory: Option<PathBuf>,
    /// 结果总数（含合成条目）
    pub total_files: usize,
    pub csv_count: usize,
    pub json_count: usize,
    pub log_count: usize,
    pub xml_count: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub partial_count: usize,
    /// 本次模式执行的墙钟毫秒数
    pub total_duration_ms: u64,
    /// 按输入顺序排列的结果
    pub results: Vec<FileResult>,
    /// 对比模式附加数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_data: Option<BenchmarkData>,
}

impl ExecutionReport {
    /// 序列化为 JSON 字符串
    ///
    /// # Errors
    ///
    /// 序列化失败时返回 `Err(serde_json::Error)`。
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// 将有序结果折叠为 [`ExecutionReport`]。
///
/// 为每个被跳过的发现条目追加一个合成的
/// `FileResult{type=Unknown, status=Error}`，同时计入
/// `total_files` 与 `error_count`。
#[must_use]
pub fn aggregate(
    mode: ExecutionMode,
    start_time: String,
    directory: Option<PathBuf>,
    mut results: Vec<FileResult>,
    skipped: &[(PathBuf, String)],
    total_duration: Duration,
    benchmark_data: Option<BenchmarkData>,
) -> ExecutionReport {
    // 被跳过的输入作为合成错误结果附在末尾
    for (path, reason) in skipped {
        results.push(FileResult::error(
            FileType::Unknown,
            path,
            reason.clone(),
        ));
    }

    let mut report = ExecutionReport {
        mode,
        start_time,
        directory,
        total_files: results.len(),
        csv_count: 0,
        json_count: 0,
        log_count: 0,
        xml_count: 0,
        success_count: 0,
        error_count: 0,
        partial_count: 0,
        total_duration_ms: total_duration.as_millis() as u64,
        results,
        benchmark_data,
    };

    for result in &report.results {
        match result.file_type {
            FileType::Csv => report.csv_count += 1,
            FileType::Json => report.json_count += 1,
            FileType::Log => report.log_count += 1,
            FileType::Xml => report.xml_count += 1,
            FileType::Unknown => {}
        }
        match result.status {
            Status::Ok => report.success_count += 1,
            Status::Error => report.error_count += 1,
            Status::Partial => report.partial_count += 1,
        }
    }

    report
}
