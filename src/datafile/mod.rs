//! 数据文件解析模块
//!
//! 每种文件类型一个解析器，共享同一签名：
//! `parse(path) → Ok(data) | Partial(data, errors) | Error(reason)`。
//! 解析器一次性读入整个文件，不修改外部状态，也从不向调用方抛出 panic。

pub mod csv;
pub mod json;
pub mod log;
pub mod types;
pub mod xml;

use crate::discovery::FileType;
use crate::report::FileError;
use std::path::Path;

pub use types::{
    Catalog, CatalogMetadata, LogEntry, LogLevel, Product, Sale, Session,
    User, UserActivity,
};

/// 解析器的三臂结果
#[derive(Debug, Clone)]
pub enum ParseOutcome<T> {
    /// 完全成功
    Ok(T),
    /// 产出了数据，同时也有逐行错误
    Partial(T, Vec<FileError>),
    /// 整个文件解析失败
    Error(String),
}

/// 按类型分派后的统一数据载体
#[derive(Debug, Clone)]
pub enum ParsedData {
    Sales(Vec<Sale>),
    Activity(UserActivity),
    Entries(Vec<LogEntry>),
    Catalog(Catalog),
}

/// 按文件类型分派到对应解析器。
///
/// `FileType::Unknown` 不对应任何解析器，直接返回错误。
#[must_use]
pub fn parse_datafile(
    file_type: FileType,
    path: &Path,
) -> ParseOutcome<ParsedData> {
    match file_type {
        FileType::Csv => map_outcome(csv::parse(path), ParsedData::Sales),
        FileType::Json => {
            map_outcome(json::parse(path), ParsedData::Activity)
        }
        FileType::Log => map_outcome(log::parse(path), ParsedData::Entries),
        FileType::Xml => map_outcome(xml::parse(path), ParsedData::Catalog),
        FileType::Unknown => ParseOutcome::Error(format!(
            "不支持的文件类型: {}",
            path.display()
        )),
    }
}

fn map_outcome<T, F>(
    outcome: ParseOutcome<T>,
    wrap: F,
) -> ParseOutcome<ParsedData>
where
    F: FnOnce(T) -> ParsedData,
{
    match outcome {
        ParseOutcome::Ok(data) => ParseOutcome::Ok(wrap(data)),
        ParseOutcome::Partial(data, errors) => {
            ParseOutcome::Partial(wrap(data), errors)
        }
        ParseOutcome::Error(reason) => ParseOutcome::Error(reason),
    }
}

/// 读取整个文件为字符串；失败时给出带 `failed to read` 前缀的原因，
/// 供重试策略识别为可重试错误。
pub(crate) fn read_to_string(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| {
        format!("failed to read file {}: {}", path.display(), e)
    })
}
