//! 输入发现与分类模块
//!
//! 将输入（目录、单个文件或显式文件列表）规范化为 `(文件类型, 路径)` 列表。
//! 分类只依据扩展名（不区分大小写），从不嗅探文件内容；不支持的输入被记入
//! `skipped` 列表而不会使整个运行失败。

use crate::error::{AnalysisError, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 支持的文件类型（封闭集合）
///
/// `Unknown` 是保留哨兵值，仅用于发现阶段被跳过的输入所合成的错误结果。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Json,
    Log,
    Xml,
    Unknown,
}

impl FileType {
    /// 根据扩展名（不含点，不区分大小写）分类
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "log" => Some(Self::Log),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// 根据路径的扩展名分类
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// 类型的小写名称
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Log => "log",
            Self::Xml => "xml",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 发现阶段的结果
#[derive(Debug, Default, Clone)]
pub struct Discovered {
    /// 已分类的输入：`(类型, 路径)`
    pub files: Vec<(FileType, PathBuf)>,
    /// 被跳过的输入及原因
    pub skipped: Vec<(PathBuf, String)>,
}

impl Discovered {
    /// 两个列表是否都为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.skipped.is_empty()
    }
}

/// 递归扫描目录，收集所有扩展名受支持的常规文件。
///
/// 结果按 `(类型, 路径)` 排序，保证多次运行结果一致。
///
/// # Errors
///
/// - 目录不存在或不可读时返回 `Err(AnalysisError::Io)`。
/// - 目录中没有任何受支持的文件时返回 `Err(AnalysisError::NoFiles)`。
pub fn discover_directory<P: AsRef<Path>>(dir: P) -> Result<Discovered> {
    let dir = dir.as_ref();
    log::trace!("开始扫描目录: {}", dir.display());

    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;

    // 按 (类型, 路径) 排序，使运行结果可复现
    files.sort();

    if files.is_empty() {
        return Err(AnalysisError::NoFiles(format!(
            "目录 {} 中没有受支持的文件",
            dir.display()
        )));
    }

    log::debug!("目录扫描完成: {} 个受支持的文件", files.len());
    Ok(Discovered { files, skipped: Vec::new() })
}

/// 递归遍历目录的辅助函数
fn walk_dir(
    dir: &Path,
    files: &mut Vec<(FileType, PathBuf)>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
            continue;
        }
        if !path.is_file() {
            continue;
        }
        if let Some(file_type) = FileType::from_path(&path) {
            files.push((file_type, path));
        }
    }
    Ok(())
}

/// 将单个文件规范化为分类结果。
///
/// 扩展名受支持且为常规文件时进入 `files`，否则进入 `skipped` 并附原因。
#[must_use]
pub fn discover_file<P: AsRef<Path>>(path: P) -> Discovered {
    let path = path.as_ref();
    let mut out = Discovered::default();

    match FileType::from_path(path) {
        Some(file_type) => {
            if path.is_file() {
                out.files.push((file_type, path.to_path_buf()));
            } else {
                out.skipped.push((
                    path.to_path_buf(),
                    format!("不是常规文件: {}", path.display()),
                ));
            }
        }
        None => {
            out.skipped.push((
                path.to_path_buf(),
                format!("不支持的文件类型: {}", path.display()),
            ));
        }
    }

    out
}

/// 将显式文件列表规范化为分类结果。
///
/// 每个条目按单文件规则处理；成功的进入 `files`，失败的进入 `skipped`。
#[must_use]
pub fn discover_files<P: AsRef<Path>>(paths: &[P]) -> Discovered {
    let mut out = Discovered::default();
    for path in paths {
        let one = discover_file(path);
        out.files.extend(one.files);
        out.skipped.extend(one.skipped);
    }
    log::trace!(
        "列表发现完成: {} 个文件, {} 个跳过",
        out.files.len(),
        out.skipped.len()
    );
    out
}
