//! 错误类型定义
//!
//! 这个模块定义了库顶层的错误类型，使用 thiserror 提供丰富的错误信息。
//!
//! 注意：解析与指标阶段的失败不走这里，它们作为字符串原因被吸收进
//! `FileResult::errors`（见 `processor` 模块），从不向调用方传播。

/// 数据文件分析引擎的结果类型
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// 数据文件分析错误类型
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误（报告导出）
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 输入中没有任何可处理的文件
    #[error("没有可处理的文件: {0}")]
    NoFiles(String),
}

impl AnalysisError {
    /// 检查是否为 IO 错误
    pub fn is_io_error(&self) -> bool {
        matches!(self, AnalysisError::Io(_))
    }

    /// 检查是否为"无文件"错误
    pub fn is_no_files_error(&self) -> bool {
        matches!(self, AnalysisError::NoFiles(_))
    }
}
