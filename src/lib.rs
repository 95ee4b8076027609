//! # 数据文件分析库
//!
//! 这是一个用于解析、校验与统计异构数据文件的 Rust 库。支持四种
//! 文件类型：销售 CSV、用户/会话 JSON、行式应用日志 LOG、产品目录
//! XML。核心是并发处理引擎：分类后的输入列表经过
//! 解析 → 校验 → 指标 → 聚合 流水线，产出一份类型化的执行报告。
//!
//! ## 功能特性
//!
//! - 按扩展名的输入发现与分类（目录递归 / 单文件 / 显式列表）
//! - 每种文件类型独立的解析器与指标函数
//! - 三种执行模式：顺序、并行（有界线程池 + 每文件超时）、对比
//! - 瞬时错误的指数退避重试；校验错误永不重试
//! - 单文件失败完全隔离，从不中断整次运行
//! - 统一的日志系统（通过 logging feature）
//! - 丰富的错误处理与类型安全的 API
//!
//! ## 快速开始
//!
//! ```no_run
//! use datafile_analysis::config::EngineOptions;
//! use datafile_analysis::engine;
//!
//! let options = EngineOptions::default();
//! let report = engine::process_directory("data", &options).unwrap();
//! println!(
//!     "处理 {} 个文件，成功 {}，失败 {}",
//!     report.total_files, report.success_count, report.error_count
//! );
//! ```
//!
//! ## 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`config`] - 文件配置与引擎选项
//! - [`discovery`] - 输入发现与分类
//! - [`datafile`] - 四种文件类型的解析器
//! - [`metrics`] - 四种文件类型的指标函数
//! - [`processor`] - 单文件处理流水线
//! - [`retry`] - 重试策略
//! - [`modes`] - 顺序 / 并行 / 对比执行模式
//! - [`report`] - 结果与报告数据模型、聚合
//! - [`engine`] - 引擎门面（公共入口）
//! - [`progress`] - 进度回调接口
//! - [`cache`] - 报告 TTL 缓存（Web 协作者）
//! - [`formatter`] - 文本报告格式化器（协作者）

pub mod cache;
pub mod config;
pub mod datafile;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod formatter;
#[cfg(feature = "logging")]
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod processor;
pub mod progress;
pub mod report;
pub mod retry;

// 重新导出常用类型和函数
pub use discovery::FileType;
pub use error::{AnalysisError, Result};
pub use modes::ExecutionMode;
pub use report::{ExecutionReport, FileResult, Status};

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 库描述
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 预导入模块
///
/// 包含了最常用的类型和函数，方便用户快速开始使用。
///
/// ```no_run
/// use datafile_analysis::prelude::*;
///
/// // 现在你可以直接使用所有常用的类型和函数
/// ```
pub mod prelude {
    pub use crate::cache::{generate_report_id, ReportCache};
    pub use crate::config::EngineOptions;
    pub use crate::discovery::FileType;
    pub use crate::engine::{
        process, process_directory, process_file, process_files,
        EngineInput,
    };
    pub use crate::error::{AnalysisError, Result};
    pub use crate::modes::ExecutionMode;
    pub use crate::progress::{NoopProgress, ProgressSink};
    pub use crate::report::{
        ExecutionReport, FileError, FileResult, Status,
    };
}
