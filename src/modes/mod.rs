//! 执行模式模块
//!
//! 三种模式消费同一个已分类输入列表，产出同样按输入顺序排列的结果：
//! - [`sequential`]：逐个处理
//! - [`parallel`]：有界工作线程池并发处理，带每文件超时
//! - [`benchmark`]：先后跑顺序与并行两种模式并给出对比记录

pub mod benchmark;
pub mod parallel;
pub mod sequential;

use serde::Serialize;
use std::fmt;

pub use benchmark::run_benchmark;
pub use parallel::{run_parallel, run_parallel_with};
pub use sequential::run_sequential;

/// 执行模式（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Sequential,
    Parallel,
    Benchmark,
}

impl ExecutionMode {
    /// 模式的小写名称
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
            Self::Benchmark => "benchmark",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
