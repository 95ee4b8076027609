//! 顺序执行模式

use crate::config::EngineOptions;
use crate::discovery::FileType;
use crate::progress::ProgressSink;
use crate::report::FileResult;
use crate::retry::{process_with_retry, RetryPolicy};
use std::path::PathBuf;

/// 按输入顺序逐个处理文件，每处理完一个发一次进度信号。
#[must_use]
pub fn run_sequential(
    files: &[(FileType, PathBuf)],
    options: &EngineOptions,
    sink: &dyn ProgressSink,
) -> Vec<FileResult> {
    let policy = RetryPolicy {
        max_retries: options.max_retries,
        retry_delay_ms: options.retry_delay_ms,
    };

    #[cfg(feature = "logging")]
    tracing::info!("顺序模式开始: {} 个文件", files.len());

    sink.start(files.len());

    let mut results = Vec::with_capacity(files.len());
    for (index, (file_type, path)) in files.iter().enumerate() {
        results.push(process_with_retry(*file_type, path, &policy));
        sink.update(index + 1, files.len());
    }

    sink.stop();

    #[cfg(feature = "logging")]
    tracing::info!("顺序模式完成: {} 个结果", results.len());

    results
}
