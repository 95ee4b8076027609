//! 重试策略
//!
//! 包裹单次文件处理调用：结果为错误且错误可重试时，按指数退避
//! `min(base × 2^(attempt−1), 5000)` 毫秒休眠后重试；否则原样返回。
//! 校验/格式类错误是永久性的，从不重试。

use crate::config::MAX_BACKOFF_MS;
use crate::discovery::FileType;
use crate::processor::process_datafile;
use crate::report::{FileResult, Status};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// 可重试错误的标记子串（大小写无关）
const RETRYABLE_MARKERS: [&str; 7] = [
    "failed to read",
    "timeout",
    "timed out",
    "processing timeout",
    "worker process crashed",
    "killed",
    "exit:",
];

/// 永久性错误的标记子串（命中则排除重试）
const PERMANENT_MARKERS: [&str; 4] =
    ["validation", "invalid", "invalid json", "csv validation"];

/// 重试参数
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 总尝试次数上限（含首次）
    pub max_retries: u32,
    /// 基础延迟（毫秒）
    pub retry_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, retry_delay_ms: 1_000 }
    }
}

impl RetryPolicy {
    /// 第 `attempt` 次失败后的退避延迟（attempt 从 1 计）
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << (attempt.saturating_sub(1)).min(12);
        let ms = self
            .retry_delay_ms
            .saturating_mul(factor)
            .min(MAX_BACKOFF_MS);
        Duration::from_millis(ms)
    }
}

/// 判断一个错误结果是否可重试。
///
/// 规则：任一错误消息（大小写无关）命中可重试标记，**且**该消息未命中
/// 永久性标记。校验类错误（schema/validation）永不重试。
#[must_use]
pub fn is_retryable(result: &FileResult) -> bool {
    result.errors.iter().any(|error| {
        let lower = error.message().to_lowercase();
        RETRYABLE_MARKERS.iter().any(|m| lower.contains(m))
            && !PERMANENT_MARKERS.iter().any(|m| lower.contains(m))
    })
}

/// 带重试地处理单个文件。
///
/// 单个文件的各次尝试串行执行；成功（含 `Partial`）或遇到永久性
/// 错误时立即返回。
#[must_use]
pub fn process_with_retry(
    file_type: FileType,
    path: &Path,
    policy: &RetryPolicy,
) -> FileResult {
    let attempts = policy.max_retries.max(1);
    let mut attempt = 1;

    loop {
        let result = process_datafile(file_type, path);

        if result.status != Status::Error
            || attempt >= attempts
            || !is_retryable(&result)
        {
            return result;
        }

        let delay = policy.backoff_delay(attempt);
        #[cfg(feature = "logging")]
        tracing::info!(
            "文件 {} 第 {} 次尝试失败（可重试），{} ms 后重试",
            path.display(),
            attempt,
            delay.as_millis()
        );
        thread::sleep(delay);
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn error_result(message: &str) -> FileResult {
        FileResult::error(
            FileType::Csv,
            &PathBuf::from("x.csv"),
            message.to_string(),
        )
    }

    #[test]
    fn test_io_errors_are_retryable() {
        assert!(is_retryable(&error_result(
            "failed to read file x.csv: No such file"
        )));
        assert!(is_retryable(&error_result(
            "Task crashed or timed out: processing timeout"
        )));
        assert!(is_retryable(&error_result("worker process crashed")));
    }

    #[test]
    fn test_validation_errors_are_permanent() {
        assert!(!is_retryable(&error_result(
            "CSV validation failed: line 3: invalid price 'ERROR'"
        )));
        assert!(!is_retryable(&error_result("invalid JSON: EOF")));
        // 同时含有 timeout 与 validation 的消息按永久性处理
        assert!(!is_retryable(&error_result(
            "validation failed: field timeout missing"
        )));
    }

    #[test]
    fn test_ok_result_is_not_retryable() {
        let mut result =
            FileResult::new(FileType::Log, &PathBuf::from("a.log"));
        result.metrics.insert(
            "total_entries".to_string(),
            serde_json::Value::from(1),
        );
        result.normalize_status();
        assert!(!is_retryable(&result));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy { max_retries: 5, retry_delay_ms: 1_000 };
        assert_eq!(policy.backoff_delay(1).as_millis(), 1_000);
        assert_eq!(policy.backoff_delay(2).as_millis(), 2_000);
        assert_eq!(policy.backoff_delay(3).as_millis(), 4_000);
        // 上限 5000 毫秒
        assert_eq!(policy.backoff_delay(4).as_millis(), 5_000);
        assert_eq!(policy.backoff_delay(10).as_millis(), 5_000);
    }

    #[test]
    fn test_permanent_error_not_retried() {
        // 不存在的文件会产生可重试错误；用小延迟验证循环终止
        let policy = RetryPolicy { max_retries: 2, retry_delay_ms: 1 };
        let result = process_with_retry(
            FileType::Csv,
            Path::new("no/such/file.csv"),
            &policy,
        );
        assert_eq!(result.status, Status::Error);
    }
}
