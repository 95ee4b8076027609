//! 并行执行模式 - 有界工作线程池与每文件超时
//!
//! ## 并发模型
//!
//! - 任务通道：主线程把 `(序号, 类型, 路径)` 全部投入一个 mpsc 通道，
//!   工作线程通过 `Arc<Mutex<Receiver>>` 共享取用（先到先得）
//! - 结果通道：每个完成的任务连同输入序号发回主线程，最终按序号
//!   重排，保证输出列表与输入顺序一致
//! - 看护线程：每个任务在独立线程中执行，工作线程用 `recv_timeout`
//!   等待；超时或 panic 时该槽位被替换为合成错误结果，线程池本身
//!   不受影响
//!
//! ## 隔离保证
//!
//! 单个文件的失败（解析错误、超时、panic）只影响它自己的槽位；
//! 其余任务继续执行。进度信号按完成顺序发出。

use crate::config::EngineOptions;
use crate::discovery::FileType;
use crate::progress::ProgressSink;
use crate::report::FileResult;
use crate::retry::{process_with_retry, RetryPolicy};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// 单个任务的处理函数签名
pub type TaskFn = dyn Fn(FileType, &Path) -> FileResult + Send + Sync;

/// 并行处理一组文件，使用默认的"带重试的单文件流水线"作为任务体。
#[must_use]
pub fn run_parallel(
    files: &[(FileType, PathBuf)],
    options: &EngineOptions,
    sink: Arc<dyn ProgressSink>,
) -> Vec<FileResult> {
    let policy = RetryPolicy {
        max_retries: options.max_retries,
        retry_delay_ms: options.retry_delay_ms,
    };
    let task: Arc<TaskFn> = Arc::new(move |file_type, path| {
        process_with_retry(file_type, path, &policy)
    });
    run_parallel_with(files, options, sink, task)
}

/// 并行处理一组文件，任务体由调用方注入（测试用它模拟慢任务与 panic）。
#[must_use]
pub fn run_parallel_with(
    files: &[(FileType, PathBuf)],
    options: &EngineOptions,
    sink: Arc<dyn ProgressSink>,
    task: Arc<TaskFn>,
) -> Vec<FileResult> {
    let total = files.len();
    if total == 0 {
        return Vec::new();
    }

    let worker_count = options.max_workers.min(total).max(1);
    let timeout = Duration::from_millis(options.timeout_ms);

    #[cfg(feature = "logging")]
    tracing::info!(
        "并行模式开始: {} 个文件, {} 个工作线程, 超时 {} ms",
        total,
        worker_count,
        options.timeout_ms
    );

    sink.start(total);

    // 任务通道：一次性投入全部任务后关闭发送端
    let (task_tx, task_rx) =
        mpsc::channel::<(usize, FileType, PathBuf)>();
    for (index, (file_type, path)) in files.iter().enumerate() {
        // 发送端在本函数内存活，send 不会失败
        let _ = task_tx.send((index, *file_type, path.clone()));
    }
    drop(task_tx);
    let task_rx = Arc::new(Mutex::new(task_rx));

    let (result_tx, result_rx) =
        mpsc::channel::<(usize, FileResult)>();
    let completed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(worker_count);
    for worker_id in 0..worker_count {
        let task_rx = Arc::clone(&task_rx);
        let result_tx = result_tx.clone();
        let task = Arc::clone(&task);
        let sink = Arc::clone(&sink);
        let completed = Arc::clone(&completed);

        handles.push(thread::spawn(move || {
            worker_loop(
                worker_id, &task_rx, &result_tx, &task, timeout, &sink,
                &completed, total,
            );
        }));
    }
    drop(result_tx);

    // 按序号回填结果
    let mut slots: Vec<Option<FileResult>> =
        (0..total).map(|_| None).collect();
    while let Ok((index, result)) = result_rx.recv() {
        slots[index] = Some(result);
    }

    for handle in handles {
        let _ = handle.join();
    }

    sink.stop();

    // 理论上每个槽位都已填充；防御性地把缺失槽位补成合成错误
    let results: Vec<FileResult> = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                FileResult::error(
                    files[index].0,
                    &files[index].1,
                    "Task crashed or timed out: worker process crashed"
                        .to_string(),
                )
            })
        })
        .collect();

    #[cfg(feature = "logging")]
    tracing::info!("并行模式完成: {} 个结果", results.len());

    results
}

/// 工作线程主循环：从共享通道取任务直到通道关闭
#[allow(clippy::too_many_arguments)]
fn worker_loop(
    worker_id: usize,
    task_rx: &Arc<Mutex<mpsc::Receiver<(usize, FileType, PathBuf)>>>,
    result_tx: &mpsc::Sender<(usize, FileResult)>,
    task: &Arc<TaskFn>,
    timeout: Duration,
    sink: &Arc<dyn ProgressSink>,
    completed: &Arc<AtomicUsize>,
    total: usize,
) {
    #[cfg(feature = "logging")]
    tracing::debug!("工作线程 {} 启动", worker_id);
    #[cfg(not(feature = "logging"))]
    let _ = worker_id;

    loop {
        let (index, file_type, path) = {
            let rx = match task_rx.lock() {
                Ok(rx) => rx,
                // 锁中毒说明其他线程 panic；本线程直接退出
                Err(_) => return,
            };
            match rx.recv() {
                Ok(item) => item,
                Err(_) => break, // 通道关闭，退出循环
            }
        };

        let result =
            run_task_with_deadline(file_type, &path, task, timeout);

        if result_tx.send((index, result)).is_err() {
            break;
        }

        // 进度按完成顺序推进
        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        sink.update(done, total);
    }

    #[cfg(feature = "logging")]
    tracing::debug!("工作线程 {} 退出", worker_id);
}

/// 在看护线程中执行任务并等待截止时间。
///
/// - 正常完成：原样返回结果
/// - 任务 panic：返回 `"Task crashed or timed out: worker process
///   crashed"` 合成错误
/// - 超时：放弃执行线程（其结果被丢弃），返回
///   `"Task crashed or timed out: processing timeout after N ms"`
///
/// 合成错误结果的 `duration_ms` 恒为 0。
fn run_task_with_deadline(
    file_type: FileType,
    path: &Path,
    task: &Arc<TaskFn>,
    timeout: Duration,
) -> FileResult {
    let (done_tx, done_rx) = mpsc::channel();
    let task = Arc::clone(task);
    let task_path = path.to_path_buf();

    let handle = thread::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            task(file_type, &task_path)
        }));
        let _ = done_tx.send(outcome);
    });

    match done_rx.recv_timeout(timeout) {
        Ok(Ok(result)) => {
            let _ = handle.join();
            result
        }
        Ok(Err(_panic)) => {
            let _ = handle.join();
            #[cfg(feature = "logging")]
            tracing::error!("任务 panic: {}", path.display());
            FileResult::error(
                file_type,
                path,
                "Task crashed or timed out: worker process crashed"
                    .to_string(),
            )
        }
        Err(_) => {
            // 超时：执行线程被放弃，主流程继续
            #[cfg(feature = "logging")]
            tracing::error!(
                "任务超时 ({} ms): {}",
                timeout.as_millis(),
                path.display()
            );
            FileResult::error(
                file_type,
                path,
                format!(
                    "Task crashed or timed out: processing timeout \
                     after {} ms",
                    timeout.as_millis()
                ),
            )
        }
    }
}
