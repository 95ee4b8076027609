//! 进度回调接口
//!
//! 执行模式通过 [`ProgressSink`] 向外发进度信号。空实现是合法的；
//! 控制台实现用 `\r` 覆写一行百分比。接口必须能安全地被多个工作
//! 线程并发调用。

use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// 进度回调接口（三个操作：开始 / 更新 / 结束）
pub trait ProgressSink: Send + Sync {
    /// 运行开始，`total` 为文件总数
    fn start(&self, total: usize);
    /// 已完成 `current` / `total` 个文件
    fn update(&self, current: usize, total: usize);
    /// 运行结束
    fn stop(&self);
}

/// 空实现：所有回调都是空操作
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn start(&self, _total: usize) {}
    fn update(&self, _current: usize, _total: usize) {}
    fn stop(&self) {}
}

/// 控制台实现：每前进至少 5 个百分点才覆写一次，避免刷屏
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    last_percent: AtomicU8,
}

impl ConsoleProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for ConsoleProgress {
    fn start(&self, total: usize) {
        self.last_percent.store(0, Ordering::SeqCst);
        print!("\r处理进度: 0% (0/{total}) ");
        io::stdout().flush().ok();
    }

    fn update(&self, current: usize, total: usize) {
        if total == 0 {
            return;
        }
        // 用整数运算求百分比，避免浮点精度问题
        let percent_u128 =
            (current as u128).saturating_mul(100u128) / total as u128;
        let percent = u8::try_from(percent_u128).unwrap_or(100u8);
        let last = self.last_percent.load(Ordering::SeqCst);
        if percent >= last.saturating_add(5) || percent == 100 {
            self.last_percent.store(percent, Ordering::SeqCst);
            print!("\r处理进度: {percent}% ({current}/{total}) ");
            io::stdout().flush().ok();
        }
    }

    fn stop(&self) {
        println!();
    }
}
