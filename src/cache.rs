//! 报告 TTL 缓存（Web 协作者接口）
//!
//! 为 Web 前端在"提交处理"与"稍后查询"之间暂存报告。条目带存入时间，
//! 超过 TTL 的条目在查询时顺带淘汰，也可由周期清扫线程批量移除。
//! 缓存本体可克隆（内部共享），适合在请求处理器之间传递。

use crate::report::ExecutionReport;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::{Duration, Instant};

/// 默认条目存活时间：1 小时
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// 默认清扫间隔：15 分钟
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// 生成报告 ID：16 字节加密随机值，URL 安全 base64 无填充编码
/// （约 22 个字符）。
#[must_use]
pub fn generate_report_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 缓存统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// 当前存储的条目总数
    pub total: usize,
    /// 未过期的条目数
    pub active: usize,
    /// 已过期但尚未清扫的条目数
    pub expired: usize,
}

struct CacheEntry {
    report: ExecutionReport,
    stored_at: Instant,
}

/// 带 TTL 的报告缓存
#[derive(Clone)]
pub struct ReportCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl ReportCache {
    /// 用默认 TTL（1 小时）创建缓存
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// 用自定义 TTL 创建缓存
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())), ttl }
    }

    /// 以当前时间存入一份报告
    pub fn put(&self, report_id: &str, report: ExecutionReport) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            report_id.to_string(),
            CacheEntry { report, stored_at: Instant::now() },
        );
    }

    /// 查询报告。
    ///
    /// 不存在或已超过 TTL 时返回 `None`；超时条目会在本次查询中被
    /// 顺带淘汰。
    #[must_use]
    pub fn get(&self, report_id: &str) -> Option<ExecutionReport> {
        let mut entries = self.entries.lock().unwrap();
        let expired = match entries.get(report_id) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                return Some(entry.report.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            // 过期条目在查询路径上淘汰
            entries.remove(report_id);
        }
        None
    }

    /// 当前缓存统计
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap();
        let total = entries.len();
        let expired = entries
            .values()
            .filter(|e| e.stored_at.elapsed() > self.ttl)
            .count();
        CacheStats { total, active: total - expired, expired }
    }

    /// 移除所有过期条目，返回移除数量
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, e| e.stored_at.elapsed() <= ttl);
        before - entries.len()
    }

    /// 启动后台清扫线程。
    ///
    /// 线程持有弱引用：缓存全部句柄被丢弃后，线程在下一个周期自行
    /// 退出，不会阻止进程结束。
    pub fn spawn_sweeper(&self, interval: Duration) {
        let entries: Weak<Mutex<HashMap<String, CacheEntry>>> =
            Arc::downgrade(&self.entries);
        let ttl = self.ttl;

        thread::spawn(move || loop {
            thread::sleep(interval);
            match entries.upgrade() {
                Some(entries) => {
                    let mut entries = entries.lock().unwrap();
                    let before = entries.len();
                    entries
                        .retain(|_, e| e.stored_at.elapsed() <= ttl);
                    let removed = before - entries.len();
                    if removed > 0 {
                        log::debug!(
                            "缓存清扫: 移除 {removed} 个过期条目"
                        );
                    }
                }
                // 缓存已被释放，清扫线程退出
                None => break,
            }
        });
    }
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new()
    }
}
