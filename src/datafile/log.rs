//! 应用日志解析器 - 行格式校验与部分成功语义
//!
//! 本模块实现了一个强健的行式日志解析器，每个非空行必须匹配
//! `YYYY-MM-DD  HH:MM:SS  [LEVEL]  [COMPONENT]  message` 格式
//! （字段间为任意空白）。
//!
//! ## 核心特性
//!
//! ### 1. 快速预检
//! - **日期前缀检测**：在进入正则之前先用字节级检查判断行首是否为合法
//!   `YYYY-MM-DD` 日期，绝大多数坏行在这里就被拦下
//! - **级别集合校验**：`LEVEL` 必须属于 `{DEBUG,INFO,WARN,ERROR,FATAL}`
//! - **小时范围校验**：`HH` 必须在 `[0, 23]` 内
//!
//! ### 2. 部分成功语义
//! - 匹配失败的行收集为逐行错误，不会中断后续行的处理
//! - 至少一行匹配且存在失败行 → `Partial(entries, errors)`
//! - 所有行都匹配 → `Ok(entries)`
//! - 没有任何行匹配 → `Error`（携带第一个失败原因）
//!
//! ## 解析流程
//!
//! ```text
//! 原始日志行 → 空行过滤 → 日期预检 → 正则匹配 → 级别/小时校验
//!                                 ↓失败            ↓失败
//!                             逐行错误          逐行错误
//! ```

use super::types::{LogEntry, LogLevel};
use super::ParseOutcome;
use crate::report::FileError;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// 每月天数（非闰年），用于日期合法性校验
const DAYS_IN_MONTH: [u8; 12] =
    [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// 判断年份是否为闰年
#[must_use]
pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 判断字符串前 10 个字节是否为合法的 `YYYY-MM-DD` 日期。
///
/// 这是进入正则之前的快速预检：逐字节检查分隔符位置、数字位以及
/// 月份/日期的取值范围，避免对明显不合法的行做正则匹配。
#[must_use]
pub fn starts_with_date(s: &str) -> bool {
    if s.len() < 10 {
        return false;
    }

    let b = s.as_bytes();

    // 检查分隔符位置
    if !(b[4] == b'-' && b[7] == b'-') {
        return false;
    }

    // 检查所有数字位
    if !b[0].is_ascii_digit()
        || !b[1].is_ascii_digit()
        || !b[2].is_ascii_digit()
        || !b[3].is_ascii_digit()
        || !b[5].is_ascii_digit()
        || !b[6].is_ascii_digit()
        || !b[8].is_ascii_digit()
        || !b[9].is_ascii_digit()
    {
        return false;
    }

    // 年份合法性校验
    let year = u16::from(b[0] - b'0') * 1000
        + u16::from(b[1] - b'0') * 100
        + u16::from(b[2] - b'0') * 10
        + u16::from(b[3] - b'0');
    if year == 0 {
        return false;
    }

    // 月份合法性校验
    let month = (b[5] - b'0') * 10 + (b[6] - b'0');
    if month == 0 || month > 12 {
        return false;
    }

    // 日期合法性校验
    let mut max_days = DAYS_IN_MONTH[month as usize - 1];
    if month == 2 && is_leap_year(year) {
        max_days += 1;
    }
    let day = (b[8] - b'0') * 10 + (b[9] - b'0');
    day != 0 && day <= max_days
}

/// 解析应用日志文件
#[must_use]
pub fn parse(path: &Path) -> ParseOutcome<Vec<LogEntry>> {
    let contents = match super::read_to_string(path) {
        Ok(c) => c,
        Err(reason) => return ParseOutcome::Error(reason),
    };

    #[cfg(feature = "logging")]
    tracing::debug!("开始解析日志文件: {}", path.display());

    let mut entries = Vec::new();
    let mut errors: Vec<FileError> = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_line(trimmed) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                errors.push(FileError::Line {
                    line: line_num,
                    message: reason,
                });
            }
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        "日志文件 {} 解析完成: {} 条记录, {} 个错误行",
        path.display(),
        entries.len(),
        errors.len()
    );

    // 两臂判定：无任何匹配行 → 整体错误；有匹配行 → Ok / Partial
    if entries.is_empty() {
        let reason = errors
            .first()
            .map(FileError::render)
            .unwrap_or_else(|| "no valid log lines".to_string());
        return ParseOutcome::Error(reason);
    }

    if errors.is_empty() {
        ParseOutcome::Ok(entries)
    } else {
        ParseOutcome::Partial(entries, errors)
    }
}

/// 解析单个非空日志行
fn parse_line(line: &str) -> Result<LogEntry, String> {
    lazy_static! {
        static ref LOG_LINE_RE: Regex = Regex::new(
            r"^(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2})\s+\[(\w+)\]\s+\[([^\]]+)\]\s+(.+)$"
        )
        .unwrap();
    }

    // 字节级预检先于正则
    if !starts_with_date(line) {
        return Err("line does not start with a valid date".to_string());
    }

    let caps = LOG_LINE_RE
        .captures(line)
        .ok_or_else(|| "line does not match log format".to_string())?;

    let date = &caps[1];
    let time = &caps[2];
    let level_text = &caps[3];
    let component = &caps[4];
    let message = &caps[5];

    let level = LogLevel::parse(level_text)
        .ok_or_else(|| format!("invalid level '{level_text}'"))?;

    // 小时取自时间字段的前两位
    let hour: u8 = time[0..2]
        .parse()
        .map_err(|_| format!("invalid hour in '{time}'"))?;
    if hour > 23 {
        return Err(format!("hour out of range: {hour}"));
    }

    Ok(LogEntry {
        timestamp: format!("{date} {time}"),
        level,
        component: component.to_string(),
        message: message.to_string(),
        hour,
    })
}
