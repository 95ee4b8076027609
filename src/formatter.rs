//! 文本报告格式化器（协作者接口）
//!
//! 把 [`ExecutionReport`] 渲染成 80 列定宽的人类可读报告并写入输出
//! 目录。引擎本身不依赖任何具体格式化器实现；不配置时直接使用未经
//! 注解的 `ExecutionReport` 即可。另附 JSON 导出作为补充。

use crate::error::Result;
use crate::report::{ExecutionReport, Status};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 报告固定宽度
const WIDTH: usize = 80;

/// 生成文本报告并写入 `output_dir`，返回写入的文件路径。
///
/// 文件名形如 `report_YYYYMMDD_HHMMSS.txt`。
///
/// # Errors
///
/// 目录创建或文件写入失败时返回 `Err(AnalysisError::Io)`。
pub fn generate_and_save<P: AsRef<Path>>(
    report: &ExecutionReport,
    output_dir: P,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let stamp =
        chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = output_dir.join(format!("report_{stamp}.txt"));

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render(report).as_bytes())?;
    writer.flush()?;

    log::info!("文本报告已写入: {}", path.display());
    Ok(path)
}

/// 将报告另存为 JSON 文件，返回写入的文件路径。
///
/// # Errors
///
/// 序列化或文件写入失败时返回错误。
pub fn save_json<P: AsRef<Path>>(
    report: &ExecutionReport,
    output_dir: P,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let stamp =
        chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = output_dir.join(format!("report_{stamp}.json"));
    fs::write(&path, report.to_json()?)?;

    log::info!("JSON 报告已写入: {}", path.display());
    Ok(path)
}

/// 渲染完整报告文本
#[must_use]
pub fn render(report: &ExecutionReport) -> String {
    let mut out = String::new();

    // Header
    push_rule(&mut out, '=');
    push_centered(&mut out, "数据文件分析报告");
    push_rule(&mut out, '=');
    out.push('\n');

    // Metadata
    push_section(&mut out, "运行信息");
    push_kv(&mut out, "执行模式", report.mode.as_str());
    push_kv(&mut out, "开始时间", &report.start_time);
    if let Some(dir) = &report.directory {
        push_kv(&mut out, "输入目录", &dir.display().to_string());
    }
    push_kv(
        &mut out,
        "总耗时",
        &format!("{} ms", report.total_duration_ms),
    );
    out.push('\n');

    // Executive Summary
    push_section(&mut out, "执行摘要");
    push_kv(&mut out, "文件总数", &report.total_files.to_string());
    push_kv(
        &mut out,
        "成功 / 失败 / 部分",
        &format!(
            "{} / {} / {}",
            report.success_count,
            report.error_count,
            report.partial_count
        ),
    );
    push_kv(
        &mut out,
        "CSV / JSON / LOG / XML",
        &format!(
            "{} / {} / {} / {}",
            report.csv_count,
            report.json_count,
            report.log_count,
            report.xml_count
        ),
    );
    out.push('\n');

    // 按类型的指标块
    for label in ["csv", "json", "log", "xml"] {
        let block: Vec<_> = report
            .results
            .iter()
            .filter(|r| {
                r.file_type.as_str() == label
                    && r.status != Status::Error
            })
            .collect();
        if block.is_empty() {
            continue;
        }
        push_section(&mut out, &format!("{} 指标", label.to_uppercase()));
        for result in block {
            push_kv(&mut out, "文件", &result.filename);
            for (key, value) in &result.metrics {
                push_wrapped(
                    &mut out,
                    &format!("  {key}: {value}"),
                );
            }
            out.push('\n');
        }
    }

    // Performance Analysis
    push_section(&mut out, "性能分析");
    let avg = if report.total_files == 0 {
        0.0
    } else {
        report.total_duration_ms as f64 / report.total_files as f64
    };
    push_kv(&mut out, "平均每文件耗时", &format!("{avg:.2} ms"));
    if let Some(bench) = &report.benchmark_data {
        push_kv(
            &mut out,
            "顺序运行",
            &format!(
                "{} ms (内存 {} KB)",
                bench.sequential.duration_ms, bench.sequential.memory_kb
            ),
        );
        push_kv(
            &mut out,
            "并行运行",
            &format!(
                "{} ms (内存 {} KB)",
                bench.parallel.duration_ms, bench.parallel.memory_kb
            ),
        );
        push_kv(
            &mut out,
            "加速比",
            &format!("{:.2}", bench.comparison.speedup_factor),
        );
        push_kv(&mut out, "较快一方", &bench.comparison.faster_mode);
    }
    out.push('\n');

    // Errors & Warnings
    push_section(&mut out, "错误与警告");
    let mut any = false;
    for result in &report.results {
        if result.errors.is_empty() {
            continue;
        }
        any = true;
        let first = result.errors[0].render();
        push_wrapped(
            &mut out,
            &format!("{}: {}", result.filename, first),
        );
    }
    if !any {
        out.push_str("（无）\n");
    }
    out.push('\n');

    // Footer
    push_rule(&mut out, '=');
    push_centered(
        &mut out,
        &format!("{} v{}", crate::NAME, crate::VERSION),
    );
    push_rule(&mut out, '=');

    out
}

fn push_rule(out: &mut String, ch: char) {
    out.extend(std::iter::repeat(ch).take(WIDTH));
    out.push('\n');
}

fn push_centered(out: &mut String, text: &str) {
    let len = text.chars().count();
    let pad = WIDTH.saturating_sub(len) / 2;
    out.extend(std::iter::repeat(' ').take(pad));
    out.push_str(text);
    out.push('\n');
}

fn push_section(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    push_rule(out, '-');
}

fn push_kv(out: &mut String, key: &str, value: &str) {
    push_wrapped(out, &format!("{key}: {value}"));
}

/// 追加一行文本，超过 80 列时按字符折行
fn push_wrapped(out: &mut String, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        out.push('\n');
        return;
    }
    for chunk in chars.chunks(WIDTH) {
        out.extend(chunk.iter());
        out.push('\n');
    }
}
