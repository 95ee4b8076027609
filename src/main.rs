use anyhow::Result;
use datafile_analysis::{
    config::{Config, EngineOptions},
    engine, formatter,
    modes::ExecutionMode,
};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // 日志参数解析与初始化
    #[cfg(feature = "logging")]
    {
        use datafile_analysis::logging::{init_logging, LogConfig};
        let log_config = LogConfig::from_args(env::args().skip(1));
        if let Err(e) = init_logging(&log_config) {
            eprintln!("日志初始化失败: {e}");
        }
    }

    let runtime = Config::load();
    let (input_dir, options) =
        parse_args(env::args().skip(1), runtime.options);

    // 输入目录：命令行优先，其次配置文件，最后当前目录
    let dir = input_dir
        .or(runtime.data_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    log::trace!("开始处理目录: {}", dir.display());
    if !dir.exists() {
        log::error!("目录不存在: {}", dir.display());
        return Ok(());
    }

    let report = match engine::process_directory(&dir, &options) {
        Ok(report) => report,
        Err(e) => {
            log::error!("处理失败: {e}");
            return Ok(());
        }
    };

    log::info!(
        "处理完成，共 {} 个文件，成功 {}，失败 {}，部分成功 {}，总耗时 {} ms",
        report.total_files,
        report.success_count,
        report.error_count,
        report.partial_count,
        report.total_duration_ms
    );

    let path = formatter::generate_and_save(&report, &options.output_dir)?;
    log::info!("报告已写入: {}", path.display());

    Ok(())
}

/// 解析引擎相关的命令行参数。
///
/// 第一个非 `--` 开头的参数作为输入目录；日志相关参数由
/// `LogConfig::from_args` 处理，这里跳过。
fn parse_args<I: Iterator<Item = String>>(
    args: I,
    mut options: EngineOptions,
) -> (Option<PathBuf>, EngineOptions) {
    let mut input_dir = None;
    for arg in args {
        if let Some(mode) = arg.strip_prefix("--mode=") {
            options.mode = match mode {
                "sequential" => ExecutionMode::Sequential,
                _ => ExecutionMode::Parallel,
            };
        } else if arg == "--benchmark" {
            options.benchmark = true;
        } else if let Some(v) = arg.strip_prefix("--workers=") {
            if let Ok(v) = v.parse() {
                options.max_workers = v;
            }
        } else if let Some(v) = arg.strip_prefix("--timeout=") {
            if let Ok(v) = v.parse() {
                options.timeout_ms = v;
            }
        } else if let Some(v) = arg.strip_prefix("--retries=") {
            if let Ok(v) = v.parse() {
                options.max_retries = v;
            }
        } else if let Some(v) = arg.strip_prefix("--output=") {
            options.output_dir = PathBuf::from(v);
        } else if arg == "--no-progress" {
            options.show_progress = false;
        } else if arg == "--verbose" {
            options.verbose = true;
        } else if is_log_flag(&arg) {
            // --log-* 参数由日志模块解析
        } else if arg.starts_with("--") {
            // 未知选项一律拒绝
            eprintln!("未知参数: {arg}");
            std::process::exit(2);
        } else {
            input_dir = Some(PathBuf::from(arg));
        }
    }
    (input_dir, options)
}

/// 日志模块负责的参数
fn is_log_flag(arg: &str) -> bool {
    arg == "--no-log"
        || arg.starts_with("--log-level=")
        || arg.starts_with("--log-dir=")
}
