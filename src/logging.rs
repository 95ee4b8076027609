//! 日志初始化和配置模块
//!
//! 提供统一的日志初始化与命令行参数解析接口，使用 tracing 库。
//! 默认配置：info 级别，同时输出到控制台和 logs 目录（按天循环）。
//! 二进制入口通过 [`LogConfig::from_args`] 解析 `--log-*` 参数后调用
//! [`init_logging`]。

use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 日志配置结构体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 是否启用日志
    pub enabled: bool,
    /// 日志级别
    pub level: Level,
    /// 日志文件目录（缺省为当前目录下的 `logs`）
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    /// 创建新的日志配置，使用默认级别
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志级别
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// 从命令行参数解析日志配置
    ///
    /// 识别的参数：`--no-log`、`--log-level=<error|warn|info|debug|trace>`、
    /// `--log-dir=<路径>`。其余参数原样忽略（由调用方解析）。
    pub fn from_args<I: Iterator<Item = String>>(args: I) -> Self {
        let mut config = Self::default();
        for arg in args {
            if arg == "--no-log" {
                config.enabled = false;
            } else if let Some(lvl) = arg.strip_prefix("--log-level=") {
                config.level = match lvl.to_lowercase().as_str() {
                    "error" => Level::ERROR,
                    "warn" => Level::WARN,
                    "debug" => Level::DEBUG,
                    "trace" => Level::TRACE,
                    _ => Level::INFO,
                };
            } else if let Some(path) = arg.strip_prefix("--log-dir=") {
                config.log_dir = Some(PathBuf::from(path));
            }
        }
        config
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { enabled: true, level: Level::INFO, log_dir: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("日志配置错误: {0}")]
    Config(String),
    #[error("日志初始化错误: {0}")]
    Init(String),
}

/// 日志初始化结果
pub type LogResult<T> = Result<T, LogError>;

/// 初始化日志系统
///
/// - `enabled` 为 false 时直接返回，不安装任何订阅者
/// - 控制台层与按天循环的文件层同时输出
/// - 级别可被 `RUST_LOG` 环境变量覆盖
/// - 重复初始化不视为错误（后续调用安静返回）
///
/// # Arguments
///
/// * `config` - 日志配置
///
/// # Returns
///
/// 返回初始化结果
///
/// # Examples
///
/// ```no_run
/// use datafile_analysis::logging::{init_logging, LogConfig};
/// use tracing::Level;
///
/// // 默认配置（INFO 级别）
/// init_logging(&LogConfig::new()).unwrap();
///
/// // 自定义级别
/// let config = LogConfig::new().level(Level::DEBUG);
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LogConfig) -> LogResult<()> {
    if !config.enabled {
        return Ok(());
    }

    // 创建环境过滤器，默认使用配置的级别
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    // 构建订阅者
    let subscriber = Registry::default().with(env_filter);

    // 控制台输出层
    let console_layer = fmt::layer()
        .with_timer(SystemTime)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_ansi(true);

    // 文件输出层 - 按天循环，缺省输出到 logs 目录
    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender =
        tracing_appender::rolling::daily(log_dir, "datafile-analysis");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_timer(SystemTime)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_ansi(false); // 文件中不使用颜色

    // 尝试初始化，如果失败说明已经初始化过了
    match subscriber.with(console_layer).with(file_layer).try_init() {
        Ok(_) => {
            // 存储 guard 以防止 appender 被丢弃
            std::mem::forget(_guard);
            tracing::info!(
                "日志系统初始化完成 - 输出到控制台和 logs 目录，按天循环"
            );
            Ok(())
        }
        Err(_) => {
            // 已经初始化过了，这不是错误
            Ok(())
        }
    }
}

/// 使用默认配置初始化日志系统
///
/// 这是一个便捷函数，使用默认配置初始化日志系统。
/// 默认配置会输出 INFO 级别的日志到控制台和 logs 目录。
///
/// # Examples
///
/// ```no_run
/// use datafile_analysis::logging::init_default_logging;
///
/// init_default_logging().unwrap();
/// ```
pub fn init_default_logging() -> LogResult<()> {
    init_logging(&LogConfig::default())
}
