//! 配置模块
//!
//! 分为两层：
//! - [`Config`]：从 `config.toml` 读取的文件配置（可选），与默认值合并后
//!   得到 [`RuntimeConfig`]。
//! - [`EngineOptions`]：引擎单次运行的选项结构体（§ 执行选项），所有字段
//!   都有默认值，并在 [`EngineOptions::normalized`] 中做边界收敛。

use crate::modes::ExecutionMode;
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

/// 每个文件的最小超时时间（毫秒），低于该值会被钳制上来
pub const MIN_TIMEOUT_MS: u64 = 1_000;

/// 退避延迟的上限（毫秒）
pub const MAX_BACKOFF_MS: u64 = 5_000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub log: Option<LogSection>,
    pub input: Option<InputSection>,
    pub engine: Option<EngineSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    pub enable_stdout: Option<bool>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    pub data_dir: Option<PathBuf>,
}

/// `[engine]` 小节，未知键一律拒绝
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    pub mode: Option<String>,
    pub benchmark: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub max_workers: Option<usize>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub show_progress: Option<bool>,
    pub verbose: Option<bool>,
}

/// 合并默认值后的运行时配置
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub enable_stdout: bool,
    pub log_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub options: EngineOptions,
}

impl Config {
    /// 加载配置文件并与默认值合并。
    ///
    /// 查找顺序：`$DATAFILE_CONFIG` → 当前目录 `config.toml` →
    /// `config_dir()/datafile-analysis/config.toml`。找不到时使用默认配置。
    #[must_use]
    pub fn load() -> RuntimeConfig {
        let mut cfg = Self { log: None, input: None, engine: None };

        let config_path = (|| {
            if let Ok(p) = env::var("DATAFILE_CONFIG") {
                return Some(PathBuf::from(p));
            }
            if let Ok(cwd) = env::current_dir() {
                let p = cwd.join("config.toml");
                if p.exists() {
                    return Some(p);
                }
            }
            if let Some(cfg_dir) = dirs::config_dir() {
                let p =
                    cfg_dir.join("datafile-analysis").join("config.toml");
                if p.exists() {
                    return Some(p);
                }
            }
            None
        })();

        if let Some(path) = config_path {
            match fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Self>(&contents) {
                    Ok(parsed) => {
                        cfg = parsed;
                        log::info!("使用配置文件: {}", path.display());
                    }
                    Err(e) => {
                        log::error!(
                            "解析配置文件失败 {}: {}",
                            path.display(),
                            e
                        );
                        // 配置写错视为致命问题，立即退出
                        std::process::exit(2);
                    }
                },
                Err(e) => {
                    log::warn!("读取配置文件失败 {}: {}", path.display(), e);
                }
            }
        } else {
            log::info!("未找到配置文件；使用默认运行时配置");
        }

        let enable_stdout = cfg
            .log
            .as_ref()
            .and_then(|l| l.enable_stdout)
            .unwrap_or(cfg!(debug_assertions));

        let log_dir = cfg.log.as_ref().and_then(|l| l.log_dir.clone());
        let data_dir = cfg.input.as_ref().and_then(|i| i.data_dir.clone());

        let mut options = EngineOptions::default();
        if let Some(engine) = cfg.engine.as_ref() {
            if let Some(mode) = engine.mode.as_deref() {
                options.mode = match mode {
                    "sequential" => ExecutionMode::Sequential,
                    _ => ExecutionMode::Parallel,
                };
            }
            if let Some(v) = engine.benchmark {
                options.benchmark = v;
            }
            if let Some(v) = engine.timeout_ms {
                options.timeout_ms = v;
            }
            if let Some(v) = engine.max_workers {
                options.max_workers = v;
            }
            if let Some(v) = engine.max_retries {
                options.max_retries = v;
            }
            if let Some(v) = engine.retry_delay_ms {
                options.retry_delay_ms = v;
            }
            if let Some(v) = engine.output_dir.clone() {
                options.output_dir = v;
            }
            if let Some(v) = engine.show_progress {
                options.show_progress = v;
            }
            if let Some(v) = engine.verbose {
                options.verbose = v;
            }
        }

        RuntimeConfig { enable_stdout, log_dir, data_dir, options }
    }
}

/// 引擎单次运行的选项
///
/// 字段与默认值：
///
/// | 选项 | 含义 | 默认 |
/// |---|---|---|
/// | `mode` | 顺序或并行 | 并行 |
/// | `benchmark` | 为 true 时覆盖 mode，执行对比测试 | false |
/// | `timeout_ms` | 并行/对比模式下每个文件的截止时间 | 30000 |
/// | `max_workers` | 并行工作线程数，钳制到 `[1, 2×核数]` | 8 |
/// | `max_retries` | 重试总次数上限 | 3 |
/// | `retry_delay_ms` | 重试基础延迟 | 1000 |
/// | `output_dir` | 报告输出目录（外部协作者使用） | `output` |
/// | `show_progress` | 是否触发进度回调 | true |
/// | `verbose` | 是否输出发现阶段摘要 | false |
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub mode: ExecutionMode,
    pub benchmark: bool,
    pub timeout_ms: u64,
    pub max_workers: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub output_dir: PathBuf,
    pub show_progress: bool,
    pub verbose: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            benchmark: false,
            timeout_ms: 30_000,
            max_workers: 8,
            max_retries: 3,
            retry_delay_ms: 1_000,
            output_dir: PathBuf::from("output"),
            show_progress: true,
            verbose: false,
        }
    }
}

impl EngineOptions {
    /// 返回边界收敛后的选项副本。
    ///
    /// - `max_workers` 钳制到 `[1, 2 × 可用核数]`
    /// - `timeout_ms` 最低 1000 毫秒
    /// - `max_retries` 最低 1（至少执行一次）
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        let core_cap = 2 * num_cpus::get().max(1);
        out.max_workers = out.max_workers.clamp(1, core_cap);
        out.timeout_ms = out.timeout_ms.max(MIN_TIMEOUT_MS);
        out.max_retries = out.max_retries.max(1);
        out
    }

    /// 实际生效的执行模式（benchmark 覆盖 mode）
    #[must_use]
    pub fn effective_mode(&self) -> ExecutionMode {
        if self.benchmark { ExecutionMode::Benchmark } else { self.mode }
    }
}
