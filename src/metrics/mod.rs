//! 指标计算模块
//!
//! 每种文件类型一个纯函数：`compute(data) → Ok(指标映射) | Err(原因)`。
//! 空输入一律返回错误。指标值用 `serde_json::Value` 表达，既能放标量
//! 也能放嵌套对象/数组。

pub mod csv;
pub mod json;
pub mod log;
pub mod xml;

use crate::datafile::ParsedData;
use crate::report::Metrics;

/// 按解析产物的类型分派到对应的指标函数
pub fn compute_metrics(data: &ParsedData) -> Result<Metrics, String> {
    match data {
        ParsedData::Sales(sales) => csv::compute(sales),
        ParsedData::Activity(activity) => json::compute(activity),
        ParsedData::Entries(entries) => log::compute(entries),
        ParsedData::Catalog(catalog) => xml::compute(catalog),
    }
}

/// 四舍五入到两位小数
#[must_use]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 四舍五入到一位小数
#[must_use]
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 对 `(键, 计数)` 对按计数降序、键升序排序后取前 `n` 个。
/// 键升序的次级排序保证同计数时结果稳定。
pub(crate) fn top_n_by_count<T: Ord + Clone>(
    mut pairs: Vec<(T, u64)>,
    n: usize,
) -> Vec<(T, u64)> {
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs.truncate(n);
    pairs
}
