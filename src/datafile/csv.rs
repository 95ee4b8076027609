//! 销售 CSV 解析器 - 表头校验与逐行字段验证
//!
//! ## 核心规则
//!
//! - 文件首行必须与期望表头完全一致（不区分大小写）
//! - 每个数据行必须恰好有 6 个逗号分隔字段
//! - 任何一行校验失败都会使整个文件以 `Error` 失败（比 LOG 策略更严格），
//!   错误消息包含最多前三个失败行的 `line N: reason`
//! - 空文件、缺失或不匹配的表头都是错误
//!
//! ## 字段校验
//!
//! | 字段 | 规则 |
//! |---|---|
//! | fecha | ISO `YYYY-MM-DD` 日期 |
//! | precio_unitario | 数值且 > 0 |
//! | cantidad | 整数且 > 0 |
//! | descuento | 数值且在 [0, 100] |
//!
//! 派生字段：`total = unit_price × quantity × (1 − discount/100)`。

use super::types::Sale;
use super::ParseOutcome;
use chrono::NaiveDate;
use std::path::Path;

/// 期望的表头（不区分大小写比较）
const EXPECTED_HEADER: &str =
    "fecha,producto,categoria,precio_unitario,cantidad,descuento";

/// 数据行的固定字段数
const FIELD_COUNT: usize = 6;

/// 错误消息中最多列出的失败行数
const MAX_REPORTED_ROWS: usize = 3;

/// 解析销售 CSV 文件
#[must_use]
pub fn parse(path: &Path) -> ParseOutcome<Vec<Sale>> {
    let contents = match super::read_to_string(path) {
        Ok(c) => c,
        Err(reason) => return ParseOutcome::Error(reason),
    };

    #[cfg(feature = "logging")]
    tracing::debug!("开始解析 CSV 文件: {}", path.display());

    let mut lines = contents.lines();

    // 首行是表头；空文件直接失败
    let header = match lines.next() {
        Some(h) => h.trim(),
        None => {
            return ParseOutcome::Error(
                "CSV validation failed: empty file".to_string(),
            );
        }
    };

    if !header.eq_ignore_ascii_case(EXPECTED_HEADER) {
        return ParseOutcome::Error(format!(
            "CSV validation failed: invalid header '{header}' \
             (expected '{EXPECTED_HEADER}')"
        ));
    }

    let mut sales = Vec::new();
    let mut row_errors: Vec<(usize, String)> = Vec::new();

    // 数据行从第 2 行开始计
    for (idx, line) in lines.enumerate() {
        let line_num = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Ok(sale) => sales.push(sale),
            Err(reason) => row_errors.push((line_num, reason)),
        }
    }

    if !row_errors.is_empty() {
        // 单行失败即判整个文件失败；消息最多引用前三个失败行
        let mut shown: Vec<String> = row_errors
            .iter()
            .take(MAX_REPORTED_ROWS)
            .map(|(line, reason)| format!("line {line}: {reason}"))
            .collect();
        if row_errors.len() > MAX_REPORTED_ROWS {
            shown.push(format!(
                "... and {} more",
                row_errors.len() - MAX_REPORTED_ROWS
            ));
        }
        #[cfg(feature = "logging")]
        tracing::warn!(
            "CSV 文件 {} 校验失败: {} 个错误行",
            path.display(),
            row_errors.len()
        );
        return ParseOutcome::Error(format!(
            "CSV validation failed: {}",
            shown.join("; ")
        ));
    }

    if sales.is_empty() {
        // 只有表头没有数据行，同样视为错误
        return ParseOutcome::Error(
            "CSV validation failed: no data rows".to_string(),
        );
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        "CSV 文件 {} 解析完成: {} 条记录",
        path.display(),
        sales.len()
    );

    ParseOutcome::Ok(sales)
}

/// 校验并解析单个数据行
fn parse_row(line: &str) -> Result<Sale, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        ));
    }

    let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}'", fields[0]))?;

    let product = fields[1].to_string();
    let category = fields[2].to_string();

    let unit_price: f64 = fields[3]
        .parse()
        .map_err(|_| format!("invalid price '{}'", fields[3]))?;
    if unit_price <= 0.0 {
        return Err(format!("price must be > 0, got {unit_price}"));
    }

    let quantity: i64 = fields[4]
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", fields[4]))?;
    if quantity <= 0 {
        return Err(format!("quantity must be > 0, got {quantity}"));
    }

    let discount: f64 = fields[5]
        .parse()
        .map_err(|_| format!("invalid discount '{}'", fields[5]))?;
    if !(0.0..=100.0).contains(&discount) {
        return Err(format!(
            "discount must be within [0, 100], got {discount}"
        ));
    }

    let total = unit_price * quantity as f64 * (1.0 - discount / 100.0);

    Ok(Sale { date, product, category, unit_price, quantity, discount, total })
}
