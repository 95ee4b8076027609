//! 销售数据指标计算

use super::round2;
use crate::datafile::Sale;
use crate::report::Metrics;
use serde_json::{json, Value};

/// 计算销售 CSV 的指标摘要
pub fn compute(sales: &[Sale]) -> Result<Metrics, String> {
    if sales.is_empty() {
        return Err("no sales records to compute metrics".to_string());
    }

    let total_sales: f64 = sales.iter().map(|s| s.total).sum();
    let total_quantity: i64 = sales.iter().map(|s| s.quantity).sum();
    let average_discount =
        sales.iter().map(|s| s.discount).sum::<f64>() / sales.len() as f64;

    // 按产品累计数量（保持首次出现顺序，以便同量时取先出现者）
    let mut by_product: Vec<(String, i64)> = Vec::new();
    for sale in sales {
        match by_product.iter_mut().find(|(name, _)| name == &sale.product)
        {
            Some((_, qty)) => *qty += sale.quantity,
            None => by_product.push((sale.product.clone(), sale.quantity)),
        }
    }
    let unique_products = by_product.len();
    // 严格大于才替换，保证同量时保留先出现的产品
    let best_selling = by_product
        .iter()
        .cloned()
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .unwrap_or_default();

    // 按分类累计营收（同样保持首次出现顺序）
    let mut by_category: Vec<(String, f64)> = Vec::new();
    for sale in sales {
        match by_category
            .iter_mut()
            .find(|(name, _)| name == &sale.category)
        {
            Some((_, revenue)) => *revenue += sale.total,
            None => by_category.push((sale.category.clone(), sale.total)),
        }
    }
    let top_category = by_category
        .iter()
        .cloned()
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .unwrap_or_default();

    let date_from = sales.iter().map(|s| s.date).min().unwrap();
    let date_to = sales.iter().map(|s| s.date).max().unwrap();

    let mut metrics = Metrics::new();
    metrics
        .insert("total_sales".into(), Value::from(round2(total_sales)));
    metrics.insert("unique_products".into(), Value::from(unique_products));
    metrics.insert("total_quantity".into(), Value::from(total_quantity));
    metrics.insert("total_records".into(), Value::from(sales.len()));
    metrics.insert(
        "best_selling_product".into(),
        json!({ "name": best_selling.0, "quantity": best_selling.1 }),
    );
    metrics.insert(
        "top_category".into(),
        json!({ "name": top_category.0, "revenue": round2(top_category.1) }),
    );
    metrics.insert(
        "average_discount".into(),
        Value::from(round2(average_discount)),
    );
    metrics.insert(
        "date_range".into(),
        json!({
            "from": date_from.format("%Y-%m-%d").to_string(),
            "to": date_to.format("%Y-%m-%d").to_string(),
        }),
    );

    Ok(metrics)
}
