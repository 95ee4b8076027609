//! 产品目录指标计算

use super::round2;
use crate::datafile::Catalog;
use crate::report::Metrics;
use serde_json::{json, Value};

/// 低库存阈值（0 < stock ≤ 10 视为低库存）
const LOW_STOCK_THRESHOLD: i64 = 10;

/// 计算产品目录 XML 的指标摘要
pub fn compute(catalog: &Catalog) -> Result<Metrics, String> {
    let products = &catalog.products;
    if products.is_empty() {
        return Err("no products to compute metrics".to_string());
    }

    let total_products = products.len();
    let total_stock_units: i64 = products.iter().map(|p| p.stock).sum();
    let total_inventory_value: f64 =
        products.iter().map(|p| p.price * p.stock as f64).sum();
    let average_price =
        products.iter().map(|p| p.price).sum::<f64>() / products.len() as f64;

    // 按分类聚合（数量/库存/价值），按价值降序输出
    let mut by_category: Vec<(String, usize, i64, f64)> = Vec::new();
    for product in products {
        match by_category
            .iter_mut()
            .find(|(name, ..)| name == &product.category)
        {
            Some((_, count, stock, value)) => {
                *count += 1;
                *stock += product.stock;
                *value += product.price * product.stock as f64;
            }
            None => by_category.push((
                product.category.clone(),
                1,
                product.stock,
                product.price * product.stock as f64,
            )),
        }
    }
    by_category.sort_by(|a, b| {
        b.3.partial_cmp(&a.3)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    let products_by_category: Vec<Value> = by_category
        .into_iter()
        .map(|(category, count, stock, value)| {
            json!({
                "category": category,
                "product_count": count,
                "total_stock": stock,
                "total_value": round2(value),
            })
        })
        .collect();

    // 低库存清单，按库存升序
    let mut low_stock: Vec<&crate::datafile::Product> = products
        .iter()
        .filter(|p| p.stock > 0 && p.stock <= LOW_STOCK_THRESHOLD)
        .collect();
    low_stock.sort_by(|a, b| {
        a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name))
    });
    let low_stock_items: Vec<Value> = low_stock
        .into_iter()
        .map(|p| {
            json!({
                "name": p.name,
                "stock": p.stock,
                "category": p.category,
            })
        })
        .collect();

    // 供应商榜单：按产品数降序，其次库存降序
    let mut by_supplier: Vec<(String, usize, i64)> = Vec::new();
    for product in products {
        match by_supplier
            .iter_mut()
            .find(|(name, ..)| name == &product.supplier)
        {
            Some((_, count, stock)) => {
                *count += 1;
                *stock += product.stock;
            }
            None => by_supplier.push((
                product.supplier.clone(),
                1,
                product.stock,
            )),
        }
    }
    by_supplier.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    by_supplier.truncate(5);
    let top_suppliers: Vec<Value> = by_supplier
        .into_iter()
        .map(|(supplier, count, stock)| {
            json!({
                "supplier": supplier,
                "product_count": count,
                "total_stock": stock,
            })
        })
        .collect();

    let price_min = products
        .iter()
        .map(|p| p.price)
        .fold(f64::INFINITY, f64::min);
    let price_max = products
        .iter()
        .map(|p| p.price)
        .fold(f64::NEG_INFINITY, f64::max);

    // 严格大于才替换，同价时保留先出现的产品
    let most_expensive = products
        .iter()
        .skip(1)
        .fold(&products[0], |best, cur| {
            if cur.price > best.price { cur } else { best }
        });

    let mut metrics = Metrics::new();
    metrics.insert("total_products".into(), Value::from(total_products));
    metrics.insert(
        "total_stock_units".into(),
        Value::from(total_stock_units),
    );
    metrics.insert(
        "total_inventory_value".into(),
        Value::from(round2(total_inventory_value)),
    );
    metrics
        .insert("average_price".into(), Value::from(round2(average_price)));
    metrics.insert(
        "categories_count".into(),
        Value::from(catalog.categories.len()),
    );
    metrics.insert(
        "products_by_category".into(),
        Value::from(products_by_category),
    );
    metrics.insert("low_stock_items".into(), Value::from(low_stock_items));
    metrics.insert("top_suppliers".into(), Value::from(top_suppliers));
    metrics.insert(
        "price_range".into(),
        json!({ "min": round2(price_min), "max": round2(price_max) }),
    );
    metrics.insert(
        "most_expensive_product".into(),
        Value::from(most_expensive.name.clone()),
    );

    Ok(metrics)
}
