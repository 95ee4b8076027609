//! 产品目录 XML 解析器
//!
//! 使用 roxmltree 做只读 DOM 解析。提取可选的 `<metadata>` 信息与
//! `<products>/<product>` 节点集合；XML 语法错误以 `Error` 返回，
//! 空目录（无产品节点）是合法输入，产出零值统计。

use super::types::{Catalog, CatalogMetadata, Product};
use super::ParseOutcome;
use roxmltree::{Document, Node};
use std::path::Path;

/// 缺省币种
const DEFAULT_CURRENCY: &str = "USD";

/// 解析产品目录 XML 文件
#[must_use]
pub fn parse(path: &Path) -> ParseOutcome<Catalog> {
    let contents = match super::read_to_string(path) {
        Ok(c) => c,
        Err(reason) => return ParseOutcome::Error(reason),
    };

    #[cfg(feature = "logging")]
    tracing::debug!("开始解析 XML 文件: {}", path.display());

    let doc = match Document::parse(&contents) {
        Ok(d) => d,
        Err(e) => {
            return ParseOutcome::Error(format!("malformed XML: {e}"));
        }
    };

    let root = doc.root_element();

    // <metadata> 整体可选
    let metadata = root
        .children()
        .find(|n| n.has_tag_name("metadata"))
        .map(|meta| CatalogMetadata {
            generated: child_text(&meta, "generated"),
            source: child_text(&meta, "source"),
        })
        .unwrap_or_default();

    let mut products = Vec::new();
    if let Some(container) =
        root.children().find(|n| n.has_tag_name("products"))
    {
        for node in
            container.children().filter(|n| n.has_tag_name("product"))
        {
            products.push(parse_product(&node));
        }
    }

    let total_products = products.len();
    let total_stock = products.iter().map(|p| p.stock).sum();

    // 分类去重，保持首次出现顺序
    let mut categories: Vec<String> = Vec::new();
    for product in &products {
        if !product.category.is_empty()
            && !categories.contains(&product.category)
        {
            categories.push(product.category.clone());
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        "XML 文件 {} 解析完成: {} 个产品, {} 个分类",
        path.display(),
        total_products,
        categories.len()
    );

    ParseOutcome::Ok(Catalog {
        metadata,
        products,
        total_products,
        total_stock,
        categories,
    })
}

/// 提取单个 `<product>` 节点的字段，缺失字段取宽松默认值
fn parse_product(node: &Node) -> Product {
    let id = node.attribute("id").unwrap_or_default().to_string();
    let currency = node
        .attribute("currency")
        .unwrap_or(DEFAULT_CURRENCY)
        .to_string();

    let name = child_text(node, "name").unwrap_or_default();
    let category = child_text(node, "category").unwrap_or_default();
    let supplier = child_text(node, "supplier").unwrap_or_default();

    let price = child_text(node, "price")
        .and_then(|t| t.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    let stock = child_text(node, "stock")
        .and_then(|t| t.trim().parse::<i64>().ok())
        .unwrap_or(0);

    Product { id, name, category, price, currency, stock, supplier }
}

/// 子元素的文本内容（去除首尾空白；空文本视为缺失）
fn child_text(node: &Node, tag: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
