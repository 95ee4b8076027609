//! 各文件类型解析产出的领域记录定义

use chrono::NaiveDate;
use serde::Serialize;

/// 单条销售记录（CSV 解析产出）
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    /// 销售日期
    pub date: NaiveDate,
    /// 产品名称
    pub product: String,
    /// 产品分类
    pub category: String,
    /// 单价（> 0）
    pub unit_price: f64,
    /// 数量（> 0）
    pub quantity: i64,
    /// 折扣百分比（0..=100）
    pub discount: f64,
    /// 行合计：`unit_price × quantity × (1 − discount/100)`
    pub total: f64,
}

/// 用户记录（JSON 解析产出）
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// 用户 ID
    pub id: i64,
    /// 用户名
    pub name: String,
    /// 邮箱
    pub email: String,
    /// 是否活跃
    pub active: bool,
    /// 最后访问时间（可选，ISO 字符串）
    pub last_access: Option<String>,
}

/// 会话记录（JSON 解析产出）
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// 所属用户 ID
    pub user_id: i64,
    /// 开始时间（可选，ISO 字符串）
    pub start: Option<String>,
    /// 持续秒数（可选）
    pub duration_seconds: Option<i64>,
    /// 访问页面数（可选）
    pub pages_visited: Option<i64>,
    /// 会话中的操作列表（缺失或非列表时为空）
    pub actions: Vec<String>,
}

/// 用户活动文档：用户与会话两个数组
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserActivity {
    pub users: Vec<User>,
    pub sessions: Vec<Session>,
}

/// 日志级别（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// 从日志行中的级别文本解析
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            "FATAL" => Some(Self::Fatal),
            _ => None,
        }
    }

    /// 级别的大写名称
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// 是否为严重级别（ERROR/FATAL）
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }

    /// 五个级别的固定顺序（用于分布统计时补零）
    pub const ALL: [Self; 5] =
        [Self::Debug, Self::Info, Self::Warn, Self::Error, Self::Fatal];
}

/// 单条日志记录（LOG 解析产出）
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// 完整时间戳 `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// 日志级别
    pub level: LogLevel,
    /// 产生日志的组件
    pub component: String,
    /// 日志消息
    pub message: String,
    /// 小时（0..=23，从时间戳提取）
    pub hour: u8,
}

/// 产品记录（XML 解析产出）
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// 产品 ID（id 属性）
    pub id: String,
    /// 名称
    pub name: String,
    /// 分类
    pub category: String,
    /// 单价
    pub price: f64,
    /// 币种（currency 属性，缺省 USD）
    pub currency: String,
    /// 库存数量
    pub stock: i64,
    /// 供应商
    pub supplier: String,
}

/// 目录文档的元数据
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogMetadata {
    /// 生成时间
    pub generated: Option<String>,
    /// 来源系统
    pub source: Option<String>,
}

/// 产品目录文档（XML 解析产出）
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub metadata: CatalogMetadata,
    pub products: Vec<Product>,
    /// 产品总数
    pub total_products: usize,
    /// 库存总量
    pub total_stock: i64,
    /// 出现过的分类（去重，保持首次出现顺序）
    pub categories: Vec<String>,
}
