//! 商品数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// 修改时间的格式，秒级精度
pub const EDIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// 创建日期的格式
pub const CREATE_DATE_FORMAT: &str = "%Y-%m-%d";

/// 仓库中的商品
///
/// `article` 由服务端生成且不可更改；`editdate` 在首次修改前为空字符串。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    pub article: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i32,
    pub count: i32,
    pub editdate: String,
    pub createdate: NaiveDate,
}

/// 创建商品请求
///
/// 所有字段都允许缺省，缺省值由创建校验逐项拒绝。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub price: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub count: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

/// 同时接受 JSON 数字和数字字符串，例如 `"price": "100"`；小数向零截断
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrText>::deserialize(deserializer)? {
        None => Ok(0),
        Some(IntOrText::Int(n)) => Ok(n),
        Some(IntOrText::Float(f)) => Ok(f.trunc() as i64),
        Some(IntOrText::Text(s)) => s
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("'{}' is not an integer", s))),
    }
}
