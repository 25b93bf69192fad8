//! 商品字段注册表与参数值转换
//!
//! 白名单中的每个字段对应一条 [`FieldSpec`]：名称、转换函数、是否允许空值、是否可修改。
//! 查询、删除、修改都通过这张表分派，新增字段只需要在表里加一行。

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use uuid::Uuid;

use super::model::{Product, CREATE_DATE_FORMAT, EDIT_DATE_FORMAT};
use crate::core::error::CoreError;

pub const MSG_EMPTY_VALUE: &str = "invalid parameter value";
pub const MSG_INVALID_ARTICLE: &str = "invalid article UUID";
pub const MSG_INVALID_PRICE: &str = "invalid price";
pub const MSG_INVALID_COUNT: &str = "invalid count";
pub const MSG_INVALID_EDIT_DATE: &str = "invalid date-time format, expected yyyy-MM-dd HH:mm:ss";
pub const MSG_INVALID_CREATE_DATE: &str = "invalid date format, expected yyyy-MM-dd";

/// 可作为查询键的商品字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Article,
    Name,
    Description,
    Category,
    Price,
    Count,
    EditDate,
    CreateDate,
}

/// 转换后的强类型参数值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Article(Uuid),
    Name(String),
    Description(String),
    Category(String),
    Price(i32),
    Count(i32),
    /// 空字符串表示“从未修改”
    EditDate(String),
    CreateDate(NaiveDate),
}

/// 字段是否允许通过修改接口变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    /// 不可修改，附带拒绝时返回的消息
    Immutable(&'static str),
}

/// 注册表中的一行
pub struct FieldSpec {
    pub field: Field,
    /// 小写的参数名，同时也是存储列名
    pub name: &'static str,
    pub coerce: fn(&str) -> Result<FieldValue, CoreError>,
    pub accepts_empty: bool,
    pub mutability: Mutability,
}

/// 字段白名单，顺序与 [`Field`] 的声明顺序一致
pub static REGISTRY: [FieldSpec; 8] = [
    FieldSpec {
        field: Field::Article,
        name: "article",
        coerce: coerce_article,
        accepts_empty: false,
        mutability: Mutability::Immutable("article cannot be changed"),
    },
    FieldSpec {
        field: Field::Name,
        name: "name",
        coerce: coerce_name,
        accepts_empty: false,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: Field::Description,
        name: "description",
        coerce: coerce_description,
        accepts_empty: false,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: Field::Category,
        name: "category",
        coerce: coerce_category,
        accepts_empty: false,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: Field::Price,
        name: "price",
        coerce: coerce_price,
        accepts_empty: false,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: Field::Count,
        name: "count",
        coerce: coerce_count,
        accepts_empty: false,
        mutability: Mutability::Mutable,
    },
    FieldSpec {
        field: Field::EditDate,
        name: "editdate",
        coerce: coerce_edit_date,
        accepts_empty: true,
        mutability: Mutability::Immutable("edit date cannot be changed"),
    },
    FieldSpec {
        field: Field::CreateDate,
        name: "createdate",
        coerce: coerce_create_date,
        accepts_empty: false,
        mutability: Mutability::Immutable("create date cannot be changed"),
    },
];

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("accepts_empty", &self.accepts_empty)
            .field("mutability", &self.mutability)
            .finish_non_exhaustive()
    }
}

impl Field {
    /// 按名称查找字段，大小写不敏感
    pub fn parse(name: &str) -> Result<Field, CoreError> {
        let normalized = name.to_lowercase();
        REGISTRY
            .iter()
            .find(|spec| spec.name == normalized)
            .map(|spec| spec.field)
            .ok_or_else(|| CoreError::UnknownField(name.to_string()))
    }

    pub fn is_recognized(name: &str) -> bool {
        Field::parse(name).is_ok()
    }

    pub fn all() -> impl Iterator<Item = Field> {
        REGISTRY.iter().map(|spec| spec.field)
    }

    pub fn spec(self) -> &'static FieldSpec {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn is_mutable(self) -> bool {
        self.spec().mutability == Mutability::Mutable
    }

    /// 按字段类型转换原始字符串，不处理空值策略
    pub fn coerce(self, raw: &str) -> Result<FieldValue, CoreError> {
        (self.spec().coerce)(raw)
    }

    /// 空值策略 + 类型转换。只有 `editdate` 接受空字符串
    pub fn resolve(self, raw: &str) -> Result<FieldValue, CoreError> {
        if raw.is_empty() && !self.spec().accepts_empty {
            return Err(CoreError::invalid(MSG_EMPTY_VALUE));
        }
        self.coerce(raw)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Article(_) => Field::Article,
            FieldValue::Name(_) => Field::Name,
            FieldValue::Description(_) => Field::Description,
            FieldValue::Category(_) => Field::Category,
            FieldValue::Price(_) => Field::Price,
            FieldValue::Count(_) => Field::Count,
            FieldValue::EditDate(_) => Field::EditDate,
            FieldValue::CreateDate(_) => Field::CreateDate,
        }
    }

    /// 精确相等匹配
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            FieldValue::Article(v) => product.article == *v,
            FieldValue::Name(v) => product.name == *v,
            FieldValue::Description(v) => product.description == *v,
            FieldValue::Category(v) => product.category == *v,
            FieldValue::Price(v) => product.price == *v,
            FieldValue::Count(v) => product.count == *v,
            FieldValue::EditDate(v) => product.editdate == *v,
            FieldValue::CreateDate(v) => product.createdate == *v,
        }
    }

    /// 把值写入商品。不可修改的字段返回注册表中的拒绝消息
    pub fn apply(self, product: &mut Product) -> Result<(), CoreError> {
        if let Mutability::Immutable(reason) = self.field().spec().mutability {
            return Err(CoreError::invalid(reason));
        }
        match self {
            FieldValue::Name(v) => product.name = v,
            FieldValue::Description(v) => product.description = v,
            FieldValue::Category(v) => product.category = v,
            FieldValue::Price(v) => product.price = v,
            FieldValue::Count(v) => product.count = v,
            FieldValue::Article(_) | FieldValue::EditDate(_) | FieldValue::CreateDate(_) => {}
        }
        Ok(())
    }
}

/// 解析 UUID 格式的商品编号，只接受带连字符的 36 位形式
pub fn parse_article(raw: &str) -> Result<Uuid, CoreError> {
    if raw.len() != 36 {
        return Err(CoreError::invalid(MSG_INVALID_ARTICLE));
    }
    Uuid::parse_str(raw).map_err(|_| CoreError::invalid(MSG_INVALID_ARTICLE))
}

/// 十进制正整数（>= 1）
fn parse_positive(raw: &str, message: &'static str) -> Result<i32, CoreError> {
    match raw.parse::<i32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CoreError::invalid(message)),
    }
}

fn coerce_article(raw: &str) -> Result<FieldValue, CoreError> {
    parse_article(raw).map(FieldValue::Article)
}

fn coerce_name(raw: &str) -> Result<FieldValue, CoreError> {
    Ok(FieldValue::Name(raw.to_string()))
}

fn coerce_description(raw: &str) -> Result<FieldValue, CoreError> {
    Ok(FieldValue::Description(raw.to_string()))
}

fn coerce_category(raw: &str) -> Result<FieldValue, CoreError> {
    Ok(FieldValue::Category(raw.to_string()))
}

fn coerce_price(raw: &str) -> Result<FieldValue, CoreError> {
    parse_positive(raw, MSG_INVALID_PRICE).map(FieldValue::Price)
}

fn coerce_count(raw: &str) -> Result<FieldValue, CoreError> {
    parse_positive(raw, MSG_INVALID_COUNT).map(FieldValue::Count)
}

/// chrono 允许省略前导零和带符号的年份，这里要求格式化结果与原文一致
fn coerce_edit_date(raw: &str) -> Result<FieldValue, CoreError> {
    if !raw.is_empty() {
        match NaiveDateTime::parse_from_str(raw, EDIT_DATE_FORMAT) {
            Ok(parsed) if parsed.format(EDIT_DATE_FORMAT).to_string() == raw => {}
            _ => return Err(CoreError::invalid(MSG_INVALID_EDIT_DATE)),
        }
    }
    Ok(FieldValue::EditDate(raw.to_string()))
}

fn coerce_create_date(raw: &str) -> Result<FieldValue, CoreError> {
    match NaiveDate::parse_from_str(raw, CREATE_DATE_FORMAT) {
        Ok(parsed) if parsed.format(CREATE_DATE_FORMAT).to_string() == raw => {
            Ok(FieldValue::CreateDate(parsed))
        }
        _ => Err(CoreError::invalid(MSG_INVALID_CREATE_DATE)),
    }
}
