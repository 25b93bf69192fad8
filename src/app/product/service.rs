//! 商品业务服务
//!
//! 按参数名分派查询、删除、修改，以及新商品的创建校验。

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::field::{parse_article, Field, FieldValue, Mutability, MSG_EMPTY_VALUE};
use super::model::{CreateProductRequest, Product, EDIT_DATE_FORMAT};
use super::repository::ProductRepository;
use crate::core::error::CoreError;

pub const MSG_EMPTY_ARTICLE: &str = "invalid article value";
pub const MSG_NO_PAYLOAD: &str = "request body is missing";
pub const MSG_NAME_MISSING: &str = "name missing";
pub const MSG_DESCRIPTION_MISSING: &str = "description missing";
pub const MSG_CATEGORY_MISSING: &str = "category missing";
pub const MSG_BAD_PRICE: &str = "product price must be at least 1";
pub const MSG_BAD_COUNT: &str = "product count must be at least 1";

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// 按参数值查找商品，没有匹配时返回空列表
    pub async fn search_by_param(
        &self,
        param: &str,
        param_value: &str,
    ) -> Result<Vec<Product>, CoreError> {
        let value = Field::parse(param)?.resolve(param_value)?;
        let products = self.repository.find_by(&value).await?;
        debug!("search {}={:?}: {} match(es)", value.field(), param_value, products.len());
        Ok(products)
    }

    /// 按参数值删除商品，返回删除条数（可能为 0）
    pub async fn delete_by_param(&self, param: &str, param_value: &str) -> Result<u64, CoreError> {
        let value = Field::parse(param)?.resolve(param_value)?;
        let deleted = self.repository.delete_by(&value).await?;
        if deleted > 0 {
            info!("Deleted {} product(s) by {}={:?}", deleted, value.field(), param_value);
        }
        Ok(deleted)
    }

    /// 修改指定商品的一个字段，并刷新 `editdate`
    ///
    /// 读取与保存是两次独立的存储调用，中间被并发删除的商品会被重新写回。
    pub async fn edit_param(
        &self,
        param: &str,
        param_value: &str,
        article: &str,
    ) -> Result<Product, CoreError> {
        let field = Field::parse(param)?;
        if let Mutability::Immutable(reason) = field.spec().mutability {
            warn!("Rejected edit of immutable field {}", field);
            return Err(CoreError::invalid(reason));
        }
        if param_value.is_empty() {
            return Err(CoreError::invalid(MSG_EMPTY_VALUE));
        }
        if article.is_empty() {
            return Err(CoreError::invalid(MSG_EMPTY_ARTICLE));
        }

        let id = parse_article(article)?;
        if !self.repository.exists_by_article(id).await? {
            return Err(not_found(id));
        }
        let mut product = self
            .repository
            .find_by(&FieldValue::Article(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(id))?;

        field.coerce(param_value)?.apply(&mut product)?;
        product.editdate = edit_timestamp();

        let saved = self.repository.save(product).await?;
        info!("Edited product {}: {} set", saved.article, field);
        Ok(saved)
    }

    pub async fn get_all(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn delete_all(&self) -> Result<u64, CoreError> {
        let deleted = self.repository.delete_all().await?;
        info!("Deleted all products ({} removed)", deleted);
        Ok(deleted)
    }

    /// 校验并创建新商品
    ///
    /// 按顺序返回第一条失败：请求体、名称、描述、分类、价格、数量。
    pub async fn create_product(
        &self,
        payload: Option<CreateProductRequest>,
    ) -> Result<Product, CoreError> {
        let payload = payload.ok_or_else(|| CoreError::invalid(MSG_NO_PAYLOAD))?;
        let name = required_text(payload.name, MSG_NAME_MISSING)?;
        let description = required_text(payload.description, MSG_DESCRIPTION_MISSING)?;
        let category = required_text(payload.category, MSG_CATEGORY_MISSING)?;
        let price = positive(payload.price, MSG_BAD_PRICE)?;
        let count = positive(payload.count, MSG_BAD_COUNT)?;

        let product = Product {
            article: self.generate_article().await?,
            name,
            description,
            category,
            price,
            count,
            editdate: String::new(),
            createdate: Local::now().date_naive(),
        };

        let saved = self.repository.save(product).await?;
        info!("Created product {} ({})", saved.name, saved.article);
        Ok(saved)
    }

    /// 生成一个存储中不存在的编号
    async fn generate_article(&self) -> Result<Uuid, CoreError> {
        let mut article = Uuid::new_v4();
        while self.repository.exists_by_article(article).await? {
            warn!("Generated article {} already exists, retrying", article);
            article = Uuid::new_v4();
        }
        Ok(article)
    }
}

fn not_found(article: Uuid) -> CoreError {
    CoreError::RecordNotFound(format!("product with article {} does not exist", article))
}

fn required_text(value: Option<String>, message: &'static str) -> Result<String, CoreError> {
    match value {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(CoreError::invalid(message)),
    }
}

fn positive(value: i64, message: &'static str) -> Result<i32, CoreError> {
    match i32::try_from(value) {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CoreError::invalid(message)),
    }
}

/// 当前本地时间，秒级精度
fn edit_timestamp() -> String {
    Local::now().format(EDIT_DATE_FORMAT).to_string()
}
