//! 商品仓储接口

use async_trait::async_trait;
use uuid::Uuid;

use super::field::FieldValue;
use super::model::Product;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

/// 商品记录存储
///
/// 并发隔离完全交给实现方，服务层不加额外的锁。
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 按字段精确匹配查找
    async fn find_by(&self, value: &FieldValue) -> Result<Vec<Product>, StoreError>;

    /// 按字段精确匹配删除，返回删除的条数
    async fn delete_by(&self, value: &FieldValue) -> Result<u64, StoreError>;

    async fn exists_by_article(&self, article: Uuid) -> Result<bool, StoreError>;

    /// 按 `article` 插入或整体替换
    async fn save(&self, product: Product) -> Result<Product, StoreError>;

    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn delete_all(&self) -> Result<u64, StoreError>;
}
