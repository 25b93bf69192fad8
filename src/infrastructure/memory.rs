//! 内存仓储，用于开发环境和测试

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::app::product::{
    field::FieldValue,
    model::Product,
    repository::{ProductRepository, StoreError},
};

/// 按插入顺序保存商品
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by(&self, value: &FieldValue) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| value.matches(p)).cloned().collect())
    }

    async fn delete_by(&self, value: &FieldValue) -> Result<u64, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| !value.matches(p));
        Ok((before - products.len()) as u64)
    }

    async fn exists_by_article(&self, article: Uuid) -> Result<bool, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().any(|p| p.article == article))
    }

    async fn save(&self, product: Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.article == product.article) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut products = self.products.write().await;
        let removed = products.len() as u64;
        products.clear();
        Ok(removed)
    }
}
