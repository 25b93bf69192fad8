//! 数据库基础设施

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgPool, PgPoolOptions},
    query::{Query, QueryAs},
    Error, Postgres,
};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::app::product::{
    field::FieldValue,
    model::Product,
    repository::{ProductRepository, StoreError},
};
use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig, database_url: &str) -> Result<Self, Error> {
        info!(
            "Connecting to database: {}",
            database_url.split('@').last().unwrap_or("<unknown>")
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 创建商品表（在实际部署中应该使用迁移）
    pub async fn create_tables(&self) -> Result<(), Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                article UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                price INTEGER NOT NULL CHECK (price >= 1),
                "count" INTEGER NOT NULL CHECK ("count" >= 1),
                editdate TEXT NOT NULL DEFAULT '',
                createdate DATE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database table `products` ready");
        Ok(())
    }
}

/// PostgreSQL 商品仓储
///
/// 列名只取自字段注册表，不拼接任何请求内容。
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_select<'q>(
    query: QueryAs<'q, Postgres, Product, PgArguments>,
    value: &FieldValue,
) -> QueryAs<'q, Postgres, Product, PgArguments> {
    match value {
        FieldValue::Article(v) => query.bind(*v),
        FieldValue::Name(v)
        | FieldValue::Description(v)
        | FieldValue::Category(v)
        | FieldValue::EditDate(v) => query.bind(v.clone()),
        FieldValue::Price(v) | FieldValue::Count(v) => query.bind(*v),
        FieldValue::CreateDate(v) => query.bind(*v),
    }
}

fn bind_delete<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &FieldValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        FieldValue::Article(v) => query.bind(*v),
        FieldValue::Name(v)
        | FieldValue::Description(v)
        | FieldValue::Category(v)
        | FieldValue::EditDate(v) => query.bind(v.clone()),
        FieldValue::Price(v) | FieldValue::Count(v) => query.bind(*v),
        FieldValue::CreateDate(v) => query.bind(*v),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by(&self, value: &FieldValue) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            r#"SELECT * FROM products WHERE "{}" = $1"#,
            value.field().name()
        );
        let products = bind_select(sqlx::query_as::<_, Product>(&sql), value)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn delete_by(&self, value: &FieldValue) -> Result<u64, StoreError> {
        let sql = format!(r#"DELETE FROM products WHERE "{}" = $1"#, value.field().name());
        let result = bind_delete(sqlx::query(&sql), value)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn exists_by_article(&self, article: Uuid) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE article = $1)")
                .bind(article)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, product: Product) -> Result<Product, StoreError> {
        let saved = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (article, name, description, category, price, "count", editdate, createdate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (article) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                price = EXCLUDED.price,
                "count" = EXCLUDED."count",
                editdate = EXCLUDED.editdate
            RETURNING *
            "#,
        )
        .bind(product.article)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.count)
        .bind(&product.editdate)
        .bind(product.createdate)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY createdate, name")
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
