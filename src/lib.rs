//! # 仓库商品库存服务
//!
//! 通过任意字段名 + 字段值对商品进行查询、修改、删除：
//! - `app`：商品模型、字段注册表、业务服务、HTTP 处理器
//! - `core`：统一错误处理、请求日志中间件
//! - `infrastructure`：内存 / PostgreSQL 存储、日志初始化
//! - `config`：TOML 配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

use axum::{middleware, response::Json, routing::get, Router};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use app::product::{
    handler::{self, AppState},
    repository::ProductRepository,
    service::ProductService,
};

/// 用给定的存储构建应用状态
pub fn app_state(repository: Arc<dyn ProductRepository>) -> AppState {
    AppState {
        product_service: ProductService::new(repository),
    }
}

/// 创建完整的路由，挂载日志、追踪、跨域和超时中间件
pub fn build_app(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/product", handler::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(crate::core::middleware::request_logging_middleware))
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

/// 健康检查
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
