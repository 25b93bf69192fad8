//! 商品处理器

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;

use super::{
    model::{CreateProductRequest, Product},
    service::ProductService,
};
use crate::core::{error::CoreError, extract::QueryParams};

pub const MSG_ALL_DELETED: &str = "All products deleted successfully";

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

/// 查询、删除使用的参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamQuery {
    pub param: String,
    pub param_value: String,
}

/// 修改使用的参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditQuery {
    pub param: String,
    pub param_value: String,
    pub article: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/searchByParam", get(search_by_param))
        .route("/deleteByParam", delete(delete_by_param))
        .route("/editByParam", put(edit_by_param))
        .route("/getAll", get(get_all))
        .route("/deleteAll", delete(delete_all))
        .route("/createProduct", post(create_product))
}

pub async fn search_by_param(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ParamQuery>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state
        .product_service
        .search_by_param(&query.param, &query.param_value)
        .await?;
    Ok(Json(products))
}

pub async fn delete_by_param(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ParamQuery>,
) -> Result<String, CoreError> {
    let deleted = state
        .product_service
        .delete_by_param(&query.param, &query.param_value)
        .await?;
    Ok(delete_outcome(&query.param, &query.param_value, deleted))
}

pub async fn edit_by_param(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<EditQuery>,
) -> Result<Json<Product>, CoreError> {
    let product = state
        .product_service
        .edit_param(&query.param, &query.param_value, &query.article)
        .await?;
    Ok(Json(product))
}

pub async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Product>>, CoreError> {
    Ok(Json(state.product_service.get_all().await?))
}

pub async fn delete_all(State(state): State<AppState>) -> Result<&'static str, CoreError> {
    state.product_service.delete_all().await?;
    Ok(MSG_ALL_DELETED)
}

/// 请求体可以为空或 `null`，由服务层给出“请求体缺失”的错误
pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Product>, CoreError> {
    let payload = parse_payload(&body)?;
    let product = state.product_service.create_product(payload).await?;
    Ok(Json(product))
}

fn parse_payload(body: &[u8]) -> Result<Option<CreateProductRequest>, CoreError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map_err(|e| CoreError::invalid(format!("malformed request body: {}", e)))
}

/// 删除结果的文字说明，参数名按客户端原样回显
pub fn delete_outcome(param: &str, param_value: &str, deleted: u64) -> String {
    if deleted > 0 {
        format!(
            "Product(s) with param {} and value {} deleted successfully",
            param, param_value
        )
    } else {
        format!(
            "Product(s) with param {} and value {} not found",
            param, param_value
        )
    }
}
