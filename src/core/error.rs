//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::app::product::repository::StoreError;

/// 核心错误类型
///
/// 所有校验失败都在发现处立即返回，原样传递到 HTTP 边界。
/// “没有匹配的商品”不是错误。
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 参数名不在白名单内
    #[error("parameter '{0}' does not exist")]
    UnknownField(String),
    /// 参数值无法转换、越界、为空，或修改了不可变字段
    #[error("{0}")]
    InvalidValue(String),
    /// 修改时引用的商品不存在
    #[error("{0}")]
    RecordNotFound(String),
    /// 存储层故障
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidValue(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::UnknownField(_) | CoreError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            CoreError::Store(e) => {
                error!("Storage error: {}", e);
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
