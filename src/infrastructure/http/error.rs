//! HTTP Error Handling
//!
//! 流水线错误到真实 HTTP 状态码的映射:
//! 空请求体 → 400，流水线终态失败 → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::PipelineError;

/// 统一错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                // 细节留在日志里，响应体只给通用描述
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Internal Error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::EmptyPayload => ApiError::BadRequest("Payload empty".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
