//! HTTP Middleware
//!
//! 请求耗时与错误状态日志

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 请求日志中间件
///
/// 每个请求记录方法、路径、状态码和耗时；
/// 5xx 记 error，4xx 记 warn，其余记 debug
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!(%method, %uri, status = status.as_u16(), latency_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %uri, status = status.as_u16(), latency_ms, "Request rejected");
    } else {
        tracing::debug!(%method, %uri, status = status.as_u16(), latency_ms, "Request served");
    }

    response
}
