//! HTTP Routes
//!
//! API Endpoints:
//! - POST /raw       合成并返回裸 URL 文本
//! - POST /embed     合成并返回 audio 标签片段
//! - POST /json      合成并返回 JSON 对象
//! - GET  /api/ping  健康检查
//! - GET  /files/*   成品文件托管（可选）

use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
///
/// `serve_dir` 提供时把存储目录挂到 /files 下，
/// 成品 URL 才能由本服务直接兑现
pub fn create_routes(serve_dir: Option<PathBuf>) -> Router<Arc<AppState>> {
    let mut router = Router::new()
        .route("/raw", post(handlers::synthesize_raw))
        .route("/embed", post(handlers::synthesize_embed))
        .route("/json", post(handlers::synthesize_json))
        .route("/api/ping", get(handlers::ping));

    if let Some(dir) = serve_dir {
        router = router.nest_service("/files", ServeDir::new(dir));
    }

    router
}
