//! Synthesize Handlers
//!
//! 三种响应形态共用一条流水线:
//! - /raw   裸 URL 文本
//! - /embed 可嵌入的 audio 标签片段
//! - /json  {"url": "..."} JSON 对象
//!
//! 请求体就是要合成的原始 UTF-8 文本（可带 HTML 标签）

use axum::{
    body::Bytes,
    extract::State,
    response::Html,
    Json,
};
use std::sync::Arc;

use crate::infrastructure::http::dto::SynthesizeResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 跑完流水线并构建成品 URL
async fn run_pipeline(state: &AppState, body: Bytes) -> Result<String, ApiError> {
    let artifact = state.pipeline.process(&body).await?;
    Ok(state.artifact_url(&artifact.fingerprint))
}

/// POST /raw - 返回裸 URL
pub async fn synthesize_raw(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<String, ApiError> {
    run_pipeline(&state, body).await
}

/// POST /embed - 返回 audio 标签片段
pub async fn synthesize_embed(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, ApiError> {
    let url = run_pipeline(&state, body).await?;
    Ok(Html(format!(
        r#"<audio src="{}" controls autoplay></audio>"#,
        url
    )))
}

/// POST /json - 返回 JSON 对象
pub async fn synthesize_json(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    let url = run_pipeline(&state, body).await?;
    Ok(Json(SynthesizeResponse { url }))
}
