//! HTTP DTOs

use serde::Serialize;

/// /json 端点的响应
#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    /// 成品音频的对外 URL
    pub url: String,
}
