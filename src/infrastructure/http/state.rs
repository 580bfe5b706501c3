//! Application State

use std::sync::Arc;

use crate::application::SynthesisPipeline;

/// 应用状态
///
/// 流水线加上构建对外链接所需的前缀
pub struct AppState {
    pub pipeline: Arc<SynthesisPipeline>,
    /// 成品链接前缀
    public_prefix: String,
}

impl AppState {
    pub fn new(pipeline: Arc<SynthesisPipeline>, public_prefix: impl Into<String>) -> Self {
        Self {
            pipeline,
            public_prefix: public_prefix.into(),
        }
    }

    /// 指纹 → 对外可访问的成品 URL
    pub fn artifact_url(&self, fingerprint: &str) -> String {
        format!(
            "{}/{}.mp3",
            self.public_prefix.trim_end_matches('/'),
            fingerprint
        )
    }
}
