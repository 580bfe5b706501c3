//! Speech Synthesis Port - 合成服务抽象
//!
//! 定义远端 TTS 服务的抽象接口，具体实现在 infrastructure/adapters 层。
//! 失败用类型化错误表达，调用方不可能把"无音频"误认成合法的空 URL。

use async_trait::async_trait;
use thiserror::Error;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    /// 服务端拒绝: HTTP 非 2xx，或响应信封里 error_code 非零
    #[error("Provider rejected request (code {code}): {message}")]
    ServiceError { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Speech Synthesis Port
///
/// 每个片段调用一次，成功返回短时效的音频下载 URL。
/// 本层不做重试——已知的失败模式是合成成功之后的 CDN 传播延迟，
/// 重试属于下载侧（AudioFetcherPort 的实现）。
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// 提交片段文本，返回瞬态音频 URL
    async fn synthesize(&self, text: &str) -> Result<String, SynthesisError>;
}
