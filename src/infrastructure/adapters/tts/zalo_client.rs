//! Zalo TTS Client - 调用 Zalo AI 合成服务
//!
//! 实现 SpeechSynthesisPort trait
//!
//! 外部 API:
//! POST https://api.zalo.ai/v1/tts/synthesize
//! Request: form 编码字段 input / speaker_id / speed，Apikey 头认证
//! Response: {"error_code": 0, "error_message": "...", "data": {"url": "..."}}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{SpeechSynthesisPort, SynthesisError};

/// 合成响应信封
#[derive(Debug, Deserialize)]
struct SynthesizeEnvelope {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_message: String,
    #[serde(default)]
    data: Option<SynthesizeData>,
}

#[derive(Debug, Deserialize)]
struct SynthesizeData {
    #[serde(default)]
    url: String,
}

/// Zalo TTS 客户端配置
#[derive(Debug, Clone)]
pub struct ZaloTtsClientConfig {
    /// 合成服务端点
    pub endpoint: String,
    /// 静态 API key，随 Apikey 头发送
    pub api_key: String,
    /// 发音人
    pub speaker_id: String,
    /// 语速
    pub speed: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ZaloTtsClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.zalo.ai/v1/tts/synthesize".to_string(),
            api_key: String::new(),
            speaker_id: "1".to_string(),
            speed: "0.8".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Zalo TTS 客户端
///
/// 每个片段调用一次，成功时返回瞬态音频 URL。
/// 本层不重试——合成成功后的 CDN 传播延迟由下载侧处理
pub struct ZaloTtsClient {
    client: Client,
    config: ZaloTtsClientConfig,
}

impl ZaloTtsClient {
    /// 创建新的 Zalo TTS 客户端
    pub fn new(config: ZaloTtsClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn form_params<'a>(&'a self, text: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("input", text),
            ("speaker_id", &self.config.speaker_id),
            ("speed", &self.config.speed),
        ]
    }
}

#[async_trait]
impl SpeechSynthesisPort for ZaloTtsClient {
    async fn synthesize(&self, text: &str) -> Result<String, SynthesisError> {
        tracing::debug!(
            endpoint = %self.config.endpoint,
            text_len = text.len(),
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Apikey", &self.config.api_key)
            .form(&self.form_params(text))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else if e.is_connect() {
                    SynthesisError::Network(format!("Cannot connect to TTS provider: {}", e))
                } else {
                    SynthesisError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ServiceError {
                code: status.as_u16() as i64,
                message: error_text,
            });
        }

        let envelope: SynthesizeEnvelope = response
            .json()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        if envelope.error_code != 0 {
            return Err(SynthesisError::ServiceError {
                code: envelope.error_code,
                message: envelope.error_message,
            });
        }

        let url = envelope.data.map(|d| d.url).unwrap_or_default();
        if url.is_empty() {
            return Err(SynthesisError::InvalidResponse(
                "Provider returned no audio url".to_string(),
            ));
        }

        tracing::debug!(url = %url, "Synthesis accepted, transient url issued");

        Ok(url)
    }
}
