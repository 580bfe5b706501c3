//! Fake Synthesis Client - 用于测试和离线运行的合成客户端
//!
//! 不调用外部服务，返回固定前缀拼出的假 URL

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{SpeechSynthesisPort, SynthesisError};

/// Fake 客户端配置
#[derive(Debug, Clone)]
pub struct FakeSynthesisClientConfig {
    /// 假 URL 前缀
    pub url_prefix: String,
    /// 模拟的合成延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeSynthesisClientConfig {
    fn default() -> Self {
        Self {
            url_prefix: "http://localhost/fake-audio".to_string(),
            latency_ms: 0,
        }
    }
}

/// Fake Synthesis Client
pub struct FakeSynthesisClient {
    config: FakeSynthesisClientConfig,
    calls: AtomicUsize,
}

impl FakeSynthesisClient {
    pub fn new(config: FakeSynthesisClientConfig) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeSynthesisClientConfig::default())
    }

    /// 已处理的合成调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeSynthesisClient {
    async fn synthesize(&self, text: &str) -> Result<String, SynthesisError> {
        let seq = self.calls.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(text_len = text.len(), seq, "FakeSynthesisClient: issuing fake url");

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        Ok(format!("{}/{}.wav", self.config.url_prefix, seq))
    }
}
