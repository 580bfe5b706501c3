//! HTTP Audio Fetcher - 带重试的瞬态 URL 下载
//!
//! 实现 AudioFetcherPort trait
//!
//! 合成服务返回 URL 时 CDN 往往还没传播完成，立即 GET 会拿到 404。
//! 对任何非 200 响应按固定间隔重试，直到预算耗尽；
//! 拿到 200 后把响应体流式写入目标路径。

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{AudioFetcherPort, FetchError};
use crate::application::retry::{Delay, RetryPolicy, TokioDelay};

/// 单次尝试的失败
enum AttemptError {
    /// 非 200 状态，可重试
    Status(u16),
    /// 传输层错误，同样按传播延迟处理重试
    Transport(String),
}

/// 下载器配置
#[derive(Debug, Clone)]
pub struct HttpAudioFetcherConfig {
    /// 重试策略，默认 20 次 × 500ms
    pub retry: RetryPolicy,
}

impl Default for HttpAudioFetcherConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP 下载器
pub struct HttpAudioFetcher {
    client: Client,
    retry: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl HttpAudioFetcher {
    /// 创建新的下载器
    pub fn new(config: HttpAudioFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            retry: config.retry,
            delay: Arc::new(TokioDelay),
        })
    }

    /// 注入自定义 Delay（测试用，免真实挂钟）
    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl AudioFetcherPort for HttpAudioFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self
            .retry
            .run(self.delay.as_ref(), |attempt| {
                let client = self.client.clone();
                let url = url.to_string();
                async move {
                    tracing::debug!(url = %url, attempt, "Downloading transient url");

                    match client.get(&url).send().await {
                        Ok(resp) if resp.status() == reqwest::StatusCode::OK => Ok(resp),
                        Ok(resp) => Err(AttemptError::Status(resp.status().as_u16())),
                        Err(e) => Err(AttemptError::Transport(e.to_string())),
                    }
                }
            })
            .await
            .map_err(|e| match e {
                AttemptError::Status(last_status) => FetchError::RetriesExhausted {
                    attempts: self.retry.max_attempts,
                    last_status,
                },
                AttemptError::Transport(msg) => FetchError::Network(msg),
            })?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Network(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::Io(e.to_string()))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        tracing::info!(url = %url, dest = %dest.display(), size = written, "Downloaded");

        Ok(written)
    }
}
