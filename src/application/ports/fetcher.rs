//! Audio Fetcher Port - 瞬态 URL 下载抽象
//!
//! 合成服务返回 URL 时 CDN 可能尚未传播完成，立即下载会合法地 404。
//! 实现方负责按有界重试策略轮询直到拿到 200。

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 下载错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(String),

    /// 重试预算耗尽，`last_status` 为最后一次观测到的 HTTP 状态
    #[error("Retries exhausted after {attempts} attempts (last status: {last_status})")]
    RetriesExhausted { attempts: u32, last_status: u16 },
}

/// Audio Fetcher Port
#[async_trait]
pub trait AudioFetcherPort: Send + Sync {
    /// 下载瞬态 URL 到本地路径，覆盖已存在的文件
    ///
    /// 返回写入的字节数
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}
