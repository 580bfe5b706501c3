//! Audio Transcoder Port - 转码/拼接抽象
//!
//! 把转码和拼接当作能力接口，核心流水线与外部媒体工具的
//! 具体调用语法隔离，唯一的适配器通过子进程调用 ffmpeg。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to spawn transcoder process: {0}")]
    Spawn(String),

    /// 外部工具非零退出
    #[error("Transcoder exited with {status}: {stderr}")]
    ToolFailed { status: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(String),
}

/// Audio Transcoder Port
#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 把下载的原始音频转成目标编码
    ///
    /// 无论成败都删除原始输入文件，避免存储泄漏
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;

    /// 按给定顺序把多个已编码片段拼接成一个连续文件
    ///
    /// 格式一致时走流复制，不重新编码。
    /// 成功后删除所有输入片段；失败时保留现场供排查，不重试。
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), TranscodeError>;
}
