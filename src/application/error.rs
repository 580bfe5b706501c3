//! 流水线错误定义

use thiserror::Error;

use crate::application::ports::TranscodeError;

/// 流水线错误
///
/// 单片段的合成/下载失败只降级该片段，不会出现在这里；
/// 这里是让整个请求失败的终态错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 空请求体，无任何副作用
    #[error("Payload empty")]
    EmptyPayload,

    /// 所有片段都失败，没有产出任何音频
    #[error("No audio produced: all segments failed")]
    NoAudio,

    /// 转码/拼接失败，成品未写入（缓存不会被失败污染）
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// 存储操作失败
    #[error("Storage error: {0}")]
    Storage(String),
}
