//! Artifact Store Port - 成品与片段文件布局
//!
//! 指纹到路径的映射是推导出来的，不单独建索引——
//! 成品文件在磁盘上的存在本身就是缓存状态。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),
}

/// Artifact Store Port
///
/// 文件布局:
/// - `{root}/{fingerprint}.mp3`       成品，一次写入后只读
/// - `{root}/{fingerprint}_{idx}.wav` 片段原始音频，合并后删除
/// - `{root}/{fingerprint}_{idx}.mp3` 片段编码音频，合并后删除
///
/// 路径按指纹 + 片段序号命名空间化，不同指纹的并发请求不会互相碰撞
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 成品路径
    fn artifact_path(&self, fingerprint: &str) -> PathBuf;

    /// 片段原始音频路径
    fn segment_raw_path(&self, fingerprint: &str, index: usize) -> PathBuf;

    /// 片段编码音频路径
    fn segment_encoded_path(&self, fingerprint: &str, index: usize) -> PathBuf;

    /// 缓存探测: 成品存在即命中
    async fn lookup(&self, fingerprint: &str) -> Option<PathBuf>;

    /// 把单片段的编码文件直接提升为成品（跳过拼接）
    async fn promote(&self, encoded: &Path, fingerprint: &str) -> Result<PathBuf, StoreError>;
}
