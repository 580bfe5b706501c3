//! File Artifact Store - 指纹命名的文件系统布局
//!
//! 实现 ArtifactStorePort trait。成品文件的存在本身就是缓存状态，
//! 没有单独的索引。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ArtifactStorePort, StoreError};

/// 成品扩展名
const ARTIFACT_EXT: &str = "mp3";
/// 片段原始音频扩展名
const RAW_EXT: &str = "wav";

/// 文件系统存储
pub struct FileArtifactStore {
    /// 存储根目录
    root: PathBuf,
}

impl FileArtifactStore {
    /// 创建存储，确保根目录存在
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(Self { root })
    }

    /// 存储根目录
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    fn artifact_path(&self, fingerprint: &str) -> PathBuf {
        self.root.join(format!("{}.{}", fingerprint, ARTIFACT_EXT))
    }

    fn segment_raw_path(&self, fingerprint: &str, index: usize) -> PathBuf {
        self.root
            .join(format!("{}_{}.{}", fingerprint, index, RAW_EXT))
    }

    fn segment_encoded_path(&self, fingerprint: &str, index: usize) -> PathBuf {
        self.root
            .join(format!("{}_{}.{}", fingerprint, index, ARTIFACT_EXT))
    }

    async fn lookup(&self, fingerprint: &str) -> Option<PathBuf> {
        let path = self.artifact_path(fingerprint);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    async fn promote(&self, encoded: &Path, fingerprint: &str) -> Result<PathBuf, StoreError> {
        let path = self.artifact_path(fingerprint);

        fs::rename(encoded, &path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        tracing::debug!(
            from = %encoded.display(),
            to = %path.display(),
            "Promoted sole segment to artifact"
        );

        Ok(path)
    }
}
