//! Synthesis Pipeline - 分段合成-拼装流水线
//!
//! 核心编排: 指纹 → 缓存探测 → 清洗/分段 → 逐段合成+下载+编码
//! （有界并发）→ 按片段序号拼接 → 成品落盘即缓存提交。
//!
//! 同指纹的并发请求通过 in-flight 锁串行化，第二个请求在锁后
//! 重新探测缓存，直接拿到第一个请求的成品。

use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::join_all;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};

use crate::application::error::PipelineError;
use crate::application::ports::{
    ArtifactStorePort, AudioFetcherPort, AudioTranscoderPort, FetchError, SpeechSynthesisPort,
    SynthesisError, TranscodeError,
};
use crate::domain::{fingerprint, normalize, split};

/// 流水线配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 单片段最大字符预算
    pub max_segment_chars: usize,
    /// 片段级合成/下载的最大并发数
    pub max_parallel: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_segment_chars: 2000,
            max_parallel: 2,
        }
    }
}

/// 成品引用
#[derive(Debug, Clone)]
pub struct Artifact {
    /// 内容指纹，也是文件名主干
    pub fingerprint: String,
    /// 成品在本地存储中的路径
    pub path: PathBuf,
}

/// 单片段失败
///
/// 只用于降级日志，不向上传播
#[derive(Debug, Error)]
enum SegmentError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Encode(#[from] TranscodeError),
}

/// 分段合成流水线
pub struct SynthesisPipeline {
    config: PipelineConfig,
    synthesis: Arc<dyn SpeechSynthesisPort>,
    fetcher: Arc<dyn AudioFetcherPort>,
    transcoder: Arc<dyn AudioTranscoderPort>,
    store: Arc<dyn ArtifactStorePort>,
    /// 指纹 → 执行锁，保证同指纹最多一条流水线在跑
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl SynthesisPipeline {
    pub fn new(
        config: PipelineConfig,
        synthesis: Arc<dyn SpeechSynthesisPort>,
        fetcher: Arc<dyn AudioFetcherPort>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        store: Arc<dyn ArtifactStorePort>,
    ) -> Self {
        Self {
            config,
            synthesis,
            fetcher,
            transcoder,
            store,
            inflight: DashMap::new(),
        }
    }

    /// 处理一次请求
    ///
    /// 缓存命中时不触碰合成/下载/转码任何一层
    pub async fn process(&self, body: &[u8]) -> Result<Artifact, PipelineError> {
        if body.is_empty() {
            return Err(PipelineError::EmptyPayload);
        }

        let fp = fingerprint(body);

        let lock = self
            .inflight
            .entry(fp.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.run(&fp, body).await
        };

        // 没有其他等待者时回收 in-flight 条目（map 自身 + 本地 clone = 2）
        self.inflight
            .remove_if(&fp, |_, existing| Arc::strong_count(existing) <= 2);

        result
    }

    /// 持锁执行: 缓存探测 + 完整流水线
    async fn run(&self, fp: &str, body: &[u8]) -> Result<Artifact, PipelineError> {
        if let Some(path) = self.store.lookup(fp).await {
            tracing::debug!(fingerprint = %fp, "Cache hit, serving existing artifact");
            return Ok(Artifact {
                fingerprint: fp.to_string(),
                path,
            });
        }

        let text = String::from_utf8_lossy(body);
        let normalized = normalize(&text);
        let segments = split(&normalized, self.config.max_segment_chars);

        tracing::info!(
            fingerprint = %fp,
            text_len = normalized.len(),
            segments = segments.len(),
            "Cache miss, starting synthesis"
        );

        // 有界并发逐段处理，结果按片段序号归位而不是完成顺序
        let semaphore = Arc::new(Semaphore::new(self.config.max_parallel.max(1)));
        let mut tasks = Vec::with_capacity(segments.len());

        for segment in segments {
            let semaphore = semaphore.clone();
            let synthesis = self.synthesis.clone();
            let fetcher = self.fetcher.clone();
            let transcoder = self.transcoder.clone();
            let raw_path = self.store.segment_raw_path(fp, segment.index);
            let encoded_path = self.store.segment_encoded_path(fp, segment.index);
            let fp = fp.to_string();

            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(p) => p,
                    Err(_) => return None,
                };

                match Self::process_segment(
                    synthesis.as_ref(),
                    fetcher.as_ref(),
                    transcoder.as_ref(),
                    &segment.text,
                    &raw_path,
                    &encoded_path,
                )
                .await
                {
                    Ok(()) => Some((segment.index, encoded_path)),
                    Err(e) => {
                        // 单片段失败只降级该片段
                        tracing::warn!(
                            fingerprint = %fp,
                            segment_index = segment.index,
                            error = %e,
                            "Segment failed, degrading"
                        );
                        None
                    }
                }
            }));
        }

        let mut encoded: Vec<(usize, PathBuf)> = join_all(tasks)
            .await
            .into_iter()
            .filter_map(|joined| joined.ok().flatten())
            .collect();
        encoded.sort_by_key(|(index, _)| *index);

        if encoded.is_empty() {
            tracing::error!(fingerprint = %fp, "All segments failed, no artifact produced");
            return Err(PipelineError::NoAudio);
        }

        let path = if encoded.len() == 1 {
            // 单片段跳过拼接，编码文件直接提升为成品
            let (_, only) = &encoded[0];
            self.store
                .promote(only, fp)
                .await
                .map_err(|e| PipelineError::Storage(e.to_string()))?
        } else {
            let inputs: Vec<PathBuf> = encoded.into_iter().map(|(_, p)| p).collect();
            let artifact_path = self.store.artifact_path(fp);
            self.transcoder.concat(&inputs, &artifact_path).await?;
            artifact_path
        };

        tracing::info!(fingerprint = %fp, path = %path.display(), "Artifact assembled");

        Ok(Artifact {
            fingerprint: fp.to_string(),
            path,
        })
    }

    /// 单片段: 合成 → 下载 → 编码
    async fn process_segment(
        synthesis: &dyn SpeechSynthesisPort,
        fetcher: &dyn AudioFetcherPort,
        transcoder: &dyn AudioTranscoderPort,
        text: &str,
        raw_path: &std::path::Path,
        encoded_path: &std::path::Path,
    ) -> Result<(), SegmentError> {
        let url = synthesis.synthesize(text).await?;
        fetcher.fetch(&url, raw_path).await?;
        transcoder.encode(raw_path, encoded_path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::application::ports::StoreError;

    /// 返回内嵌片段文本的假 URL，统计调用次数
    struct FakeSynthesis {
        calls: AtomicUsize,
    }

    impl FakeSynthesis {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpeechSynthesisPort for FakeSynthesis {
        async fn synthesize(&self, text: &str) -> Result<String, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("FAIL") {
                return Err(SynthesisError::ServiceError {
                    code: -32,
                    message: "rejected".to_string(),
                });
            }
            Ok(format!("http://cdn.test/{}", text))
        }
    }

    /// 把 URL 尾段当作音频内容写盘; 可按片段内容注入延迟制造乱序完成
    struct FakeFetcher {
        calls: AtomicUsize,
        staggered: bool,
    }

    impl FakeFetcher {
        fn new(staggered: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                staggered,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AudioFetcherPort for FakeFetcher {
        async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let content = url.rsplit('/').next().unwrap_or("").to_string();
            if self.staggered {
                // 前面的片段睡得更久，完成顺序与原文顺序相反
                let delay = match content.chars().next() {
                    Some('a') => 30,
                    Some('b') => 15,
                    _ => 1,
                };
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            tokio::fs::write(dest, content.as_bytes())
                .await
                .map_err(|e| FetchError::Io(e.to_string()))?;
            Ok(content.len() as u64)
        }
    }

    /// encode = 原样搬运并删除输入; concat = 按给定顺序拼接内容
    struct FakeTranscoder {
        concat_calls: AtomicUsize,
    }

    impl FakeTranscoder {
        fn new() -> Self {
            Self {
                concat_calls: AtomicUsize::new(0),
            }
        }

        fn concat_count(&self) -> usize {
            self.concat_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AudioTranscoderPort for FakeTranscoder {
        async fn encode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
            let data = tokio::fs::read(input)
                .await
                .map_err(|e| TranscodeError::Io(e.to_string()))?;
            tokio::fs::write(output, data)
                .await
                .map_err(|e| TranscodeError::Io(e.to_string()))?;
            let _ = tokio::fs::remove_file(input).await;
            Ok(())
        }

        async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), TranscodeError> {
            self.concat_calls.fetch_add(1, Ordering::SeqCst);
            let mut joined = Vec::new();
            for input in inputs {
                let data = tokio::fs::read(input)
                    .await
                    .map_err(|e| TranscodeError::Io(e.to_string()))?;
                joined.extend_from_slice(&data);
            }
            tokio::fs::write(output, joined)
                .await
                .map_err(|e| TranscodeError::Io(e.to_string()))?;
            for input in inputs {
                let _ = tokio::fs::remove_file(input).await;
            }
            Ok(())
        }
    }

    /// 临时目录上的最小存储实现
    struct TempStore {
        root: PathBuf,
    }

    #[async_trait]
    impl ArtifactStorePort for TempStore {
        fn artifact_path(&self, fingerprint: &str) -> PathBuf {
            self.root.join(format!("{}.mp3", fingerprint))
        }

        fn segment_raw_path(&self, fingerprint: &str, index: usize) -> PathBuf {
            self.root.join(format!("{}_{}.wav", fingerprint, index))
        }

        fn segment_encoded_path(&self, fingerprint: &str, index: usize) -> PathBuf {
            self.root.join(format!("{}_{}.mp3", fingerprint, index))
        }

        async fn lookup(&self, fingerprint: &str) -> Option<PathBuf> {
            let path = self.artifact_path(fingerprint);
            tokio::fs::metadata(&path).await.ok().map(|_| path)
        }

        async fn promote(&self, encoded: &Path, fingerprint: &str) -> Result<PathBuf, StoreError> {
            let path = self.artifact_path(fingerprint);
            tokio::fs::rename(encoded, &path)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
            Ok(path)
        }
    }

    struct Harness {
        pipeline: SynthesisPipeline,
        synthesis: Arc<FakeSynthesis>,
        fetcher: Arc<FakeFetcher>,
        transcoder: Arc<FakeTranscoder>,
        _dir: tempfile::TempDir,
    }

    fn harness(max_segment_chars: usize, staggered: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let synthesis = Arc::new(FakeSynthesis::new());
        let fetcher = Arc::new(FakeFetcher::new(staggered));
        let transcoder = Arc::new(FakeTranscoder::new());
        let store = Arc::new(TempStore {
            root: dir.path().to_path_buf(),
        });

        let pipeline = SynthesisPipeline::new(
            PipelineConfig {
                max_segment_chars,
                max_parallel: 4,
            },
            synthesis.clone(),
            fetcher.clone(),
            transcoder.clone(),
            store,
        );

        Harness {
            pipeline,
            synthesis,
            fetcher,
            transcoder,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_empty_payload_rejected_without_side_effects() {
        let h = harness(2000, false);
        let result = h.pipeline.process(b"").await;
        assert!(matches!(result, Err(PipelineError::EmptyPayload)));
        assert_eq!(h.synthesis.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_segment_skips_concat() {
        let h = harness(2000, false);
        let artifact = h.pipeline.process(b"hello world").await.unwrap();

        assert_eq!(h.synthesis.call_count(), 1);
        assert_eq!(h.transcoder.concat_count(), 0);
        let content = tokio::fs::read_to_string(&artifact.path).await.unwrap();
        assert_eq!(content, "hello world");
    }

    #[tokio::test]
    async fn test_multi_segment_concatenated_in_text_order() {
        // max_len 6: "aaaa bbbb cccc" → 三个片段
        let h = harness(6, true);
        let artifact = h.pipeline.process(b"aaaa bbbb cccc").await.unwrap();

        assert_eq!(h.synthesis.call_count(), 3);
        assert_eq!(h.transcoder.concat_count(), 1);
        // 乱序完成（c 最先落盘），拼接仍按原文顺序
        let content = tokio::fs::read_to_string(&artifact.path).await.unwrap();
        assert_eq!(content, "aaaabbbbcccc");
    }

    #[tokio::test]
    async fn test_second_submission_served_from_cache() {
        let h = harness(2000, false);
        let first = h.pipeline.process(b"same text").await.unwrap();
        let second = h.pipeline.process(b"same text").await.unwrap();

        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.path, second.path);
        // 第二次请求零合成、零下载
        assert_eq!(h.synthesis.call_count(), 1);
        assert_eq!(h.fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_segment_degrades_not_aborts() {
        let h = harness(6, false);
        let artifact = h.pipeline.process(b"aaaa FAIL cccc").await.unwrap();

        assert_eq!(h.synthesis.call_count(), 3);
        // 成品只含两个成功片段，保持相对顺序
        let content = tokio::fs::read_to_string(&artifact.path).await.unwrap();
        assert_eq!(content, "aaaacccc");
    }

    #[tokio::test]
    async fn test_sole_segment_failure_yields_no_artifact() {
        let h = harness(2000, false);
        let result = h.pipeline.process(b"FAIL").await;
        assert!(matches!(result, Err(PipelineError::NoAudio)));
    }

    #[tokio::test]
    async fn test_concurrent_same_fingerprint_runs_pipeline_once() {
        let h = harness(2000, true);
        let (a, b) = tokio::join!(
            h.pipeline.process(b"race me"),
            h.pipeline.process(b"race me")
        );

        let a = a.unwrap();
        let b = b.unwrap();
        assert_eq!(a.path, b.path);
        // 第二个请求在 in-flight 锁后命中缓存，不重复合成
        assert_eq!(h.synthesis.call_count(), 1);
    }

    #[tokio::test]
    async fn test_inflight_map_drained_after_completion() {
        let h = harness(2000, false);
        h.pipeline.process(b"drain").await.unwrap();
        assert!(h.pipeline.inflight.is_empty());
    }

    #[tokio::test]
    async fn test_markup_is_stripped_before_synthesis() {
        let h = harness(2000, false);
        let artifact = h.pipeline.process(b"<p>clean text</p>").await.unwrap();
        let content = tokio::fs::read_to_string(&artifact.path).await.unwrap();
        assert_eq!(content, "clean text");
    }
}
