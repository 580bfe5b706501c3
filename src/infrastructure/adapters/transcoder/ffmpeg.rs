//! Ffmpeg Transcoder - 子进程调用 ffmpeg
//!
//! 实现 AudioTranscoderPort trait
//!
//! - encode: 原始 WAV → 固定采样率/声道/码率的 MP3
//! - concat: concat demuxer 流复制拼接，不重新编码

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoderPort, TranscodeError};

/// 转码器配置
///
/// 目标参数固定: 44.1kHz 双声道 128kbps
#[derive(Debug, Clone)]
pub struct FfmpegTranscoderConfig {
    /// ffmpeg 可执行文件
    pub ffmpeg_bin: String,
    /// 目标采样率（Hz）
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
    /// 码率，如 "128k"
    pub bitrate: String,
}

impl Default for FfmpegTranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            sample_rate: 44100,
            channels: 2,
            bitrate: "128k".to_string(),
        }
    }
}

/// Ffmpeg 转码器
pub struct FfmpegTranscoder {
    config: FfmpegTranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: FfmpegTranscoderConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FfmpegTranscoderConfig::default())
    }

    /// 单文件转码参数
    fn encode_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-ar".to_string(),
            self.config.sample_rate.to_string(),
            "-ac".to_string(),
            self.config.channels.to_string(),
            "-b:a".to_string(),
            self.config.bitrate.clone(),
            output.display().to_string(),
        ]
    }

    /// 拼接参数（concat demuxer + 流复制）
    fn concat_args(list: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            list.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.display().to_string(),
        ]
    }

    /// concat demuxer 的文件列表，单引号按 ffmpeg 规则转义
    fn concat_list(inputs: &[PathBuf]) -> String {
        inputs
            .iter()
            .map(|p| format!("file '{}'\n", p.display().to_string().replace('\'', r"'\''")))
            .collect()
    }

    /// 运行 ffmpeg，非零退出带回 stderr
    async fn run_ffmpeg(&self, args: &[String]) -> Result<(), TranscodeError> {
        tracing::debug!(bin = %self.config.ffmpeg_bin, ?args, "Invoking ffmpeg");

        let output = Command::new(&self.config.ffmpeg_bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TranscodeError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(TranscodeError::ToolFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl AudioTranscoderPort for FfmpegTranscoder {
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let result = self.run_ffmpeg(&self.encode_args(input, output)).await;

        // 无论成败删除原始输入，避免存储泄漏
        if let Err(e) = tokio::fs::remove_file(input).await {
            tracing::warn!(path = %input.display(), error = %e, "Failed to remove raw input");
        }

        if result.is_ok() {
            tracing::debug!(
                input = %input.display(),
                output = %output.display(),
                "Encoded segment"
            );
        }

        result
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), TranscodeError> {
        let list_path = output.with_extension("list");
        tokio::fs::write(&list_path, Self::concat_list(inputs))
            .await
            .map_err(|e| TranscodeError::Io(e.to_string()))?;

        let result = self.run_ffmpeg(&Self::concat_args(&list_path, output)).await;

        match &result {
            Ok(()) => {
                // 合并完成后清理片段文件和列表
                for input in inputs {
                    if let Err(e) = tokio::fs::remove_file(input).await {
                        tracing::warn!(path = %input.display(), error = %e, "Failed to remove segment");
                    }
                }
                let _ = tokio::fs::remove_file(&list_path).await;

                tracing::info!(parts = inputs.len(), output = %output.display(), "Concatenated");
            }
            Err(e) => {
                // 失败时保留片段文件供排查
                tracing::error!(error = %e, "Concat failed, leaving segment files in place");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_args_carry_fixed_target() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let args = transcoder.encode_args(Path::new("/tmp/a.wav"), Path::new("/tmp/a.mp3"));
        assert_eq!(
            args,
            vec![
                "-y", "-i", "/tmp/a.wav", "-ar", "44100", "-ac", "2", "-b:a", "128k",
                "/tmp/a.mp3"
            ]
        );
    }

    #[test]
    fn test_concat_args_use_stream_copy() {
        let args = FfmpegTranscoder::concat_args(Path::new("/tmp/x.list"), Path::new("/tmp/x.mp3"));
        assert!(args.windows(2).any(|w| w == ["-f", "concat"]));
        assert!(args.windows(2).any(|w| w == ["-c", "copy"]));
    }

    #[test]
    fn test_concat_list_preserves_order() {
        let inputs = vec![
            PathBuf::from("/tmp/fp_0.mp3"),
            PathBuf::from("/tmp/fp_1.mp3"),
            PathBuf::from("/tmp/fp_2.mp3"),
        ];
        let list = FfmpegTranscoder::concat_list(&inputs);
        assert_eq!(
            list,
            "file '/tmp/fp_0.mp3'\nfile '/tmp/fp_1.mp3'\nfile '/tmp/fp_2.mp3'\n"
        );
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let inputs = vec![PathBuf::from("/tmp/it's.mp3")];
        let list = FfmpegTranscoder::concat_list(&inputs);
        assert_eq!(list, "file '/tmp/it'\\''s.mp3'\n");
    }

    #[tokio::test]
    async fn test_missing_binary_reports_spawn_error() {
        let transcoder = FfmpegTranscoder::new(FfmpegTranscoderConfig {
            ffmpeg_bin: "/nonexistent/ffmpeg".to_string(),
            ..FfmpegTranscoderConfig::default()
        });
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        tokio::fs::write(&input, b"riff").await.unwrap();

        let result = transcoder.encode(&input, &dir.path().join("out.mp3")).await;

        assert!(matches!(result, Err(TranscodeError::Spawn(_))));
        // 原始输入被无条件清理
        assert!(!input.exists());
    }
}
