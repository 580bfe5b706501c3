//! Configuration Types
//!
//! 定义所有配置结构体。启动时构建一次，之后以不可变对象
//! 显式传入各组件，不使用全局可变状态

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::retry::RetryPolicy;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成服务配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 流水线配置
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// 下载重试配置
    #[serde(default)]
    pub fetch: FetchConfig,

    /// 编码目标配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 成品链接前缀，返回给调用方的 URL 以它开头
    /// 未设置时使用 http://{host}:{port}/files
    #[serde(default)]
    pub public_prefix: Option<String>,

    /// 是否由本服务托管存储目录（/files）
    #[serde(default = "default_serve_files")]
    pub serve_files: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_serve_files() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_prefix: None,
            serve_files: default_serve_files(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 对外链接前缀
    pub fn public_prefix(&self) -> String {
        self.public_prefix.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}/files", host, self.port)
        })
    }
}

/// 合成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 合成端点
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// API key，必填，缺失时进程拒绝启动
    #[serde(default)]
    pub api_key: String,

    /// 发音人
    #[serde(default = "default_speaker_id")]
    pub speaker_id: String,

    /// 语速
    #[serde(default = "default_speed")]
    pub speed: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_endpoint() -> String {
    "https://api.zalo.ai/v1/tts/synthesize".to_string()
}

fn default_speaker_id() -> String {
    "1".to_string()
}

fn default_speed() -> String {
    "0.8".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            api_key: String::new(),
            speaker_id: default_speaker_id(),
            speed: default_speed(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 单片段最大字符预算
    #[serde(default = "default_max_segment_chars")]
    pub max_segment_chars: usize,

    /// 片段级合成/下载最大并发
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

fn default_max_segment_chars() -> usize {
    2000
}

fn default_max_parallel() -> usize {
    2
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_segment_chars: default_max_segment_chars(),
            max_parallel: default_max_parallel(),
        }
    }
}

/// 下载重试配置
///
/// CDN 传播延迟的应对参数
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// 最大尝试次数
    #[serde(default = "default_fetch_attempts")]
    pub max_attempts: u32,

    /// 重试间隔（毫秒）
    #[serde(default = "default_fetch_interval")]
    pub interval_ms: u64,
}

fn default_fetch_attempts() -> u32 {
    20
}

fn default_fetch_interval() -> u64 {
    500
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_fetch_attempts(),
            interval_ms: default_fetch_interval(),
        }
    }
}

impl FetchConfig {
    /// 转成重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.interval_ms))
    }
}

/// 编码目标配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// ffmpeg 可执行文件
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: String,

    /// 目标采样率（Hz）
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 声道数
    #[serde(default = "default_channels")]
    pub channels: u8,

    /// 码率
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
}

fn default_ffmpeg_bin() -> String {
    "ffmpeg".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u8 {
    2 // 立体声
}

fn default_bitrate() -> String {
    "128k".to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: default_ffmpeg_bin(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            bitrate: default_bitrate(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音频存储根目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
