//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXCAST_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOXCAST_TTS__API_KEY=xxxx`
/// - `VOXCAST_SERVER__PORT=9000`
/// - `VOXCAST_STORAGE__AUDIO_DIR=/data/audio`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.serve_files", true)?
        .set_default("tts.endpoint", "https://api.zalo.ai/v1/tts/synthesize")?
        .set_default("tts.api_key", "")?
        .set_default("tts.speaker_id", "1")?
        .set_default("tts.speed", "0.8")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("pipeline.max_segment_chars", 2000)?
        .set_default("pipeline.max_parallel", 2)?
        .set_default("fetch.max_attempts", 20)?
        .set_default("fetch.interval_ms", 500)?
        .set_default("audio.ffmpeg_bin", "ffmpeg")?
        .set_default("audio.sample_rate", 44100)?
        .set_default("audio.channels", 2)?
        .set_default("audio.bitrate", "128k")?
        .set_default("storage.audio_dir", "data/audio")?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 前缀: VOXCAST_，层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("VOXCAST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
///
/// 缺失凭证属于配置错误，进程不应启动
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.tts.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS api_key is not set (VOXCAST_TTS__API_KEY)".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.endpoint.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS endpoint cannot be empty".to_string(),
        ));
    }

    if config.pipeline.max_segment_chars == 0 {
        return Err(ConfigError::ValidationError(
            "Segment budget cannot be 0".to_string(),
        ));
    }

    if config.fetch.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Fetch retry budget cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（启动时日志，凭证不落日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Public Prefix: {}", config.server.public_prefix());
    tracing::info!("TTS Endpoint: {}", config.tts.endpoint);
    tracing::info!("Speaker: {} (speed {})", config.tts.speaker_id, config.tts.speed);
    tracing::info!("Segment Budget: {} chars", config.pipeline.max_segment_chars);
    tracing::info!("Segment Parallelism: {}", config.pipeline.max_parallel);
    tracing::info!(
        "Fetch Retry: {} x {}ms",
        config.fetch.max_attempts,
        config.fetch.interval_ms
    );
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.tts.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = AppConfig::default();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let mut config = valid_config();
        config.tts.api_key = "   ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_segment_budget() {
        let mut config = valid_config();
        config.pipeline.max_segment_chars = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_retry_budget() {
        let mut config = valid_config();
        config.fetch.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }
}
