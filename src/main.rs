//! Voxcast - 分段 TTS 合成-拼装服务

use std::sync::Arc;

use voxcast::application::{PipelineConfig, SynthesisPipeline};
use voxcast::config::{load_config, print_config};
use voxcast::infrastructure::adapters::{
    FfmpegTranscoder, FfmpegTranscoderConfig, FileArtifactStore, HttpAudioFetcher,
    HttpAudioFetcherConfig, ZaloTtsClient, ZaloTtsClientConfig,
};
use voxcast::infrastructure::http::{AppState, HttpServer, ServerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    // 缺失 API key 在这里直接失败，进程不启动
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},voxcast={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Voxcast - 分段 TTS 合成-拼装服务");
    print_config(&config);

    // 存储目录
    let store = Arc::new(FileArtifactStore::new(&config.storage.audio_dir).await?);

    // 合成客户端
    let synthesis = Arc::new(ZaloTtsClient::new(ZaloTtsClientConfig {
        endpoint: config.tts.endpoint.clone(),
        api_key: config.tts.api_key.clone(),
        speaker_id: config.tts.speaker_id.clone(),
        speed: config.tts.speed.clone(),
        timeout_secs: config.tts.timeout_secs,
    })?);

    // 下载器（CDN 传播延迟重试）
    let fetcher = Arc::new(HttpAudioFetcher::new(HttpAudioFetcherConfig {
        retry: config.fetch.retry_policy(),
    })?);

    // ffmpeg 转码器
    let transcoder = Arc::new(FfmpegTranscoder::new(FfmpegTranscoderConfig {
        ffmpeg_bin: config.audio.ffmpeg_bin.clone(),
        sample_rate: config.audio.sample_rate,
        channels: config.audio.channels,
        bitrate: config.audio.bitrate.clone(),
    }));

    // 流水线
    let pipeline = Arc::new(SynthesisPipeline::new(
        PipelineConfig {
            max_segment_chars: config.pipeline.max_segment_chars,
            max_parallel: config.pipeline.max_parallel,
        },
        synthesis,
        fetcher,
        transcoder,
        store,
    ));

    // HTTP 服务器
    let mut settings = ServerSettings::new(&config.server.host, config.server.port);
    if config.server.serve_files {
        settings = settings.with_serve_dir(config.storage.audio_dir.clone());
    }

    let state = AppState::new(pipeline, config.server.public_prefix());
    let server = HttpServer::new(settings, state);

    // 启动（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
