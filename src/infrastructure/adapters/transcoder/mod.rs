//! 音频转码适配器

mod ffmpeg;

pub use ffmpeg::{FfmpegTranscoder, FfmpegTranscoderConfig};
