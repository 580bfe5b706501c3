//! Application Layer - 应用层
//!
//! - Ports: 出站端口（合成、下载、转码、存储）
//! - Retry: 有界重试策略
//! - Pipeline: 分段合成-拼装流水线（核心）

pub mod error;
pub mod pipeline;
pub mod ports;
pub mod retry;

pub use error::PipelineError;
pub use pipeline::{Artifact, PipelineConfig, SynthesisPipeline};
pub use retry::{Delay, RetryPolicy, TokioDelay};
