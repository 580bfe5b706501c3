//! Voxcast - 分段 TTS 合成-拼装服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 内容指纹、文本清洗、分段算法（纯函数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（合成、下载、转码、存储）
//! - Retry: 有界重试策略（CDN 传播延迟应对）
//! - Pipeline: 分段合成-拼装流水线
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（/raw /embed /json）+ 成品文件托管
//! - Adapters: Zalo TTS 客户端、HTTP 下载器、ffmpeg 转码器、文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
