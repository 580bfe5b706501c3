//! Infrastructure Layer - 基础设施层
//!
//! - HTTP: axum 入站接口
//! - Adapters: 合成客户端、下载器、转码器、文件存储

pub mod adapters;
pub mod http;
