//! TTS 合成客户端适配器

mod fake_client;
mod zalo_client;

pub use fake_client::{FakeSynthesisClient, FakeSynthesisClientConfig};
pub use zalo_client::{ZaloTtsClient, ZaloTtsClientConfig};
