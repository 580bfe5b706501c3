//! Application Ports - 出站端口定义
//!
//! 定义流水线与基础设施层之间的抽象接口

mod artifact_store;
mod fetcher;
mod synthesis;
mod transcoder;

pub use artifact_store::{ArtifactStorePort, StoreError};
pub use fetcher::{AudioFetcherPort, FetchError};
pub use synthesis::{SpeechSynthesisPort, SynthesisError};
pub use transcoder::{AudioTranscoderPort, TranscodeError};
