//! Domain Layer - 领域层
//!
//! 纯文本处理，无 I/O:
//! - 内容指纹（缓存/存储 key）
//! - 文本清洗（去标记、句点补空格）
//! - 分段算法（按词边界切块）

pub mod fingerprint;
pub mod normalizer;
pub mod splitter;

pub use fingerprint::fingerprint;
pub use normalizer::normalize;
pub use splitter::{split, Segment};
