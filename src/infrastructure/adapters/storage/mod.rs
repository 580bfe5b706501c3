//! 文件存储适配器

mod file_store;

pub use file_store::FileArtifactStore;
