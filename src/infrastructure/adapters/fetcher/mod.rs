//! 瞬态 URL 下载适配器

mod http_fetcher;

pub use http_fetcher::{HttpAudioFetcher, HttpAudioFetcherConfig};
