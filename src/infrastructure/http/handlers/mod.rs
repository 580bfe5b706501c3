//! HTTP Handlers

mod ping;
mod synthesize;

pub use ping::ping;
pub use synthesize::{synthesize_embed, synthesize_json, synthesize_raw};
