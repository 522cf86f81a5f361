//! QueryForge — query correction and synonym-mining core for a
//! Russian-language full-text news search index.
//!
//! Core library providing text normalization, a composite spell-correction
//! pipeline, a confidence-gated synonym graph, and an offline co-occurrence
//! miner that builds that graph from a news corpus.

pub mod config;
pub mod error;
pub mod mining;
pub mod spelling;
pub mod synonyms;
pub mod text;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
