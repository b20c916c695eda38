#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations
pub const TRACING_TARGET_CLIENT: &str = "notra_gemini::client";

mod api;
mod client;
mod config;

pub use crate::client::GeminiClient;
pub use crate::config::GeminiConfig;
