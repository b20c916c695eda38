#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations
pub const TRACING_TARGET_CLIENT: &str = "notra_openai::client";

mod api;
mod client;
mod config;

pub use crate::client::OpenAiClient;
pub use crate::config::OpenAiConfig;
