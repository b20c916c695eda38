#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations
pub const TRACING_TARGET_CLIENT: &str = "notra_anthropic::client";

mod api;
mod client;
mod config;

pub use crate::client::AnthropicClient;
pub use crate::config::AnthropicConfig;
