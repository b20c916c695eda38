#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod auth;
pub mod proto;
pub mod service;
pub mod utility;

pub use auth::{API_KEY_METADATA, AuthConfig, AuthContext, Authenticator};
pub use service::{HealthGateway, NoteGateway};
