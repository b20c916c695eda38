#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Notra Core
//!
//! Foundational types for the Notra gateway: the shared error taxonomy and
//! the domain enums used by the provider adapters, the batch orchestrator,
//! and the gRPC surface. No concrete provider or transport code lives here.

pub mod error;
pub mod types;

// Re-export key types for convenience
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use types::{Capability, Language};
