//! Shared domain types.

mod capability;
mod language;

pub use capability::Capability;
pub use language::Language;
