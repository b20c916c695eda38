#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod batch;
pub mod inference;

pub use batch::{
    BatchConfig, BatchOrchestrator, FailurePolicy, NoteBatch, NoteOutcome, NoteRequest,
    ProviderResult,
};
pub use inference::{
    AudioRequest, AudioResponse, ImageRequest, ImageResponse, ImageSource, InferenceProvider,
    InferenceService, TextRequest, TextResponse, Timing,
};
#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use inference::{MockConfig, MockProvider};
pub use notra_core::{BoxedError, Capability, Error, ErrorKind, Language, Result};
