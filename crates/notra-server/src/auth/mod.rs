//! API key authentication for the gRPC surface.
//!
//! Callers present their key in the `api-key` metadata entry. The
//! [`Authenticator`] checks it against the configured allow-list and,
//! as a tonic interceptor, rejects unauthenticated calls before any
//! handler runs. Accepted requests carry an [`AuthContext`] in their
//! extensions.

use std::collections::HashSet;
use std::sync::Arc;

use notra_core::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tonic::metadata::MetadataMap;
use tonic::service::Interceptor;
use tonic::{Request, Status};

#[cfg(feature = "config")]
use clap::Args;

use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Metadata key carrying the caller's API key.
pub const API_KEY_METADATA: &str = "api-key";

/// Configuration for API key authentication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AuthConfig {
    /// Accepted API keys.
    #[cfg_attr(
        feature = "config",
        arg(long = "api-key", env = "GRPC_API_KEYS", value_delimiter = ',')
    )]
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Whether the plain health endpoint also requires a key.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "health-requires-auth",
            env = "HEALTH_REQUIRES_AUTH",
            default_value = "false"
        )
    )]
    #[serde(default)]
    pub health_requires_auth: bool,
}

impl AuthConfig {
    /// Validates that at least one usable key is configured.
    pub fn validate(&self) -> Result<()> {
        if !self.api_keys.iter().any(|key| !key.is_empty()) {
            return Err(Error::configuration()
                .with_message("at least one API key must be configured (GRPC_API_KEYS)"));
        }
        Ok(())
    }
}

/// Authentication decision attached to each accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// A configured key matched; `caller` is a loggable key fingerprint.
    Authenticated { caller: String },
    /// No configured key matched.
    Rejected,
}

impl AuthContext {
    /// Whether the request presented a valid key.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Fingerprint of the matched key, if any.
    pub fn caller(&self) -> Option<&str> {
        match self {
            Self::Authenticated { caller } => Some(caller),
            Self::Rejected => None,
        }
    }
}

/// Validates API keys presented in request metadata.
#[derive(Debug, Clone)]
pub struct Authenticator {
    keys: Arc<HashSet<String>>,
}

impl Authenticator {
    /// Creates an authenticator from an allow-list; blank keys are dropped.
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        let keys: HashSet<String> = keys.into_iter().filter(|key| !key.is_empty()).collect();
        Self {
            keys: Arc::new(keys),
        }
    }

    /// Creates an authenticator from the auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.api_keys.iter().cloned())
    }

    /// Number of accepted keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Checks every value under the `api-key` entry; any match wins.
    pub fn authenticate(&self, metadata: &MetadataMap) -> AuthContext {
        for value in metadata.get_all(API_KEY_METADATA).iter() {
            if let Ok(key) = value.to_str()
                && self.keys.contains(key)
            {
                return AuthContext::Authenticated {
                    caller: fingerprint(key),
                };
            }
        }
        AuthContext::Rejected
    }

    /// Authenticates and converts a rejection into a gRPC status.
    ///
    /// The status message is the same for missing, malformed, and
    /// unknown keys.
    pub fn require(&self, metadata: &MetadataMap) -> std::result::Result<AuthContext, Status> {
        let context = self.authenticate(metadata);
        if !context.is_authenticated() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                "rejected request with missing or invalid API key"
            );
            return Err(Status::unauthenticated("Invalid API key"));
        }
        Ok(context)
    }
}

/// Short stable digest of a key, safe to log.
fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(&digest[..4])
}

impl Interceptor for Authenticator {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        let context = self.require(request.metadata())?;
        request.extensions_mut().insert(context);
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use tonic::metadata::MetadataValue;

    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(["secret-one".to_owned(), "secret-two".to_owned()])
    }

    #[test]
    fn test_valid_key_is_accepted() {
        let mut metadata = MetadataMap::new();
        metadata.insert(API_KEY_METADATA, MetadataValue::from_static("secret-one"));

        let context = authenticator().authenticate(&metadata);
        assert!(context.is_authenticated());
        assert!(context.caller().is_some());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut metadata = MetadataMap::new();
        metadata.insert(API_KEY_METADATA, MetadataValue::from_static("wrong"));

        assert_eq!(authenticator().authenticate(&metadata), AuthContext::Rejected);
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let metadata = MetadataMap::new();
        assert_eq!(authenticator().authenticate(&metadata), AuthContext::Rejected);
    }

    #[test]
    fn test_any_matching_value_wins() {
        let mut metadata = MetadataMap::new();
        metadata.insert(API_KEY_METADATA, MetadataValue::from_static("wrong"));
        metadata.append(API_KEY_METADATA, MetadataValue::from_static("secret-two"));

        assert!(authenticator().authenticate(&metadata).is_authenticated());
    }

    #[test]
    fn test_blank_keys_are_never_accepted() {
        let authenticator = Authenticator::new([String::new()]);
        assert_eq!(authenticator.key_count(), 0);

        let mut metadata = MetadataMap::new();
        metadata.insert(API_KEY_METADATA, MetadataValue::from_static(""));
        assert_eq!(authenticator.authenticate(&metadata), AuthContext::Rejected);
    }

    #[test]
    fn test_rejection_message_is_uniform() {
        let authenticator = authenticator();

        let missing = authenticator.require(&MetadataMap::new()).unwrap_err();
        let mut metadata = MetadataMap::new();
        metadata.insert(API_KEY_METADATA, MetadataValue::from_static("wrong"));
        let unknown = authenticator.require(&metadata).unwrap_err();

        assert_eq!(missing.code(), tonic::Code::Unauthenticated);
        assert_eq!(missing.message(), "Invalid API key");
        assert_eq!(unknown.message(), missing.message());
    }

    #[test]
    fn test_interceptor_attaches_context() {
        let mut interceptor = authenticator();

        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert(API_KEY_METADATA, MetadataValue::from_static("secret-one"));

        let accepted = interceptor.call(request).unwrap();
        let context = accepted.extensions().get::<AuthContext>().unwrap();
        assert!(context.is_authenticated());
    }

    #[test]
    fn test_interceptor_rejects_before_handler() {
        let mut interceptor = authenticator();

        let status = interceptor.call(Request::new(())).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_config_requires_a_key() {
        let config = AuthConfig::default();
        assert!(config.validate().is_err());

        let config = AuthConfig {
            api_keys: vec!["secret".to_owned()],
            ..AuthConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        assert_eq!(fingerprint("secret"), fingerprint("secret"));
        assert_eq!(fingerprint("secret").len(), 8);
        assert_ne!(fingerprint("secret"), fingerprint("other"));
    }
}
