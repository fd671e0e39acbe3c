//! Security models
//!
//! Secret handling for the configuration layer. Indexer endpoints, store
//! URLs and webhook signing secrets are all loaded through these types.
//!
//! - `error`: Error types for security operations
//! - `secret`: Secret management and zeroization

mod error;
mod secret;

use std::env;

pub use error::{SecurityError, SecurityResult};
pub use secret::{SecretString, SecretValue};

/// Read an environment variable referenced by a configuration secret
pub fn get_env_var(key: &str) -> SecurityResult<String> {
	env::var(key).map_err(|e| {
		Box::new(SecurityError::parse_error(
			format!("Missing {} environment variable", key),
			Some(e.into()),
			None,
		))
	})
}
