//! Secret management module for handling sensitive data securely.
//!
//! This module provides types and utilities for managing secrets in a secure manner,
//! with automatic memory zeroization and support for multiple secret sources.
//!
//! # Features
//!
//! - Secure memory handling with automatic zeroization
//! - Multiple secret sources (plain text, environment variables)
//! - Type-safe secret resolution
//! - Serde support for configuration files

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
	impl_case_insensitive_enum,
	models::security::{error::SecurityResult, get_env_var},
};

/// A type that represents a secret value that can be sourced from different places
/// and ensures proper zeroization of sensitive data.
///
/// This enum provides different ways to store and retrieve secrets:
/// - `Plain`: Direct secret value (wrapped in `SecretString` for secure memory handling)
/// - `Environment`: Environment variable reference
///
/// All variants implement `ZeroizeOnDrop` to ensure secure memory cleanup.
#[derive(Debug, Clone, Serialize, ZeroizeOnDrop)]
#[serde(tag = "type", content = "value")]
#[serde(deny_unknown_fields)]
pub enum SecretValue {
	/// A plain text secret value
	Plain(SecretString),
	/// A secret stored in an environment variable
	Environment(String),
}

impl_case_insensitive_enum!(SecretValue, {
	"plain" => Plain,
	"environment" => Environment,
});

impl PartialEq for SecretValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Plain(l0), Self::Plain(r0)) => l0.as_str() == r0.as_str(),
			(Self::Environment(l0), Self::Environment(r0)) => l0 == r0,
			_ => false,
		}
	}
}

/// A string type that automatically zeroizes its contents when dropped.
///
/// This type ensures that sensitive data like API keys and signing secrets are
/// securely erased from memory as soon as they're no longer needed. It implements
/// both `Zeroize` and `ZeroizeOnDrop` to guarantee secure memory cleanup.
///
/// # Security
///
/// The underlying string is automatically zeroized when:
/// - The value is dropped
/// - `zeroize()` is called explicitly
/// - The value is moved
#[derive(Debug, Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl SecretValue {
	/// Resolves the secret value based on its type.
	///
	/// This method retrieves the actual secret value from its source:
	/// - For `Plain`, returns the wrapped `SecretString`
	/// - For `Environment`, reads the environment variable
	///
	/// # Errors
	///
	/// Returns a `SecurityError` if the environment variable is not set.
	pub async fn resolve(&self) -> SecurityResult<SecretString> {
		match self {
			SecretValue::Plain(secret) => Ok(secret.clone()),
			SecretValue::Environment(env_var) => get_env_var(env_var).map(SecretString::new),
		}
	}

	/// Checks if the secret value starts with a given prefix
	pub fn starts_with(&self, prefix: &str) -> bool {
		match self {
			SecretValue::Plain(secret) => secret.as_str().starts_with(prefix),
			SecretValue::Environment(env_var) => env_var.starts_with(prefix),
		}
	}

	/// Checks if the secret value is empty
	pub fn is_empty(&self) -> bool {
		match self {
			SecretValue::Plain(secret) => secret.as_str().is_empty(),
			SecretValue::Environment(env_var) => env_var.is_empty(),
		}
	}

	/// Trims the secret value
	pub fn trim(&self) -> &str {
		match self {
			SecretValue::Plain(secret) => secret.as_str().trim(),
			SecretValue::Environment(env_var) => env_var.trim(),
		}
	}

	/// Returns the secret value as a string
	pub fn as_str(&self) -> &str {
		match self {
			SecretValue::Plain(secret) => secret.as_str(),
			SecretValue::Environment(env_var) => env_var,
		}
	}
}

impl Zeroize for SecretValue {
	/// Securely zeroizes the secret value.
	///
	/// - For `Plain`, zeroizes the underlying `SecretString`
	/// - For `Environment`, clears the environment variable name
	fn zeroize(&mut self) {
		match self {
			SecretValue::Plain(secret) => secret.zeroize(),
			SecretValue::Environment(env_var) => {
				// Clear the environment variable name
				env_var.clear();
			}
		}
	}
}

impl SecretString {
	/// Creates a new `SecretString` with the given value.
	///
	/// The value will be automatically zeroized when the `SecretString` is dropped.
	pub fn new(value: String) -> Self {
		Self(value)
	}

	/// Gets a reference to the underlying string.
	///
	/// # Security Note
	///
	/// Be careful with this method as it exposes the secret value.
	/// The reference should be used immediately and not stored.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl AsRef<str> for SecretString {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}

impl fmt::Display for SecretValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SecretValue::Plain(secret) => write!(f, "{}", secret.as_str()),
			SecretValue::Environment(env_var) => write!(f, "{}", env_var),
		}
	}
}

impl AsRef<str> for SecretValue {
	fn as_ref(&self) -> &str {
		match self {
			SecretValue::Plain(secret) => secret.as_ref(),
			SecretValue::Environment(env_var) => env_var,
		}
	}
}
