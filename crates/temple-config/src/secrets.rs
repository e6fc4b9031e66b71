//! Secret values and the secrets file.
//!
//! Signing material (private keys, mnemonic phrases, explorer keys) is kept in
//! a separate JSON file next to the configuration so it can stay out of version
//! control. Values are wrapped in [`SecretString`] so they never show up in
//! `Debug` output or logs.

use crate::ConfigError;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A string that must not be printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
	/// Returns the wrapped value. Call sites should pass it straight to the
	/// consumer (signer, HTTP client) and never log it.
	pub fn expose_secret(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretString([REDACTED])")
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer).map(Self)
	}
}

/// Named secrets loaded from a JSON object such as `{"mnemonic": "..."}`.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
	values: HashMap<String, SecretString>,
}

impl Secrets {
	/// Loads secrets from `path`. A missing file yields an empty set, so a
	/// configuration that references no secrets works without one.
	pub async fn load(path: &Path) -> Result<Self, ConfigError> {
		if !tokio::fs::try_exists(path).await? {
			tracing::debug!(path = %path.display(), "No secrets file found");
			return Ok(Self::default());
		}

		let content = tokio::fs::read_to_string(path).await?;
		let secrets = Self::from_json(&content)?;
		tracing::debug!(
			path = %path.display(),
			count = secrets.values.len(),
			"Loaded secrets file"
		);
		Ok(secrets)
	}

	/// Parses secrets from JSON text. Only string values are accepted.
	pub fn from_json(content: &str) -> Result<Self, ConfigError> {
		let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)
			.map_err(|e| ConfigError::Parse(format!("Invalid secrets file: {e}")))?;

		let mut values = HashMap::with_capacity(raw.len());
		for (name, value) in raw {
			match value {
				serde_json::Value::String(s) => {
					values.insert(name, SecretString(s));
				},
				_ => {
					return Err(ConfigError::Parse(format!(
						"Secret '{name}' must be a string"
					)))
				},
			}
		}

		Ok(Self { values })
	}

	pub fn get(&self, name: &str) -> Option<&SecretString> {
		self.values.get(name)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}
