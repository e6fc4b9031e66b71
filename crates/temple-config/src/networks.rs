//! Named network profiles.
//!
//! Each profile describes one EVM network the workspace can deploy to: the
//! JSON-RPC endpoint, the accounts that sign for it, and optional chain
//! parameters. The `hardhat` profile is always available and points at a local
//! development node funded from the well-known development mnemonic.

use crate::{secrets::SecretString, ConfigError};
use serde::Deserialize;

/// Name of the built-in local development network.
pub const HARDHAT_NETWORK: &str = "hardhat";

/// Default endpoint of a local development node.
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Chain id used by local development nodes.
pub const HARDHAT_CHAIN_ID: u64 = 31337;

/// Mnemonic shared by local development nodes. Never use it on a public network.
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// BIP-44 derivation prefix for Ethereum accounts.
pub const DEFAULT_HD_PATH: &str = "m/44'/60'/0'/0";

/// A single network profile as declared under `[networks.<name>]`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkProfile {
	/// JSON-RPC endpoint. Required for every network except `hardhat`.
	#[serde(default)]
	pub url: Option<String>,
	/// Expected EIP-155 chain id. When set, the endpoint must report the same id.
	#[serde(default)]
	pub chain_id: Option<u64>,
	/// Fixed legacy gas price in wei. When absent the node's estimate is used.
	#[serde(default)]
	pub gas_price: Option<u64>,
	/// Signing accounts for this network.
	#[serde(default)]
	pub accounts: AccountsConfig,
	/// Per-network block explorer key.
	#[serde(default)]
	pub api_key: Option<SecretString>,
	/// How long to wait for a transaction receipt before giving up.
	#[serde(default = "default_confirmation_timeout_secs")]
	pub confirmation_timeout_secs: u64,
	/// Delay between receipt polls.
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
}

impl Default for NetworkProfile {
	fn default() -> Self {
		Self {
			url: None,
			chain_id: None,
			gas_price: None,
			accounts: AccountsConfig::default(),
			api_key: None,
			confirmation_timeout_secs: default_confirmation_timeout_secs(),
			poll_interval_ms: default_poll_interval_ms(),
		}
	}
}

fn default_confirmation_timeout_secs() -> u64 {
	120
}

fn default_poll_interval_ms() -> u64 {
	1000
}

fn default_hd_count() -> u32 {
	20
}

fn default_hd_path() -> String {
	DEFAULT_HD_PATH.to_string()
}

/// Signing accounts of a network.
///
/// Either a list of secrets, each a hex private key or a mnemonic phrase, or an
/// HD wallet descriptor that derives `count` consecutive accounts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountsConfig {
	List(Vec<SecretString>),
	Hd(HdAccounts),
}

impl Default for AccountsConfig {
	fn default() -> Self {
		AccountsConfig::List(Vec::new())
	}
}

impl AccountsConfig {
	pub fn is_empty(&self) -> bool {
		match self {
			AccountsConfig::List(list) => list.is_empty(),
			AccountsConfig::Hd(hd) => hd.count == 0,
		}
	}

	/// Number of signers this configuration yields.
	pub fn len(&self) -> usize {
		match self {
			AccountsConfig::List(list) => list.len(),
			AccountsConfig::Hd(hd) => hd.count as usize,
		}
	}
}

/// HD wallet descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct HdAccounts {
	pub mnemonic: SecretString,
	#[serde(default = "default_hd_path")]
	pub path: String,
	#[serde(default)]
	pub initial_index: u32,
	#[serde(default = "default_hd_count")]
	pub count: u32,
	#[serde(default)]
	pub passphrase: Option<SecretString>,
}

impl HdAccounts {
	/// The development wallet used by the `hardhat` network.
	pub fn development() -> Self {
		Self {
			mnemonic: SecretString::from(DEV_MNEMONIC),
			path: default_hd_path(),
			initial_index: 0,
			count: default_hd_count(),
			passphrase: None,
		}
	}
}

impl NetworkProfile {
	/// Fills in the implicit values of the built-in development network.
	///
	/// Profiles other than `hardhat` are returned unchanged.
	pub fn with_defaults(mut self, name: &str) -> Self {
		if name == HARDHAT_NETWORK {
			if self.url.is_none() {
				self.url = Some(LOCAL_RPC_URL.to_string());
			}
			if self.chain_id.is_none() {
				self.chain_id = Some(HARDHAT_CHAIN_ID);
			}
			if self.accounts.is_empty() {
				self.accounts = AccountsConfig::Hd(HdAccounts::development());
			}
		}
		self
	}

	/// The endpoint, which is always present after [`Self::with_defaults`] and
	/// validation.
	pub fn rpc_url(&self) -> Result<&str, ConfigError> {
		self.url
			.as_deref()
			.ok_or_else(|| ConfigError::Validation("Network has no url".into()))
	}

	pub(crate) fn validate(&self, name: &str) -> Result<(), ConfigError> {
		match &self.url {
			Some(raw) => {
				let parsed = url::Url::parse(raw).map_err(|e| {
					ConfigError::Validation(format!("Network '{name}' has an invalid url: {e}"))
				})?;
				if !matches!(parsed.scheme(), "http" | "https") {
					return Err(ConfigError::Validation(format!(
						"Network '{name}' url must use http or https, got '{}'",
						parsed.scheme()
					)));
				}
			},
			None if name != HARDHAT_NETWORK => {
				return Err(ConfigError::Validation(format!(
					"Network '{name}' must have a url"
				)));
			},
			None => {},
		}

		if self.chain_id == Some(0) {
			return Err(ConfigError::Validation(format!(
				"Network '{name}' chain_id must be greater than 0"
			)));
		}
		if self.gas_price == Some(0) {
			return Err(ConfigError::Validation(format!(
				"Network '{name}' gas_price must be greater than 0"
			)));
		}
		if self.confirmation_timeout_secs == 0 {
			return Err(ConfigError::Validation(format!(
				"Network '{name}' confirmation_timeout_secs must be greater than 0"
			)));
		}
		if self.poll_interval_ms == 0 {
			return Err(ConfigError::Validation(format!(
				"Network '{name}' poll_interval_ms must be greater than 0"
			)));
		}

		match &self.accounts {
			AccountsConfig::List(list) => {
				if list.iter().any(SecretString::is_empty) {
					return Err(ConfigError::Validation(format!(
						"Network '{name}' has an empty account entry"
					)));
				}
			},
			AccountsConfig::Hd(hd) => {
				if hd.mnemonic.is_empty() {
					return Err(ConfigError::Validation(format!(
						"Network '{name}' HD accounts need a mnemonic"
					)));
				}
				if hd.count == 0 {
					return Err(ConfigError::Validation(format!(
						"Network '{name}' HD account count must be greater than 0"
					)));
				}
				if !hd.path.starts_with("m/") {
					return Err(ConfigError::Validation(format!(
						"Network '{name}' HD path must start with 'm/'"
					)));
				}
			},
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hardhat_defaults() {
		let profile = NetworkProfile::default().with_defaults(HARDHAT_NETWORK);
		assert_eq!(profile.url.as_deref(), Some(LOCAL_RPC_URL));
		assert_eq!(profile.chain_id, Some(HARDHAT_CHAIN_ID));
		match profile.accounts {
			AccountsConfig::Hd(hd) => {
				assert_eq!(hd.mnemonic.expose_secret(), DEV_MNEMONIC);
				assert_eq!(hd.count, 20);
			},
			other => panic!("expected development wallet, got {other:?}"),
		}
	}

	#[test]
	fn test_defaults_leave_remote_networks_alone() {
		let profile = NetworkProfile::default().with_defaults("mumbai");
		assert!(profile.url.is_none());
		assert!(profile.accounts.is_empty());
	}

	#[test]
	fn test_remote_network_requires_url() {
		let err = NetworkProfile::default().validate("ropsten").unwrap_err();
		assert!(err.to_string().contains("must have a url"));
		assert!(NetworkProfile::default().validate(HARDHAT_NETWORK).is_ok());
	}

	#[test]
	fn test_rejects_non_http_url() {
		let profile = NetworkProfile {
			url: Some("ftp://example.com".into()),
			..Default::default()
		};
		assert!(profile.validate("bad").is_err());
	}

	#[test]
	fn test_rejects_zero_values() {
		let profile = NetworkProfile {
			url: Some("http://localhost:8545".into()),
			gas_price: Some(0),
			..Default::default()
		};
		assert!(profile.validate("x").unwrap_err().to_string().contains("gas_price"));

		let profile = NetworkProfile {
			url: Some("http://localhost:8545".into()),
			chain_id: Some(0),
			..Default::default()
		};
		assert!(profile.validate("x").unwrap_err().to_string().contains("chain_id"));
	}

	#[test]
	fn test_hd_accounts_from_toml() {
		let profile: NetworkProfile = toml::from_str(
			r#"
url = "http://localhost:8545"
accounts = { mnemonic = "one two three", count = 3 }
"#,
		)
		.unwrap();
		match &profile.accounts {
			AccountsConfig::Hd(hd) => {
				assert_eq!(hd.count, 3);
				assert_eq!(hd.path, DEFAULT_HD_PATH);
				assert_eq!(hd.initial_index, 0);
			},
			other => panic!("expected HD accounts, got {other:?}"),
		}
		assert_eq!(profile.accounts.len(), 3);
	}
}
