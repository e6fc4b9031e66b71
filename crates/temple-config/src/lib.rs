//! Configuration descriptor for the Temple contract workspace.
//!
//! The descriptor is a TOML file declaring the compiler version, where compiled
//! artifacts live, the named networks contracts can be deployed to, the block
//! explorer key, and an optional deployment plan. It is loaded once at process
//! start and is immutable afterwards.
//!
//! ## Placeholders
//!
//! String values may reference `${NAME}` or `${NAME:-default}`. A placeholder
//! resolves from the secrets file first, then from the environment, then from
//! its default. Anything else is a load error.

pub mod networks;
pub mod secrets;

pub use networks::{
	AccountsConfig, HdAccounts, NetworkProfile, DEV_MNEMONIC, HARDHAT_CHAIN_ID, HARDHAT_NETWORK,
	LOCAL_RPC_URL,
};
pub use secrets::{SecretString, Secrets};

use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while loading or validating the descriptor.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing the configuration or secrets file.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
	/// A network was requested that the descriptor does not declare.
	#[error("Network '{0}' is not configured")]
	UnknownNetwork(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Solidity compiler version the artifacts were built with.
	pub solidity: String,
	/// Output locations of the build.
	#[serde(default)]
	pub paths: PathsConfig,
	/// Network used when none is selected on the command line.
	#[serde(default = "default_network")]
	pub default_network: String,
	/// Secrets file, relative to the configuration file.
	#[serde(default = "default_secrets_file")]
	pub secrets: String,
	/// Named network profiles.
	#[serde(default)]
	pub networks: BTreeMap<String, NetworkProfile>,
	/// Block explorer settings.
	#[serde(default)]
	pub etherscan: Option<EtherscanConfig>,
	/// Contracts deployed by the `deploy` command when none are named.
	#[serde(default)]
	pub deploy: Vec<DeploymentSpec>,
	/// Directory the configuration was loaded from.
	#[serde(skip)]
	base_dir: PathBuf,
}

/// Build output locations.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
	#[serde(default = "default_artifacts_dir")]
	pub artifacts: PathBuf,
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			artifacts: default_artifacts_dir(),
		}
	}
}

/// Block explorer verification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EtherscanConfig {
	pub api_key: SecretString,
}

/// One entry of the deployment plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeploymentSpec {
	/// Contract name, either `GOLD` or fully qualified as `contracts/Gold.sol:GOLD`.
	pub contract: String,
	/// Constructor arguments, coerced against the contract ABI.
	#[serde(default)]
	pub args: Vec<String>,
}

impl DeploymentSpec {
	pub fn new(contract: impl Into<String>) -> Self {
		Self {
			contract: contract.into(),
			args: Vec::new(),
		}
	}

	pub fn with_args(mut self, args: Vec<String>) -> Self {
		self.args = args;
		self
	}
}

fn default_network() -> String {
	HARDHAT_NETWORK.to_string()
}

fn default_secrets_file() -> String {
	"secrets.json".to_string()
}

fn default_artifacts_dir() -> PathBuf {
	PathBuf::from("./artifacts")
}

/// Resolves `${NAME}` placeholders against the secrets, then the environment,
/// then the inline default. Placeholders inside TOML comments are left alone.
///
/// Input strings are limited to 1MB to keep the regex scan bounded.
pub(crate) fn resolve_placeholders(input: &str, secrets: &Secrets) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let line_start = input[..full_match.start()].rfind('\n').map_or(0, |i| i + 1);
		if in_comment(&input[line_start..full_match.start()]) {
			continue;
		}
		let name = name.as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = if let Some(secret) = secrets.get(name) {
			secret.expose_secret().to_string()
		} else if let Ok(v) = std::env::var(name) {
			v
		} else if let Some(default) = default_value {
			default.to_string()
		} else {
			return Err(ConfigError::Validation(format!(
				"'{name}' not found in secrets or environment"
			)));
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply in reverse so earlier offsets stay valid
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

/// Whether a line prefix has already opened a `#` comment outside any string.
fn in_comment(line_prefix: &str) -> bool {
	let mut quote = None;
	let mut escaped = false;
	for c in line_prefix.chars() {
		match (quote, c) {
			(Some('"'), '\\') if !escaped => {
				escaped = true;
				continue;
			},
			(Some(q), c) if c == q && !escaped => quote = None,
			(None, '"' | '\'') => quote = Some(c),
			(None, '#') => return true,
			_ => {},
		}
		escaped = false;
	}
	false
}

impl Config {
	/// Loads the descriptor from `path`.
	///
	/// A `.env` file in the working directory is loaded first. The secrets file
	/// named by the descriptor is read relative to the descriptor's directory
	/// before placeholders are resolved.
	pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();

		if !tokio::fs::try_exists(path).await? {
			return Err(ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("configuration file not found: {}", path.display()),
			)));
		}

		let raw = tokio::fs::read_to_string(path).await?;
		let base_dir = path
			.parent()
			.filter(|p| !p.as_os_str().is_empty())
			.unwrap_or_else(|| Path::new("."))
			.to_path_buf();

		// The secrets location must be known before placeholders can be resolved
		let secrets_file = Self::secrets_file_of(&raw)?;
		let secrets = Secrets::load(&base_dir.join(secrets_file)).await?;

		let mut config = Self::parse_with_secrets(&raw, &secrets)?;
		config.base_dir = base_dir;

		tracing::debug!(
			path = %path.display(),
			networks = config.networks.len(),
			default_network = %config.default_network,
			"Loaded configuration"
		);
		Ok(config)
	}

	/// Parses and validates descriptor text using the given secrets.
	pub fn parse_with_secrets(raw: &str, secrets: &Secrets) -> Result<Self, ConfigError> {
		let resolved = resolve_placeholders(raw, secrets)?;
		let mut config: Config = toml::from_str(&resolved)?;
		config.base_dir = PathBuf::from(".");
		config.validate()?;
		Ok(config)
	}

	fn secrets_file_of(raw: &str) -> Result<String, ConfigError> {
		// Unquoted placeholders make the raw text invalid TOML; the full parse
		// after resolution reports the real error
		let Ok(table) = raw.parse::<toml::Table>() else {
			return Ok(default_secrets_file());
		};
		match table.get("secrets") {
			Some(toml::Value::String(s)) => Ok(s.clone()),
			Some(_) => Err(ConfigError::Parse("'secrets' must be a string".into())),
			None => Ok(default_secrets_file()),
		}
	}

	/// Returns the profile for `name` with the development defaults applied.
	///
	/// `hardhat` is always available even when the descriptor omits it.
	pub fn network(&self, name: &str) -> Result<NetworkProfile, ConfigError> {
		match self.networks.get(name) {
			Some(profile) => Ok(profile.clone().with_defaults(name)),
			None if name == HARDHAT_NETWORK => {
				Ok(NetworkProfile::default().with_defaults(HARDHAT_NETWORK))
			},
			None => Err(ConfigError::UnknownNetwork(name.to_string())),
		}
	}

	/// Names of all declared networks, including the implicit `hardhat`.
	pub fn network_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.networks.keys().cloned().collect();
		if !self.networks.contains_key(HARDHAT_NETWORK) {
			names.insert(0, HARDHAT_NETWORK.to_string());
		}
		names
	}

	/// Artifacts directory resolved against the configuration's location.
	pub fn artifacts_dir(&self) -> PathBuf {
		if self.paths.artifacts.is_absolute() {
			self.paths.artifacts.clone()
		} else {
			self.base_dir.join(&self.paths.artifacts)
		}
	}

	/// Explorer key for `network`, preferring the network's own key.
	pub fn explorer_api_key(&self, network: &str) -> Option<&SecretString> {
		self.networks
			.get(network)
			.and_then(|n| n.api_key.as_ref())
			.or_else(|| self.etherscan.as_ref().map(|e| &e.api_key))
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let version = Regex::new(r"^\d+\.\d+\.\d+$")
			.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;
		if !version.is_match(&self.solidity) {
			return Err(ConfigError::Validation(format!(
				"Invalid solidity version '{}', expected MAJOR.MINOR.PATCH",
				self.solidity
			)));
		}

		if self.default_network != HARDHAT_NETWORK
			&& !self.networks.contains_key(&self.default_network)
		{
			return Err(ConfigError::Validation(format!(
				"Default network '{}' is not configured",
				self.default_network
			)));
		}

		for (name, profile) in &self.networks {
			profile.validate(name)?;
		}

		if let Some(etherscan) = &self.etherscan {
			if etherscan.api_key.is_empty() {
				return Err(ConfigError::Validation(
					"etherscan.api_key cannot be empty".into(),
				));
			}
		}

		for (i, spec) in self.deploy.iter().enumerate() {
			if spec.contract.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"deploy[{i}] has an empty contract name"
				)));
			}
		}

		Ok(())
	}
}

/// Parses descriptor text with environment-only placeholder resolution.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse_with_secrets(s, &Secrets::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	const SAMPLE: &str = r#"
solidity = "0.8.0"

[paths]
artifacts = "./src/artifacts"

[networks.hardhat]

[networks.bsc_testnet]
url = "https://data-seed-prebsc-1-s1.binance.org:8545"
chain_id = 97
gas_price = 20000000000
accounts = ["0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"]

[etherscan]
api_key = "EXPLORERKEY"

[[deploy]]
contract = "GOLD"

[[deploy]]
contract = "Pool"
args = ["0x585F4fbED2a215a168C42Ec63d54602be3b9D092", "0xE402651B30e0Dd156b818F0eD03706E95EA019AA"]
"#;

	#[test]
	fn test_parse_sample() {
		let config: Config = SAMPLE.parse().unwrap();
		assert_eq!(config.solidity, "0.8.0");
		assert_eq!(config.default_network, HARDHAT_NETWORK);
		assert_eq!(config.networks.len(), 2);
		assert_eq!(config.deploy.len(), 2);
		assert_eq!(config.deploy[0], DeploymentSpec::new("GOLD"));
		assert_eq!(config.deploy[1].args.len(), 2);

		let bsc = config.network("bsc_testnet").unwrap();
		assert_eq!(bsc.chain_id, Some(97));
		assert_eq!(bsc.gas_price, Some(20_000_000_000));
		assert_eq!(bsc.accounts.len(), 1);
	}

	#[test]
	fn test_implicit_hardhat_network() {
		let config: Config = "solidity = \"0.8.0\"".parse().unwrap();
		let profile = config.network(HARDHAT_NETWORK).unwrap();
		assert_eq!(profile.url.as_deref(), Some(LOCAL_RPC_URL));
		assert_eq!(config.network_names(), vec![HARDHAT_NETWORK.to_string()]);
	}

	#[test]
	fn test_unknown_network() {
		let config: Config = SAMPLE.parse().unwrap();
		assert!(matches!(
			config.network("tron"),
			Err(ConfigError::UnknownNetwork(name)) if name == "tron"
		));
	}

	#[test]
	fn test_unknown_default_network_rejected() {
		let err = "solidity = \"0.8.0\"\ndefault_network = \"mumbai\""
			.parse::<Config>()
			.unwrap_err();
		assert!(err.to_string().contains("mumbai"));
	}

	#[test]
	fn test_invalid_solidity_version_rejected() {
		assert!("solidity = \"latest\"".parse::<Config>().is_err());
	}

	#[test]
	fn test_explorer_key_precedence() {
		let config: Config = r#"
solidity = "0.8.0"
[networks.rinkeby]
url = "https://rinkeby.example"
api_key = "NETWORKKEY"
[networks.mumbai]
url = "https://mumbai.example"
[etherscan]
api_key = "GLOBALKEY"
"#
		.parse()
		.unwrap();

		assert_eq!(
			config.explorer_api_key("rinkeby").unwrap().expose_secret(),
			"NETWORKKEY"
		);
		assert_eq!(
			config.explorer_api_key("mumbai").unwrap().expose_secret(),
			"GLOBALKEY"
		);
	}

	#[test]
	fn test_placeholder_prefers_secrets() {
		std::env::set_var("TEMPLE_TEST_SHADOWED", "from-env");
		let secrets = Secrets::from_json(r#"{"TEMPLE_TEST_SHADOWED": "from-secrets"}"#).unwrap();

		let resolved = resolve_placeholders("v = \"${TEMPLE_TEST_SHADOWED}\"", &secrets).unwrap();
		assert_eq!(resolved, "v = \"from-secrets\"");

		let resolved =
			resolve_placeholders("v = \"${TEMPLE_TEST_SHADOWED}\"", &Secrets::default()).unwrap();
		assert_eq!(resolved, "v = \"from-env\"");

		std::env::remove_var("TEMPLE_TEST_SHADOWED");
	}

	#[test]
	fn test_placeholder_default_and_missing() {
		let secrets = Secrets::default();
		let resolved =
			resolve_placeholders("v = \"${TEMPLE_TEST_MISSING:-fallback}\"", &secrets).unwrap();
		assert_eq!(resolved, "v = \"fallback\"");

		let err = resolve_placeholders("v = \"${TEMPLE_TEST_MISSING}\"", &secrets).unwrap_err();
		assert!(err.to_string().contains("TEMPLE_TEST_MISSING"));
	}

	#[test]
	fn test_placeholder_in_comment_ignored() {
		let input = "# accounts = [\"${TEMPLE_TEST_UNSET_KEY}\"]\n\
			url = \"http://x/#${TEMPLE_TEST_MISSING:-frag}\" # ${TEMPLE_TEST_UNSET_KEY}\n";
		let resolved = resolve_placeholders(input, &Secrets::default()).unwrap();
		assert_eq!(
			resolved,
			"# accounts = [\"${TEMPLE_TEST_UNSET_KEY}\"]\n\
			url = \"http://x/#frag\" # ${TEMPLE_TEST_UNSET_KEY}\n"
		);

		let config = Config::from_str(
			r#"
solidity = "0.8.0"

[networks.mumbai]
url = "https://rpc-mumbai.maticvigil.com"
# accounts = ["${TEMPLE_TEST_UNSET_KEY}"]
"#,
		)
		.unwrap();
		assert!(config.network("mumbai").is_ok());
	}

	#[tokio::test]
	async fn test_from_file_with_secrets() {
		let dir = TempDir::new().unwrap();
		std::fs::write(
			dir.path().join("secrets.json"),
			r#"{"mnemonic": "test test test test test test test test test test test junk"}"#,
		)
		.unwrap();
		std::fs::write(
			dir.path().join("temple.toml"),
			r#"
solidity = "0.8.0"
default_network = "mumbai"

[paths]
artifacts = "build/artifacts"

[networks.mumbai]
url = "https://rpc-mumbai.maticvigil.com"
accounts = ["${mnemonic}"]
"#,
		)
		.unwrap();

		let config = Config::from_file(&dir.path().join("temple.toml"))
			.await
			.unwrap();
		let mumbai = config.network("mumbai").unwrap();
		match &mumbai.accounts {
			AccountsConfig::List(list) => {
				assert_eq!(list[0].expose_secret(), DEV_MNEMONIC);
			},
			other => panic!("expected account list, got {other:?}"),
		}
		assert_eq!(config.artifacts_dir(), dir.path().join("build/artifacts"));
	}

	#[test]
	fn test_workspace_descriptor_loads() {
		let raw = include_str!("../../../temple.toml");
		let secrets = Secrets::from_json(&format!(r#"{{"mnemonic": "{DEV_MNEMONIC}"}}"#)).unwrap();
		let config = Config::parse_with_secrets(raw, &secrets).unwrap();

		assert_eq!(config.solidity, "0.8.0");
		assert_eq!(config.deploy, vec![DeploymentSpec::new("GOLD")]);
		let bsc = config.network("bsc_mainnet").unwrap();
		assert_eq!(bsc.chain_id, Some(56));
		assert_eq!(bsc.gas_price, Some(20_000_000_000));
		assert!(config.explorer_api_key("rinkeby").is_some());
	}

	#[tokio::test]
	async fn test_from_file_missing() {
		let dir = TempDir::new().unwrap();
		let result = Config::from_file(&dir.path().join("absent.toml")).await;
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
