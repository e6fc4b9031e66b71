//! Deployment tooling for the Temple contracts
//!
//! Deploys compiled contracts to a configured EVM network, prints one line per
//! deployed address, and runs a smoke test that a freshly deployed token
//! reports a zero balance.
//!
//! A run loads the descriptor into a [`Context`], connects a
//! [`core::Provider`] for the selected network, and drives the operations in
//! [`operations`] strictly in sequence.

pub mod cli;
pub mod constants;
pub mod core;
pub mod operations;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use types::{Error, ErrorKind, Result};

use crate::core::{ArtifactStore, Provider};
use crate::operations::Deployer;
use std::path::Path;
use std::sync::Arc;
use temple_config::{Config, NetworkProfile};
use tracing::info;

/// Everything a command needs: the descriptor and the selected network.
#[derive(Debug, Clone)]
pub struct Context {
	pub config: Config,
	pub network: String,
	pub profile: NetworkProfile,
}

impl Context {
	/// Loads the descriptor and selects a network.
	///
	/// # Arguments
	/// * `config_path` - Descriptor file
	/// * `network` - Profile name; the descriptor's default when `None`
	///
	/// # Errors
	/// Returns a configuration error if the file cannot be loaded or the
	/// network is not declared
	pub async fn load(config_path: &Path, network: Option<String>) -> Result<Self> {
		let config = Config::from_file(config_path).await?;
		Self::new(config, network)
	}

	/// Selects a network from an already loaded descriptor.
	pub fn new(config: Config, network: Option<String>) -> Result<Self> {
		let network = network.unwrap_or_else(|| config.default_network.clone());
		let profile = config.network(&network)?;
		info!(network = %network, "Selected network");
		Ok(Self {
			config,
			network,
			profile,
		})
	}

	/// Connects to the selected network.
	pub async fn provider(&self) -> Result<Provider> {
		Provider::connect(&self.network, &self.profile).await
	}

	pub fn artifacts(&self) -> ArtifactStore {
		ArtifactStore::new(self.config.artifacts_dir())
	}

	/// A deployer bound to the selected network and the build artifacts.
	pub async fn deployer(&self) -> Result<Deployer> {
		let provider = self.provider().await?;
		Ok(Deployer::new(Arc::new(provider), self.artifacts()))
	}
}
