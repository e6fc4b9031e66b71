//! Contract deployment operations
//!
//! Deploys a plan of contracts one after another. Each contract is resolved
//! from the build artifacts, created with its encoded constructor arguments,
//! and awaited until its receipt is available. Its address line is written
//! only after confirmation, so a failed run never reports an address it did
//! not confirm.

use crate::{
	core::{
		artifacts::ArtifactStore, blockchain::ChainClient, factory::ContractFactory, logging,
	},
	types::{
		error::{Error, Result},
		records::DeploymentRecord,
	},
};
use std::io::Write;
use std::sync::Arc;
use temple_config::{Config, DeploymentSpec};
use tracing::{info, instrument};

/// Builds the deployment plan for a run.
///
/// Contracts named on the command line win over the configured `[[deploy]]`
/// list. Constructor arguments from the command line only apply when exactly
/// one contract is named.
///
/// # Errors
/// Returns `InvalidArguments` for arguments given with several contracts and
/// `EmptyPlan` when there is nothing to deploy
pub fn resolve_plan(
	contracts: &[String],
	args: &[String],
	config: &Config,
) -> Result<Vec<DeploymentSpec>> {
	if contracts.is_empty() {
		if !args.is_empty() {
			return Err(Error::InvalidArguments {
				contract: "<none>".into(),
				reason: "constructor arguments given without a contract".into(),
			});
		}
		if config.deploy.is_empty() {
			return Err(Error::EmptyPlan);
		}
		return Ok(config.deploy.clone());
	}

	if !args.is_empty() && contracts.len() != 1 {
		return Err(Error::InvalidArguments {
			contract: contracts.join(", "),
			reason: "constructor arguments require exactly one contract".into(),
		});
	}

	Ok(contracts
		.iter()
		.map(|name| DeploymentSpec::new(name.as_str()).with_args(args.to_vec()))
		.collect())
}

/// Deploys contracts through a [`ChainClient`].
#[derive(Clone)]
pub struct Deployer {
	client: Arc<dyn ChainClient>,
	artifacts: ArtifactStore,
}

impl Deployer {
	pub fn new(client: Arc<dyn ChainClient>, artifacts: ArtifactStore) -> Self {
		Self { client, artifacts }
	}

	pub fn client(&self) -> &Arc<dyn ChainClient> {
		&self.client
	}

	/// Resolves a factory from the build artifacts.
	///
	/// The artifacts walk runs on the blocking pool.
	pub async fn factory(&self, contract: &str) -> Result<ContractFactory> {
		let artifacts = self.artifacts.clone();
		let contract = contract.to_string();
		tokio::task::spawn_blocking(move || artifacts.resolve(&contract))
			.await
			.map_err(|e| Error::Other(e.into()))?
			.map(ContractFactory::new)
	}

	/// Deploys one contract and waits for its confirmation.
	///
	/// # Errors
	/// Returns a resolution error before anything is sent, or a network or
	/// transaction error once the creation has been submitted
	#[instrument(skip(self, spec), fields(contract = %spec.contract))]
	pub async fn deploy(&self, spec: &DeploymentSpec) -> Result<DeploymentRecord> {
		let factory = self.factory(&spec.contract).await?;
		let init_code = factory.deploy_code(&spec.args)?;

		let tx_hash = self.client.submit_creation(init_code).await?;
		logging::operation_progress("deploy", "awaiting confirmation", None);
		let confirmation = self.client.wait_for_confirmation(tx_hash).await?;

		if !confirmation.success {
			return Err(Error::TransactionReverted(tx_hash));
		}
		let address = confirmation
			.contract_address
			.ok_or(Error::MissingContractAddress(tx_hash))?;

		info!(
			address = %address,
			tx_hash = %tx_hash,
			block = ?confirmation.block_number,
			gas_used = confirmation.gas_used,
			"Contract deployed"
		);

		Ok(DeploymentRecord {
			contract: factory.name().to_string(),
			address,
			tx_hash,
			block_number: confirmation.block_number,
			gas_used: confirmation.gas_used,
		})
	}

	/// Deploys a plan strictly in order, writing one address line per
	/// confirmed contract to `out`.
	///
	/// Stops at the first failure. Contracts confirmed before it stay deployed
	/// and their lines have already been written.
	pub async fn deploy_all<W: Write>(
		&self,
		plan: &[DeploymentSpec],
		out: &mut W,
	) -> Result<Vec<DeploymentRecord>> {
		let mut records = Vec::with_capacity(plan.len());
		for (i, spec) in plan.iter().enumerate() {
			logging::operation_progress("deploy", &spec.contract, Some((i + 1, plan.len())));
			let record = self.deploy(spec).await?;
			writeln!(out, "{}", record.banner())?;
			out.flush()?;
			records.push(record);
		}
		Ok(records)
	}
}
