//! Blockchain provider and transaction management
//!
//! [`ChainClient`] is the seam between the deployment operations and the
//! network. [`Provider`] implements it over an alloy HTTP provider: it signs
//! with the profile's accounts, submits creation transactions, and polls for
//! receipts until the profile's confirmation timeout.

use crate::core::signer::signers_for;
use crate::types::{
	chain::ChainId,
	error::{Error, Result},
	records::Confirmation,
};
use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{DynProvider, Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use async_trait::async_trait;
use std::time::Duration;
use temple_config::NetworkProfile;
use tracing::{debug, info, instrument};

/// Operations a deployment run needs from a chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
	/// Chain the client is connected to.
	fn chain(&self) -> ChainId;

	/// Addresses of the locally configured signers, first one deploys.
	fn accounts(&self) -> Vec<Address>;

	/// Submits a contract creation transaction and returns its hash.
	async fn submit_creation(&self, init_code: Bytes) -> Result<B256>;

	/// Waits until the transaction is included in a block.
	async fn wait_for_confirmation(&self, hash: B256) -> Result<Confirmation>;

	/// Executes a read-only call against the latest block.
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

	/// Accounts the node itself manages (`eth_accounts`).
	async fn node_accounts(&self) -> Result<Vec<Address>>;
}

/// Alloy-backed [`ChainClient`] for one network profile.
#[derive(Clone)]
pub struct Provider {
	inner: DynProvider,
	network: String,
	chain: ChainId,
	accounts: Vec<Address>,
	gas_price: Option<u128>,
	poll_interval: Duration,
	confirmation_timeout: Duration,
}

impl std::fmt::Debug for Provider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Provider")
			.field("network", &self.network)
			.field("chain", &self.chain)
			.field("accounts", &self.accounts)
			.field("inner", &"<dyn AlloyProvider>")
			.finish()
	}
}

impl Provider {
	/// Connects to the profile's endpoint.
	///
	/// The endpoint's chain id is queried once. It must match the profile's
	/// `chain_id` when one is configured, and is bound into every signer so
	/// transactions cannot be replayed on another network.
	///
	/// # Arguments
	/// * `network` - Profile name, used in logs and errors
	/// * `profile` - Profile with development defaults already applied
	///
	/// # Errors
	/// Returns `RpcError` if the endpoint is unreachable, `ChainIdMismatch` if
	/// it reports a different chain, and `InvalidAccount` for bad signers
	#[instrument(skip(profile), fields(url))]
	pub async fn connect(network: &str, profile: &NetworkProfile) -> Result<Self> {
		let rpc_url = profile.rpc_url()?;
		tracing::Span::current().record("url", rpc_url);
		let url: url::Url = rpc_url
			.parse()
			.map_err(|e| Error::RpcError(format!("Invalid RPC URL {rpc_url}: {e}")))?;

		let signers = signers_for(profile)?;
		let unsigned = ProviderBuilder::new().connect_http(url.clone());
		let actual = unsigned
			.get_chain_id()
			.await
			.map_err(|e| Error::RpcError(format!("Failed to connect to {rpc_url}: {e}")))?;

		if let Some(expected) = profile.chain_id {
			if expected != actual {
				return Err(Error::ChainIdMismatch { expected, actual });
			}
		}

		let accounts: Vec<Address> = signers.iter().map(|s| s.address()).collect();
		let mut signers = signers
			.into_iter()
			.map(|signer| signer.with_chain_id(Some(actual)));

		let inner = match signers.next() {
			Some(first) => {
				let mut wallet = EthereumWallet::new(first);
				for signer in signers {
					wallet.register_signer(signer);
				}
				ProviderBuilder::new().wallet(wallet).connect_http(url).erased()
			},
			None => unsigned.erased(),
		};

		let chain = ChainId::from_u64(actual);
		info!(network, chain = %chain, accounts = accounts.len(), "Connected");

		Ok(Self {
			inner,
			network: network.to_string(),
			chain,
			accounts,
			gas_price: profile.gas_price.map(u128::from),
			poll_interval: Duration::from_millis(profile.poll_interval_ms),
			confirmation_timeout: Duration::from_secs(profile.confirmation_timeout_secs),
		})
	}

	/// The account creation transactions are sent from.
	///
	/// Falls back to the node's first unlocked account when the profile
	/// configures no signer.
	async fn deployer(&self) -> Result<Address> {
		if let Some(first) = self.accounts.first() {
			return Ok(*first);
		}
		self.node_accounts()
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| Error::NoSigner(self.network.clone()))
	}

	async fn poll_receipt(&self, hash: B256) -> Result<Confirmation> {
		loop {
			let receipt = self
				.inner
				.get_transaction_receipt(hash)
				.await
				.map_err(|e| Error::RpcError(format!("Failed to get receipt: {e}")))?;

			if let Some(receipt) = receipt {
				return Ok(Confirmation {
					tx_hash: hash,
					contract_address: receipt.contract_address(),
					block_number: receipt.block_number(),
					gas_used: receipt.gas_used(),
					success: receipt.status(),
				});
			}
			tokio::time::sleep(self.poll_interval).await;
		}
	}
}

#[async_trait]
impl ChainClient for Provider {
	fn chain(&self) -> ChainId {
		self.chain
	}

	fn accounts(&self) -> Vec<Address> {
		self.accounts.clone()
	}

	async fn submit_creation(&self, init_code: Bytes) -> Result<B256> {
		let from = self.deployer().await?;
		let mut tx = TransactionRequest::default()
			.with_from(from)
			.with_deploy_code(init_code);
		if let Some(gas_price) = self.gas_price {
			tx = tx.with_gas_price(gas_price);
		}

		let pending = self
			.inner
			.send_transaction(tx)
			.await
			.map_err(|e| Error::SubmissionFailed(e.to_string()))?;

		debug!(from = %from, tx_hash = %pending.tx_hash(), "Submitted creation transaction");
		Ok(*pending.tx_hash())
	}

	async fn wait_for_confirmation(&self, hash: B256) -> Result<Confirmation> {
		// Bounds a hung receipt request as well as an unmined transaction
		tokio::time::timeout(self.confirmation_timeout, self.poll_receipt(hash))
			.await
			.map_err(|_| Error::ConfirmationTimeout {
				hash,
				timeout_secs: self.confirmation_timeout.as_secs(),
			})?
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
		let tx = TransactionRequest::default().with_to(to).with_input(data);
		self.inner
			.call(tx)
			.await
			.map_err(|e| Error::ContractCallFailed(e.to_string()))
	}

	async fn node_accounts(&self) -> Result<Vec<Address>> {
		self.inner
			.get_accounts()
			.await
			.map_err(|e| Error::RpcError(format!("Failed to list node accounts: {e}")))
	}
}
