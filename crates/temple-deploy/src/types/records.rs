//! Transaction confirmations and deployment records

use crate::constants::BANNER;
use alloy_primitives::{Address, B256};

/// The receipt facts a deployment needs from a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
	pub tx_hash: B256,
	pub contract_address: Option<Address>,
	pub block_number: Option<u64>,
	pub gas_used: u64,
	pub success: bool,
}

/// Outcome of deploying one contract. Held only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
	pub contract: String,
	pub address: Address,
	pub tx_hash: B256,
	pub block_number: Option<u64>,
	pub gas_used: u64,
}

impl DeploymentRecord {
	/// The line reported on stdout for this deployment.
	pub fn banner(&self) -> String {
		format!(
			"{} ------- {} deployed ------- {}",
			BANNER, self.contract, self.address
		)
	}
}
