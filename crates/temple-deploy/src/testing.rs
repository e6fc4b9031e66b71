//! In-memory chain for operation tests
//!
//! Behaves like a fresh local development node: contracts land at the CREATE
//! address of the deployer and nonce, every transaction is mined immediately,
//! and token balances start at zero.

use crate::constants::dev_accounts;
use crate::core::artifacts::tests::{erc20_abi, write_hardhat_artifact, INIT_CODE};
use crate::core::blockchain::ChainClient;
use crate::types::{
	chain::ChainId,
	error::{Error, Result},
	records::Confirmation,
};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// `balanceOf(address)` selector.
const BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

#[derive(Default)]
struct DevState {
	nonce: u64,
	receipts: HashMap<B256, Confirmation>,
	deployed: HashMap<Address, Bytes>,
	balances: HashMap<(Address, Address), U256>,
}

pub(crate) struct DevChain {
	deployer: Address,
	revert_all: bool,
	state: Mutex<DevState>,
}

impl DevChain {
	pub(crate) fn new() -> Self {
		Self {
			deployer: dev_accounts::DEPLOYER_ADDRESS.parse().unwrap(),
			revert_all: false,
			state: Mutex::new(DevState::default()),
		}
	}

	/// A chain on which every creation reverts.
	pub(crate) fn reverting() -> Self {
		Self {
			revert_all: true,
			..Self::new()
		}
	}

	pub(crate) fn set_balance(&self, token: Address, holder: Address, amount: U256) {
		self.state
			.lock()
			.unwrap()
			.balances
			.insert((token, holder), amount);
	}

	pub(crate) fn nonce(&self) -> u64 {
		self.state.lock().unwrap().nonce
	}
}

#[async_trait]
impl ChainClient for DevChain {
	fn chain(&self) -> ChainId {
		ChainId::from_u64(31337)
	}

	fn accounts(&self) -> Vec<Address> {
		vec![self.deployer]
	}

	async fn submit_creation(&self, init_code: Bytes) -> Result<B256> {
		let mut state = self.state.lock().unwrap();
		let nonce = state.nonce;
		let address = self.deployer.create(nonce);

		let mut preimage = self.deployer.to_vec();
		preimage.extend_from_slice(&nonce.to_be_bytes());
		preimage.extend_from_slice(&init_code);
		let hash = keccak256(&preimage);

		let success = !self.revert_all;
		if success {
			state.deployed.insert(address, init_code);
		}
		state.receipts.insert(
			hash,
			Confirmation {
				tx_hash: hash,
				contract_address: Some(address),
				block_number: Some(nonce + 1),
				gas_used: 120_000,
				success,
			},
		);
		state.nonce += 1;
		Ok(hash)
	}

	async fn wait_for_confirmation(&self, hash: B256) -> Result<Confirmation> {
		self.state
			.lock()
			.unwrap()
			.receipts
			.get(&hash)
			.cloned()
			.ok_or(Error::ConfirmationTimeout {
				hash,
				timeout_secs: 0,
			})
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
		let state = self.state.lock().unwrap();
		if !state.deployed.contains_key(&to) {
			return Ok(Bytes::new());
		}
		if data.len() != 36 || data[..4] != BALANCE_OF {
			return Err(Error::ContractCallFailed("execution reverted".into()));
		}

		let holder = Address::from_slice(&data[16..36]);
		let balance = state
			.balances
			.get(&(to, holder))
			.copied()
			.unwrap_or(U256::ZERO);
		Ok(Bytes::from(balance.to_be_bytes::<32>().to_vec()))
	}

	async fn node_accounts(&self) -> Result<Vec<Address>> {
		Ok(vec![self.deployer])
	}
}

/// Writes Hardhat artifacts for the workspace's tokens under `root`.
pub(crate) fn write_token_artifacts(root: &Path) {
	for (source, name) in [("contracts/Gold.sol", "GOLD"), ("contracts/CFC.sol", "CFC")] {
		write_hardhat_artifact(root, source, name, erc20_abi(), INIT_CODE);
	}
}
