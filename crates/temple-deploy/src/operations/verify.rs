//! Post-deployment verification
//!
//! Deploys a fresh token and checks that a holder's balance equals the expected
//! value. On a fresh development chain the default holder is the token's own
//! address, whose balance must be zero.

use crate::{
	constants,
	operations::deploy::Deployer,
	types::{
		error::{Error, Result},
		records::DeploymentRecord,
	},
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use temple_config::DeploymentSpec;
use tracing::{info, instrument};

sol! {
	interface IERC20 {
		function balanceOf(address owner) external view returns (uint256);
	}
}

/// What to deploy and what to assert.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
	pub contract: String,
	pub args: Vec<String>,
	pub holder: Address,
	pub expected: U256,
}

impl VerifyOptions {
	/// Parses command-line values.
	///
	/// `expected` accepts decimal or `0x`-prefixed hex. Without a holder the
	/// [`constants::DEFAULT_BALANCE_HOLDER`] is checked.
	pub fn parse(
		contract: &str,
		args: Vec<String>,
		holder: Option<&str>,
		expected: &str,
	) -> Result<Self> {
		let holder = match holder {
			Some(holder) => holder
				.parse::<Address>()
				.map_err(|e| Error::InvalidAddress(format!("{holder}: {e}")))?,
			None => constants::DEFAULT_BALANCE_HOLDER,
		};
		let expected = expected.parse::<U256>().map_err(|e| Error::InvalidArguments {
			contract: contract.to_string(),
			reason: format!("expected balance '{expected}' is not a number: {e}"),
		})?;
		Ok(Self {
			contract: contract.to_string(),
			args,
			holder,
			expected,
		})
	}
}

impl Default for VerifyOptions {
	fn default() -> Self {
		Self {
			contract: constants::DEFAULT_VERIFY_CONTRACT.to_string(),
			args: Vec::new(),
			holder: constants::DEFAULT_BALANCE_HOLDER,
			expected: U256::ZERO,
		}
	}
}

/// Outcome of a passing verification.
#[derive(Debug, Clone)]
pub struct VerifyReport {
	pub deployment: DeploymentRecord,
	pub holder: Address,
	pub balance: U256,
}

/// Runs verifications on top of a [`Deployer`].
pub struct Verifier {
	deployer: Deployer,
}

impl Verifier {
	pub fn new(deployer: Deployer) -> Self {
		Self { deployer }
	}

	/// Deploys `options.contract` and asserts the holder's balance.
	///
	/// # Errors
	/// Returns `AssertionFailed` carrying both values on a mismatch, or the
	/// deployment or call error that prevented the check
	#[instrument(skip(self, options), fields(contract = %options.contract, holder = %options.holder))]
	pub async fn verify(&self, options: &VerifyOptions) -> Result<VerifyReport> {
		let spec = DeploymentSpec::new(options.contract.as_str()).with_args(options.args.clone());
		let deployment = self.deployer.deploy(&spec).await?;

		let balance = self.balance_of(deployment.address, options.holder).await?;
		info!(token = %deployment.address, balance = %balance, "Queried balance");

		if balance != options.expected {
			return Err(Error::AssertionFailed {
				what: format!("{}.balanceOf({})", deployment.contract, options.holder),
				expected: options.expected.to_string(),
				actual: balance.to_string(),
			});
		}

		Ok(VerifyReport {
			deployment,
			holder: options.holder,
			balance,
		})
	}

	/// Reads an ERC-20 balance.
	pub async fn balance_of(&self, token: Address, holder: Address) -> Result<U256> {
		let data = IERC20::balanceOfCall { owner: holder }.abi_encode();
		let out = self
			.deployer
			.client()
			.call(token, Bytes::from(data))
			.await?;

		if out.len() != 32 {
			return Err(Error::ContractCallFailed(format!(
				"balanceOf on {token} returned {} bytes, expected 32",
				out.len()
			)));
		}
		Ok(U256::from_be_slice(&out))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::artifacts::ArtifactStore;
	use crate::testing::{write_token_artifacts, DevChain};
	use std::str::FromStr;
	use std::sync::Arc;
	use tempfile::TempDir;

	fn verifier(chain: Arc<DevChain>) -> (Verifier, TempDir) {
		let dir = TempDir::new().unwrap();
		write_token_artifacts(dir.path());
		let deployer = Deployer::new(chain, ArtifactStore::new(dir.path()));
		(Verifier::new(deployer), dir)
	}

	#[test]
	fn test_default_options() {
		let options = VerifyOptions::default();
		assert_eq!(options.contract, "CFC");
		assert_eq!(options.holder, constants::DEFAULT_BALANCE_HOLDER);
		assert_eq!(options.expected, U256::ZERO);
	}

	#[test]
	fn test_parse_options() {
		let options = VerifyOptions::parse("GOLD", Vec::new(), None, "0x10").unwrap();
		assert_eq!(options.expected, U256::from(16));
		assert_eq!(options.holder, constants::DEFAULT_BALANCE_HOLDER);

		let options = VerifyOptions::parse(
			"GOLD",
			Vec::new(),
			Some(constants::dev_accounts::SECOND_ADDRESS),
			"0",
		)
		.unwrap();
		assert_eq!(
			options.holder,
			Address::from_str(constants::dev_accounts::SECOND_ADDRESS).unwrap()
		);

		assert!(matches!(
			VerifyOptions::parse("GOLD", Vec::new(), Some("0x1234"), "0"),
			Err(Error::InvalidAddress(_))
		));
		assert!(matches!(
			VerifyOptions::parse("GOLD", Vec::new(), None, "lots"),
			Err(Error::InvalidArguments { .. })
		));
	}

	#[tokio::test]
	async fn test_fresh_token_balance_is_zero() {
		let (verifier, _dir) = verifier(Arc::new(DevChain::new()));

		let report = verifier.verify(&VerifyOptions::default()).await.unwrap();
		assert_eq!(report.deployment.contract, "CFC");
		assert_eq!(report.deployment.address, report.holder);
		assert_eq!(report.balance, U256::ZERO);
	}

	#[tokio::test]
	async fn test_balance_mismatch() {
		let chain = Arc::new(DevChain::new());
		let holder = constants::DEFAULT_BALANCE_HOLDER;
		chain.set_balance(holder, holder, U256::from(5));
		let (verifier, _dir) = verifier(chain);

		let err = verifier.verify(&VerifyOptions::default()).await.unwrap_err();
		match err {
			Error::AssertionFailed {
				expected, actual, ..
			} => {
				assert_eq!(expected, "0");
				assert_eq!(actual, "5");
			},
			other => panic!("expected assertion failure, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_balance_of_without_code() {
		let (verifier, _dir) = verifier(Arc::new(DevChain::new()));
		let err = verifier
			.balance_of(Address::repeat_byte(1), Address::ZERO)
			.await
			.unwrap_err();
		assert!(matches!(err, Error::ContractCallFailed(_)));
	}
}
