//! Constants used throughout the deployment tooling

use alloy_primitives::{address, Address};

/// Prefix of every line reporting a deployed contract.
pub const BANNER: &str = "Temple";

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "temple.toml";

/// Token deployed by the verification run when none is named.
pub const DEFAULT_VERIFY_CONTRACT: &str = "CFC";

/// Account whose balance the verification run checks.
///
/// This is also where the first contract created by the first development
/// account lands on a fresh local chain.
pub const DEFAULT_BALANCE_HOLDER: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

/// Environment variable names
pub mod env_vars {
	pub const CONFIG: &str = "TEMPLE_CONFIG";
	pub const NETWORK: &str = "TEMPLE_NETWORK";
	pub const DEBUG: &str = "TEMPLE_DEBUG";
}

/// Development accounts derived from the default local mnemonic.
///
/// Well-known test accounts; never use them on a public network.
pub mod dev_accounts {
	/// First account of the development mnemonic, the default deployer.
	pub const DEPLOYER_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

	/// Private key of [`DEPLOYER_ADDRESS`].
	pub const DEPLOYER_PRIVATE_KEY: &str =
		"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	/// Second account of the development mnemonic.
	pub const SECOND_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
}
