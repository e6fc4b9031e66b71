//! Blockchain chain identifier types
//!
//! The ChainId enum names the networks this workspace is usually pointed at
//! and falls back to a numeric id for everything else.

use std::fmt;

/// Identifier for blockchain networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainId {
	Mainnet,
	Custom { id: u64 },
}

impl ChainId {
	/// Create ChainId from numeric identifier
	pub fn from_u64(id: u64) -> Self {
		match id {
			1 => Self::Mainnet,
			id => Self::Custom { id },
		}
	}

	/// Get the numeric chain identifier
	pub fn id(&self) -> u64 {
		match self {
			Self::Mainnet => 1,
			Self::Custom { id } => *id,
		}
	}

	/// Get a human-readable name for the chain
	pub fn name(&self) -> &str {
		match self {
			Self::Mainnet => "Ethereum Mainnet",
			Self::Custom { id: 3 } => "Ropsten",
			Self::Custom { id: 4 } => "Rinkeby",
			Self::Custom { id: 56 } => "BNB Smart Chain",
			Self::Custom { id: 97 } => "BNB Smart Chain Testnet",
			Self::Custom { id: 137 } => "Polygon",
			Self::Custom { id: 80001 } => "Polygon Mumbai",
			Self::Custom { id: 11155111 } => "Sepolia",
			Self::Custom { id: 31337 } => "Hardhat",
			Self::Custom { .. } => "Custom Chain",
		}
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.id(), self.name())
	}
}

impl From<u64> for ChainId {
	fn from(id: u64) -> Self {
		Self::from_u64(id)
	}
}

impl From<ChainId> for u64 {
	fn from(chain: ChainId) -> Self {
		chain.id()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_chain_id_conversion() {
		assert_eq!(ChainId::from_u64(1), ChainId::Mainnet);
		assert_eq!(ChainId::from_u64(97), ChainId::Custom { id: 97 });
		assert_eq!(u64::from(ChainId::Custom { id: 56 }), 56);
	}

	#[test]
	fn test_chain_display() {
		assert_eq!(ChainId::Mainnet.to_string(), "1 (Ethereum Mainnet)");
		assert_eq!(ChainId::from_u64(97).to_string(), "97 (BNB Smart Chain Testnet)");
		assert_eq!(ChainId::from_u64(424242).to_string(), "424242 (Custom Chain)");
	}
}
