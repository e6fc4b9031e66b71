//! Error types and result handling for deployments
//!
//! Every failure a deployment or verification run can hit is a variant of
//! [`Error`]. Variants are grouped by [`ErrorKind`] so the binary can report
//! what class of problem ended the run. Nothing here is retried; errors flow
//! back to the entry point unchanged.

use alloy_primitives::B256;
use std::fmt;
use std::path::PathBuf;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// A contract, network, account, or argument could not be resolved.
	Resolution,
	/// The endpoint was unreachable or answered with something unusable.
	Network,
	/// A transaction was rejected, reverted, or never confirmed.
	Transaction,
	/// A post-deployment check did not hold.
	Assertion,
	/// Local I/O or unexpected failures.
	Internal,
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ErrorKind::Resolution => "resolution",
			ErrorKind::Network => "network",
			ErrorKind::Transaction => "transaction",
			ErrorKind::Assertion => "assertion",
			ErrorKind::Internal => "internal",
		};
		f.write_str(name)
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	// Resolution errors
	#[error("Contract {name} not found in {}", dir.display())]
	ArtifactNotFound { name: String, dir: PathBuf },

	#[error("Contract name {name} is ambiguous, use one of: {}", candidates.join(", "))]
	AmbiguousArtifact {
		name: String,
		candidates: Vec<String>,
	},

	#[error("Invalid artifact {}: {reason}", path.display())]
	InvalidArtifact { path: PathBuf, reason: String },

	#[error("Contract {0} has no creation bytecode (abstract contract or interface)")]
	NotDeployable(String),

	#[error("Contract {name} needs unlinked libraries: {libraries}")]
	UnlinkedLibraries { name: String, libraries: String },

	#[error("Invalid constructor arguments for {contract}: {reason}")]
	InvalidArguments { contract: String, reason: String },

	#[error("Nothing to deploy: no contracts given and no deploy plan configured")]
	EmptyPlan,

	#[error("Invalid account: {0}")]
	InvalidAccount(String),

	#[error("No signing account configured for network {0}")]
	NoSigner(String),

	#[error("Invalid address: {0}")]
	InvalidAddress(String),

	#[error(transparent)]
	Config(#[from] temple_config::ConfigError),

	// Network errors
	#[error("RPC connection failed: {0}")]
	RpcError(String),

	#[error("Chain id mismatch: configured {expected}, endpoint reports {actual}")]
	ChainIdMismatch { expected: u64, actual: u64 },

	#[error("Contract call failed: {0}")]
	ContractCallFailed(String),

	// Transaction errors
	#[error("Failed to submit transaction: {0}")]
	SubmissionFailed(String),

	#[error("Transaction {0} reverted")]
	TransactionReverted(B256),

	#[error("Transaction {0} has no contract address in its receipt")]
	MissingContractAddress(B256),

	#[error("Transaction {hash} not confirmed after {timeout_secs}s")]
	ConfirmationTimeout { hash: B256, timeout_secs: u64 },

	// Assertion errors
	#[error("Assertion failed: {what}: expected {expected}, got {actual}")]
	AssertionFailed {
		what: String,
		expected: String,
		actual: String,
	},

	// IO errors
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	// JSON errors
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl Error {
	/// Classifies the error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::ArtifactNotFound { .. }
			| Error::AmbiguousArtifact { .. }
			| Error::InvalidArtifact { .. }
			| Error::NotDeployable(_)
			| Error::UnlinkedLibraries { .. }
			| Error::InvalidArguments { .. }
			| Error::EmptyPlan
			| Error::InvalidAccount(_)
			| Error::NoSigner(_)
			| Error::InvalidAddress(_)
			| Error::Config(_) => ErrorKind::Resolution,
			Error::RpcError(_) | Error::ChainIdMismatch { .. } | Error::ContractCallFailed(_) => {
				ErrorKind::Network
			},
			Error::SubmissionFailed(_)
			| Error::TransactionReverted(_)
			| Error::MissingContractAddress(_)
			| Error::ConfirmationTimeout { .. } => ErrorKind::Transaction,
			Error::AssertionFailed { .. } => ErrorKind::Assertion,
			Error::Io(_) | Error::Json(_) | Error::Other(_) => ErrorKind::Internal,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_kinds() {
		let missing = Error::ArtifactNotFound {
			name: "GOLD".into(),
			dir: PathBuf::from("artifacts"),
		};
		assert_eq!(missing.kind(), ErrorKind::Resolution);
		assert_eq!(missing.to_string(), "Contract GOLD not found in artifacts");

		assert_eq!(
			Error::RpcError("refused".into()).kind(),
			ErrorKind::Network
		);
		assert_eq!(
			Error::TransactionReverted(B256::ZERO).kind(),
			ErrorKind::Transaction
		);
		assert_eq!(
			Error::AssertionFailed {
				what: "balance".into(),
				expected: "0".into(),
				actual: "1".into(),
			}
			.kind(),
			ErrorKind::Assertion
		);
	}

	#[test]
	fn test_ambiguous_message_lists_candidates() {
		let err = Error::AmbiguousArtifact {
			name: "Token".into(),
			candidates: vec!["a/Token.sol:Token".into(), "b/Token.sol:Token".into()],
		};
		assert_eq!(
			err.to_string(),
			"Contract name Token is ambiguous, use one of: a/Token.sol:Token, b/Token.sol:Token"
		);
	}
}
