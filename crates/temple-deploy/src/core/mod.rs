//! Core building blocks of a deployment run
//!
//! Artifact lookup, constructor encoding, signer construction, the chain
//! client, and logging.

pub mod artifacts;
pub mod blockchain;
pub mod factory;
pub mod logging;
pub mod signer;

pub use artifacts::{ArtifactStore, ContractArtifact};
pub use blockchain::{ChainClient, Provider};
pub use factory::ContractFactory;
pub use logging::init_logging;
pub use signer::signers_for;
