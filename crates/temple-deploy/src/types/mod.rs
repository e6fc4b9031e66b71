//! Type definitions shared across the deployment tooling
//!
//! Chain identifiers, the error taxonomy, and the records a deployment run
//! produces.

pub mod chain;
pub mod error;
pub mod records;

pub use chain::ChainId;
pub use error::{Error, ErrorKind, Result};
pub use records::{Confirmation, DeploymentRecord};
