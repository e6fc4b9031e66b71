//! High-level operation implementations for CLI commands
//!
//! Each submodule implements one command on top of the core building blocks.

pub mod accounts;
pub mod config;
pub mod deploy;
pub mod verify;

pub use accounts::list_accounts;
pub use deploy::{resolve_plan, Deployer};
pub use verify::{Verifier, VerifyOptions, VerifyReport};
