//! Command-line interface definitions and parsing

pub mod output;

use crate::constants::{env_vars, DEFAULT_CONFIG_FILE, DEFAULT_VERIFY_CONTRACT};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deploys the Temple contracts and checks them on chain.
#[derive(Parser, Debug)]
#[command(name = "temple")]
#[command(about = "Deploy compiled Temple contracts to EVM networks")]
#[command(version)]
pub struct Cli {
	/// Configuration file
	#[arg(long, global = true, env = env_vars::CONFIG, default_value = DEFAULT_CONFIG_FILE)]
	pub config: PathBuf,

	/// Network profile to use instead of the configured default
	#[arg(long, global = true, env = env_vars::NETWORK)]
	pub network: Option<String>,

	/// Verbose logging
	#[arg(long, global = true, env = env_vars::DEBUG)]
	pub debug: bool,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Deploy contracts, printing one line per deployed address
	Deploy {
		/// Contracts to deploy in order; defaults to the configured plan
		contracts: Vec<String>,

		/// Constructor argument, repeatable; only with a single contract
		#[arg(long = "arg", value_name = "VALUE")]
		args: Vec<String>,
	},

	/// Deploy a fresh token and assert a holder's balance
	Verify {
		/// Token contract to deploy
		#[arg(long, default_value = DEFAULT_VERIFY_CONTRACT)]
		contract: String,

		/// Constructor argument, repeatable
		#[arg(long = "arg", value_name = "VALUE")]
		args: Vec<String>,

		/// Address whose balance is checked; defaults to the token's address
		/// on a fresh development chain
		#[arg(long)]
		holder: Option<String>,

		/// Expected balance in base units
		#[arg(long, default_value = "0")]
		expected: String,
	},

	/// List the signing accounts of the selected network
	Accounts,

	/// Show the resolved configuration
	Config,
}
