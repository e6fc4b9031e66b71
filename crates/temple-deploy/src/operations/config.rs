//! Configuration display
//!
//! Summarizes the loaded descriptor without exposing secret values.

use crate::cli::output::Display;
use crate::types::{chain::ChainId, error::Result};
use std::path::PathBuf;
use temple_config::{AccountsConfig, Config};

/// One network as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSummary {
	pub name: String,
	pub url: String,
	pub chain: Option<ChainId>,
	pub gas_price: Option<u64>,
	pub accounts: String,
	pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigSummary {
	pub solidity: String,
	pub artifacts: PathBuf,
	pub selected_network: String,
	pub networks: Vec<NetworkSummary>,
	pub explorer_key: bool,
	pub plan: Vec<String>,
}

/// Collects what `config` prints for the given selected network.
pub fn summarize(config: &Config, selected: &str) -> Result<ConfigSummary> {
	let networks = config
		.network_names()
		.into_iter()
		.map(|name| -> Result<NetworkSummary> {
			let profile = config.network(&name)?;
			let accounts = match &profile.accounts {
				AccountsConfig::List(list) => format!("{} configured", list.len()),
				AccountsConfig::Hd(hd) => format!("{} derived from mnemonic", hd.count),
			};
			Ok(NetworkSummary {
				selected: name == selected,
				url: profile.url.clone().unwrap_or_default(),
				chain: profile.chain_id.map(ChainId::from_u64),
				gas_price: profile.gas_price,
				accounts,
				name,
			})
		})
		.collect::<Result<Vec<_>>>()?;

	Ok(ConfigSummary {
		solidity: config.solidity.clone(),
		artifacts: config.artifacts_dir(),
		selected_network: selected.to_string(),
		networks,
		explorer_key: config.explorer_api_key(selected).is_some(),
		plan: config.deploy.iter().map(|d| d.contract.clone()).collect(),
	})
}

/// Prints a summary to stdout.
pub fn show(summary: &ConfigSummary) {
	Display::header("Current Configuration");
	Display::kv("Solidity", &summary.solidity);
	Display::kv("Artifacts", &summary.artifacts.display().to_string());
	Display::kv("Network", &summary.selected_network);
	Display::kv(
		"Explorer key",
		if summary.explorer_key { "set" } else { "not set" },
	);
	if !summary.plan.is_empty() {
		Display::kv("Deploy plan", &summary.plan.join(", "));
	}

	for network in &summary.networks {
		let marker = if network.selected { " (selected)" } else { "" };
		Display::section(&format!("{}{marker}", network.name));
		Display::kv("URL", &network.url);
		if let Some(chain) = network.chain {
			Display::kv("Chain", &chain.to_string());
		}
		if let Some(gas_price) = network.gas_price {
			Display::kv("Gas price", &format!("{gas_price} wei"));
		}
		Display::kv("Accounts", &network.accounts);
	}
}
