//! Account listing

use crate::core::blockchain::ChainClient;
use crate::types::error::Result;
use alloy_primitives::Address;
use tracing::debug;

/// Addresses available for signing on the connected network.
///
/// Locally configured signers come first; when none are configured the node's
/// own unlocked accounts are listed instead.
pub async fn list_accounts(client: &dyn ChainClient) -> Result<Vec<Address>> {
	let configured = client.accounts();
	if !configured.is_empty() {
		return Ok(configured);
	}

	debug!("No configured signers, asking the node");
	client.node_accounts().await
}
