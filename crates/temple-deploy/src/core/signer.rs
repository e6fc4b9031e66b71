//! Signing accounts for a network profile
//!
//! Accounts are either a list of secrets or an HD descriptor. A list entry is a
//! hex private key, or a mnemonic phrase whose first derived key is used.
//! Error messages name the account by position only; secret material is
//! never echoed.

use crate::types::error::{Error, Result};
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use temple_config::{networks::DEFAULT_HD_PATH, AccountsConfig, HdAccounts, NetworkProfile};

/// Builds every signer a profile configures, in declaration order.
///
/// # Errors
/// Returns `InvalidAccount` if a key does not parse or a mnemonic cannot be
/// derived along the configured path
pub fn signers_for(profile: &NetworkProfile) -> Result<Vec<PrivateKeySigner>> {
	match &profile.accounts {
		AccountsConfig::List(entries) => entries
			.iter()
			.enumerate()
			.map(|(i, entry)| signer_from_entry(i, entry.expose_secret()))
			.collect(),
		AccountsConfig::Hd(hd) => derive_hd(hd),
	}
}

fn signer_from_entry(index: usize, entry: &str) -> Result<PrivateKeySigner> {
	let entry = entry.trim();
	if entry.split_whitespace().count() > 1 {
		return derive(entry, DEFAULT_HD_PATH, 0, None)
			.map_err(|reason| Error::InvalidAccount(format!("account #{index}: {reason}")));
	}

	entry.parse::<PrivateKeySigner>().map_err(|_| {
		Error::InvalidAccount(format!(
			"account #{index}: not a 32-byte hex private key or mnemonic phrase"
		))
	})
}

fn derive_hd(hd: &HdAccounts) -> Result<Vec<PrivateKeySigner>> {
	let passphrase = hd.passphrase.as_ref().map(|p| p.expose_secret());
	(hd.initial_index..hd.initial_index.saturating_add(hd.count))
		.map(|index| {
			derive(hd.mnemonic.expose_secret(), &hd.path, index, passphrase)
				.map_err(|reason| Error::InvalidAccount(format!("HD account {index}: {reason}")))
		})
		.collect()
}

fn derive(
	phrase: &str,
	path: &str,
	index: u32,
	passphrase: Option<&str>,
) -> std::result::Result<PrivateKeySigner, String> {
	let mut builder = MnemonicBuilder::<English>::default()
		.phrase(phrase)
		.derivation_path(format!("{}/{index}", path.trim_end_matches('/')))
		.map_err(|_| format!("invalid derivation path {path}"))?;
	if let Some(passphrase) = passphrase {
		builder = builder.password(passphrase);
	}
	builder
		.build()
		.map_err(|_| "invalid mnemonic phrase".to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::constants::dev_accounts;
	use alloy_primitives::Address;
	use temple_config::{SecretString, DEV_MNEMONIC};

	fn addr(s: &str) -> Address {
		s.parse().unwrap()
	}

	fn profile(accounts: AccountsConfig) -> NetworkProfile {
		NetworkProfile {
			accounts,
			..NetworkProfile::default()
		}
	}

	#[test]
	fn test_private_key_entry() {
		let p = profile(AccountsConfig::List(vec![SecretString::from(
			dev_accounts::DEPLOYER_PRIVATE_KEY,
		)]));
		let signers = signers_for(&p).unwrap();
		assert_eq!(signers.len(), 1);
		assert_eq!(signers[0].address(), addr(dev_accounts::DEPLOYER_ADDRESS));
	}

	#[test]
	fn test_mnemonic_entry_uses_first_key() {
		let p = profile(AccountsConfig::List(vec![SecretString::from(DEV_MNEMONIC)]));
		let signers = signers_for(&p).unwrap();
		assert_eq!(signers[0].address(), addr(dev_accounts::DEPLOYER_ADDRESS));
	}

	#[test]
	fn test_hd_derivation() {
		let hd = HdAccounts {
			count: 2,
			..HdAccounts::development()
		};
		let signers = signers_for(&profile(AccountsConfig::Hd(hd))).unwrap();
		assert_eq!(signers.len(), 2);
		assert_eq!(signers[0].address(), addr(dev_accounts::DEPLOYER_ADDRESS));
		assert_eq!(signers[1].address(), addr(dev_accounts::SECOND_ADDRESS));
	}

	#[test]
	fn test_hd_initial_index() {
		let hd = HdAccounts {
			initial_index: 1,
			count: 1,
			..HdAccounts::development()
		};
		let signers = signers_for(&profile(AccountsConfig::Hd(hd))).unwrap();
		assert_eq!(signers[0].address(), addr(dev_accounts::SECOND_ADDRESS));
	}

	#[test]
	fn test_bad_key_does_not_leak() {
		let secret = "0xnot-really-a-key";
		let p = profile(AccountsConfig::List(vec![SecretString::from(secret)]));
		let err = signers_for(&p).unwrap_err();
		assert!(matches!(err, Error::InvalidAccount(_)));
		assert!(!err.to_string().contains(secret));
	}

	#[test]
	fn test_bad_mnemonic() {
		let phrase = "these words are not a valid bip39 phrase at all";
		let p = profile(AccountsConfig::List(vec![SecretString::from(phrase)]));
		let err = signers_for(&p).unwrap_err();
		assert!(matches!(err, Error::InvalidAccount(_)));
		assert!(!err.to_string().contains(phrase));
	}
}
