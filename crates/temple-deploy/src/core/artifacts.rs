//! Compiled contract artifacts
//!
//! Resolves contract names to the JSON artifacts an external Solidity build
//! leaves behind. Two layouts are understood:
//!
//! - Hardhat: `<root>/contracts/**/<Source>.sol/<Name>.json` with the creation
//!   bytecode as a hex string under `bytecode`
//! - Foundry: `<root>/<Source>.sol/<Name>.json` with the bytecode under
//!   `bytecode.object`
//!
//! Debug files (`*.dbg.json`) and the `build-info` directory are ignored.

use crate::types::error::{Error, Result};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{hex, Bytes};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A compiled contract ready to be turned into a factory.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
	pub name: String,
	/// Source file the contract was compiled from, relative to the artifacts root.
	pub source: String,
	pub abi: JsonAbi,
	pub bytecode: Bytes,
	pub path: PathBuf,
}

/// Lookup over one artifacts directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
	root: PathBuf,
}

impl ArtifactStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves `name` to exactly one artifact.
	///
	/// `name` is either a bare contract name (`GOLD`) or fully qualified with
	/// its source (`contracts/Gold.sol:GOLD`). A bare name matching contracts
	/// in several sources is ambiguous.
	pub fn resolve(&self, name: &str) -> Result<ContractArtifact> {
		let (source, contract) = match name.rsplit_once(':') {
			Some((source, contract)) => (Some(Path::new(source)), contract),
			None => (None, name),
		};

		let mut candidates = self.candidates(contract)?;
		if let Some(source) = source {
			candidates.retain(|path| {
				let parent = self.source_of(path);
				parent.ends_with(source) || source.ends_with(&parent)
			});
		}

		match candidates.len() {
			0 => Err(Error::ArtifactNotFound {
				name: name.to_string(),
				dir: self.root.clone(),
			}),
			1 => self.load(&candidates[0], contract),
			_ => Err(Error::AmbiguousArtifact {
				name: name.to_string(),
				candidates: candidates
					.iter()
					.map(|path| format!("{}:{}", self.source_of(path).display(), contract))
					.collect(),
			}),
		}
	}

	/// Every `<contract>.json` that sits inside a `*.sol` directory.
	fn candidates(&self, contract: &str) -> Result<Vec<PathBuf>> {
		if !self.root.is_dir() {
			return Err(Error::ArtifactNotFound {
				name: contract.to_string(),
				dir: self.root.clone(),
			});
		}

		let file_name = format!("{contract}.json");
		let mut found = Vec::new();
		let mut pending = vec![self.root.clone()];

		while let Some(dir) = pending.pop() {
			for entry in std::fs::read_dir(&dir)? {
				let entry = entry?;
				let file_type = entry.file_type()?;
				let path = entry.path();
				// Linked directories are not followed, a cycle would never end
				if file_type.is_symlink() {
					continue;
				}
				if file_type.is_dir() {
					if path.file_name().is_some_and(|n| n != "build-info") {
						pending.push(path);
					}
					continue;
				}

				let in_source_dir = path
					.parent()
					.and_then(Path::extension)
					.is_some_and(|ext| ext == "sol");
				if in_source_dir && path.file_name().is_some_and(|n| n == file_name.as_str()) {
					found.push(path);
				}
			}
		}

		found.sort();
		debug!(contract, count = found.len(), "Artifact candidates");
		Ok(found)
	}

	/// Source directory of an artifact, relative to the root.
	fn source_of(&self, artifact: &Path) -> PathBuf {
		let parent = artifact.parent().unwrap_or(artifact);
		parent
			.strip_prefix(&self.root)
			.unwrap_or(parent)
			.to_path_buf()
	}

	fn load(&self, path: &Path, contract: &str) -> Result<ContractArtifact> {
		let content = std::fs::read_to_string(path)?;
		let json: Value = serde_json::from_str(&content).map_err(|e| Error::InvalidArtifact {
			path: path.to_path_buf(),
			reason: format!("invalid JSON: {e}"),
		})?;

		let abi_value = json.get("abi").cloned().ok_or_else(|| Error::InvalidArtifact {
			path: path.to_path_buf(),
			reason: "missing abi".to_string(),
		})?;
		let abi: JsonAbi = serde_json::from_value(abi_value).map_err(|e| Error::InvalidArtifact {
			path: path.to_path_buf(),
			reason: format!("invalid abi: {e}"),
		})?;

		let bytecode = extract_bytecode(&json).ok_or_else(|| Error::InvalidArtifact {
			path: path.to_path_buf(),
			reason: "missing bytecode".to_string(),
		})?;
		let hex_str = bytecode.strip_prefix("0x").unwrap_or(bytecode);

		if hex_str.is_empty() {
			return Err(Error::NotDeployable(contract.to_string()));
		}
		if hex_str.contains("__") {
			return Err(Error::UnlinkedLibraries {
				name: contract.to_string(),
				libraries: link_references(&json),
			});
		}

		let bytecode = hex::decode(hex_str).map_err(|e| Error::InvalidArtifact {
			path: path.to_path_buf(),
			reason: format!("invalid bytecode hex: {e}"),
		})?;

		let source = json
			.get("sourceName")
			.and_then(Value::as_str)
			.map(str::to_string)
			.unwrap_or_else(|| self.source_of(path).display().to_string());

		debug!(contract, source = %source, size = bytecode.len(), "Loaded artifact");
		Ok(ContractArtifact {
			name: contract.to_string(),
			source,
			abi,
			bytecode: Bytes::from(bytecode),
			path: path.to_path_buf(),
		})
	}
}

/// Creation bytecode as a Hardhat string or a Foundry `{ "object": ... }`.
fn extract_bytecode(json: &Value) -> Option<&str> {
	match json.get("bytecode")? {
		Value::String(s) => Some(s.as_str()),
		Value::Object(obj) => obj.get("object").and_then(Value::as_str),
		_ => None,
	}
}

/// Library names from `linkReferences`, or `unknown` when the artifact has none.
fn link_references(json: &Value) -> String {
	let refs = json
		.get("linkReferences")
		.or_else(|| json.get("bytecode").and_then(|b| b.get("linkReferences")))
		.and_then(Value::as_object);

	let mut names: Vec<String> = refs
		.into_iter()
		.flat_map(|sources| sources.iter())
		.flat_map(|(source, libs)| {
			libs.as_object()
				.into_iter()
				.flat_map(|libs| libs.keys())
				.map(move |lib| format!("{source}:{lib}"))
		})
		.collect();

	if names.is_empty() {
		return "unknown".to_string();
	}
	names.sort();
	names.join(", ")
}
