//! Contract factories
//!
//! Turns a resolved artifact and textual constructor arguments into the init
//! code of a creation transaction.

use crate::core::artifacts::ContractArtifact;
use crate::types::error::{Error, Result};
use alloy_dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy_primitives::Bytes;

/// Produces creation transactions for one contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
	artifact: ContractArtifact,
}

impl ContractFactory {
	pub fn new(artifact: ContractArtifact) -> Self {
		Self { artifact }
	}

	pub fn name(&self) -> &str {
		&self.artifact.name
	}

	/// Builds init code: creation bytecode followed by the ABI-encoded
	/// constructor arguments.
	///
	/// # Arguments
	/// * `args` - One textual value per constructor parameter, in order
	///
	/// # Errors
	/// Returns `InvalidArguments` when the count does not match the constructor
	/// or a value cannot be coerced to its parameter type
	pub fn deploy_code(&self, args: &[String]) -> Result<Bytes> {
		let encoded = self.encode_constructor_args(args)?;

		let mut code = Vec::with_capacity(self.artifact.bytecode.len() + encoded.len());
		code.extend_from_slice(&self.artifact.bytecode);
		code.extend_from_slice(&encoded);
		Ok(Bytes::from(code))
	}

	fn encode_constructor_args(&self, args: &[String]) -> Result<Vec<u8>> {
		let Some(ctor) = self.artifact.abi.constructor() else {
			if args.is_empty() {
				return Ok(Vec::new());
			}
			return Err(self.invalid(format!(
				"contract has no constructor but {} argument(s) were given",
				args.len()
			)));
		};

		if ctor.inputs.len() != args.len() {
			return Err(self.invalid(format!(
				"expected {} argument(s), got {}",
				ctor.inputs.len(),
				args.len()
			)));
		}

		let values = ctor
			.inputs
			.iter()
			.zip(args)
			.map(|(param, raw)| {
				let ty = param
					.resolve()
					.map_err(|e| self.invalid(format!("unsupported type {}: {e}", param.ty)))?;
				ty.coerce_str(raw).map_err(|e| {
					self.invalid(format!(
						"cannot use '{raw}' for {} {}: {e}",
						param.ty, param.name
					))
				})
			})
			.collect::<Result<Vec<DynSolValue>>>()?;

		ctor.abi_encode_input(&values)
			.map_err(|e| self.invalid(format!("encoding failed: {e}")))
	}

	fn invalid(&self, reason: String) -> Error {
		Error::InvalidArguments {
			contract: self.artifact.name.clone(),
			reason,
		}
	}
}
