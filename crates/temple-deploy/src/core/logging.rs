//! Logging setup and operation logging helpers
//!
//! Logs always go to stderr. Stdout is reserved for the lines scripts consume,
//! such as deployed addresses.

use crate::cli::output::Display;
use crate::types::error::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "temple_deploy=info,temple_config=info,warn";

/// Filter used by `--debug`.
const DEBUG_FILTER: &str = "temple_deploy=debug,temple_config=debug,info";

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence over both defaults.
pub fn init_logging(debug: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let default = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

	// A second init in the same process is a no-op
	let _ = tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(debug)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.try_init();
}

/// Records the beginning of an operation.
///
/// # Arguments
/// * `operation` - Name of the operation starting
/// * `context` - Additional context for the operation
pub fn operation_start(operation: &str, context: &str) {
	info!(operation, context, "Operation started");
}

/// Progress within an operation, logged without user output.
pub fn operation_progress(operation: &str, step: &str, progress: Option<(usize, usize)>) {
	match progress {
		Some((current, total)) => {
			info!(operation, step, current, total, "Operation progress");
		},
		None => {
			info!(operation, step, "Operation step");
		},
	}
}

/// Operation success for both the user and the logs.
pub fn operation_success(operation: &str, details: &str) {
	Display::success(&format!("{operation} completed successfully"));
	info!(operation, details, "Operation completed successfully");
}

/// Operation failure for both the user and the logs.
///
/// The error class is recorded so failures can be filtered by kind.
pub fn operation_error(operation: &str, err: &Error) {
	Display::error(&format!("{operation} failed: {err}"));
	error!(operation, kind = %err.kind(), error = %err, "Operation failed");
}

/// Records completion with the elapsed time.
pub fn operation_complete(operation: &str, duration_ms: u64) {
	info!(operation, duration_ms, "Operation completed");
}
