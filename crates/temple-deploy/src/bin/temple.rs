//! Main binary entry point for the Temple deployment CLI
//!
//! Parses arguments, sets up logging, and dispatches to the operations. Every
//! error ends the run: it is logged, printed to stderr, and the process exits
//! with status 1.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;
use temple_deploy::{
	cli::{output::Display, Cli, Commands},
	core::{init_logging, logging},
	operations::{config as config_ops, list_accounts, resolve_plan, Verifier, VerifyOptions},
	Context, Result,
};
use tracing::instrument;

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.debug);

	let operation = match &cli.command {
		Commands::Deploy { .. } => "deploy",
		Commands::Verify { .. } => "verify",
		Commands::Accounts => "accounts",
		Commands::Config => "config",
	};

	let started = Instant::now();
	logging::operation_start(operation, &cli.config.display().to_string());
	match run(cli).await {
		Ok(()) => {
			logging::operation_complete(operation, started.elapsed().as_millis() as u64);
			ExitCode::SUCCESS
		},
		Err(err) => {
			logging::operation_error(operation, &err);
			ExitCode::FAILURE
		},
	}
}

async fn run(cli: Cli) -> Result<()> {
	let ctx = Context::load(&cli.config, cli.network).await?;

	match cli.command {
		Commands::Deploy { contracts, args } => handle_deploy(&ctx, contracts, args).await,
		Commands::Verify {
			contract,
			args,
			holder,
			expected,
		} => {
			let options = VerifyOptions::parse(&contract, args, holder.as_deref(), &expected)?;
			handle_verify(&ctx, options).await
		},
		Commands::Accounts => handle_accounts(&ctx).await,
		Commands::Config => {
			let summary = config_ops::summarize(&ctx.config, &ctx.network)?;
			config_ops::show(&summary);
			Ok(())
		},
	}
}

#[instrument(skip_all, fields(network = %ctx.network))]
async fn handle_deploy(ctx: &Context, contracts: Vec<String>, args: Vec<String>) -> Result<()> {
	let plan = resolve_plan(&contracts, &args, &ctx.config)?;
	let deployer = ctx.deployer().await?;

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	let records = deployer.deploy_all(&plan, &mut out).await?;

	logging::operation_success(
		"deploy",
		&format!("{} contract(s) on {}", records.len(), deployer.client().chain()),
	);
	Ok(())
}

#[instrument(skip_all, fields(network = %ctx.network))]
async fn handle_verify(ctx: &Context, options: VerifyOptions) -> Result<()> {
	let verifier = Verifier::new(ctx.deployer().await?);
	let report = verifier.verify(&options).await?;

	println!("{}", report.deployment.banner());
	Display::success(&format!(
		"{}.balanceOf({}) = {}",
		report.deployment.contract, report.holder, report.balance
	));
	Ok(())
}

#[instrument(skip_all, fields(network = %ctx.network))]
async fn handle_accounts(ctx: &Context) -> Result<()> {
	let provider = ctx.provider().await?;
	let accounts = list_accounts(&provider).await?;
	if accounts.is_empty() {
		Display::warning(&format!("No accounts available on {}", ctx.network));
	}

	let mut out = std::io::stdout().lock();
	for account in accounts {
		writeln!(out, "{account}")?;
	}
	Ok(())
}
