//! Rating agent command line host.
//!
//! Runs a single trigger (or a read-only view) against a sled-backed agent
//! whose registry and oracle feeds are seeded from configuration.

mod config;

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rating_agent::{RatingAgent, TriggerOutcome};
use rating_storage::{SledStateStore, StateStore};
use rating_types::{Address, Amount, AssetRef, Trigger};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "rating-cli")]
#[command(about = "Rating agent command line host", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the agent state (overrides `state_dir`)
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Define the reputation asset
    Define(TriggerArgs),
    /// Notify the agent of a donation
    Donate(DonateCommand),
    /// Print all agent state vars
    State,
    /// Print the token registry state vars
    Tokens,
}

#[derive(Debug, Args)]
struct TriggerArgs {
    /// Trigger sender address
    #[arg(long)]
    from: String,
    /// Trigger unit id
    #[arg(long)]
    unit: String,
    /// Base units attached to the trigger
    #[arg(long, default_value_t = 10_000)]
    attach: Amount,
}

#[derive(Debug, Args)]
struct DonateCommand {
    #[command(flatten)]
    trigger: TriggerArgs,
    /// Project (repository) that received the donation
    #[arg(long)]
    repo: String,
    /// Donor address
    #[arg(long)]
    donor: String,
    /// Donated amount in the asset's smallest units
    #[arg(long)]
    amount: String,
    /// `base` or a registered asset id
    #[arg(long)]
    asset: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }
    init_logging(&config);

    let registry = Arc::new(config.build_registry()?);

    if let Commands::Tokens = cli.command {
        print_json(&registry.state_vars())?;
        return Ok(ExitCode::SUCCESS);
    }

    let feeds = Arc::new(config.build_feeds()?);
    let store = SledStateStore::new(&config.state_dir)
        .with_context(|| format!("failed to open state in {}", config.state_dir.display()))?;
    debug!(target: "cli", "State opened at {}", config.state_dir.display());

    let agent = RatingAgent::new(store, registry, feeds, config.agent.clone())?;

    let code = match cli.command {
        Commands::Define(args) => {
            let trigger = build_trigger(&args, json!({ "define": 1 }))?;
            report(&agent, &trigger)?
        }
        Commands::Donate(cmd) => {
            let data = json!({
                "repo": cmd.repo,
                "donor": cmd.donor,
                "amount": cmd.amount,
                "asset": cmd.asset,
            });
            let trigger = build_trigger(&cmd.trigger, data)?;
            report(&agent, &trigger)?
        }
        Commands::State => {
            print_json(&agent.state_vars()?)?;
            ExitCode::SUCCESS
        }
        Commands::Tokens => ExitCode::SUCCESS,
    };

    agent.store().flush()?;
    Ok(code)
}

fn build_trigger(args: &TriggerArgs, data: Value) -> Result<Trigger> {
    let sender = Address::new(args.from.as_str()).context("invalid --from address")?;
    let mut trigger = Trigger::new(args.unit.as_str(), sender).with_data(data);
    if args.attach > 0 {
        trigger = trigger.with_payment(AssetRef::Base, args.attach);
    }
    Ok(trigger)
}

/// Run the trigger and print its outcome. Bounces exit with status 2.
fn report<S: StateStore>(agent: &RatingAgent<S>, trigger: &Trigger) -> Result<ExitCode> {
    let outcome = agent.handle(trigger);
    print_json(&outcome)?;
    match outcome {
        TriggerOutcome::Committed(_) => {
            info!(target: "cli", "Trigger {} committed", trigger.unit);
            Ok(ExitCode::SUCCESS)
        }
        TriggerOutcome::Bounced(_) => Ok(ExitCode::from(2)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs go to stderr so stdout carries only JSON.
fn init_logging(config: &CliConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
