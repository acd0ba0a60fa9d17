//! # Permission Check
//!
//! Evaluates policy identifiers against a set of permission claims from the
//! command line and prints the outcome as JSON. Exits with status 1 on Deny.
//!
//! ```text
//! permission-check --policy PERMISSION_1_ride.book_ride.view \
//!     --permission ride.book --permission ride.view
//! ```
//!
//! Configuration comes from `--config <file>` (JSON) or, without it, from the
//! `AUTHZ_*` environment variables. Log level follows `RUST_LOG` (default: info).

use anyhow::{Context, Result};
use clap::Parser;
use permission_authz::{AuthorizationGate, ClaimSet, GateConfig};
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CheckArgs {
    /// Policy identifier required by the endpoint. Repeat for several policies.
    #[arg(long = "policy", short = 'p', required = true)]
    policies: Vec<String>,

    /// Permission claim held by the caller. Repeatable.
    #[arg(long = "permission", short = 'g')]
    permissions: Vec<String>,

    /// Treat the caller as unauthenticated.
    #[arg(long)]
    anonymous: bool,

    /// Path to a JSON gate configuration.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

fn run(args: CheckArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => GateConfig::from_file(path)
            .with_context(|| format!("load config from {}", path.display()))?,
        None => GateConfig::from_env().context("load config from environment")?,
    };

    let gate = AuthorizationGate::new(config).context("build authorization gate")?;

    let mut claims = ClaimSet::with_claims(&gate.config().claim_type, args.permissions);
    claims.authenticated = !args.anonymous;

    let outcome = gate.authorize(args.policies.as_slice(), &claims);

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("encode outcome")?
    );

    Ok(outcome.is_allowed())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CheckArgs::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("permission-check failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}
