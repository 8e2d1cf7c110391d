//! `itop-automation` CLI entry-point.
//!
//! Available sub-commands:
//! - `run`   — run an iTop operation over a batch of items.
//! - `list`  — print a lookup list (organizations, persons, teams, locations).
//! - `check` — check the configured credentials.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{Batch, ExecutorConfig, NodeExecutor};
use itop::credentials::{SECRET_PASSWORD, SECRET_URL, SECRET_USERNAME};
use itop::{Credentials, ITopClient};
use nodes::{ExecutionContext, ITopNode};

#[derive(Parser)]
#[command(
    name = "itop-automation",
    about = "Create, read, update, delete and list iTop tickets, persons and organizations",
    version
)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Connection {
    /// Base URL of the iTop instance.
    #[arg(long, env = "ITOP_URL", global = true)]
    url: Option<String>,
    #[arg(long, env = "ITOP_USERNAME", global = true)]
    username: Option<String>,
    #[arg(long, env = "ITOP_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run an operation over a batch of items and print the output records.
    Run {
        /// JSON file with the shared parameter bag.
        #[arg(long)]
        params: PathBuf,
        /// JSON file with an array of per-item parameter overrides.
        #[arg(long)]
        items: Option<PathBuf>,
        /// Record failed items as `{error}` instead of aborting.
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Print a `{name, value}` lookup list.
    List {
        #[arg(value_enum)]
        kind: LookupKind,
    },
    /// Validate the credentials against the instance.
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum LookupKind {
    Organizations,
    Persons,
    Teams,
    Locations,
}

impl Connection {
    fn context(&self) -> ExecutionContext {
        let mut ctx = ExecutionContext::new("iTop");
        for (name, value) in [
            (SECRET_URL, &self.url),
            (SECRET_USERNAME, &self.username),
            (SECRET_PASSWORD, &self.password),
        ] {
            if let Some(value) = value {
                ctx = ctx.with_secret(name, value.as_str());
            }
        }
        ctx
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = cli.connection.context();
    let node = ITopNode::new();

    match cli.command {
        Command::Run {
            params,
            items,
            continue_on_fail,
        } => {
            let parameters: Map<String, Value> = read_json(&params)?;
            let batch = match items {
                Some(path) => Batch::new(parameters, read_json(&path)?),
                None => Batch::single(parameters),
            };

            info!("running {} item(s)", batch.items.len());
            let executor = NodeExecutor::new(Arc::new(node), ExecutorConfig { continue_on_fail });
            let output = executor.run(&batch, &ctx).await?;
            print_json(&output)?;
        }
        Command::List { kind } => {
            let entries = match kind {
                LookupKind::Organizations => node.list_organizations(&ctx).await?,
                LookupKind::Persons => node.list_persons(&ctx).await?,
                LookupKind::Teams => node.list_teams(&ctx).await?,
                LookupKind::Locations => node.list_locations(&ctx).await?,
            };
            print_json(&entries)?;
        }
        Command::Check => {
            let credentials = Credentials::from_secrets(&ctx.secrets)?;
            ITopClient::new(credentials)?.check_credentials().await?;
            println!("Credentials are valid.");
        }
    }

    Ok(())
}
