//! Collect every page of a list method and print the aggregate as JSON.
//!
//! ```text
//! vkcollect wall.get owner_id=1 count=250
//! vkcollect groups.getMembers group_id=1 --server-auth
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;
use vkclient_domain::{Expiry, Params, Session};
use vkclient_infra::config;
use vkclient_infra::observability::logging;
use vkclient_infra::VkClient;

#[derive(Parser, Debug)]
#[command(name = "vkcollect", version, about = "Collect every page of a VK list method")]
struct Cli {
    /// Method to collect, e.g. `wall.get`
    method: String,

    /// Method parameters as `key=value`; `offset` and `count` bound the run
    #[arg(value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Obtain an application token with the client credentials flow first
    #[arg(long)]
    server_auth: bool,

    /// Use an existing access token
    #[arg(long, env = "VKCLIENT_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Read configuration from this file instead of the environment
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

/// Integers are sent as numbers so `offset`/`count` drive pagination; the
/// rest stays text.
fn to_params(pairs: Vec<(String, String)>) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| {
            let value = value.parse::<u64>().map(Value::from).unwrap_or(Value::String(value));
            (key, value)
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone())),
        None => config::load(),
    }
    .context("failed to load configuration")?;
    logging::init(&config.logging);

    let client = VkClient::new(config).context("failed to build client")?;

    if let Some(token) = &cli.token {
        client.set_session(Session::new(token.clone(), None, Expiry::Never));
    }
    if cli.server_auth {
        client.server_auth().await.context("client credentials flow failed")?;
    }
    if cli.token.is_none() && !cli.server_auth && !vkclient_infra::api::is_open_method(&cli.method)
    {
        bail!("`{}` needs an access token: pass --token or --server-auth", cli.method);
    }

    let collected = client
        .collect(&cli.method, to_params(cli.params))
        .await
        .with_context(|| format!("collecting `{}` failed", cli.method))?;
    info!(method = %cli.method, pages = collected.pages, items = collected.items.len(), "done");

    let output = collected.into_value();
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
