//! Operator binary: serve the intake endpoint, bootstrap or inspect the database

use anyhow::Context;
use clap::{value_parser, Arg, Command};
use intake_server::{init_tracing, shutdown_signal, IntakeConfig, IntakeServer};
use intake_store::CatalogSeed;
use std::path::PathBuf;
use tracing::info;

fn cli() -> Command {
    Command::new("intake-server")
        .version(intake_server::VERSION)
        .about("SparkNest booking and contact intake")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(Command::new("serve").about("Run the HTTP intake endpoint (default)"))
        .subcommand(
            Command::new("init-db")
                .about("Create the database schema, optionally loading a catalog seed")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML catalog seed file"),
                ),
        )
        .subcommand(Command::new("stats").about("Print intake and catalog counts as JSON"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config_path = matches.get_one::<PathBuf>("config");
    let config = IntakeConfig::load(config_path.map(PathBuf::as_path))
        .context("loading configuration")?;
    init_tracing(&config.logging).context("installing tracing subscriber")?;

    match matches.subcommand() {
        Some(("init-db", args)) => {
            let server = IntakeServer::open(config)?;
            let store = server.store();
            info!(version = ?store.schema_version()?, "schema ready");
            if let Some(path) = args.get_one::<PathBuf>("seed") {
                let seed = CatalogSeed::load(path)
                    .with_context(|| format!("loading seed {}", path.display()))?;
                let report = store.seed_catalog(&seed)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Some(("stats", _)) => {
            let server = IntakeServer::open(config)?;
            let stats = server.store().stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => {
            IntakeServer::open(config)?.run(shutdown_signal()).await?;
        }
    }
    Ok(())
}
