use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::HirelinkError;
use crate::service::{Hiring, blocking};
use crate::utils::logging::init_tracing;

mod demo;

#[derive(Parser)]
#[command(name = "hirelink", about = "workers, resumes and vacancies over SQLite")]
struct Cmd {
    /// Configuration file; missing files fall back to defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides `database.url`.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Drop and recreate every table (destroys all data).
    Bootstrap,
    /// Bootstrap, then load the demo data.
    Seed,
    /// Seed, then run every scenario and print the results as JSON.
    Demo,
    /// Serve the HTTP read API.
    Serve,
}

/// Entry point of the binary. Blocking commands use their own runtime, so this
/// must not be called from inside an async context.
pub fn run() -> Result<(), HirelinkError> {
    let args = Cmd::parse();

    let mut cfg = Config::load_from(&args.config)?;
    if let Some(url) = args.database_url {
        cfg.database.url = url;
    }
    init_tracing(&cfg.basic.loglevel);

    info!(
        config = %args.config.display(),
        database_url = %cfg.database.url,
        pool_size = cfg.database.pool_size,
        max_overflow = cfg.database.max_overflow,
        echo = cfg.database.echo,
        loglevel = %cfg.basic.loglevel,
    );

    match args.command {
        Some(SubCommandType::Bootstrap) => {
            let hiring = blocking::Hiring::connect(&cfg.database)?;
            hiring.bootstrap()?;
            hiring.close();
        }
        Some(SubCommandType::Seed) => {
            let hiring = blocking::Hiring::connect(&cfg.database)?;
            hiring.seed_all()?;
            hiring.close();
        }
        Some(SubCommandType::Demo) => {
            demo::run(&cfg)?;
        }
        Some(SubCommandType::Serve) => {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            rt.block_on(async {
                let hiring = Hiring::connect(&cfg.database).await?;
                crate::server::serve(&cfg.basic, hiring).await
            })?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
