//! Money Manager main entry point

use anyhow::Context;
use clap::Parser;
use moneyview_api::start_server;
use moneyview_config::Config;
use moneyview_core::{Dashboard, FileStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "moneyview")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight personal-finance dashboard over a spreadsheet export", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print a default configuration file and exit
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = Config::load(args.config.clone())
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level)).init();
    log::info!("Config loaded: storage={}", config.storage.path.display());

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store = FileStore::open(&config.storage.path).context("Failed to open storage")?;
        log::info!("Using store {}", store.path().display());
        let dashboard = Arc::new(Dashboard::new(&config, Arc::new(store))?);

        if dashboard.load_cache() {
            log::info!("Cached data loaded");
        } else {
            log::info!("No cached data");
        }

        if dashboard.needs_setup() {
            log::warn!("No data source configured; open /setup to connect a sheet");
        } else {
            let background = dashboard.clone();
            tokio::spawn(async move {
                let outcome = background.refresh().await;
                log::info!("Initial refresh: {:?}", outcome);
            });
        }

        start_server(config, dashboard).await
    })
}
