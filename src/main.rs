use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use fan_map_board::common::BoardEvent;
use fan_map_board::config::{self, AppConfig, StoreConfig};
use fan_map_board::geo::{self, PositionOptions};
use fan_map_board::network::GatewayWorker;
use fan_map_board::storage::{MessageStore, RestStore};
use fan_map_board::ui::BoardApp;

const GATEWAY_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(
    name = "fan_map_board",
    version,
    about = "Drop a pin on the world map and leave a message for your favourite group"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    // Without the store there is nothing to show, so this is the one fatal error.
    let store_config = StoreConfig::from_env().inspect_err(|err| {
        log::error!("Message store is not configured: {err}");
    })?;
    let store = RestStore::new(&store_config, &app_config.table)?;
    log::info!("Using message table at {}", store.table_url());

    run_board(app_config, Arc::new(store)).await?;
    Ok(())
}

async fn run_board(app_config: AppConfig, store: Arc<dyn MessageStore>) -> Result<(), eframe::Error> {
    // UI -> store gateway
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Background tasks -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let gateway = tokio::spawn(GatewayWorker::new(store, event_tx.clone(), cmd_rx).run());

    let geolocation = app_config.geolocation.clone();
    let fallback = app_config.fallback_center;
    tokio::spawn(async move {
        let provider = geo::provider_for(&geolocation);
        let outcome = geo::bootstrap(provider.as_deref(), &PositionOptions::default(), fallback).await;
        if event_tx.send(BoardEvent::Located(outcome)).await.is_err() {
            log::warn!("Board closed before the location was known");
        }
    });

    let runtime = Handle::current();
    let options = eframe::NativeOptions::default();

    let result = eframe::run_native(
        "Fan Map Board",
        options,
        Box::new(move |cc| {
            log::info!("Board window opened");
            Ok(Box::new(BoardApp::new(cc, runtime, &app_config, cmd_tx, event_rx)))
        }),
    );

    // The window owned the only command sender; the gateway drains and exits.
    if tokio::time::timeout(GATEWAY_SHUTDOWN_GRACE, gateway).await.is_err() {
        log::warn!("Store gateway still busy after shutdown grace period");
    }

    result
}
