use clap::Parser;
use env_logger::Env;
use log::{error, info};
use mergington::configuration::{Args, Config};
use mergington::storage::DatabaseStorage;
use mergington::web_interface::WebServer;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    println!(
        "
==============================================================================
            Mergington High School Activities API v{}
==============================================================================
",
        env!("CARGO_PKG_VERSION")
    );

    info!("Importing configuration");

    let args = Args::parse();
    let config = Config::load(&args).unwrap_or_else(|e| {
        error!("Unable to import configuration: {}", e);
        std::process::exit(1);
    });

    info!("Configuration imported successfully");

    let storage = DatabaseStorage::from_config(&config)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to open the database: {}, exiting...", e);
            std::process::exit(1);
        });

    if let Err(e) = storage.bootstrap().await {
        error!("Unable to initialize the database: {}, exiting...", e);
        std::process::exit(1);
    }

    let server = WebServer::new(Arc::new(storage));
    server.start(config.socket_addr()).await;
}
