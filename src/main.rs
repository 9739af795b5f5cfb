mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;
use std::io;
use std::sync::atomic::Ordering;

use api::AppState;
use config::NodeConfig;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let state = web::Data::new(AppState::new(&config).map_err(io::Error::other)?);
    let shutdown = state.shutdown.clone();

    info!(
        "⛓️ Starting ledger node {} at http://{}:{} (difficulty {})",
        config.node_address,
        config.host,
        config.port,
        blockchain::DEFAULT_DIFFICULTY
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    // Let any proof search still running on the blocking pool give up.
    shutdown.store(true, Ordering::Relaxed);
    Ok(())
}
