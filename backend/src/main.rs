//! Server entry-point: loads header rules, wires middleware, and serves the
//! greeting and health endpoints.

mod server;

use std::net::{IpAddr, SocketAddr};

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use header_guard::config::HeaderGuardSettings;
use header_guard::inbound::http::health::HealthState;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        HeaderGuardSettings::load_from_iter(std::env::args_os()).map_err(std::io::Error::other)?;
    let rules = settings.rule_set().map_err(std::io::Error::other)?;
    let host: IpAddr = settings.host().parse().map_err(std::io::Error::other)?;
    let bind_addr = SocketAddr::new(host, settings.port());

    let config = ServerConfig::new(bind_addr, rules);
    info!(bind_addr = %config.bind_addr(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
