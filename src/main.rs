use std::env;

use cost_dashboard::api::{AppState, create_router};
use cost_dashboard::config::ConfigLoader;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "./config/dashboard.yaml";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("COST_DASHBOARD_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let loader = match ConfigLoader::load(&config_path) {
        Ok(loader) => loader,
        Err(e) => {
            error!(path = %config_path, error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let bind_address = loader.config().server.bind_address.clone();
    let app = create_router(AppState::from_config(loader));

    let listener = match tokio::net::TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %bind_address, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(address = %bind_address, config = %config_path, "Cost dashboard listening");
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}
