use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use liveboard_server::config::AppConfig;
use liveboard_server::irail::{IrailApi, IrailClient, MockIrailClient};
use liveboard_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("liveboard_server=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    match &config.mock_dir {
        Some(dir) => {
            let api = MockIrailClient::from_dir(dir).expect("Failed to load mock fixtures");
            info!(dir = %dir.display(), fixtures = api.len().await, "serving mock iRail data");
            serve(api, &config).await;
        }
        None => {
            let api = IrailClient::new(config.irail.clone()).expect("Failed to create iRail client");
            info!(base_url = %config.irail.base_url, "using iRail API");
            serve(api, &config).await;
        }
    }
}

async fn serve<A: IrailApi>(api: A, config: &AppConfig) {
    let state = AppState::new(api, config.default_station.clone());
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.addr, "liveboard listening on http://{}", config.addr);
    info!("  GET  /                     - Liveboard (?station=&arrdep=)");
    info!("  GET  /train/:id/:station   - Train detail");
    info!("  GET  /health               - Health check");

    axum::serve(listener, app).await.expect("Server error");
}
