use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{delete, get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod diet;
pub mod error;
pub mod feed;
pub mod profile;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use error::AppError;
use feed::Sources;
use routes::{
    add_record_handler, alerts_handler, delete_record_handler, diet_generate_handler,
    diet_list_handler, emergency_handler, health_handler, location_handler, login_handler,
    logout_handler, nearest_vets_handler, pet_handler, report_handler, resolve_alert_handler,
    signup_handler, update_pet_handler, vitals_handler, weekly_reports_handler,
};
use state::State;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let mut sources = Sources::mock(config.base_origin);
    let state = State::new(config, &mut sources)?;
    let ticker = feed::spawn(state.clone(), sources);

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(state.config.cors_max_age_secs));

    let app = app(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.abort();
    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/pet", get(pet_handler).put(update_pet_handler))
        .route("/pet/records", post(add_record_handler))
        .route("/pet/records/{id}", delete(delete_record_handler))
        .route("/vitals", get(vitals_handler))
        .route("/location", get(location_handler))
        .route("/emergency", get(emergency_handler))
        .route("/vets/nearest", get(nearest_vets_handler))
        .route("/alerts", get(alerts_handler))
        .route("/alerts/{id}/resolve", post(resolve_alert_handler))
        .route("/reports", get(report_handler))
        .route("/reports/weekly", get(weekly_reports_handler))
        .route("/diet", get(diet_list_handler).post(diet_generate_handler))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
