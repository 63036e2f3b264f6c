use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use auth_cell::AuthService;
use booking_cell::{BookingServices, BookingView};
use scheduler_cell::{SchedulerApiClient, SchedulerView};
use shared_config::AppConfig;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting vet clinic portal");

    // Load configuration
    let config = AppConfig::from_env();

    // Session first, so the booking view mounts with whatever was persisted
    let auth = Arc::new(AuthService::new(&config));
    auth.restore_session().await;

    let booking = Arc::new(BookingView::mount(BookingServices::new(&config, auth)).await);
    let scheduler = Arc::new(SchedulerView::mount(SchedulerApiClient::new(&config)).await);

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router::create_router(booking.clone(), scheduler)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    let listener = match TcpListener::bind(config.portal_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.portal_addr, e);
            return;
        }
    };
    info!("Listening on {}", config.portal_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    // Handlers hold no clones once the server is gone
    match Arc::try_unwrap(booking) {
        Ok(view) => view.teardown().await,
        Err(_) => info!("Booking view still shared at shutdown; dropping it releases the subscription"),
    }
    info!("Portal stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
