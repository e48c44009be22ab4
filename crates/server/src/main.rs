//! Markethall server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use markethall_api::{AppState, router as api_router};
use markethall_common::Config;
use markethall_core::{
    CaptchaService, EmailService, EnquiryService, NotificationService, NotificationWorkerContext,
    OrderService, ProfessionalService,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "markethall=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting markethall server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = markethall_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    markethall_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Start the notification worker
    let email_service = EmailService::from_config(&config.email)?;
    let notification_service = NotificationService::new();
    let notification_sender = notification_service.sender();
    notification_service.start(NotificationWorkerContext {
        email: email_service,
        admin_address: config.notifications.admin_address.clone(),
    });
    info!("Notification worker started");

    // Initialize services
    let captcha_service = CaptchaService::new(&config.captcha);

    let professional_service = ProfessionalService::new(
        Arc::clone(&db),
        captcha_service.clone(),
        notification_sender.clone(),
    );
    let order_service = OrderService::new(
        Arc::clone(&db),
        captcha_service.clone(),
        notification_sender.clone(),
    );
    let enquiry_service = EnquiryService::new(db, captcha_service, notification_sender);

    let state = AppState {
        professional_service,
        order_service,
        enquiry_service,
    };

    // Build router
    let app = Router::new()
        .merge(markethall_api::endpoints::health::router())
        .nest("/api", api_router())
        .layer(middleware::from_fn(
            markethall_api::middleware::caller_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from((config.server.host.parse::<std::net::IpAddr>()?, config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
