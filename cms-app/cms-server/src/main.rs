use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{error, info, warn};

use cms_api::{build_router, AppState};
use cms_core::repositories::{MenuItemRepository, MenuLocationRepository};
use cms_core::services::{MenuItemService, MenuLocationService};
use cms_infrastructure::{create_pool, run_migrations, PgMenuItemRepository, PgMenuLocationRepository};
use cms_security::JwtService;
use cms_shared::config::{AppConfig, CorsSettings};
use cms_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (reads .env first)
    let config = AppConfig::load()?;

    // Initialize telemetry
    init_telemetry(&config.log)?;

    info!("{} starting in {} mode...", config.app.name, config.app.env);

    // Connect to Database
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    // Wire repositories and services
    let item_repo: Arc<dyn MenuItemRepository> = Arc::new(PgMenuItemRepository::new(pool.clone()));
    let location_repo: Arc<dyn MenuLocationRepository> =
        Arc::new(PgMenuLocationRepository::new(pool.clone()));

    if config.is_production() && config.jwt.secret.len() < 32 {
        warn!("JWT secret is shorter than 32 bytes");
    }

    let state = AppState {
        menu_items: Arc::new(MenuItemService::new(item_repo.clone(), location_repo.clone())),
        menu_locations: Arc::new(MenuLocationService::new(location_repo, item_repo)),
        jwt: Arc::new(JwtService::new(&config.jwt.secret, config.jwt.issuer.clone())),
        db: Some(pool),
    };

    let app = with_layers(build_router(state), &config.cors)?;

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn with_layers(router: Router, cors: &CorsSettings) -> anyhow::Result<Router> {
    let cors_layer = if cors.allowed_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        // Explicit origins so the admin dashboard can send the token cookie
        let origins = cors
            .allowed_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new().allow_origin(origins).allow_credentials(true)
    };

    let cors_layer = cors_layer
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(router
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
