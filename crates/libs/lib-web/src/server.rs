//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! Creates the Axum router, registers all routes, applies middleware, and
//! starts the HTTP server with graceful shutdown on ctrl-c.

// region: --- Imports
use crate::handlers::{chats, messages};
use crate::middleware::{log_requests, require_auth, stamp_req};
use crate::relay::{socket::relay_websocket, PresenceRelay};
use axum::{
    routing::{get, post, put},
    Router,
};
use lib_core::config::DirectoryMode;
use lib_core::{create_pool, Config, DbPool};
use lib_directory::{HttpDirectory, SharedDirectory, StaticDirectory};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub directory: SharedDirectory,
    pub relay: Arc<PresenceRelay>,
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for SharedDirectory {
    fn from_ref(state: &AppState) -> Self {
        state.directory.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<PresenceRelay> {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5000")
    pub bind_address: String,
    /// Database migrations path
    pub migrations_path: &'static str,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            migrations_path: "./migrations",
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - Database connection or migrations fail
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
        });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global tracing subscriber");

    info!("CHAT BACKEND STARTING");

    dotenvy::dotenv().ok();

    info!("Loading configuration...");
    let app_config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    app_config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Database URL: {}", app_config.database_url);

    // Ensure data directory exists for SQLite database
    if let Some(db_path) = app_config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {:?}", parent);
            }
        }
    }

    info!("Connecting to database...");
    let pool = create_pool().await?;

    info!("Running database migrations from: {}", config.migrations_path);
    let migrator =
        sqlx::migrate::Migrator::new(std::path::Path::new(config.migrations_path)).await?;
    migrator.run(&pool).await?;
    info!("Migrations complete");

    // Account directory client (external collaborator)
    let directory: SharedDirectory = match app_config.directory_mode {
        DirectoryMode::Http => {
            let url = app_config
                .directory_url
                .clone()
                .expect("validated: DIRECTORY_URL is set in http mode");
            info!("Account directory: {}", url);
            Arc::new(HttpDirectory::new(url))
        }
        DirectoryMode::Static => {
            info!("Account directory: static (development mode)");
            Arc::new(StaticDirectory::new())
        }
    };

    // Presence relay: single-process, in-memory
    let relay = Arc::new(PresenceRelay::new(app_config.typing_include_sender));
    info!(
        "Presence relay initialized (typing echo: {})",
        app_config.typing_include_sender
    );

    let state = AppState {
        db: pool,
        config: app_config,
        directory,
        relay,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!("SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server closed");
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState) -> Router {
    use axum::http::Method;

    // Browsers are served from arbitrary origins; bearer auth, not cookies
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    let protected = Router::new()
        .route("/api/chats", get(chats::list_chats).post(chats::access_chat))
        .route("/api/chats/group", post(chats::create_group_chat))
        .route("/api/chats/rename", put(chats::rename_chat))
        .route("/api/chats/members/add", put(chats::add_member))
        .route("/api/chats/members/remove", put(chats::remove_member))
        .route("/api/messages", post(messages::send_message))
        .route(
            "/api/messages/{id}",
            get(messages::list_messages)
                .put(messages::edit_message)
                .delete(messages::delete_message),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        // Relay connections authenticate through their own `setup` handshake
        .route("/api/ws", get(relay_websocket))
        .route("/health", get(|| async { "OK" }))
        .merge(protected)
        .with_state(state)
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
}

/// Resolves when ctrl-c (SIGINT) is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install ctrl-c handler: {}", e);
    } else {
        info!("SIGINT received: closing server...");
    }
}

/// Log server information
fn log_server_info() {
    info!("CHATS:");
    info!("   • GET  /api/chats");
    info!("   • POST /api/chats");
    info!("   • POST /api/chats/group");
    info!("   • PUT  /api/chats/rename");
    info!("   • PUT  /api/chats/members/add");
    info!("   • PUT  /api/chats/members/remove");
    info!("MESSAGES:");
    info!("   • GET    /api/messages/{{chat_id}}");
    info!("   • POST   /api/messages");
    info!("   • PUT    /api/messages/{{id}}");
    info!("   • DELETE /api/messages/{{id}}");
    info!("RELAY:");
    info!("   • GET  /api/ws");
    info!("HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
