//! # Backend Service
//!
//! Thin entry point that delegates to lib-web for server setup.

use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ServerConfig {
        bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:5000".to_string()),
        migrations_path: "migrations",
    };

    start_server(config).await
}
