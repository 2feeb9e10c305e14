//! VaultBank API Server
//!
//! REST API server for the VaultBank identity and wallet platform.
//!
//! # Features
//!
//! - Password registration and login with JWT bearer sessions
//! - Per-user wallet accounts with globally unique addresses
//! - OpenAPI documentation with Swagger UI
//! - Prometheus metrics export
//! - Graceful shutdown handling
//! - Health and readiness endpoints
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! vaultbank-api-server
//!
//! # Start with custom config
//! vaultbank-api-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! VAULTBANK__SERVER__PORT=8000 vaultbank-api-server
//! ```

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use clap::Parser;
use serde::Serialize;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultbank_api::{create_router, ApiConfig, AppState, WalletPolicy};
use vaultbank_auth::{AuthConfig, AuthService, JwtConfig, PasswordConfig};
use vaultbank_db::{Database, DatabaseConfig as DbConfig};

use crate::config::ServerConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// VaultBank API Server - identity and wallet account service
#[derive(Parser, Debug)]
#[command(name = "vaultbank-api-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "VAULTBANK_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "VAULTBANK_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "VAULTBANK_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VAULTBANK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "VAULTBANK_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// JWT secret key
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Enable development mode (relaxed security)
    #[arg(long, env = "VAULTBANK_DEV_MODE")]
    dev_mode: bool,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(db_url) = args.database_url {
        server_config.database.postgres_url = db_url;
    }
    if let Some(jwt_secret) = args.jwt_secret {
        server_config.auth.jwt_secret = jwt_secret;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    // Initialize logging
    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting VaultBank API Server"
    );

    // Validate configuration
    validate_config(&server_config, args.dev_mode)?;

    // Initialize database
    let db = init_database(&server_config.database).await?;

    // Initialize auth service
    let auth = init_auth(&server_config.auth)?;

    // Create application state
    let policy = WalletPolicy {
        max_wallets_per_user: server_config.wallet.max_wallets_per_user,
        allowed_currencies: server_config.wallet.allowed_currencies.clone(),
    };
    let state = Arc::new(AppState::new(
        Arc::new(db.user_repo()),
        Arc::new(db.wallet_repo()),
        auth,
        policy,
    ));

    // Create API configuration
    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_compression: server_config.api.enable_compression,
        enable_tracing: server_config.api.enable_tracing,
    };

    // Create router, with the readiness probe served directly by the binary
    let app = create_router(state, api_config).merge(readiness_routes(db.clone()));

    // Start metrics exporter if enabled
    if server_config.metrics.enabled {
        start_metrics_exporter(&server_config.metrics)?;
    }

    // Get bind address
    let addr = server_config.server.socket_addr();

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    // Check JWT secret in production
    if !dev_mode && config.auth.jwt_secret == "change-me-in-production" {
        anyhow::bail!(
            "JWT secret must be changed in production. Set JWT_SECRET environment variable."
        );
    }

    if config.wallet.allowed_currencies.is_empty() {
        anyhow::bail!("At least one allowed currency must be configured");
    }

    Ok(())
}

/// Initialize database connection
async fn init_database(config: &config::DatabaseConfig) -> anyhow::Result<Database> {
    tracing::info!("Connecting to database...");

    let db_config = DbConfig {
        postgres_url: config.postgres_url.clone(),
        pg_max_connections: config.max_connections,
        pg_min_connections: config.min_connections,
        pg_acquire_timeout_secs: config.connect_timeout_secs,
    };

    let db = Database::connect(&db_config).await?;

    tracing::info!("Database connected successfully");

    // Run migrations
    if config.run_migrations {
        db.migrate().await?;
        tracing::info!("Database migrations applied");
    }

    // Run health check
    let health = db.health_check().await?;
    if !health.healthy {
        anyhow::bail!("Database health check failed");
    }

    tracing::info!(postgres = health.postgres, "Database health check passed");

    Ok(db)
}

/// Initialize authentication service
fn init_auth(config: &config::AuthSettings) -> anyhow::Result<Arc<AuthService>> {
    let auth_config = AuthConfig {
        jwt: JwtConfig {
            secret: config.jwt_secret.clone(),
            token_ttl: Duration::from_secs(config.token_ttl_secs),
        },
        password: PasswordConfig::default(),
    };

    if let Err(problems) = auth_config.validate() {
        anyhow::bail!("Invalid auth configuration: {}", problems.join("; "));
    }

    tracing::info!(
        token_ttl_secs = config.token_ttl_secs,
        "Authentication service initialized"
    );

    Ok(Arc::new(AuthService::new(&auth_config)))
}

/// Start the Prometheus metrics exporter
fn start_metrics_exporter(config: &config::MetricsConfig) -> anyhow::Result<()> {
    if let Some(port) = config.port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;

        tracing::info!(
            port = port,
            path = %config.path,
            "Metrics exporter listening"
        );
    }

    Ok(())
}

// =============================================================================
// Readiness Probe
// =============================================================================

/// Readiness check response
#[derive(Debug, Serialize)]
struct ReadinessResponse {
    /// Overall status
    status: String,
    /// Database status
    database: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
struct ComponentStatus {
    /// Component name
    name: String,
    /// Status (healthy/unhealthy)
    status: String,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Routes that need the raw database handle rather than application state
fn readiness_routes(db: Database) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(db)
}

/// Returns 200 once the database answers, 503 otherwise.
async fn readiness_check(State(db): State<Database>) -> (StatusCode, Json<ReadinessResponse>) {
    let (database, ready) = match db.health_check().await {
        Ok(health) if health.postgres => (
            ComponentStatus {
                name: "PostgreSQL".to_string(),
                status: "healthy".to_string(),
                error: None,
            },
            true,
        ),
        Ok(_) => (
            ComponentStatus {
                name: "PostgreSQL".to_string(),
                status: "unhealthy".to_string(),
                error: Some("PostgreSQL health check failed".to_string()),
            },
            false,
        ),
        Err(e) => (
            ComponentStatus {
                name: "PostgreSQL".to_string(),
                status: "unhealthy".to_string(),
                error: Some(e.to_string()),
            },
            false,
        ),
    };

    let (status_code, status) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        status_code,
        Json(ReadinessResponse {
            status: status.to_string(),
            database,
        }),
    )
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
///
/// Returns as soon as a signal arrives so the server stops accepting new
/// connections and starts draining in-flight requests. A watchdog task
/// force-exits the process if draining outlives the grace period.
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    tracing::info!(
        grace_secs = grace.as_secs(),
        "Draining in-flight requests..."
    );

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!("Shutdown grace period expired, terminating");
        std::process::exit(1);
    });
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["vaultbank-api-server", "--port", "8000"]);
        assert_eq!(args.port, Some(8000));
    }

    #[test]
    fn test_development_config() {
        let config = ServerConfig::development();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_default_secret_rejected() {
        let config = ServerConfig::development();
        assert!(validate_config(&config, false).is_err());
        assert!(validate_config(&config, true).is_ok());
    }
}
