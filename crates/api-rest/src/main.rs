//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, without loading `.env`.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `portal-run` binary is the usual
//! entry point.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{resolve_config_from_env, router, AppState};

/// Main entry point for the portal REST API server
///
/// # Environment Variables
/// - `PORTAL_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - plus those read by [`resolve_config_from_env`]
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PORTAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = resolve_config_from_env()?;

    tracing::info!("-- Starting portal REST API on {}", addr);

    let app = router(AppState::new(&cfg));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
