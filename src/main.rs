use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{resolve_config_from_env, router, AppState};
use api_shared::HealthService;

/// Main entry point for the clinic portal
///
/// Loads `.env`, resolves configuration once and serves the REST API.
///
/// # Environment Variables
/// - `PORTAL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PORTAL_STORE_PATH`: file used by file-backed stores (default: ".portal/session.json")
/// - `PORTAL_LOGIN_PATH`: login screen path (default: "/auth/login")
/// - `PORTAL_ROUTES_FILE`: optional YAML route table replacing the built-in one
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portal_run=info".parse()?)
                .add_directive("portal_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PORTAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = resolve_config_from_env()?;

    tracing::info!("++ Starting clinic portal REST on {}", rest_addr);
    tracing::info!(
        "++ Login path {}, {} route rules",
        cfg.login_path(),
        cfg.routes().rules().len()
    );
    tracing::info!("++ {}", HealthService::check_health().message);

    let app: axum::Router = router(AppState::new(&cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
