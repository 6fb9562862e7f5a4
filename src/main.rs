use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dircredit_webhook::auth::SignatureVerifier;
use dircredit_webhook::config::Config;
use dircredit_webhook::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A malformed key is a startup failure; an absent key runs fail-closed.
    let verifier = match &config.provider_public_key {
        Some(pem) => {
            let verifier = SignatureVerifier::from_pem(pem)?;
            tracing::info!("signature verification enabled");
            verifier
        }
        None => {
            tracing::warn!(
                "PROVIDER_PUBLIC_KEY is not set; every webhook delivery will be rejected as unauthenticated"
            );
            SignatureVerifier::disabled()
        }
    };

    let app = create_app(AppState { verifier });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
