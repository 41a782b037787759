use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use docchat_server::config::{Runtime, ServerConfig};
use docchat_server::state::AppState;
use docchat_server::{cors_layer, create_router};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        region = %config.region,
        model_id = %config.model_id,
        storage = ?config.storage,
        extractor = ?config.extractor,
        runtime = ?config.runtime,
        "starting docchat"
    );

    let state = AppState::from_config(&config).await?;
    let app = create_router(state).layer(cors_layer(config.cors_origin.as_deref())?);

    match config.runtime {
        Runtime::Lambda => lambda_http::run(app).await.map_err(|e| eyre::eyre!(e)),
        Runtime::Standalone => {
            let listener = TcpListener::bind(config.bind_addr).await?;
            tracing::info!(addr = %config.bind_addr, "listening");
            axum::serve(listener, app).await?;
            Ok(())
        }
    }
}
