use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use carebill_api::config::ApiConfig;
use carebill_api::state::AppState;
use carebill_storage::s3::S3Store;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;

    let client = carebill_storage::client::build_client(config.region.as_deref()).await;
    let store = S3Store::new(client, config.bucket.clone());
    tracing::info!(bucket = %config.bucket, issuer = %config.jwt_issuer, "starting carebill api");

    let state = AppState::new(Arc::new(store), &config);
    let app = carebill_api::router(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
