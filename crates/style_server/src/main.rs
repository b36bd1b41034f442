use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();

    let config = match style_service::config::load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            tracing::error!("Set your Gemini API key before running the server,");
            tracing::error!("e.g. export GEMINI_API_KEY='your_api_key_here'");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting StyleAI backend (model: {}, storage: {:?}, port: {})",
        config.model,
        config.storage_mode,
        config.port
    );

    if let Err(e) = style_service::server::run(config).await {
        tracing::error!("Failed to run StyleAI backend: {e}");
        std::process::exit(1);
    }
}
