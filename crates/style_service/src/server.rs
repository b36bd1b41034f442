use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use gemini_client::{GeminiClient, GeminiConfig, ImageModelClient};
use log::info;

use crate::config::AppConfig;
use crate::controllers::{image_controller, style_controller, system_controller};
use crate::storage::ImageStore;

pub struct AppState {
    pub image_client: Arc<dyn ImageModelClient>,
    pub image_store: ImageStore,
    pub model: String,
}

const DEFAULT_WORKER_COUNT: usize = 4;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(style_controller::config)
        .configure(image_controller::config)
        .configure(system_controller::config);
}

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting StyleAI backend...");

    let image_store = ImageStore::new(&config.data_dir, config.storage_mode);
    image_store.init().await?;

    let mut gemini_config = GeminiConfig::new(config.api_key.clone(), config.model.clone());
    gemini_config.timeout = config.upstream_timeout;
    let image_client: Arc<dyn ImageModelClient> = Arc::new(GeminiClient::new(gemini_config)?);

    let app_state = web::Data::new(AppState {
        image_client,
        image_store,
        model: config.model.clone(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(("0.0.0.0", config.port))?
    .run();

    info!(
        "StyleAI backend listening on http://0.0.0.0:{} (model: {})",
        config.port, config.model
    );

    server.await?;
    Ok(())
}
