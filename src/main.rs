mod analytics;
mod config;
mod feed;
mod sentiment;
mod store;
mod web;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandpulse=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = config::AppConfig::load()?;

    // Durable state comes back from the mention log.
    let seeded = store::log::replay(&config.storage.data_dir)?;

    let (change_tx, _) = broadcast::channel::<store::ChangeEvent>(256);
    let mention_store = Arc::new(store::MentionStore::new(seeded, change_tx.clone()));
    let settings = Arc::new(store::SettingsStore::load(&config.storage.data_dir)?);

    let backend = Arc::new(sentiment::HttpChatBackend::new(&config.llm));
    let analyzer = Arc::new(sentiment::SentimentAnalyzer::new(backend));

    // Log writer persists every change it sees on the broadcast feed.
    let log_writer = store::LogWriter::new(&config.storage.data_dir);
    let log_rx = change_tx.subscribe();
    let writer_handle = tokio::spawn(async move {
        if let Err(e) = log_writer.run(log_rx).await {
            tracing::error!("Mention log writer error: {:#}", e);
        }
    });

    let app_state = web::state::AppState {
        store: mention_store,
        settings,
        analyzer,
        recent_limit: config.web.recent_limit,
    };
    let router = web::create_router(app_state);
    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let web_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Web server error: {:#}", e);
        }
    });

    // Wait for any task to finish (shouldn't under normal operation)
    tokio::select! {
        _ = writer_handle => info!("Log writer task ended"),
        _ = web_handle => info!("Web server ended"),
    }

    Ok(())
}
