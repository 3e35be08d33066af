use creator_orbit::{
    AppState, Config, KvStore,
    alert::TerminalBell,
    habits::default_habits,
    inspiration::GeminiClient,
    router,
    storage::{load_check_ins, load_notes},
    update::AppModel,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let store = KvStore::new(&config.data_dir);
    tokio::fs::create_dir_all(store.dir()).await?;

    let check_ins = load_check_ins(&store).await;
    let notes = load_notes(&store).await;
    info!(
        days = check_ins.len(),
        notes = notes.len(),
        "loaded data from {}",
        store.dir().display()
    );

    let generator = GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        config.gemini_api_key.clone(),
    );
    let model = AppModel::new(default_habits(), check_ins, notes);
    let state = AppState::spawn(store, model, Arc::new(generator), Arc::new(TerminalBell));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
