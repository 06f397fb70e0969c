use anyhow::Result;
use shared::{init_tracing, AppError, Config};
use todo_server::{app_router, build_store, AppState, StaticAssets};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().map_err(|e| anyhow::anyhow!("トレーシングの初期化に失敗しました: {e}"))?;

    let config = Config::from_env()?;
    info!(
        environment = %config.environment,
        backend = config.store_backend.as_str(),
        "todo-server を起動します"
    );

    // ストアに到達できなければここで終了する
    let store = build_store(&config).await?;

    let app = app_router(AppState::with_store(store), &StaticAssets::from_config(&config));

    let listener = TcpListener::bind(config.bind_address)
        .await
        .map_err(AppError::from)?;
    info!("listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;

    info!("todo-server を停止しました");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "シャットダウンシグナルの待機に失敗しました");
        std::future::pending::<()>().await;
    }
    info!("シャットダウンシグナルを受信しました");
}
