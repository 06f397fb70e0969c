use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// サーバー用のトレーシングサブスクライバーを初期化
/// `RUST_LOG` 未設定時は info レベル、出力はJSON形式
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).json())
        .with(env_filter("info"))
        .try_init()?;

    Ok(())
}

/// CLI用: 標準エラーへ簡潔な形式で出力（デフォルト warn）
pub fn init_cli_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .with(env_filter("warn"))
        .try_init()?;

    Ok(())
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}
