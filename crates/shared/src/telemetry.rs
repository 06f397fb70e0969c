use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

/// ストア操作を計測してログに記録する
///
/// 失敗も debug レベルで記録する。重要度に応じたログは呼び出し側が
/// `log_todo_error` で出力する。
pub async fn trace_store_operation<T, E, Fut>(
    backend: &str,
    operation: &str,
    future: Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let span = tracing::debug_span!("store_operation", backend, operation);
    let start_time = Instant::now();
    let result = future.instrument(span).await;
    let duration_ms = start_time.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => {
            tracing::debug!(
                backend,
                operation,
                duration_ms,
                "ストア操作が完了しました"
            );
        }
        Err(e) => {
            tracing::debug!(
                backend,
                operation,
                duration_ms,
                error = %e,
                "ストア操作が失敗しました"
            );
        }
    }

    result
}
