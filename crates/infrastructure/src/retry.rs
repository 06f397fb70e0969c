use crate::store::{StoreError, StoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// ストア操作のリトライ設定
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// 初回を含む試行回数の上限
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// 待機時間の上限（ミリ秒）
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            backoff_multiplier: 2.0,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// 各再試行の前に待つ時間の列（長さは `max_attempts - 1`）
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let retries = self.max_attempts.saturating_sub(1) as usize;
        std::iter::successors(Some(self.initial_delay_ms), move |&delay| {
            Some(((delay as f64 * self.backoff_multiplier) as u64).min(self.max_delay_ms))
        })
        .map(|ms| Duration::from_millis(ms.min(self.max_delay_ms)))
        .take(retries)
    }
}

/// `is_retryable` が真を返すエラーだけを指数バックオフで再試行する
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation: F,
    config: &RetryConfig,
    is_retryable: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delays = config.delays();
    let mut attempt = 1;

    loop {
        let error = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "再試行で成功しました");
                }
                return Ok(result);
            }
            Err(error) => error,
        };

        if !is_retryable(&error) {
            return Err(error);
        }

        let Some(delay) = delays.next() else {
            warn!(attempts = attempt, error = %error, "再試行の上限に達しました");
            return Err(error);
        };

        warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "一時的なエラーのため再試行します"
        );
        sleep(delay).await;
        attempt += 1;
    }
}

/// ストア操作用のリトライヘルパー（`StoreError::Unavailable` のみ再試行）
pub async fn retry_store_operation<F, Fut, T>(
    operation: F,
    config: &RetryConfig,
) -> Result<T, StoreError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, StoreError>>,
{
    retry_with_backoff(operation, config, StoreError::is_retryable).await
}

/// 非冪等な書き込みの試行履歴
///
/// 結果不明（`StoreError::Indeterminate`）の失敗が一度でもあれば、後続の試行で
/// 観測した「既に書き込み済み」の状態は自分の書き込みによるものとみなせる。
#[derive(Debug, Default)]
pub struct WriteAttempts {
    indeterminate: AtomicBool,
}

impl WriteAttempts {
    pub fn new() -> Self {
        Self::default()
    }

    /// 試行結果を記録してそのまま返す
    pub fn record<T>(&self, result: StoreResult<T>) -> StoreResult<T> {
        if let Err(StoreError::Indeterminate(_)) = &result {
            self.indeterminate.store(true, Ordering::SeqCst);
        }
        result
    }

    /// 以前の試行が反映済みの可能性があるか
    pub fn may_have_committed(&self) -> bool {
        self.indeterminate.load(Ordering::SeqCst)
    }
}
