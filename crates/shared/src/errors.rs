use domain::TodoError;
use thiserror::Error;

/// 起動時・設定時のエラー（プロセスを終了させる致命的エラー）
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// エラーの重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 利用者の入力ミスなど（情報レベル）
    Info,
    /// 存在しないリソースへの操作
    Warning,
    /// バックエンド障害
    Error,
}

/// サービスエラーの重要度を判定
pub fn severity_of(error: &TodoError) -> ErrorSeverity {
    match error {
        TodoError::Domain(_) => ErrorSeverity::Info,
        TodoError::NotFound(_) => ErrorSeverity::Warning,
        TodoError::Store(_) => ErrorSeverity::Error,
    }
}

/// 重要度に応じたレベルでサービスエラーをログに記録
pub fn log_todo_error(error: &TodoError, operation: &str) {
    let kind = error.kind();

    match severity_of(error) {
        ErrorSeverity::Error => {
            tracing::error!(operation, kind, error = %error, "ストア操作に失敗しました");
        }
        ErrorSeverity::Warning => {
            tracing::warn!(operation, kind, error = %error, "対象のToDoが見つかりません");
        }
        ErrorSeverity::Info => {
            tracing::info!(operation, kind, error = %error, "入力検証エラー");
        }
    }
}
