use thiserror::Error;

/// 入力検証エラー
///
/// 表示文字列はそのままエラーエンベロープの `message` としてクライアントへ返る。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("ID is required")]
    MissingId,

    #[error("Task must be a non-empty string")]
    InvalidTask,

    #[error("Owner must be a non-empty string")]
    InvalidOwner,

    #[error("Completed must be a boolean value")]
    InvalidCompleted,

    #[error("Update body must be a JSON object")]
    InvalidUpdateBody,

    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),
}

#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// 対象IDのアイテムが存在しない（IDはログ用に保持）
    #[error("Todo not found")]
    NotFound(String),

    #[error("Database Error: {0}")]
    Store(String),
}

impl TodoError {
    /// エラーの分類名（ログ出力用）
    pub fn kind(&self) -> &'static str {
        match self {
            TodoError::Domain(_) => "validation",
            TodoError::NotFound(_) => "not_found",
            TodoError::Store(_) => "store",
        }
    }
}
