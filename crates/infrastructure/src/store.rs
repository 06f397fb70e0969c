use async_trait::async_trait;
use domain::{NewTodo, Todo, TodoError, TodoId};
use thiserror::Error;

/// ストア層のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// IDがストアのID形式（ULID）として解釈できない
    #[error("Cast to ULID failed for value \"{0}\"")]
    InvalidId(String),

    /// スロットリングなど一時的な障害（リトライ対象）
    #[error("Store temporarily unavailable: {0}")]
    Unavailable(String),

    /// 書き込みが反映されたかどうか分からない障害（リトライ対象）
    #[error("Store outcome unknown: {0}")]
    Indeterminate(String),

    /// 保存済みデータを復元できない
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::Indeterminate(_)
        )
    }
}

impl From<StoreError> for TodoError {
    fn from(error: StoreError) -> Self {
        TodoError::Store(error.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// IDをストアのID形式として検証する
pub fn parse_store_id(id: &TodoId) -> StoreResult<ulid::Ulid> {
    ulid::Ulid::from_string(id.as_str()).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// ドキュメントストアの基本操作
///
/// 単一ドキュメントの書き込みの原子性はストアが保証する。同一IDへの並行更新は
/// 後勝ちとなる。
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// ログ用のバックエンド名
    fn backend_name(&self) -> &'static str;

    /// 全件取得（順序はストアの自然順）
    async fn find_all(&self) -> StoreResult<Vec<Todo>>;

    /// 新規挿入。IDはストアが採番する
    async fn insert(&self, new_todo: NewTodo) -> StoreResult<Todo>;

    async fn find_by_id(&self, id: &TodoId) -> StoreResult<Option<Todo>>;

    /// 既存アイテムを置き換える。対象が既に存在しなければ `false`
    async fn replace(&self, todo: &Todo) -> StoreResult<bool>;

    /// 削除する。対象が存在しなければ `false`
    async fn delete_by_id(&self, id: &TodoId) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_id() {
        let id = TodoId::new();
        assert!(parse_store_id(&id).is_ok());

        let bad = TodoId::from_string("123".to_string());
        assert_eq!(
            parse_store_id(&bad),
            Err(StoreError::InvalidId("123".to_string()))
        );
    }

    #[test]
    fn test_store_error_converts_to_database_error() {
        let error: TodoError = StoreError::InvalidId("abc".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Database Error: Cast to ULID failed for value \"abc\""
        );
    }

    #[test]
    fn test_only_transient_errors_are_retryable() {
        assert!(StoreError::Unavailable("throttled".to_string()).is_retryable());
        assert!(StoreError::Indeterminate("internal error".to_string()).is_retryable());
        assert!(!StoreError::Backend("denied".to_string()).is_retryable());
        assert!(!StoreError::InvalidId("x".to_string()).is_retryable());
    }
}
