use crate::dynamodb::{map_sdk_error, DynamoDbClient};
use crate::models::{item_to_todo, todo_to_item, DynamoDbKeys, TODO_ENTITY_TYPE};
use crate::retry::{retry_store_operation, WriteAttempts};
use crate::store::{parse_store_id, StoreError, StoreResult, TodoStore};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use domain::{NewTodo, Todo, TodoId};
use tracing::{debug, info};

/// DynamoDB 上のToDoリポジトリ
///
/// 1アイテム = 1ドキュメント（`PK = TODO#<id>`, `SK = CURRENT`）。
#[derive(Clone)]
pub struct DynamoTodoRepository {
    db: DynamoDbClient,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }

    /// テーブル到達性を確認してからリポジトリを返す
    pub async fn connect(db: DynamoDbClient) -> StoreResult<Self> {
        db.verify_table().await?;
        Ok(Self::new(db))
    }
}

#[async_trait]
impl TodoStore for DynamoTodoRepository {
    fn backend_name(&self) -> &'static str {
        "dynamodb"
    }

    async fn find_all(&self) -> StoreResult<Vec<Todo>> {
        let client = self.db.client();
        let table_name = self.db.table_name();

        retry_store_operation(
            || async move {
                let mut todos = Vec::new();
                let mut start_key = None;

                loop {
                    let output = client
                        .scan()
                        .table_name(table_name)
                        .filter_expression("EntityType = :entity_type")
                        .expression_attribute_values(
                            ":entity_type",
                            AttributeValue::S(TODO_ENTITY_TYPE.to_string()),
                        )
                        .set_exclusive_start_key(start_key)
                        .send()
                        .await
                        .map_err(map_sdk_error)?;

                    for item in output.items() {
                        todos.push(item_to_todo(item)?);
                    }

                    match output.last_evaluated_key() {
                        Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                        _ => break,
                    }
                }

                debug!(count = todos.len(), "ToDo一覧を取得しました");
                Ok(todos)
            },
            self.db.retry_config(),
        )
        .await
    }

    async fn insert(&self, new_todo: NewTodo) -> StoreResult<Todo> {
        let todo = new_todo.with_id(TodoId::new());
        let client = self.db.client();
        let table_name = self.db.table_name();
        let item = todo_to_item(&todo);
        let attempts = WriteAttempts::new();
        let attempts = &attempts;

        retry_store_operation(
            || {
                let item = item.clone();
                async move {
                    let result = client
                        .put_item()
                        .table_name(table_name)
                        .set_item(Some(item))
                        .condition_expression("attribute_not_exists(PK)")
                        .send()
                        .await;

                    match result {
                        Ok(_) => Ok(()),
                        Err(e)
                            if e.as_service_error()
                                .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
                        {
                            settle_insert_conflict(attempts, map_sdk_error(e))
                        }
                        Err(e) => attempts.record(Err(map_sdk_error(e))),
                    }
                }
            },
            self.db.retry_config(),
        )
        .await?;

        info!(todo_id = %todo.id, "ToDoを作成しました");
        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> StoreResult<Option<Todo>> {
        parse_store_id(id)?;
        let client = self.db.client();
        let table_name = self.db.table_name();
        let key = DynamoDbKeys::for_todo(id).to_key_map();

        let item = retry_store_operation(
            || {
                let key = key.clone();
                async move {
                    let output = client
                        .get_item()
                        .table_name(table_name)
                        .set_key(Some(key))
                        .consistent_read(true)
                        .send()
                        .await
                        .map_err(map_sdk_error)?;
                    Ok(output.item().cloned())
                }
            },
            self.db.retry_config(),
        )
        .await?;

        item.as_ref().map(item_to_todo).transpose()
    }

    async fn replace(&self, todo: &Todo) -> StoreResult<bool> {
        parse_store_id(&todo.id)?;
        let client = self.db.client();
        let table_name = self.db.table_name();
        let item = todo_to_item(todo);

        // 参照と保存の間に削除されたアイテムを復活させない
        retry_store_operation(
            || {
                let item = item.clone();
                async move {
                    let result = client
                        .put_item()
                        .table_name(table_name)
                        .set_item(Some(item))
                        .condition_expression("attribute_exists(PK)")
                        .send()
                        .await;

                    match result {
                        Ok(_) => Ok(true),
                        Err(e)
                            if e.as_service_error()
                                .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
                        {
                            Ok(false)
                        }
                        Err(e) => Err(map_sdk_error(e)),
                    }
                }
            },
            self.db.retry_config(),
        )
        .await
    }

    async fn delete_by_id(&self, id: &TodoId) -> StoreResult<bool> {
        parse_store_id(id)?;
        let client = self.db.client();
        let table_name = self.db.table_name();
        let key = DynamoDbKeys::for_todo(id).to_key_map();
        let attempts = WriteAttempts::new();
        let attempts = &attempts;

        let old = retry_store_operation(
            || {
                let key = key.clone();
                async move {
                    let result = client
                        .delete_item()
                        .table_name(table_name)
                        .set_key(Some(key))
                        .return_values(ReturnValue::AllOld)
                        .send()
                        .await
                        .map_err(map_sdk_error);
                    let output = attempts.record(result)?;
                    Ok(output.attributes().cloned())
                }
            },
            self.db.retry_config(),
        )
        .await?;

        let found = old.is_some_and(|attributes| !attributes.is_empty());
        let deleted = settle_delete(found, attempts);
        if deleted {
            info!(todo_id = %id, "ToDoを削除しました");
        }
        Ok(deleted)
    }
}

/// 挿入の条件不一致を解決する
///
/// IDは採番直後なので、結果不明の試行の後に既存アイテムが見つかればそれは
/// 自分の書き込みである。
fn settle_insert_conflict(attempts: &WriteAttempts, conflict: StoreError) -> StoreResult<()> {
    if attempts.may_have_committed() {
        debug!("結果不明の試行が反映済みのため挿入成功として扱います");
        Ok(())
    } else {
        Err(conflict)
    }
}

/// 旧属性が返らなかった削除でも、結果不明の試行があれば削除済みとみなす
fn settle_delete(found: bool, attempts: &WriteAttempts) -> bool {
    found || attempts.may_have_committed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryConfig;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 1,
            backoff_multiplier: 2.0,
            max_delay_ms: 5,
        }
    }

    fn conflict() -> StoreError {
        StoreError::Backend("ConditionalCheckFailedException".to_string())
    }

    /// 1回目は内部エラー（実際には書き込み済み）、2回目は条件不一致
    #[tokio::test]
    async fn test_insert_after_indeterminate_attempt_is_success() {
        let attempts = WriteAttempts::new();
        let attempts = &attempts;
        let counter = AtomicU32::new(0);
        let counter = &counter;

        let result = retry_store_operation(
            || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    attempts.record(Err(StoreError::Indeterminate("internal".to_string())))
                } else {
                    settle_insert_conflict(attempts, conflict())
                }
            },
            &fast_config(),
        )
        .await;

        assert_eq!(result, Ok(()));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_insert_conflict_without_prior_failure_is_error() {
        let attempts = WriteAttempts::new();

        let result = settle_insert_conflict(&attempts, conflict());

        assert_eq!(result, Err(conflict()));
    }

    #[tokio::test]
    async fn test_insert_conflict_after_throttling_is_error() {
        let attempts = WriteAttempts::new();
        let attempts = &attempts;
        let counter = AtomicU32::new(0);
        let counter = &counter;

        let result = retry_store_operation(
            || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    attempts.record(Err(StoreError::Unavailable("throttled".to_string())))
                } else {
                    settle_insert_conflict(attempts, conflict())
                }
            },
            &fast_config(),
        )
        .await;

        assert_eq!(result, Err(conflict()));
    }

    /// 1回目は内部エラー（実際には削除済み）、2回目は旧属性なし
    #[tokio::test]
    async fn test_delete_after_indeterminate_attempt_is_success() {
        let attempts = WriteAttempts::new();
        let attempts = &attempts;
        let counter = AtomicU32::new(0);
        let counter = &counter;

        let found = retry_store_operation(
            || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    attempts.record(Err(StoreError::Indeterminate("internal".to_string())))
                } else {
                    attempts.record(Ok(false))
                }
            },
            &fast_config(),
        )
        .await
        .unwrap();

        assert!(settle_delete(found, attempts));
    }

    #[test]
    fn test_delete_without_old_attributes_is_not_found() {
        let attempts = WriteAttempts::new();

        assert!(!settle_delete(false, &attempts));
        assert!(settle_delete(true, &attempts));
    }
}
