use domain::{parse_patch, require_id, validate_new_todo, Todo, TodoError};
use infrastructure::TodoStore;
use shared::telemetry::trace_store_operation;
use std::sync::Arc;
use tracing::info;

/// ToDoサービス
///
/// 入力の形状チェックはすべてストアアクセスの前に行い、「見つからない」は
/// ストア参照の後でのみ判定する。ストアのエラーは `TodoError::Store` に変換される。
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    fn backend(&self) -> &'static str {
        self.store.backend_name()
    }

    /// 全件取得
    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let todos = trace_store_operation(self.backend(), "find_all", self.store.find_all()).await?;
        Ok(todos)
    }

    /// 新規作成（task, owner 必須）
    pub async fn create(&self, task: Option<&str>, owner: Option<&str>) -> Result<Todo, TodoError> {
        let new_todo = validate_new_todo(task, owner)?;

        let todo = trace_store_operation(self.backend(), "insert", self.store.insert(new_todo)).await?;
        info!(todo_id = %todo.id, owner = %todo.owner, "ToDoを作成しました");
        Ok(todo)
    }

    /// 部分更新。ボディに含まれるフィールドのみ変更する
    pub async fn update(&self, id: Option<&str>, body: &[u8]) -> Result<Todo, TodoError> {
        let id = require_id(id)?;
        let patch = parse_patch(body)?;

        let mut todo = trace_store_operation(self.backend(), "find_by_id", self.store.find_by_id(&id))
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;

        todo.apply(&patch);

        let replaced = trace_store_operation(self.backend(), "replace", self.store.replace(&todo)).await?;
        if !replaced {
            return Err(TodoError::NotFound(id.to_string()));
        }

        info!(todo_id = %todo.id, completed = todo.completed, "ToDoを更新しました");
        Ok(todo)
    }

    /// 削除
    pub async fn delete(&self, id: Option<&str>) -> Result<(), TodoError> {
        let id = require_id(id)?;

        let deleted =
            trace_store_operation(self.backend(), "delete_by_id", self.store.delete_by_id(&id))
                .await?;
        if !deleted {
            return Err(TodoError::NotFound(id.to_string()));
        }

        info!(todo_id = %id, "ToDoを削除しました");
        Ok(())
    }
}
