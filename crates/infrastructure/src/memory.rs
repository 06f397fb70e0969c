use crate::store::{parse_store_id, StoreResult, TodoStore};
use async_trait::async_trait;
use domain::{NewTodo, Todo, TodoId};
use tokio::sync::RwLock;
use tracing::debug;

/// プロセス内メモリのストア（ローカル実行・テスト用）
///
/// 自然順は挿入順。ID形式の検証はDynamoDB実装と同じ規則に従う。
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    items: RwLock<Vec<Todo>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_all(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.items.read().await.clone())
    }

    async fn insert(&self, new_todo: NewTodo) -> StoreResult<Todo> {
        let todo = new_todo.with_id(TodoId::new());
        debug!(todo_id = %todo.id, "メモリストアに挿入");
        self.items.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> StoreResult<Option<Todo>> {
        parse_store_id(id)?;
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|todo| &todo.id == id)
            .cloned())
    }

    async fn replace(&self, todo: &Todo) -> StoreResult<bool> {
        parse_store_id(&todo.id)?;
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == todo.id) {
            Some(existing) => {
                *existing = todo.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &TodoId) -> StoreResult<bool> {
        parse_store_id(id)?;
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|todo| &todo.id != id);
        Ok(items.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn new_todo(task: &str) -> NewTodo {
        NewTodo::new(task.to_string(), "Sam".to_string())
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids_in_insertion_order() {
        let store = InMemoryTodoStore::new();

        let first = store.insert(new_todo("one")).await.unwrap();
        let second = store.insert(new_todo("two")).await.unwrap();

        assert_ne!(first.id, second.id);
        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_find_replace_delete() {
        let store = InMemoryTodoStore::new();
        let mut todo = store.insert(new_todo("one")).await.unwrap();

        assert_eq!(store.find_by_id(&todo.id).await.unwrap(), Some(todo.clone()));

        todo.completed = true;
        assert!(store.replace(&todo).await.unwrap());
        assert!(store.find_by_id(&todo.id).await.unwrap().unwrap().completed);

        assert!(store.delete_by_id(&todo.id).await.unwrap());
        assert!(!store.delete_by_id(&todo.id).await.unwrap());
        assert!(!store.replace(&todo).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_id_is_a_store_error() {
        let store = InMemoryTodoStore::new();
        let bad = TodoId::from_string("not-an-id".to_string());

        assert_eq!(
            store.find_by_id(&bad).await,
            Err(StoreError::InvalidId("not-an-id".to_string()))
        );
        assert!(store.delete_by_id(&bad).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_well_formed_id_is_none() {
        let store = InMemoryTodoStore::new();
        store.insert(new_todo("one")).await.unwrap();

        assert_eq!(store.find_by_id(&TodoId::new()).await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }
}
