use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ToDoアイテムのID
///
/// ストアが採番する不透明な文字列。形式（ULID）の検証はストア側で行う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// 新しいIDを生成
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 永続化されたToDoアイテム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(alias = "_id")]
    pub id: TodoId,
    pub task: String,
    pub owner: String,
    pub completed: bool,
    pub creation_date: DateTime<Utc>,
}

impl Todo {
    /// 指定されたフィールドのみを上書きする。`id` と `creation_date` は変更しない。
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(task) = &patch.task {
            self.task = task.clone();
        }
        if let Some(owner) = &patch.owner {
            self.owner = owner.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// ストアへ挿入する前のアイテム（IDはストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub task: String,
    pub owner: String,
    pub completed: bool,
    pub creation_date: DateTime<Utc>,
}

impl NewTodo {
    /// 未完了・作成日時=現在で新規アイテムを組み立てる
    pub fn new(task: String, owner: String) -> Self {
        Self {
            task,
            owner,
            completed: false,
            creation_date: Utc::now(),
        }
    }

    /// 採番されたIDを付与して永続化済みアイテムにする
    pub fn with_id(self, id: TodoId) -> Todo {
        Todo {
            id,
            task: self.task,
            owner: self.owner,
            completed: self.completed,
            creation_date: self.creation_date,
        }
    }
}

/// 部分更新の内容。`None` のフィールドは変更しない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.owner.is_none() && self.completed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_todo() -> Todo {
        NewTodo::new("Buy milk".to_string(), "Sam".to_string()).with_id(TodoId::new())
    }

    #[test]
    fn test_todo_id_new_generates_ulid() {
        let todo_id = TodoId::new();

        assert_eq!(todo_id.as_str().len(), 26);
        assert!(ulid::Ulid::from_string(todo_id.as_str()).is_ok());
    }

    #[test]
    fn test_todo_id_from_string_keeps_value() {
        let todo_id = TodoId::from_string("not-a-ulid".to_string());
        assert_eq!(todo_id.as_str(), "not-a-ulid");
    }

    #[test]
    fn test_new_todo_defaults() {
        let before = Utc::now();
        let new_todo = NewTodo::new("Buy milk".to_string(), "Sam".to_string());

        assert!(!new_todo.completed);
        assert!(new_todo.creation_date >= before);
        assert!(new_todo.creation_date <= Utc::now());
    }

    #[test]
    fn test_apply_partial_patch_keeps_other_fields() {
        let original = sample_todo();
        let mut todo = original.clone();

        todo.apply(&TodoPatch::completed(true));

        assert!(todo.completed);
        assert_eq!(todo.task, original.task);
        assert_eq!(todo.owner, original.owner);
        assert_eq!(todo.id, original.id);
        assert_eq!(todo.creation_date, original.creation_date);
    }

    #[test]
    fn test_apply_empty_patch_is_noop() {
        let original = sample_todo();
        let mut todo = original.clone();

        todo.apply(&TodoPatch::default());

        assert_eq!(todo, original);
    }

    #[test]
    fn test_todo_json_shape() {
        let todo = sample_todo();
        let value = serde_json::to_value(&todo).unwrap();

        assert_eq!(value["id"], todo.id.as_str());
        assert_eq!(value["task"], "Buy milk");
        assert_eq!(value["owner"], "Sam");
        assert_eq!(value["completed"], false);
        assert!(value["creation_date"].is_string());
    }

    #[test]
    fn test_todo_accepts_underscore_id_alias() {
        let json = r#"{
            "_id": "01HZX3Q9W8R6Y2V1T0S5N4M3K2",
            "task": "Walk dog",
            "owner": "Alex",
            "completed": true,
            "creation_date": "2024-05-01T10:00:00Z"
        }"#;

        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.id.as_str(), "01HZX3Q9W8R6Y2V1T0S5N4M3K2");
        assert!(todo.completed);
    }
}
