//! リクエスト境界での入力検証
//!
//! ここでの検証はすべてストアアクセスの前に行われる。IDは「空でない文字列」かどうか
//! だけを確認し、形式の妥当性はストア側に任せる。

use crate::errors::DomainError;
use crate::todo::{NewTodo, TodoId, TodoPatch};
use serde_json::{Map, Value};

/// 空でない文字列かどうか
pub fn is_non_empty(value: Option<&str>) -> bool {
    matches!(value, Some(s) if !s.is_empty())
}

/// 必須IDの形状チェック
pub fn require_id(raw: Option<&str>) -> Result<TodoId, DomainError> {
    match raw {
        Some(id) if !id.is_empty() => Ok(TodoId::from_string(id.to_string())),
        _ => Err(DomainError::MissingId),
    }
}

/// 作成リクエストの検証（task → owner の順）
pub fn validate_new_todo(task: Option<&str>, owner: Option<&str>) -> Result<NewTodo, DomainError> {
    let task = match task {
        Some(t) if !t.is_empty() => t,
        _ => return Err(DomainError::InvalidTask),
    };
    let owner = match owner {
        Some(o) if !o.is_empty() => o,
        _ => return Err(DomainError::InvalidOwner),
    };

    Ok(NewTodo::new(task.to_string(), owner.to_string()))
}

/// 更新ボディを解析して検証する
///
/// 空のボディは「変更なし」として扱う。`null` のフィールドは未指定と同じ。
pub fn parse_patch(body: &[u8]) -> Result<TodoPatch, DomainError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(TodoPatch::default());
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| DomainError::MalformedBody(e.to_string()))?;

    match value {
        Value::Object(fields) => validate_patch_fields(&fields),
        _ => Err(DomainError::InvalidUpdateBody),
    }
}

/// 検証順序: task → owner → completed
pub fn validate_patch_fields(fields: &Map<String, Value>) -> Result<TodoPatch, DomainError> {
    let task = optional_non_empty(fields, "task", DomainError::InvalidTask)?;
    let owner = optional_non_empty(fields, "owner", DomainError::InvalidOwner)?;

    let completed = match fields.get("completed") {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => return Err(DomainError::InvalidCompleted),
    };

    Ok(TodoPatch {
        task,
        owner,
        completed,
    })
}

fn optional_non_empty(
    fields: &Map<String, Value>,
    name: &str,
    error: DomainError,
) -> Result<Option<String>, DomainError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s.clone())),
        Some(_) => Err(error),
    }
}
