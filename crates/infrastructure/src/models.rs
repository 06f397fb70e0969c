use crate::store::StoreError;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{Todo, TodoId};
use std::collections::HashMap;

/// ToDoアイテムのエンティティタイプ
pub const TODO_ENTITY_TYPE: &str = "Todo";

/// 現在状態を表すソートキー
pub const CURRENT_SORT_KEY: &str = "CURRENT";

/// DynamoDB のキー構造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbKeys {
    pub pk: String,
    pub sk: String,
}

impl DynamoDbKeys {
    /// ToDoアイテム用のキーを生成
    pub fn for_todo(todo_id: &TodoId) -> Self {
        Self {
            pk: format!("TODO#{}", todo_id.as_str()),
            sk: CURRENT_SORT_KEY.to_string(),
        }
    }

    pub fn to_key_map(&self) -> HashMap<String, AttributeValue> {
        let mut map = HashMap::new();
        map.insert("PK".to_string(), AttributeValue::S(self.pk.clone()));
        map.insert("SK".to_string(), AttributeValue::S(self.sk.clone()));
        map
    }
}

/// ToDoアイテムを DynamoDB AttributeValue マップに変換
pub fn todo_to_item(todo: &Todo) -> HashMap<String, AttributeValue> {
    let mut map = DynamoDbKeys::for_todo(&todo.id).to_key_map();

    map.insert(
        "EntityType".to_string(),
        AttributeValue::S(TODO_ENTITY_TYPE.to_string()),
    );
    map.insert("Id".to_string(), AttributeValue::S(todo.id.to_string()));
    map.insert("Task".to_string(), AttributeValue::S(todo.task.clone()));
    map.insert("Owner".to_string(), AttributeValue::S(todo.owner.clone()));
    map.insert("Completed".to_string(), AttributeValue::Bool(todo.completed));
    map.insert(
        "CreationDate".to_string(),
        AttributeValue::S(todo.creation_date.to_rfc3339()),
    );

    map
}

/// DynamoDB AttributeValue マップから復元
pub fn item_to_todo(item: &HashMap<String, AttributeValue>) -> Result<Todo, StoreError> {
    let id = string_attr(item, "Id")?;
    let task = string_attr(item, "Task")?;
    let owner = string_attr(item, "Owner")?;

    let completed = *item
        .get("Completed")
        .and_then(|v| v.as_bool().ok())
        .ok_or_else(|| StoreError::CorruptRecord("Missing Completed".to_string()))?;

    let creation_date = DateTime::parse_from_rfc3339(&string_attr(item, "CreationDate")?)
        .map_err(|e| StoreError::CorruptRecord(format!("Invalid CreationDate: {e}")))?
        .with_timezone(&Utc);

    Ok(Todo {
        id: TodoId::from_string(id),
        task,
        owner,
        completed,
        creation_date,
    })
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, StoreError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::CorruptRecord(format!("Missing {name}")))
}
