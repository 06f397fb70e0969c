use crate::errors::TodoError;
use crate::todo::Todo;
use serde::{Deserialize, Serialize};

/// 一覧以外のレスポンスで使うJSONエンベロープ
///
/// `{"status":"success","todo":{...}}` / `{"status":"success"}` /
/// `{"status":"error","message":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        todo: Option<Todo>,
    },
    Error {
        message: String,
    },
}

impl Envelope {
    pub fn with_todo(todo: Todo) -> Self {
        Envelope::Success { todo: Some(todo) }
    }

    pub fn success() -> Self {
        Envelope::Success { todo: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
        }
    }
}

impl From<TodoError> for Envelope {
    fn from(error: TodoError) -> Self {
        Envelope::error(error.to_string())
    }
}

impl From<Result<Todo, TodoError>> for Envelope {
    fn from(result: Result<Todo, TodoError>) -> Self {
        match result {
            Ok(todo) => Envelope::with_todo(todo),
            Err(e) => e.into(),
        }
    }
}
