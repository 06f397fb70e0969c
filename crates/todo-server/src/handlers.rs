use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use domain::Envelope;
use shared::log_todo_error;
use std::collections::HashMap;
use tracing::debug;

/// クエリパラメータ（未知のキーは無視）
pub type QueryParams = HashMap<String, String>;

fn param<'a>(params: &'a QueryParams, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str)
}

/// GET /todos: 成功時はエンベロープなしの配列
pub async fn list_todos(State(state): State<AppState>) -> Response {
    match state.service.list().await {
        Ok(todos) => {
            debug!(count = todos.len(), "ToDo一覧を返却");
            Json(todos).into_response()
        }
        Err(e) => {
            log_todo_error(&e, "list");
            Json(Envelope::from(e)).into_response()
        }
    }
}

/// POST /create?task=..&owner=..
pub async fn create_todo(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<Envelope> {
    let result = state
        .service
        .create(param(&params, "task"), param(&params, "owner"))
        .await;

    if let Err(e) = &result {
        log_todo_error(e, "create");
    }
    Json(Envelope::from(result))
}

/// PATCH /todo?id=.. （ボディ: `{task?, owner?, completed?}`）
pub async fn update_todo(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
    body: Bytes,
) -> Json<Envelope> {
    let result = state.service.update(param(&params, "id"), &body).await;

    if let Err(e) = &result {
        log_todo_error(e, "update");
    }
    Json(Envelope::from(result))
}

/// DELETE /todo?id=..
pub async fn delete_todo(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<Envelope> {
    match state.service.delete(param(&params, "id")).await {
        Ok(()) => Json(Envelope::success()),
        Err(e) => {
            log_todo_error(&e, "delete");
            Json(Envelope::from(e))
        }
    }
}
