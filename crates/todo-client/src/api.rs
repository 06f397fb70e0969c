use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use domain::{Envelope, Todo, TodoId, TodoPatch};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde_json::Value;
use tracing::debug;

/// ToDoサービスのクライアントAPI
///
/// 通信エラーとエラーエンベロープはどちらも `ClientError` として返る。
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list_todos(&self) -> ClientResult<Vec<Todo>>;

    async fn create_todo(&self, task: &str, owner: &str) -> ClientResult<Todo>;

    /// 完了状態を更新
    async fn mark_todo(&self, id: &TodoId, completed: bool) -> ClientResult<Todo>;

    async fn delete_todo(&self, id: &TodoId) -> ClientResult<()>;
}

/// HTTP経由のクライアント
#[derive(Debug, Clone)]
pub struct RestTodoApi {
    http_client: HttpClient,
    base_url: String,
}

impl RestTodoApi {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http_client = HttpClient::builder().user_agent("todo-client/0.1").build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// リクエストを送信し、2xx を確認してJSONボディを返す
    async fn send(&self, request: RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            debug!(status = %status, "サーバーがエラーステータスを返しました");
            return Err(ClientError::Transport(status_text));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// 一覧レスポンスを解釈（エラー時はエンベロープ、成功時は配列）
pub fn parse_list(body: Value) -> ClientResult<Vec<Todo>> {
    if let Some(message) = error_message(&body) {
        return Err(ClientError::Server(message));
    }
    Ok(serde_json::from_value(body)?)
}

/// エンベロープを解釈して `todo` ペイロードを返す
pub fn parse_envelope(body: Value) -> ClientResult<Option<Todo>> {
    if let Some(message) = error_message(&body) {
        return Err(ClientError::Server(message));
    }
    match serde_json::from_value(body)? {
        Envelope::Success { todo } => Ok(todo),
        Envelope::Error { message } => Err(ClientError::Server(message)),
    }
}

fn error_message(body: &Value) -> Option<String> {
    if body.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    Some(
        body.get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string(),
    )
}

fn require_todo(todo: Option<Todo>) -> ClientResult<Todo> {
    todo.ok_or_else(|| ClientError::UnexpectedResponse("Response did not include a todo".to_string()))
}

#[async_trait]
impl TodoApi for RestTodoApi {
    async fn list_todos(&self) -> ClientResult<Vec<Todo>> {
        let body = self.send(self.http_client.get(self.url("/todos"))).await?;
        parse_list(body)
    }

    async fn create_todo(&self, task: &str, owner: &str) -> ClientResult<Todo> {
        let request = self
            .http_client
            .post(self.url("/create"))
            .query(&[("task", task), ("owner", owner)]);

        require_todo(parse_envelope(self.send(request).await?)?)
    }

    async fn mark_todo(&self, id: &TodoId, completed: bool) -> ClientResult<Todo> {
        let request = self
            .http_client
            .patch(self.url("/todo"))
            .query(&[("id", id.as_str())])
            .json(&TodoPatch::completed(completed));

        require_todo(parse_envelope(self.send(request).await?)?)
    }

    async fn delete_todo(&self, id: &TodoId) -> ClientResult<()> {
        let request = self
            .http_client
            .delete(self.url("/todo"))
            .query(&[("id", id.as_str())]);

        parse_envelope(self.send(request).await?)?;
        Ok(())
    }
}
