//! ToDoボードのコントローラー
//!
//! 一覧の読み込み、追加フォーム、完了チェックボックスの操作をAPI呼び出しへ変換し、
//! 結果をビューへ反映する。

use crate::api::TodoApi;
use crate::error::ClientError;
use crate::view::View;
use domain::{is_non_empty, Todo, TodoId};
use thiserror::Error;
use tracing::{debug, warn};

/// チェックボックスの状態
///
/// 操作直後は要求値を表示し、サーバーの応答で確定または元に戻す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Confirmed(bool),
    Tentative { previous: bool, requested: bool },
}

impl CheckState {
    /// 表示上のチェック状態
    pub fn checked(&self) -> bool {
        match *self {
            CheckState::Confirmed(value) => value,
            CheckState::Tentative { requested, .. } => requested,
        }
    }

    pub fn begin(self, requested: bool) -> Self {
        CheckState::Tentative {
            previous: self.checked(),
            requested,
        }
    }

    pub fn confirm(self) -> Self {
        CheckState::Confirmed(self.checked())
    }

    pub fn revert(self) -> Self {
        match self {
            CheckState::Tentative { previous, .. } => CheckState::Confirmed(previous),
            confirmed => confirmed,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CheckState::Tentative { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub todo: Todo,
    pub check: CheckState,
}

impl TodoRow {
    pub fn new(todo: Todo) -> Self {
        let check = CheckState::Confirmed(todo.completed);
        Self { todo, check }
    }
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Task cannot be blank")]
    BlankTask,

    #[error("Owner cannot be blank")]
    BlankOwner,

    #[error("Todo {0} is not on the board")]
    UnknownRow(TodoId),

    #[error("Unexpected error: {}: {}", .0.kind(), .0)]
    Api(#[from] ClientError),
}

/// ToDoボード
pub struct TodoBoard<A, V> {
    api: A,
    view: V,
    rows: Vec<TodoRow>,
    inputs_enabled: bool,
    error: Option<String>,
}

impl<A: TodoApi, V: View> TodoBoard<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            rows: Vec::new(),
            inputs_enabled: true,
            error: None,
        }
    }

    /// 一覧を取得して行を追加する
    pub async fn load(&mut self) -> Result<(), BoardError> {
        match self.api.list_todos().await {
            Ok(todos) => {
                debug!(count = todos.len(), "ToDo一覧を読み込みました");
                for todo in todos {
                    self.push_row(todo);
                }
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// 追加フォームの送信
    ///
    /// 空欄はサーバーへ送らずにエラー表示する。通信中は入力を無効化する。
    pub async fn add_todo(&mut self, task: &str, owner: &str) -> Result<TodoId, BoardError> {
        self.clear_error();

        if !is_non_empty(Some(task)) {
            return Err(self.fail(BoardError::BlankTask));
        }
        if !is_non_empty(Some(owner)) {
            return Err(self.fail(BoardError::BlankOwner));
        }

        self.set_inputs_enabled(false);
        let result = self.api.create_todo(task, owner).await;
        self.set_inputs_enabled(true);

        match result {
            Ok(todo) => {
                let id = todo.id.clone();
                self.push_row(todo);
                Ok(id)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// 完了チェックボックスの切り替え
    pub async fn toggle_done(&mut self, id: &TodoId, checked: bool) -> Result<(), BoardError> {
        self.clear_error();

        let Some(index) = self.rows.iter().position(|row| &row.todo.id == id) else {
            return Err(self.fail(BoardError::UnknownRow(id.clone())));
        };

        self.rows[index].check = self.rows[index].check.begin(checked);
        self.view.set_checked(id, checked);

        match self.api.mark_todo(id, checked).await {
            Ok(todo) => {
                let row = &mut self.rows[index];
                row.check = row.check.confirm();
                row.todo = todo;
                Ok(())
            }
            Err(e) => {
                let row = &mut self.rows[index];
                row.check = row.check.revert();
                let previous = row.check.checked();
                self.view.set_checked(id, previous);
                Err(self.fail(e.into()))
            }
        }
    }

    pub fn rows(&self) -> &[TodoRow] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn inputs_enabled(&self) -> bool {
        self.inputs_enabled
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn push_row(&mut self, todo: Todo) {
        let row = TodoRow::new(todo);
        self.view.append_row(&row);
        self.rows.push(row);
    }

    fn set_inputs_enabled(&mut self, enabled: bool) {
        self.inputs_enabled = enabled;
        self.view.set_inputs_enabled(enabled);
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.view.clear_error();
    }

    fn fail(&mut self, error: BoardError) -> BoardError {
        let message = error.to_string();
        warn!(error = %message, "ボード操作に失敗しました");
        self.view.show_error(&message);
        self.error = Some(message);
        error
    }
}
