use crate::controller::TodoRow;
use chrono::{Local, TimeZone};
use domain::TodoId;
use std::fmt::Display;
use std::io::{Stdout, Write};
use tracing::{debug, warn};

/// ボードが描画先に要求する操作
pub trait View {
    fn show_error(&mut self, message: &str);

    fn clear_error(&mut self);

    /// 入力欄と追加ボタンの有効/無効
    fn set_inputs_enabled(&mut self, enabled: bool);

    fn append_row(&mut self, row: &TodoRow);

    fn set_checked(&mut self, id: &TodoId, checked: bool);
}

/// 1行分の表示文字列（`id | 作成日時 | owner | task | [x]`）
pub fn format_row<Tz>(row: &TodoRow, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let created = row
        .todo
        .creation_date
        .with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p");
    let mark = if row.check.checked() { "[x]" } else { "[ ]" };

    format!(
        "{} | {} | {} | {} | {}",
        row.todo.id, created, row.todo.owner, row.todo.task, mark
    )
}

/// 端末出力のビュー
///
/// 行は `writer`（既定は標準出力）、エラーは標準エラーへ書き出す。
/// 書き込みに失敗したら以降の行出力をやめる。
#[derive(Debug)]
pub struct TerminalView<W = Stdout> {
    writer: W,
    print_rows: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// エラーだけを出力する
    pub fn errors_only() -> Self {
        Self {
            print_rows: false,
            ..Self::new()
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalView<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            print_rows: true,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> View for TerminalView<W> {
    fn show_error(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn clear_error(&mut self) {}

    fn set_inputs_enabled(&mut self, enabled: bool) {
        debug!(enabled, "入力状態を更新");
    }

    fn append_row(&mut self, row: &TodoRow) {
        if !self.print_rows {
            return;
        }
        let line = format_row(row, &Local);
        if let Err(e) = writeln!(self.writer, "{line}").and_then(|_| self.writer.flush()) {
            warn!(error = %e, "行の出力に失敗したため以降の出力を止めます");
            self.print_rows = false;
        }
    }

    fn set_checked(&mut self, id: &TodoId, checked: bool) {
        debug!(id = %id, checked, "チェック状態を更新");
    }
}

/// 描画要求を記録するだけのビュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    ErrorShown(String),
    ErrorCleared,
    InputsEnabled(bool),
    RowAppended(TodoId),
    CheckedSet(TodoId, bool),
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}

impl View for RecordingView {
    fn show_error(&mut self, message: &str) {
        self.events.push(ViewEvent::ErrorShown(message.to_string()));
    }

    fn clear_error(&mut self) {
        self.events.push(ViewEvent::ErrorCleared);
    }

    fn set_inputs_enabled(&mut self, enabled: bool) {
        self.events.push(ViewEvent::InputsEnabled(enabled));
    }

    fn append_row(&mut self, row: &TodoRow) {
        self.events.push(ViewEvent::RowAppended(row.todo.id.clone()));
    }

    fn set_checked(&mut self, id: &TodoId, checked: bool) {
        self.events.push(ViewEvent::CheckedSet(id.clone(), checked));
    }
}
