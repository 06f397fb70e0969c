pub mod api;
pub mod controller;
pub mod error;
pub mod view;

pub use api::{RestTodoApi, TodoApi};
pub use controller::{BoardError, CheckState, TodoBoard, TodoRow};
pub use error::{ClientError, ClientResult};
pub use view::{format_row, RecordingView, TerminalView, View, ViewEvent};
