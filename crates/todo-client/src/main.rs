use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use domain::TodoId;
use shared::init_cli_tracing;
use std::process::ExitCode;
use todo_client::{format_row, BoardError, RestTodoApi, TerminalView, TodoApi, TodoBoard};

#[derive(Debug, Parser)]
#[command(name = "todo-client", version, about = "ToDoサーバーのコマンドラインクライアント")]
struct Cli {
    /// サーバーのベースURL
    #[arg(long, env = "TODO_SERVER_URL", default_value = "http://localhost:3000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 一覧を表示
    List,
    /// ToDoを追加
    Add {
        #[arg(long)]
        task: String,
        #[arg(long)]
        owner: String,
    },
    /// 完了にする
    Done { id: String },
    /// 未完了に戻す
    Undone { id: String },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_cli_tracing().map_err(|e| anyhow::anyhow!("トレーシングの初期化に失敗しました: {e}"))?;

    let cli = Cli::parse();
    let api = RestTodoApi::new(cli.server)?;

    // エラーはビューが表示済みなので終了コードだけ返す
    let succeeded = match cli.command {
        Command::List => {
            let mut board = TodoBoard::new(api, TerminalView::new());
            board.load().await.is_ok()
        }
        Command::Add { task, owner } => {
            let mut board = TodoBoard::new(api, TerminalView::new());
            board.add_todo(&task, &owner).await.is_ok()
        }
        Command::Done { id } => set_done(api, TodoId::from_string(id), true).await,
        Command::Undone { id } => set_done(api, TodoId::from_string(id), false).await,
        Command::Delete { id } => match api.delete_todo(&TodoId::from_string(id)).await {
            Ok(()) => true,
            Err(e) => {
                eprintln!("{}", BoardError::from(e));
                false
            }
        },
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// 一覧を読み込んでから該当行のチェックを切り替える
async fn set_done(api: RestTodoApi, id: TodoId, completed: bool) -> bool {
    let mut board = TodoBoard::new(api, TerminalView::errors_only());
    if board.load().await.is_err() || board.toggle_done(&id, completed).await.is_err() {
        return false;
    }

    if let Some(row) = board.rows().iter().find(|row| row.todo.id == id) {
        println!("{}", format_row(row, &Local));
    }
    true
}
