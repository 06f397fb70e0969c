//! クライアント側のエラー型
//!
//! 通信エラーとサーバーが返すエラーエンベロープを単一の型にまとめる。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// 2xx 以外のHTTPステータス（ステータステキストを保持）
    #[error("{0}")]
    Transport(String),

    /// 接続失敗など
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// サーバーが `{status:"error"}` を返した
    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// 画面表示用のエラー種別名
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "TransportError",
            ClientError::Http(_) => "NetworkError",
            ClientError::Server(_) => "ServerError",
            ClientError::Decode(_) => "DecodeError",
            ClientError::UnexpectedResponse(_) => "UnexpectedResponse",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
