use crate::service::TodoService;
use infrastructure::{DynamoDbClient, DynamoTodoRepository, InMemoryTodoStore, TodoStore};
use shared::{AppError, Config, StoreBackend};
use std::sync::Arc;
use tracing::info;

/// ハンドラー間で共有する状態（ストアハンドルのみ）
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TodoService>,
}

impl AppState {
    pub fn new(service: TodoService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn with_store(store: Arc<dyn TodoStore>) -> Self {
        Self::new(TodoService::new(store))
    }
}

/// 設定に従ってストアを構築する
///
/// DynamoDB の場合はテーブルへの到達性を確認し、失敗したら起動エラーとする。
pub async fn build_store(config: &Config) -> Result<Arc<dyn TodoStore>, AppError> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("インメモリストアを使用します");
            Ok(Arc::new(InMemoryTodoStore::new()))
        }
        StoreBackend::DynamoDb => {
            let db = DynamoDbClient::new(config).await;
            let repository = DynamoTodoRepository::connect(db)
                .await
                .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
            Ok(Arc::new(repository))
        }
    }
}
