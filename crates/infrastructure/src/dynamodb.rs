use crate::retry::RetryConfig;
use crate::store::StoreError;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client;
use shared::Config;
use tracing::info;

#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
    retry_config: RetryConfig,
}

impl DynamoDbClient {
    pub async fn new(config: &Config) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&aws_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            info!(endpoint = %endpoint, "DynamoDBエンドポイントを上書きします");
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: config.dynamodb_table.clone(),
            retry_config: RetryConfig {
                max_attempts: config.retry_max_attempts.max(1),
                initial_delay_ms: config.retry_initial_delay_ms,
                ..RetryConfig::default()
            },
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// テーブルに到達できるか確認する（起動時のフェイルファスト用）
    pub async fn verify_table(&self) -> Result<(), StoreError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(map_sdk_error)?;

        info!(table = %self.table_name, "DynamoDBテーブルへの接続を確認しました");
        Ok(())
    }
}

/// SDKエラーをストアエラーへ変換
///
/// スループット超過などの一時的エラーは `Unavailable`、書き込みの成否が不明な
/// 内部エラーは `Indeterminate` とし、どちらもリトライ対象にする。
pub fn map_sdk_error<E>(error: E) -> StoreError
where
    aws_sdk_dynamodb::Error: From<E>,
{
    let error = aws_sdk_dynamodb::Error::from(error);
    let message = DisplayErrorContext(&error).to_string();

    match error {
        aws_sdk_dynamodb::Error::ProvisionedThroughputExceededException(_)
        | aws_sdk_dynamodb::Error::RequestLimitExceeded(_) => StoreError::Unavailable(message),
        aws_sdk_dynamodb::Error::InternalServerError(_) => StoreError::Indeterminate(message),
        _ => StoreError::Backend(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, InternalServerError, ProvisionedThroughputExceededException,
        RequestLimitExceeded, ResourceNotFoundException,
    };
    use aws_sdk_dynamodb::Error;

    #[test]
    fn test_throttling_maps_to_unavailable() {
        let throttled = Error::ProvisionedThroughputExceededException(
            ProvisionedThroughputExceededException::builder()
                .message("throughput exceeded")
                .build(),
        );
        let limited = Error::RequestLimitExceeded(
            RequestLimitExceeded::builder()
                .message("request limit")
                .build(),
        );

        for error in [throttled, limited] {
            let mapped = map_sdk_error(error);
            assert!(matches!(mapped, StoreError::Unavailable(_)), "{mapped:?}");
            assert!(mapped.is_retryable());
        }
    }

    #[test]
    fn test_internal_error_maps_to_indeterminate() {
        let error = Error::InternalServerError(
            InternalServerError::builder().message("internal").build(),
        );

        let mapped = map_sdk_error(error);

        assert!(matches!(mapped, StoreError::Indeterminate(_)), "{mapped:?}");
        assert!(mapped.is_retryable());
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        let missing = Error::ResourceNotFoundException(
            ResourceNotFoundException::builder()
                .message("table not found")
                .build(),
        );
        let conflict = Error::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder()
                .message("condition failed")
                .build(),
        );

        for error in [missing, conflict] {
            let mapped = map_sdk_error(error);
            assert!(matches!(mapped, StoreError::Backend(_)), "{mapped:?}");
            assert!(!mapped.is_retryable());
        }
    }
}
