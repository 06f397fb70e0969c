use crate::errors::AppError;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// 永続化バックエンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.to_lowercase().as_str() {
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "STORE_BACKEND must be 'dynamodb' or 'memory', got '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::DynamoDb => "dynamodb",
            StoreBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub store_backend: StoreBackend,
    pub dynamodb_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
    pub environment: String,
    pub static_root: PathBuf,
    pub index_file: String,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            store_backend: StoreBackend::DynamoDb,
            dynamodb_table: "todolist".to_string(),
            dynamodb_endpoint: None,
            aws_region: "us-east-1".to_string(),
            environment: "dev".to_string(),
            static_root: PathBuf::from("public"),
            index_file: "home.html".to_string(),
            retry_max_attempts: 3,
            retry_initial_delay_ms: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を構築（未設定のキーはデフォルト値）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Config::default();

        let bind_address = match lookup("BIND_ADDRESS") {
            Some(addr) => addr.parse().map_err(|e| {
                AppError::Configuration(format!("BIND_ADDRESS '{addr}' is invalid: {e}"))
            })?,
            None => defaults.bind_address,
        };

        let store_backend = match lookup("STORE_BACKEND") {
            Some(backend) => StoreBackend::parse(&backend)?,
            None => defaults.store_backend,
        };

        Ok(Config {
            bind_address,
            store_backend,
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or(defaults.dynamodb_table),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|e| !e.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or(defaults.aws_region),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            static_root: lookup("STATIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_root),
            index_file: lookup("INDEX_FILE").unwrap_or(defaults.index_file),
            retry_max_attempts: parse_number(&lookup, "RETRY_MAX_ATTEMPTS")?
                .unwrap_or(defaults.retry_max_attempts),
            retry_initial_delay_ms: parse_number(&lookup, "RETRY_INITIAL_DELAY_MS")?
                .unwrap_or(defaults.retry_initial_delay_ms),
        })
    }
}

fn parse_number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AppError::Configuration(format!("{key} '{raw}' is invalid: {e}")))
        })
        .transpose()
}
