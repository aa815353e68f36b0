use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::db::connection::{IsolationLevel, PoolConfig};
use crate::error::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub driver: String,
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub auto_commit: bool,
    pub isolation: IsolationLevel,
}

impl StorageConfig {
    pub fn load() -> Result<Self, StorageError> {
        dotenvy::dotenv().ok();

        let driver = env::var("STORAGE_DRIVER")
            .map_err(|_| StorageError::Config("STORAGE_DRIVER is not set".to_string()))?;

        let database_url = env::var("STORAGE_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .map_err(|_| {
                StorageError::Config(
                    "neither STORAGE_DATABASE_URL nor DATABASE_URL is set".to_string(),
                )
            })?;

        let max_connections = parse_var("STORAGE_MAX_CONNECTIONS", 3)?;
        let acquire_timeout_secs = parse_var("STORAGE_ACQUIRE_TIMEOUT_SECS", 30)?;
        let auto_commit = parse_var("STORAGE_AUTO_COMMIT", false)?;

        let isolation = match env::var("STORAGE_ISOLATION") {
            Ok(value) => value.parse()?,
            Err(_) => IsolationLevel::RepeatableRead,
        };

        Ok(StorageConfig {
            driver,
            database_url,
            max_connections,
            acquire_timeout_secs,
            auto_commit,
            isolation,
        })
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            auto_commit: self.auto_commit,
            isolation: self.isolation,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, StorageError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| StorageError::Config(format!("invalid {} value: {}", name, value))),
        Err(_) => Ok(default),
    }
}
