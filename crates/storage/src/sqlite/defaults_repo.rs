use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{DefaultsStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl DefaultsStore for SqliteRepository {
    async fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        let row = sqlx::query("SELECT int_value FROM app_defaults WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: Option<i64> = row.try_get("int_value").map_err(ser)?;
        value.map_or_else(
            || {
                Err(StorageError::Serialization(format!(
                    "key {key} holds an instant, not an integer"
                )))
            },
            |v| Ok(Some(v)),
        )
    }

    async fn set_int(&self, key: &str, value: i64) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_defaults (key, int_value, instant_value)
            VALUES (?1, ?2, NULL)
            ON CONFLICT(key) DO UPDATE SET
                int_value = excluded.int_value,
                instant_value = NULL
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_instant(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        let row = sqlx::query("SELECT instant_value FROM app_defaults WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: Option<DateTime<Utc>> = row.try_get("instant_value").map_err(ser)?;
        value.map_or_else(
            || {
                Err(StorageError::Serialization(format!(
                    "key {key} holds an integer, not an instant"
                )))
            },
            |v| Ok(Some(v)),
        )
    }

    async fn set_instant(&self, key: &str, value: DateTime<Utc>) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_defaults (key, int_value, instant_value)
            VALUES (?1, NULL, ?2)
            ON CONFLICT(key) DO UPDATE SET
                int_value = NULL,
                instant_value = excluded.instant_value
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await
        .map_err(conn)?;

        Ok(())
    }
}
