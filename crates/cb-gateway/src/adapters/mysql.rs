//! MySQL adapter for the user and call stores.
//!
//! Queries are plain runtime-checked SQL over the externally owned schema;
//! ids are read as text so both integer and string keys map onto the model.

use crate::domain::config::DatabaseConfig;
use crate::ports::{CallStore, StoreError, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{Call, CallStatus, Credentials, Recording, RecordingStatus, User};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use tracing::{debug, info};

const FIND_USER: &str = "SELECT CAST(id AS CHAR) AS id, username, role \
     FROM users WHERE username = ? AND password = ? LIMIT 1";

const LIST_CALLS: &str = "SELECT CAST(id AS CHAR) AS id, client_name, phone_number, \
     client_caller_id, driver_phone, driver_caller_id, status, start_time, \
     CAST(duration AS SIGNED) AS duration, company_id, driver_id \
     FROM calls LIMIT ?";

const LIST_RECORDINGS: &str = "SELECT CAST(id AS CHAR) AS id, CAST(call_id AS CHAR) AS call_id, \
     client_name, phone_number, client_caller_id, driver_phone, driver_caller_id, \
     CAST(duration AS SIGNED) AS duration, date, file_size, status, company_id, driver_id \
     FROM recordings LIMIT ?";

/// Pooled MySQL store
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Open a pool sized and timed by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            max_connections = config.max_connections,
            "MySQL pool ready"
        );

        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for MySqlStore {
    async fn find_user(&self, credentials: &Credentials) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(FIND_USER)
            .bind(&credentials.username)
            .bind(&credentials.password)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<User, StoreError> {
            Ok(User {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                role: row.try_get::<Option<String>, _>("role")?.unwrap_or_default(),
            })
        })
        .transpose()
    }
}

#[async_trait]
impl CallStore for MySqlStore {
    async fn list_calls(&self, limit: u32) -> Result<Vec<Call>, StoreError> {
        let rows = sqlx::query(LIST_CALLS)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(rows = rows.len(), "Fetched calls");
        rows.iter().map(call_from_row).collect()
    }

    async fn list_recordings(&self, limit: u32) -> Result<Vec<Recording>, StoreError> {
        let rows = sqlx::query(LIST_RECORDINGS)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(rows = rows.len(), "Fetched recordings");
        rows.iter().map(recording_from_row).collect()
    }
}

fn call_from_row(row: &MySqlRow) -> Result<Call, StoreError> {
    let status: String = row.try_get("status")?;
    let start_time: DateTime<Utc> = row.try_get("start_time")?;
    let duration: Option<i64> = row.try_get("duration")?;

    Ok(Call {
        id: row.try_get("id")?,
        client_name: row.try_get("client_name")?,
        phone_number: row.try_get("phone_number")?,
        client_caller_id: row.try_get("client_caller_id")?,
        driver_phone: row.try_get("driver_phone")?,
        driver_caller_id: row.try_get("driver_caller_id")?,
        status: status
            .parse::<CallStatus>()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        start_time,
        duration: duration.map(non_negative).transpose()?,
        company_id: row.try_get("company_id")?,
        driver_id: row.try_get("driver_id")?,
    })
}

fn recording_from_row(row: &MySqlRow) -> Result<Recording, StoreError> {
    let status: String = row.try_get("status")?;
    let duration: i64 = row.try_get("duration")?;

    Ok(Recording {
        id: row.try_get("id")?,
        call_id: row.try_get("call_id")?,
        client_name: row.try_get("client_name")?,
        phone_number: row.try_get("phone_number")?,
        client_caller_id: row.try_get("client_caller_id")?,
        driver_phone: row.try_get("driver_phone")?,
        driver_caller_id: row.try_get("driver_caller_id")?,
        duration: non_negative(duration)?,
        date: row.try_get("date")?,
        file_size: row.try_get("file_size")?,
        status: status
            .parse::<RecordingStatus>()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        company_id: row.try_get("company_id")?,
        driver_id: row.try_get("driver_id")?,
    })
}

fn non_negative(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Decode(format!("negative duration: {}", value)))
}
