//! MySQL form store using diesel-async.
//!
//! Each insert opens its own connection and drops it when done; uploads are
//! rare enough that pooling buys nothing.

use async_trait::async_trait;
use diesel::mysql::Mysql;
use diesel::sql_types::{Bool, Date, Nullable, Text};
use diesel_async::{AsyncConnection, AsyncMysqlConnection, RunQueryDsl};
use tracing::{debug, error, info};

use super::form_row::{insert_statement, ColumnValue, FormRow};
use super::{FormStore, StoreError};
use crate::config::DatabaseConfig;

/// [`FormStore`] writing to the `formularios` table.
#[derive(Clone)]
pub struct MysqlFormStore {
    config: DatabaseConfig,
}

impl MysqlFormStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    async fn connect(&self) -> Result<AsyncMysqlConnection, StoreError> {
        let url = self
            .config
            .url()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        AsyncMysqlConnection::establish(&url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    async fn insert(&self, row: &FormRow) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;

        let mut query = diesel::sql_query(insert_statement()).into_boxed::<Mysql>();
        for value in row.values() {
            query = match value.clone() {
                ColumnValue::Date(d) => query.bind::<Nullable<Date>, _>(d),
                ColumnValue::Flag(b) => query.bind::<Bool, _>(b),
                ColumnValue::Text(t) => query.bind::<Nullable<Text>, _>(t),
            };
        }

        let rows = conn
            .transaction(|conn| Box::pin(async move { query.execute(conn).await }))
            .await?;
        debug!("Inserted {} row(s)", rows);

        Ok(())
    }
}

#[async_trait]
impl FormStore for MysqlFormStore {
    async fn save(&self, row: &FormRow) -> Result<(), StoreError> {
        info!("Saving form to database {}", self.config.name);
        match self.insert(row).await {
            Ok(()) => {
                info!("Form saved");
                Ok(())
            }
            Err(e) => {
                error!("Failed to save form: {}", e);
                Err(e)
            }
        }
    }
}
