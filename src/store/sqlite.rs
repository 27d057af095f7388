// SQLite-backed output store

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{AgentOutputs, OutputStore, StoredOutput};

const COLUMNS: &str = "id, user_id, session_id, market_analyst_response, \
                       product_manager_response, tech_architect_response, created_at";

pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(include_str!("schema.sql"))
            .context("Failed to apply output store schema")?;

        tracing::info!("Output store initialized: {}", path.display());

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }
}

/// Fixed-width RFC 3339 so text order matches time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredOutput> {
    let created_at: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(StoredOutput {
        id: row.get(0)?,
        user_id: row.get(1)?,
        session_id: row.get(2)?,
        outputs: AgentOutputs {
            market_analyst_response: json_column(row, 3)?,
            product_manager_response: json_column(row, 4)?,
            tech_architect_response: json_column(row, 5)?,
        },
        created_at,
    })
}

#[async_trait]
impl OutputStore for SqliteStore {
    async fn put(
        &self,
        user_id: &str,
        session_id: &str,
        outputs: &AgentOutputs,
    ) -> Result<StoredOutput> {
        let stored = StoredOutput {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            outputs: outputs.clone(),
            created_at: Utc::now(),
        };

        let conn = self.db.lock().await;
        conn.execute(
            &format!("INSERT INTO agent_outputs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)", COLUMNS),
            params![
                &stored.id,
                &stored.user_id,
                &stored.session_id,
                outputs.market_analyst_response.to_string(),
                outputs.product_manager_response.to_string(),
                outputs.tech_architect_response.to_string(),
                timestamp(stored.created_at),
            ],
        )
        .context("Failed to store agent outputs")?;

        tracing::debug!(user_id, session_id, id = %stored.id, "Stored agent outputs");
        Ok(stored)
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<StoredOutput>> {
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agent_outputs WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))?;

        let outputs = stmt
            .query_map([user_id], read_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read agent outputs")?;
        Ok(outputs)
    }

    async fn get_by_session(&self, session_id: &str) -> Result<Option<StoredOutput>> {
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agent_outputs WHERE session_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
            COLUMNS
        ))?;

        let mut rows = stmt
            .query_map([session_id], read_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read agent outputs")?;
        Ok(rows.pop())
    }
}
