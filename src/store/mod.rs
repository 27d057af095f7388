// Storage for completed pipeline runs

mod sqlite;

pub use sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three stage responses of one run, as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutputs {
    pub market_analyst_response: Value,
    pub product_manager_response: Value,
    pub tech_architect_response: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOutput {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    #[serde(flatten)]
    pub outputs: AgentOutputs,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait OutputStore: Send + Sync {
    async fn put(&self, user_id: &str, session_id: &str, outputs: &AgentOutputs)
        -> Result<StoredOutput>;

    /// Every run for `user_id`, newest first.
    async fn get_by_user(&self, user_id: &str) -> Result<Vec<StoredOutput>>;

    /// The run stored for `session_id`, if any.
    async fn get_by_session(&self, session_id: &str) -> Result<Option<StoredOutput>>;
}
