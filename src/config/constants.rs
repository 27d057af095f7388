// Project-wide constants
//
// Import via `use crate::config::constants::*;`.

/// Default bind address for the HTTP server (localhost only).
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8000";

/// Maximum request body accepted by the HTTP server.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// Directory under the home directory holding config and the output database.
pub const CONFIG_DIR_NAME: &str = ".ideaforge";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_DB_FILE_NAME: &str = "outputs.db";

/// Google Custom Search JSON API endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Results requested per research query.
pub const DEFAULT_RESULTS_PER_QUERY: u32 = 8;

/// Pause between consecutive search calls.
pub const DEFAULT_SEARCH_PAUSE_MS: u64 = 1000;

/// Pause between consecutive competitor analyses.
pub const DEFAULT_COMPETITOR_PAUSE_MS: u64 = 2000;

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_SEARCH_API_KEY: &str = "GOOGLE_SEARCH_API_KEY";
pub const ENV_SEARCH_ENGINE_ID: &str = "GOOGLE_SEARCH_CX";
pub const ENV_DB_PATH: &str = "IDEAFORGE_DB_PATH";
