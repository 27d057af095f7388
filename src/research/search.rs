// Web search collaborators

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SEARCH_TIMEOUT_SECS: u64 = 30;

/// One organic search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, rename = "displayLink")]
    pub display_link: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Never fails: errors and empty responses come back as an empty list.
    async fn search(&self, query: &str, num_results: u32) -> Vec<SearchResult>;
}

/// Google Custom Search JSON API
pub struct GoogleSearch {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: String,
}

impl GoogleSearch {
    pub fn new(api_key: String, engine_id: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            api_key,
            engine_id,
            base_url,
        })
    }

    async fn try_search(&self, query: &str, num_results: u32) -> Result<Vec<SearchResult>> {
        let num = num_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("Failed to send search request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Search request failed\n\nStatus: {}\nBody: {}", status, body);
        }

        let page: SearchPage = response
            .json()
            .await
            .context("Failed to parse search response")?;
        Ok(page.items.unwrap_or_default())
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    async fn search(&self, query: &str, num_results: u32) -> Vec<SearchResult> {
        match self.try_search(query, num_results).await {
            Ok(results) => {
                if results.is_empty() {
                    tracing::info!("No results found for query: {}", query);
                }
                results
            }
            Err(e) => {
                tracing::warn!("Search error for '{}': {:#}", query, e);
                Vec::new()
            }
        }
    }
}

/// Used when no search credentials are configured.
pub struct NoSearch;

#[async_trait]
impl SearchProvider for NoSearch {
    async fn search(&self, query: &str, _num_results: u32) -> Vec<SearchResult> {
        tracing::debug!("Search disabled, skipping '{}'", query);
        Vec::new()
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    items: Option<Vec<SearchResult>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_google_search_parses_items() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "g-key".into()),
                Matcher::UrlEncoded("cx".into(), "cx-1".into()),
                Matcher::UrlEncoded("q".into(), "fitness app competitors".into()),
                Matcher::UrlEncoded("num".into(), "8".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"items": [{
                    "title": "FitBot",
                    "link": "https://fitbot.com",
                    "snippet": "AI coach",
                    "displayLink": "www.fitbot.com"
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        let search = GoogleSearch::new(
            "g-key".into(),
            "cx-1".into(),
            format!("{}/customsearch/v1", server.url()),
        )?;
        let results = search.search("fitness app competitors", 8).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_link, "www.fitbot.com");
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_items_and_errors_give_empty_list() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _empty = server
            .mock("GET", "/ok")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"searchInformation\": {}}")
            .create_async()
            .await;
        let _failing = server
            .mock("GET", "/fail")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let ok = GoogleSearch::new("k".into(), "cx".into(), format!("{}/ok", server.url()))?;
        assert!(ok.search("anything", 3).await.is_empty());

        let failing = GoogleSearch::new("k".into(), "cx".into(), format!("{}/fail", server.url()))?;
        assert!(failing.search("anything", 3).await.is_empty());
        Ok(())
    }
}
