// Market research: web search plus competitor page analysis
//
// Everything here is best-effort. Search and fetch failures shrink the
// research data but never fail the market stage.

pub mod pacer;
pub mod scrape;
pub mod search;

pub use pacer::Pacer;
pub use scrape::{parse_page, HttpPageFetcher, PageFetcher, ScrapedPage};
pub use search::{GoogleSearch, NoSearch, SearchProvider, SearchResult};

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ResearchConfig;

/// Competitors wanted for the report.
const TARGET_COMPETITORS: usize = 3;

/// Search hits tried before giving up on reaching the target.
const MAX_CANDIDATES: usize = 10;

/// Results per funding and review lookup.
const LOOKUP_RESULTS: u32 = 3;

/// Search results keyed by research category, in query order.
pub type SearchResults = IndexMap<String, Vec<SearchResult>>;

/// One competitor with everything gathered about it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorResearch {
    pub search_result: SearchResult,
    pub scraped: ScrapedPage,
    pub funding: Vec<SearchResult>,
    pub reviews: Vec<SearchResult>,
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Category name and query for each research search, in order.
fn research_queries(idea: &str) -> Vec<(&'static str, String)> {
    vec![
        (
            "competitors",
            format!("\"{}\" competitors top companies alternatives", idea),
        ),
        (
            "more_competitors",
            format!("{} best apps platforms solutions", idea),
        ),
        (
            "market_size",
            format!("{} market size revenue statistics 2024", idea),
        ),
        ("trends", format!("{} industry trends 2024 2025", idea)),
        ("funding", format!("{} startup funding investments", idea)),
        ("challenges", format!("{} industry challenges problems", idea)),
        ("user_reviews", format!("{} app reviews user feedback", idea)),
        ("pricing", format!("{} pricing models costs", idea)),
        ("technology", format!("{} technology stack solutions", idea)),
    ]
}

/// Company name guessed from a display link ("www.fitbot.com" -> "fitbot").
fn company_name(display_link: &str) -> String {
    display_link.replace("www.", "").replace(".com", "")
}

pub struct MarketResearcher {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    results_per_query: u32,
    search_pause: Duration,
    competitor_pause: Duration,
}

impl MarketResearcher {
    pub fn new(search: Arc<dyn SearchProvider>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            search,
            fetcher,
            results_per_query: crate::config::constants::DEFAULT_RESULTS_PER_QUERY,
            search_pause: Duration::ZERO,
            competitor_pause: Duration::ZERO,
        }
    }

    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        Ok(Self::new(build_search(config)?, Arc::new(HttpPageFetcher::new()?))
            .with_results_per_query(config.results_per_query)
            .with_pauses(
                Duration::from_millis(config.search_pause_ms),
                Duration::from_millis(config.competitor_pause_ms),
            ))
    }

    pub fn with_results_per_query(mut self, results: u32) -> Self {
        self.results_per_query = results;
        self
    }

    pub fn with_pauses(mut self, search: Duration, competitor: Duration) -> Self {
        self.search_pause = search;
        self.competitor_pause = competitor;
        self
    }

    /// Run every research query for `idea`.
    ///
    /// `more_competitors` hits are also appended to `competitors` so that
    /// competitor analysis has a wider pool.
    pub async fn conduct_search(&self, idea: &str) -> SearchResults {
        tracing::info!("Conducting market research searches");
        let pacer = Pacer::new(self.search_pause);
        let mut results = SearchResults::new();

        for (category, query) in research_queries(idea) {
            pacer.wait().await;
            tracing::debug!("Searching: {}", category);
            let hits = self.search.search(&query, self.results_per_query).await;
            results.insert(category.to_string(), hits);
        }

        let more = results.get("more_competitors").cloned().unwrap_or_default();
        if let Some(competitors) = results.get_mut("competitors") {
            competitors.extend(more);
        }
        results
    }

    /// Fetch pages and look up funding and reviews for the leading hits.
    ///
    /// Stops after three competitors were analyzed. Pages that could not be
    /// fetched don't count; if fewer than three succeed, unused hits are added
    /// with empty research data.
    pub async fn analyze_competitors(&self, results: &[SearchResult]) -> Vec<CompetitorResearch> {
        tracing::info!("Analyzing competitors");
        let pacer = Pacer::new(self.competitor_pause);
        let mut analyzed: Vec<CompetitorResearch> = Vec::new();
        let mut used = HashSet::new();

        let candidates = results.len().min(MAX_CANDIDATES);
        for (i, result) in results.iter().take(MAX_CANDIDATES).enumerate() {
            pacer.wait().await;
            tracing::debug!("Analyzing: {} ({}/{})", result.title, i + 1, candidates);

            let scraped = self.fetcher.fetch(&result.link).await;
            if !scraped.is_ok() {
                tracing::warn!(
                    "Skipping competitor {}: {}",
                    result.link,
                    scraped.error.as_deref().unwrap_or("fetch failed")
                );
                continue;
            }

            let name = company_name(&result.display_link);
            let funding = self
                .search
                .search(&format!("{} funding investment series", name), LOOKUP_RESULTS)
                .await;
            let reviews = self
                .search
                .search(&format!("{} reviews ratings", name), LOOKUP_RESULTS)
                .await;

            used.insert(i);
            analyzed.push(CompetitorResearch {
                search_result: result.clone(),
                scraped,
                funding,
                reviews,
            });

            if analyzed.len() >= TARGET_COMPETITORS {
                break;
            }
        }

        if analyzed.len() < TARGET_COMPETITORS {
            let needed = TARGET_COMPETITORS - analyzed.len();
            let padding: Vec<CompetitorResearch> = results
                .iter()
                .enumerate()
                .filter(|(i, _)| !used.contains(i))
                .take(needed)
                .map(|(_, result)| CompetitorResearch {
                    scraped: ScrapedPage {
                        url: result.link.clone(),
                        ..ScrapedPage::default()
                    },
                    search_result: result.clone(),
                    ..CompetitorResearch::default()
                })
                .collect();
            analyzed.extend(padding);
        }

        tracing::info!("Analyzed {} competitors", analyzed.len());
        analyzed
    }
}

/// Google search when both credentials are configured, otherwise none.
pub fn build_search(config: &ResearchConfig) -> Result<Arc<dyn SearchProvider>> {
    match (&config.search_api_key, &config.search_engine_id) {
        (Some(key), Some(cx)) if !key.is_empty() && !cx.is_empty() => Ok(Arc::new(
            GoogleSearch::new(key.clone(), cx.clone(), config.search_url.clone())?,
        )),
        _ => {
            tracing::warn!("No search credentials configured; market research will be limited");
            Ok(Arc::new(NoSearch))
        }
    }
}
