// Competitor page fetching and HTML feature extraction

use anyhow::{Context, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::truncate_chars;

const FETCH_TIMEOUT_SECS: u64 = 15;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const TEXT_SAMPLE_CHARS: usize = 1000;
const MAX_FEATURES: usize = 15;
const MAX_PRICE_MENTIONS: usize = 10;
const MAX_PRICING_SECTIONS: usize = 3;

const SKIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "noscript"];
const FEATURE_KEYWORDS: &[&str] = &["feature", "benefit", "capability", "service"];
const HEADING_KEYWORDS: &[&str] = &["feature", "benefit", "capability", "service", "solution"];
const PRICING_KEYWORDS: &[&str] = &[
    "pricing", "price", "subscription", "plan", "cost", "free", "trial", "premium", "basic",
    "pro", "enterprise",
];
const ABOUT_KEYWORDS: &[&str] = &["about", "company", "founded", "team", "mission", "vision"];
const SOCIAL_PLATFORMS: &[&str] = &["twitter", "facebook", "linkedin", "instagram", "youtube"];

static PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\d+(?:\.\d{2})?(?:/month|/year|/mo|/yr)?").expect("price pattern is valid")
});

static FOUNDED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:founded|since|established).*?(\d{4})").expect("founded pattern is valid")
});

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static LISTS: Lazy<Selector> = Lazy::new(|| selector("ul, ol"));
static LIST_ITEMS: Lazy<Selector> = Lazy::new(|| selector("li"));
static HEADINGS: Lazy<Selector> = Lazy::new(|| selector("h1, h2, h3, h4"));
static SECTIONS: Lazy<Selector> = Lazy::new(|| selector("div, section"));
static LINKS: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// What could be learned about a competitor from its landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub text_sample: String,
    pub features: Vec<String>,
    pub price_mentions: Vec<String>,
    pub pricing_sections: Vec<String>,
    pub about_text: Option<String>,
    pub founded_year: Option<String>,
    /// Platform name to first matching link
    pub social_links: IndexMap<String, String>,
    pub content_length: usize,
    /// Set when the page could not be fetched
    pub error: Option<String>,
}

impl ScrapedPage {
    pub fn failed(url: &str, error: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Never fails: problems are recorded in [`ScrapedPage::error`].
    async fn fetch(&self, url: &str) -> ScrapedPage;
}

/// Downloads pages over HTTP with a browser user agent.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    async fn download(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> ScrapedPage {
        match self.download(url).await {
            Ok(html) => parse_page(url, &html),
            Err(e) => {
                tracing::warn!("Scraping error for {}: {:#}", url, e);
                ScrapedPage::failed(url, format!("{:#}", e))
            }
        }
    }
}

/// Extract everything useful from a downloaded page.
pub fn parse_page(url: &str, html: &str) -> ScrapedPage {
    let doc = Html::parse_document(html);
    let text = visible_text(&doc);

    let title = doc
        .select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());
    let meta_description = doc
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string());

    let pricing_sections = doc
        .select(&SECTIONS)
        .filter(|el| has_class_keyword(el, PRICING_KEYWORDS))
        .map(|el| truncate_chars(&element_text(el), 200))
        .filter(|t| !t.is_empty())
        .take(MAX_PRICING_SECTIONS)
        .collect();

    let about_text = doc
        .select(&SECTIONS)
        .find(|el| has_class_keyword(el, ABOUT_KEYWORDS))
        .map(|el| truncate_chars(&element_text(el), 300));

    ScrapedPage {
        url: url.to_string(),
        title,
        meta_description,
        text_sample: truncate_chars(&text, TEXT_SAMPLE_CHARS),
        features: features(&doc),
        price_mentions: PRICE
            .find_iter(&text)
            .take(MAX_PRICE_MENTIONS)
            .map(|m| m.as_str().to_string())
            .collect(),
        pricing_sections,
        about_text,
        founded_year: FOUNDED
            .captures(&text.to_lowercase())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
        social_links: social_links(&doc),
        content_length: text.chars().count(),
        error: None,
    }
}

/// Page text outside script, style, nav and footer, whitespace-collapsed.
fn visible_text(doc: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|e| SKIPPED_TAGS.contains(&e.name()))
                .unwrap_or(false)
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_class_keyword(el: &ElementRef<'_>, keywords: &[&str]) -> bool {
    el.value().classes().any(|class| {
        let class = class.to_lowercase();
        keywords.iter().any(|k| class.contains(k))
    })
}

fn features(doc: &Html) -> Vec<String> {
    let mut found = Vec::new();

    for list in doc.select(&LISTS).filter(|el| has_class_keyword(el, FEATURE_KEYWORDS)) {
        for item in list.select(&LIST_ITEMS) {
            let text = element_text(item);
            let len = text.chars().count();
            if len > 10 && len < 150 {
                found.push(text);
            }
        }
    }

    for heading in doc.select(&HEADINGS) {
        let heading_text = element_text(heading);
        let lower = heading_text.to_lowercase();
        if !HEADING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            continue;
        }
        let next = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| matches!(el.value().name(), "p" | "div" | "ul"));
        if let Some(next) = next {
            found.push(format!(
                "{}: {}",
                heading_text,
                truncate_chars(&element_text(next), 100)
            ));
        }
    }

    found.truncate(MAX_FEATURES);
    found
}

fn social_links(doc: &Html) -> IndexMap<String, String> {
    let mut links = IndexMap::new();
    for platform in SOCIAL_PLATFORMS {
        let href = doc
            .select(&LINKS)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href.to_lowercase().contains(platform));
        if let Some(href) = href {
            links.insert(platform.to_string(), href.to_string());
        }
    }
    links
}
