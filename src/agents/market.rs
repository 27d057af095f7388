// Market analyst: research plus one JSON-mode report request

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{pretty, CallSpec, StageOutcome, StageTracker};
use crate::config::GenerationConfig;
use crate::extract::extract_json;
use crate::providers::LlmProvider;
use crate::records::{
    string_map, strings, CompetitorInfo, MarketAnalysisReport, MarketSizing, MarketTrends,
    OpportunityAnalysis, RiskAnalysis,
};
use crate::research::{truncate_chars, CompetitorResearch, MarketResearcher, SearchResults};

const ANALYST: CallSpec = CallSpec {
    system: "You are a market research expert. You must return valid JSON that exactly \
             matches the provided template structure.",
    temperature: 0.1,
    max_tokens: 4000,
    json_mode: true,
};

/// Search hits per category shown to the model.
const PROMPT_RESULTS_PER_CATEGORY: usize = 3;

const MIN_FALLBACK_COMPETITORS: usize = 3;
const MAX_FALLBACK_COMPETITORS: usize = 5;

pub struct MarketAnalyst {
    provider: Arc<dyn LlmProvider>,
    researcher: Arc<MarketResearcher>,
    generation: GenerationConfig,
}

impl MarketAnalyst {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        researcher: Arc<MarketResearcher>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            researcher,
            generation,
        }
    }

    pub async fn analyze(&self, idea: &str) -> StageOutcome<MarketAnalysisReport> {
        tracing::info!("Starting market analysis for: {}", idea);

        let search = self.researcher.conduct_search(idea).await;
        let pool = search.get("competitors").cloned().unwrap_or_default();
        let competitors = self.researcher.analyze_competitors(&pool).await;

        tracing::info!("Generating market analysis report");
        let mut tracker = StageTracker::new("market");
        let drafted = self.draft_report(idea, &search, &competitors).await;
        let report = tracker.step("market report", drafted, || {
            fallback_report(idea, &search, &competitors)
        });
        tracker.finish(report)
    }

    async fn draft_report(
        &self,
        idea: &str,
        search: &SearchResults,
        competitors: &[CompetitorResearch],
    ) -> Result<MarketAnalysisReport> {
        let request = ANALYST.request(&self.generation, analysis_prompt(idea, search, competitors));
        let reply = self.provider.generate(&request).await?;

        let mut value = extract_json(&reply);
        let report = value
            .as_object_mut()
            .context("Market report reply is not a JSON object")?;
        report.insert("startup_idea".into(), json!(idea));
        report.insert("analysis_date".into(), json!(analysis_date()));

        serde_json::from_value(value).context("Market report does not match the template")
    }
}

fn analysis_date() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// The layout the model is asked to fill in.
fn report_template() -> Value {
    json!({
        "executive_summary": "string",
        "market_sizing": {
            "total_addressable_market": "string or null",
            "serviceable_addressable_market": "string or null",
            "serviceable_obtainable_market": "string or null",
            "market_growth_rate": "string or null",
            "geographic_distribution": {"region": "value"}
        },
        "market_trends": {
            "emerging_trends": ["list of trends"],
            "technology_trends": ["list of tech trends"],
            "consumer_behavior": ["list of behaviors"],
            "regulatory_factors": ["list of factors"]
        },
        "competitors": [{
            "name": "string",
            "website": "string or null",
            "description": "string",
            "features": ["list of features"],
            "pricing_model": "string or null",
            "pricing_details": "string or null",
            "target_audience": "string or null",
            "strengths": ["list of strengths"],
            "weaknesses": ["list of weaknesses"],
            "competitive_score": 0.0,
            "market_share": "string or null",
            "funding_info": "string or null",
            "founded_year": "string or null",
            "team_size": "string or null",
            "social_presence": {"platform": "metrics"},
            "user_reviews": {"score": 0.0, "sentiment": "string"}
        }],
        "competitive_landscape_summary": "string",
        "market_leaders": ["list of leaders"],
        "opportunity_analysis": {
            "market_gaps": ["list of gaps"],
            "underserved_segments": ["list of segments"],
            "differentiation_opportunities": ["list of opportunities"],
            "barrier_to_entry": {"factor": "description"},
            "success_factors": ["list of factors"]
        },
        "opportunity_score": 0.0,
        "risk_analysis": {
            "market_risks": ["list of risks"],
            "competitive_risks": ["list of risks"],
            "technology_risks": ["list of risks"],
            "regulatory_risks": ["list of risks"],
            "mitigation_strategies": ["list of strategies"]
        },
        "target_audience_segments": [{"name": "string", "description": "string", "size": "string"}],
        "go_to_market_insights": ["list of insights"],
        "strategic_recommendations": ["list of recommendations"],
        "next_steps": ["list of steps"]
    })
}

fn analysis_prompt(idea: &str, search: &SearchResults, competitors: &[CompetitorResearch]) -> String {
    let search_summary: serde_json::Map<String, Value> = search
        .iter()
        .map(|(category, results)| {
            let hits: Vec<Value> = results
                .iter()
                .take(PROMPT_RESULTS_PER_CATEGORY)
                .map(|r| json!({"title": r.title, "snippet": r.snippet}))
                .collect();
            (category.clone(), Value::Array(hits))
        })
        .collect();

    let competitor_summary: Vec<Value> = competitors
        .iter()
        .take(3)
        .map(|c| {
            json!({
                "name": c.search_result.title,
                "snippet": c.search_result.snippet,
                "website": c.search_result.link,
                "features": c.scraped.features.iter().take(5).collect::<Vec<_>>(),
            })
        })
        .collect();

    format!(
        "You are a senior market research analyst. Analyze the startup idea and data provided, \
         then return a JSON response that EXACTLY matches this template structure:\n\n\
         {template}\n\n\
         STARTUP IDEA: {idea}\n\n\
         SEARCH RESULTS:\n{search}\n\n\
         COMPETITOR DATA:\n{competitors}\n\n\
         CRITICAL: Your response must be valid JSON that exactly matches the template structure above.\n\
         Replace all placeholder values with actual analysis data.\n\
         Use null for optional fields that have no data.\n\
         Ensure all arrays have at least one item, even if it's a placeholder.",
        template = pretty(&report_template()),
        idea = idea,
        search = pretty(&search_summary),
        competitors = pretty(&competitor_summary),
    )
}

/// Report assembled from the research data alone.
pub fn fallback_report(
    idea: &str,
    search: &SearchResults,
    competitors: &[CompetitorResearch],
) -> MarketAnalysisReport {
    tracing::info!("Creating fallback report from search data");

    let mut infos: Vec<CompetitorInfo> = competitors
        .iter()
        .take(MAX_FALLBACK_COMPETITORS)
        .enumerate()
        .map(|(i, c)| researched_competitor(i, c))
        .collect();

    if infos.len() < MIN_FALLBACK_COMPETITORS {
        let extra: Vec<CompetitorInfo> = search
            .get("competitors")
            .map(|results| results.iter().skip(infos.len()))
            .into_iter()
            .flatten()
            .take(MIN_FALLBACK_COMPETITORS - infos.len())
            .map(|r| CompetitorInfo {
                features: strings(&["Standard industry features"]),
                strengths: strings(&["Market presence"]),
                weaknesses: strings(&["Limited data available"]),
                competitive_score: 6.0,
                ..basic_competitor(&r.title, &r.link, &r.snippet)
            })
            .collect();
        infos.extend(extra);
    }

    let snippets = |category: &str| -> Vec<String> {
        search
            .get(category)
            .map(|results| {
                results
                    .iter()
                    .take(3)
                    .map(|r| truncate_chars(&r.snippet, 100))
                    .collect()
            })
            .unwrap_or_default()
    };
    let or_default = |items: Vec<String>, default: &[&str]| {
        if items.is_empty() {
            strings(default)
        } else {
            items
        }
    };

    let trends = or_default(
        snippets("trends"),
        &["AI integration in fitness", "Personalization trends"],
    );
    let market_gaps = or_default(
        snippets("challenges"),
        &["Enhanced personalization opportunities"],
    );

    MarketAnalysisReport {
        startup_idea: idea.to_string(),
        analysis_date: analysis_date(),
        executive_summary: format!(
            "Market analysis for {} shows competitive landscape with opportunities for differentiation.",
            idea
        ),
        market_sizing: MarketSizing {
            total_addressable_market: Some("Data extraction in progress".into()),
            market_growth_rate: Some("Growing market based on search trends".into()),
            ..MarketSizing::default()
        },
        market_trends: MarketTrends {
            emerging_trends: trends,
            technology_trends: strings(&["AI and ML adoption", "Mobile-first solutions"]),
            consumer_behavior: strings(&[
                "Demand for personalized experiences",
                "Mobile fitness adoption",
            ]),
            regulatory_factors: strings(&["Data privacy considerations"]),
        },
        competitive_landscape_summary: format!(
            "Found {} major competitors with established market presence",
            infos.len()
        ),
        market_leaders: infos.iter().take(3).map(|c| c.name.clone()).collect(),
        competitors: infos,
        opportunity_analysis: OpportunityAnalysis {
            market_gaps,
            underserved_segments: strings(&[
                "Beginner fitness enthusiasts",
                "Specialized training needs",
            ]),
            differentiation_opportunities: strings(&[
                "AI-powered personalization",
                "Unique user experience",
            ]),
            barrier_to_entry: string_map(&[
                ("technology", "AI/ML expertise required"),
                ("market", "Established competitors"),
            ]),
            success_factors: strings(&[
                "User engagement",
                "Personalization accuracy",
                "Content quality",
            ]),
        },
        opportunity_score: 7.5,
        risk_analysis: RiskAnalysis {
            market_risks: strings(&["Market saturation", "Economic sensitivity"]),
            competitive_risks: strings(&["Established players", "New entrants"]),
            technology_risks: strings(&["AI accuracy", "Data privacy"]),
            regulatory_risks: strings(&["Health data regulations"]),
            mitigation_strategies: strings(&[
                "Focus on differentiation",
                "Strong data security",
                "User-centric design",
            ]),
        },
        target_audience_segments: vec![
            string_map(&[
                ("name", "Fitness Beginners"),
                ("description", "New to fitness, seeking guidance"),
                ("age", "18-35"),
            ]),
            string_map(&[
                ("name", "Busy Professionals"),
                ("description", "Time-constrained, efficiency-focused"),
                ("age", "25-45"),
            ]),
        ],
        go_to_market_insights: strings(&[
            "Mobile-first approach",
            "Freemium model consideration",
            "Social features for engagement",
        ]),
        strategic_recommendations: strings(&[
            "Focus on unique AI personalization features",
            "Develop strong onboarding experience",
            "Build community features",
            "Implement robust data analytics",
        ]),
        next_steps: strings(&[
            "Conduct user interviews with target segments",
            "Develop MVP with core AI features",
            "Test personalization algorithms",
            "Validate pricing model",
        ]),
    }
}

fn basic_competitor(title: &str, link: &str, snippet: &str) -> CompetitorInfo {
    CompetitorInfo {
        name: truncate_chars(title, 50),
        website: Some(link.to_string()),
        description: truncate_chars(snippet, 200),
        features: Vec::new(),
        pricing_model: None,
        pricing_details: None,
        target_audience: None,
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        competitive_score: 0.0,
        market_share: None,
        funding_info: None,
        founded_year: None,
        team_size: None,
        social_presence: None,
        user_reviews: None,
    }
}

fn researched_competitor(index: usize, research: &CompetitorResearch) -> CompetitorInfo {
    let hit = &research.search_result;
    let features = if research.scraped.features.is_empty() {
        strings(&["Feature analysis unavailable"])
    } else {
        research.scraped.features.iter().take(5).cloned().collect()
    };

    CompetitorInfo {
        features,
        pricing_model: research
            .scraped
            .price_mentions
            .first()
            .map(|price| format!("Starting from {}", price)),
        strengths: strings(&["Established market presence", "Brand recognition"]),
        weaknesses: strings(&["Analysis pending", "Limited differentiation data"]),
        competitive_score: 7.0 - index as f64 * 0.5,
        ..basic_competitor(&hit.title, &hit.link, &hit.snippet)
    }
}
