// Market analysis report

use serde::{Deserialize, Serialize};

use super::StringMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorInfo {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    pub description: String,
    pub features: Vec<String>,
    /// Freemium, subscription, one-time, ...
    #[serde(default)]
    pub pricing_model: Option<String>,
    #[serde(default)]
    pub pricing_details: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Overall threat score on a 1-10 scale
    pub competitive_score: f64,
    #[serde(default)]
    pub market_share: Option<String>,
    #[serde(default)]
    pub funding_info: Option<String>,
    #[serde(default)]
    pub founded_year: Option<String>,
    #[serde(default)]
    pub team_size: Option<String>,
    #[serde(default)]
    pub social_presence: Option<StringMap>,
    #[serde(default)]
    pub user_reviews: Option<indexmap::IndexMap<String, ReviewValue>>,
}

/// A review entry is either a numeric score or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewValue {
    Score(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrends {
    pub emerging_trends: Vec<String>,
    pub technology_trends: Vec<String>,
    pub consumer_behavior: Vec<String>,
    pub regulatory_factors: Vec<String>,
}

/// TAM / SAM / SOM figures. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSizing {
    #[serde(default)]
    pub total_addressable_market: Option<String>,
    #[serde(default)]
    pub serviceable_addressable_market: Option<String>,
    #[serde(default)]
    pub serviceable_obtainable_market: Option<String>,
    #[serde(default)]
    pub market_growth_rate: Option<String>,
    #[serde(default)]
    pub geographic_distribution: Option<StringMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityAnalysis {
    pub market_gaps: Vec<String>,
    pub underserved_segments: Vec<String>,
    pub differentiation_opportunities: Vec<String>,
    pub barrier_to_entry: StringMap,
    pub success_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub market_risks: Vec<String>,
    pub competitive_risks: Vec<String>,
    pub technology_risks: Vec<String>,
    pub regulatory_risks: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

/// Output of the market stage and input of the product stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysisReport {
    pub startup_idea: String,
    /// Local time, `%Y-%m-%d %H:%M:%S`
    pub analysis_date: String,
    pub executive_summary: String,

    pub market_sizing: MarketSizing,
    pub market_trends: MarketTrends,

    pub competitors: Vec<CompetitorInfo>,
    pub competitive_landscape_summary: String,
    pub market_leaders: Vec<String>,

    pub opportunity_analysis: OpportunityAnalysis,
    /// 1-10
    pub opportunity_score: f64,

    pub risk_analysis: RiskAnalysis,

    pub target_audience_segments: Vec<StringMap>,
    pub go_to_market_insights: Vec<String>,
    pub strategic_recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_competitor_optional_fields_default() {
        let competitor: CompetitorInfo = serde_json::from_value(json!({
            "name": "FitBot",
            "description": "AI coach",
            "features": ["Plans"],
            "strengths": ["Brand"],
            "weaknesses": ["Price"],
            "competitive_score": 7,
            "user_reviews": {"score": 4.5, "sentiment": "positive"}
        }))
        .unwrap();

        assert_eq!(competitor.website, None);
        assert_eq!(competitor.competitive_score, 7.0);
        let reviews = competitor.user_reviews.unwrap();
        assert_eq!(reviews["score"], ReviewValue::Score(4.5));
        assert_eq!(reviews["sentiment"], ReviewValue::Text("positive".into()));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<MarketTrends, _> =
            serde_json::from_value(json!({"emerging_trends": ["AI"]}));
        assert!(result.is_err());
    }
}
