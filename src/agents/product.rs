// Product manager: personas, features, prioritization and validation plan

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{into_record, pretty, CallSpec, StageOutcome, StageTracker};
use crate::config::GenerationConfig;
use crate::extract::extract_json;
use crate::normalize::{normalize_features, normalize_personas};
use crate::providers::LlmProvider;
use crate::records::{
    string_map, strings, Feature, MarketAnalysisReport, ProductRoadmap, StringMap, UserPersona,
    ValidationExperiment,
};
use crate::research::truncate_chars;

const PERSONAS: CallSpec = CallSpec {
    system: "You are a product manager expert who creates detailed user personas based on \
             market analysis.",
    temperature: 0.5,
    max_tokens: 3000,
    json_mode: true,
};

const FEATURES: CallSpec = CallSpec {
    system: "You are a product manager expert who creates comprehensive feature lists based on \
             user personas and market analysis.",
    temperature: 0.5,
    max_tokens: 4000,
    json_mode: true,
};

/// Impact at or above this counts as high in the priority matrix.
const HIGH_IMPACT: i64 = 7;
/// Effort at or above this counts as high in the priority matrix.
const HIGH_EFFORT: i64 = 6;

const MIN_MVP_FEATURES: usize = 3;

pub struct ProductManager {
    provider: Arc<dyn LlmProvider>,
    generation: GenerationConfig,
}

impl ProductManager {
    pub fn new(provider: Arc<dyn LlmProvider>, generation: GenerationConfig) -> Self {
        Self {
            provider,
            generation,
        }
    }

    pub async fn plan(&self, report: &MarketAnalysisReport) -> StageOutcome<ProductRoadmap> {
        tracing::info!("Creating product roadmap for: {}", report.startup_idea);
        let mut tracker = StageTracker::new("product");

        tracing::info!("Generating user personas");
        let drafted = self.draft_personas(report).await;
        let personas = tracker.step("user personas", drafted, || fallback_personas(report));

        tracing::info!("Generating product features");
        let drafted = self.draft_features(report, &personas).await;
        let features = tracker.step("features", drafted, || fallback_features(&personas));

        let prioritization = prioritize(&features, &personas);
        tracing::debug!(matrix = ?prioritization.matrix, "Priority matrix");

        let validation_experiments = validation_experiments(&personas, &prioritization.mvp);

        tracker.finish(ProductRoadmap {
            startup_idea: report.startup_idea.clone(),
            user_personas: personas,
            features,
            mvp_features: prioritization.mvp,
            milestone_1_features: prioritization.milestone_1,
            milestone_2_features: prioritization.milestone_2,
            validation_experiments,
            success_metrics: success_metrics(),
        })
    }

    async fn draft_personas(&self, report: &MarketAnalysisReport) -> Result<Vec<UserPersona>> {
        let request = PERSONAS.request(&self.generation, personas_prompt(report));
        let reply = self.provider.generate(&request).await?;
        let personas: Vec<UserPersona> =
            into_record(normalize_personas(&extract_json(&reply))?, "personas")?;
        if personas.is_empty() {
            anyhow::bail!("reply contained no personas");
        }
        Ok(personas)
    }

    async fn draft_features(
        &self,
        report: &MarketAnalysisReport,
        personas: &[UserPersona],
    ) -> Result<Vec<Feature>> {
        let request = FEATURES.request(&self.generation, features_prompt(report, personas));
        let reply = self.provider.generate(&request).await?;
        let features: Vec<Feature> =
            into_record(normalize_features(&extract_json(&reply))?, "features")?;
        if features.is_empty() {
            anyhow::bail!("reply contained no features");
        }
        Ok(features)
    }
}

fn personas_prompt(report: &MarketAnalysisReport) -> String {
    let template = json!({
        "personas": [{
            "name": "Name",
            "description": "Description",
            "demographics": {"age": "range", "gender": "distribution", "occupation": "typical jobs"},
            "pain_points": ["pain point 1", "pain point 2"],
            "goals": ["goal 1", "goal 2"],
            "behaviors": ["behavior 1", "behavior 2"],
            "needs": ["need 1", "need 2"],
            "tech_savviness": "High/Medium/Low"
        }]
    });
    let opportunity = &report.opportunity_analysis;

    format!(
        "You are a product manager specializing in user persona creation. Based on the market \
         analysis data provided, create 3-5 detailed user personas for a startup with the idea: \
         {idea}.\n\n\
         Ensure each persona is distinct and represents a different target audience segment.\n\n\
         MARKET ANALYSIS DATA:\n\
         - Target Audience Segments: {segments}\n\
         - Market Gaps: {gaps}\n\
         - Underserved Segments: {underserved}\n\
         - Consumer Behavior: {behavior}\n\
         - Competitive Landscape: {landscape}\n\n\
         Generate your response as a JSON object that EXACTLY matches this structure:\n{template}\n\n\
         The personas should be realistic, detailed, and directly relevant to the startup idea.\n\
         Ensure diversity in the personas to cover different age groups, technical abilities, and needs.",
        idea = report.startup_idea,
        segments = json!(report.target_audience_segments),
        gaps = json!(opportunity.market_gaps),
        underserved = json!(opportunity.underserved_segments),
        behavior = json!(report.market_trends.consumer_behavior),
        landscape = report.competitive_landscape_summary,
        template = pretty(&template),
    )
}

fn features_prompt(report: &MarketAnalysisReport, personas: &[UserPersona]) -> String {
    let template = json!({
        "features": [{
            "name": "Feature Name",
            "description": "Detailed description",
            "priority": "HIGH/MEDIUM/LOW",
            "effort": 5,
            "impact": 8,
            "user_stories": ["As a user, I want to..."],
            "target_personas": ["Persona Name"],
            "technical_complexity": 6,
            "dependencies": ["Another Feature"],
            "metrics": ["Metric to measure success"]
        }]
    });

    let competitor_features: Vec<Value> = report
        .competitors
        .iter()
        .take(3)
        .flat_map(|c| {
            c.features
                .iter()
                .take(3)
                .map(move |f| json!({"competitor": c.name, "feature": f}))
        })
        .collect();

    let persona_summaries: Vec<Value> = personas
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "pain_points": p.pain_points,
                "goals": p.goals,
                "needs": p.needs,
            })
        })
        .collect();

    format!(
        "You are a product manager tasked with generating a comprehensive feature list for a new product.\n\n\
         STARTUP IDEA: {idea}\n\n\
         USER PERSONAS:\n{personas}\n\n\
         COMPETITOR FEATURES (for inspiration):\n{competitors}\n\n\
         MARKET GAPS:\n{gaps}\n\n\
         DIFFERENTIATION OPPORTUNITIES:\n{differentiation}\n\n\
         Generate 10-15 well-defined features for this product that address the personas' needs and pain points.\n\
         Each feature should be assigned to at least one persona.\n\
         Prioritize features that address key market gaps and differentiation opportunities.\n\
         Include both basic features needed for the product category AND innovative features that \
         would differentiate the product.\n\n\
         Generate your response as a JSON object that EXACTLY matches this structure:\n{template}\n\n\
         Ensure each feature has:\n\
         1. A clear, concise name\n\
         2. A detailed description\n\
         3. Reasonable effort and impact scores\n\
         4. At least one user story\n\
         5. The names of target personas (must match the exact names you were provided)\n\
         6. Relevant success metrics",
        idea = report.startup_idea,
        personas = pretty(&persona_summaries),
        competitors = pretty(&competitor_features),
        gaps = pretty(&report.opportunity_analysis.market_gaps),
        differentiation = pretty(&report.opportunity_analysis.differentiation_opportunities),
        template = pretty(&template),
    )
}

pub fn fallback_personas(report: &MarketAnalysisReport) -> Vec<UserPersona> {
    vec![UserPersona {
        name: "Primary User".into(),
        description: format!("Primary user of {}", report.startup_idea),
        demographics: string_map(&[("age", "25-45"), ("gender", "All"), ("occupation", "Various")]),
        pain_points: report
            .opportunity_analysis
            .market_gaps
            .iter()
            .take(2)
            .map(|gap| truncate_chars(gap, 100))
            .collect(),
        goals: strings(&["Solve main problem", "Improve efficiency"]),
        behaviors: strings(&["Mobile-first", "Values simplicity"]),
        needs: strings(&["Ease of use", "Reliable solution"]),
        tech_savviness: "Medium".into(),
    }]
}

pub fn fallback_features(personas: &[UserPersona]) -> Vec<Feature> {
    let target = personas
        .first()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Primary User".into());

    vec![Feature {
        name: "Core Functionality".into(),
        description: "The main functionality of the product".into(),
        priority: "HIGH".into(),
        effort: 5,
        impact: 8,
        user_stories: strings(&["As a user, I want to solve my main problem"]),
        target_personas: vec![target],
        technical_complexity: 5,
        dependencies: Vec::new(),
        metrics: strings(&["User Adoption"]),
    }]
}

/// Features bucketed by impact and effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriorityMatrix {
    pub high_impact_low_effort: Vec<String>,
    pub high_impact_high_effort: Vec<String>,
    pub low_impact_low_effort: Vec<String>,
    pub low_impact_high_effort: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prioritization {
    /// Feature names with their scores, best first
    pub scored: Vec<(String, f64)>,
    pub mvp: Vec<String>,
    pub milestone_1: Vec<String>,
    pub milestone_2: Vec<String>,
    pub matrix: PriorityMatrix,
}

/// Rank features by impact/effort, persona reach and complexity, then split
/// them into MVP and two follow-up milestones.
pub fn prioritize(features: &[Feature], personas: &[UserPersona]) -> Prioritization {
    let mut scored: Vec<(String, f64)> = features
        .iter()
        .map(|f| (f.name.clone(), feature_score(f, personas.len())))
        .collect();
    // Stable, so ties keep their generated order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut threshold = scored.len() / 3;
    if threshold < MIN_MVP_FEATURES && scored.len() > MIN_MVP_FEATURES {
        threshold = MIN_MVP_FEATURES;
    }

    let names: Vec<String> = scored.iter().map(|(name, _)| name.clone()).collect();
    let first = threshold.min(names.len());
    let second = (threshold * 2).min(names.len());

    let mut matrix = PriorityMatrix::default();
    for f in features {
        let bucket = match (f.impact >= HIGH_IMPACT, f.effort >= HIGH_EFFORT) {
            (true, false) => &mut matrix.high_impact_low_effort,
            (true, true) => &mut matrix.high_impact_high_effort,
            (false, false) => &mut matrix.low_impact_low_effort,
            (false, true) => &mut matrix.low_impact_high_effort,
        };
        bucket.push(f.name.clone());
    }

    Prioritization {
        mvp: names[..first].to_vec(),
        milestone_1: names[first..second].to_vec(),
        milestone_2: names[second..].to_vec(),
        scored,
        matrix,
    }
}

fn feature_score(feature: &Feature, persona_count: usize) -> f64 {
    let impact = feature.impact as f64;
    let base = if feature.effort > 0 {
        impact / feature.effort as f64
    } else {
        impact
    };

    let persona_weight = if persona_count > 0 {
        (feature.target_personas.len() as f64 / persona_count as f64).min(1.0)
    } else {
        0.5
    };

    let complexity_factor = 1.0 - feature.technical_complexity as f64 / 20.0;
    base * (1.0 + persona_weight) * complexity_factor
}

pub fn validation_experiments(
    personas: &[UserPersona],
    mvp: &[String],
) -> Vec<ValidationExperiment> {
    let interviews = personas.iter().map(|p| ValidationExperiment {
        name: format!("Validate {} Needs", p.name),
        description: format!(
            "Conduct user interviews with {} persona to validate their pain points and needs",
            p.name
        ),
        method: "User Interviews".into(),
        success_criteria: "Confirm at least 3 pain points with 80% of interviewees".into(),
    });

    let prototypes = mvp.iter().take(3).map(|feature| ValidationExperiment {
        name: format!("Validate {}", feature),
        description: format!(
            "Create a prototype of {} and test with target users",
            feature
        ),
        method: "Usability Testing".into(),
        success_criteria: "80% of users can complete the core task without assistance".into(),
    });

    interviews.chain(prototypes).collect()
}

pub fn success_metrics() -> StringMap {
    string_map(&[
        ("user_acquisition", "Number of new users per month"),
        ("user_retention", "Percentage of users active after 30 days"),
        ("user_engagement", "Average time spent in app per week"),
        ("revenue", "Monthly recurring revenue"),
        ("user_satisfaction", "Net Promoter Score"),
    ])
}
