// Technical architect: nine independent blueprint steps

use anyhow::Result;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use super::{into_record, CallSpec, StageOutcome, StageTracker};
use crate::config::GenerationConfig;
use crate::extract::extract_json;
use crate::normalize::{
    normalize_api_endpoints, normalize_architecture_diagram, normalize_database_schema,
    normalize_deployment_strategy, normalize_development_tools, normalize_implementation_roadmap,
    normalize_security_considerations, normalize_tech_stack, normalize_third_party_services,
    NormalizeError,
};
use crate::providers::LlmProvider;
use crate::records::{
    string_map, strings, ApiEndpoint, DatabaseTable, DeploymentStrategy, DevelopmentTool,
    ImplementationPhase, PhaseDuration, ProductRoadmap, SecurityConsiderations,
    TechStackComponent, TechnicalBlueprint, ThirdPartyService,
};

type Normalizer = fn(&Value) -> Result<Value, NormalizeError>;

/// One blueprint step: what to ask for and how to read the answer.
struct Step {
    label: &'static str,
    call: CallSpec,
    /// Completes "As a Technical Architect, ... for the following startup idea"
    task: &'static str,
    /// Details requested after the idea and MVP features
    details: &'static str,
    /// Also list the post-MVP milestone features
    milestones: bool,
}

const fn architect(system: &'static str, max_tokens: u32) -> CallSpec {
    CallSpec {
        system,
        temperature: 0.7,
        max_tokens,
        json_mode: false,
    }
}

const TECH_STACK: Step = Step {
    label: "tech stack",
    call: architect(
        "You are a Technical Architect specialized in designing technical solutions for startups.",
        2000,
    ),
    task: "recommend a technology stack",
    details: "Consider:\n\
              1. The nature of the application\n\
              2. Scalability requirements\n\
              3. Time to market\n\
              4. Development team expertise (assume a small team)\n\
              5. Cost constraints\n\n\
              Provide recommendations for the following categories:\n\
              - Frontend\n- Backend\n- Database\n- DevOps/Infrastructure\n- Mobile (if applicable)\n\n\
              For each technology, include:\n\
              - Name\n- Version\n- Justification\n- Alternatives considered\n\
              - Learning curve (Low, Medium, High)\n- Community support\n- Documentation quality\n\n\
              Format as a JSON object with categories as keys and arrays of technology objects as values.",
    milestones: false,
};

const DATABASE_SCHEMA: Step = Step {
    label: "database schema",
    call: architect("You are a Technical Architect specialized in database design.", 2000),
    task: "design a database schema",
    details: "For each table/collection, provide:\n\
              - Name\n- Type (table, collection, etc.)\n- Fields/columns with data types\n\
              - Relationships with other tables\n- Recommended indexes\n- Constraints\n\
              - Brief description\n\n\
              Format as a JSON array of database objects.",
    milestones: false,
};

const API_ENDPOINTS: Step = Step {
    label: "api endpoints",
    call: architect("You are a Technical Architect specialized in API design.", 2000),
    task: "define API endpoints",
    details: "For each endpoint, provide:\n\
              - Path\n- HTTP method\n- Description\n- Request body structure (if applicable)\n\
              - Response structure\n- Whether authentication is required\n- Related features\n\n\
              Format as a JSON array of endpoint objects.",
    milestones: false,
};

const DEPLOYMENT: Step = Step {
    label: "deployment strategy",
    call: architect("You are a Technical Architect specialized in deployment strategies.", 1500),
    task: "define a deployment strategy",
    details: "Provide:\n\
              - Recommended deployment approach\n- Infrastructure recommendations\n\
              - CI/CD pipeline recommendations\n- Scaling strategy\n\
              - Estimated costs for different components\n- Recommended monitoring tools\n\
              - Backup and disaster recovery strategy\n\n\
              Format as a JSON object with these properties.",
    milestones: false,
};

const SECURITY: Step = Step {
    label: "security considerations",
    call: architect("You are a Technical Architect specialized in security.", 1500),
    task: "define security considerations",
    details: "Provide:\n\
              - Recommended authentication method\n- Recommended authorization approach\n\
              - Data encryption recommendations\n- Security best practices to follow\n\
              - Compliance considerations\n- Security testing recommendations\n\n\
              Format as a JSON object with these properties.",
    milestones: false,
};

const SERVICES: Step = Step {
    label: "third-party services",
    call: architect("You are a Technical Architect specialized in third-party services.", 1500),
    task: "recommend third-party services",
    details: "Provide recommendations for categories such as:\n\
              - Payment processing\n- Email services\n- Authentication\n- Analytics\n\
              - Mapping\n- Storage\n- Etc.\n\n\
              For each service, include:\n\
              - Name\n- Description\n- Pricing tier (Free, Freemium, Paid)\n\
              - Integration complexity (Low, Medium, High)\n\n\
              Format as a JSON object with categories as keys and arrays of service objects as values.",
    milestones: false,
};

const DEV_TOOLS: Step = Step {
    label: "development tools",
    call: architect("You are a Technical Architect specialized in development tools.", 1500),
    task: "recommend development tools",
    details: "For each tool, include:\n\
              - Name\n- Category (IDE, Testing, Collaboration, etc.)\n- Description\n\
              - Pricing tier (Free, Freemium, Paid)\n\n\
              Format as a JSON array of tool objects.",
    milestones: false,
};

const ROADMAP: Step = Step {
    label: "implementation roadmap",
    call: architect("You are a Technical Architect specialized in project planning.", 1500),
    task: "create an implementation roadmap",
    details: "For each phase, include:\n\
              - Name\n- Description\n- Duration (in weeks)\n- Features to be implemented\n\
              - Technical deliverables\n\n\
              Format as a JSON array of phase objects.",
    milestones: true,
};

const DIAGRAM: Step = Step {
    label: "architecture diagram",
    call: architect("You are a Technical Architect specialized in system design.", 1500),
    task: "create a system architecture diagram",
    details: "Generate a Mermaid.js diagram that represents the system architecture. The diagram should:\n\n\
              1. Use flowchart LR or TB notation (left-to-right or top-to-bottom)\n\
              2. Include all main components (frontend, backend, databases, third-party services)\n\
              3. Show connections between components with appropriate arrows and labels\n\
              4. Group related components together where appropriate\n\
              5. Include a title and brief descriptions\n\n\
              The output should be ONLY the complete Mermaid.js code that can be directly rendered by a \
              Mermaid renderer.\n\
              Do not include any explanations or markdown code blocks around the Mermaid code.\n\
              Important: Make the diagram clean and professional, avoiding too much detail that would \
              make it cluttered.",
    milestones: false,
};

pub const DEFAULT_DIAGRAM: &str = "flowchart TB
    subgraph Client
        UI[User Interface]
        Mobile[Mobile App]
    end

    subgraph Backend
        API[API Gateway]
        Auth[Authentication]
        Logic[Business Logic]
    end

    subgraph Database
        DB[(Primary Database)]
        Cache[(Cache)]
    end

    UI --> API
    Mobile --> API
    API --> Auth
    API --> Logic
    Logic --> DB
    Logic --> Cache";

pub struct TechnicalArchitect {
    provider: Arc<dyn LlmProvider>,
    generation: GenerationConfig,
}

impl TechnicalArchitect {
    pub fn new(provider: Arc<dyn LlmProvider>, generation: GenerationConfig) -> Self {
        Self {
            provider,
            generation,
        }
    }

    pub async fn design(&self, roadmap: &ProductRoadmap) -> StageOutcome<TechnicalBlueprint> {
        tracing::info!("Generating technical blueprint for: {}", roadmap.startup_idea);
        let mut t = StageTracker::new("technical");

        let drafted = self
            .draft::<IndexMap<String, Vec<TechStackComponent>>>(&TECH_STACK, roadmap, normalize_tech_stack)
            .await
            .and_then(non_empty_map);
        let tech_stack = t.step(TECH_STACK.label, drafted, fallback_tech_stack);

        let drafted = self
            .draft::<Vec<DatabaseTable>>(&DATABASE_SCHEMA, roadmap, normalize_database_schema)
            .await
            .and_then(non_empty);
        let database_schema = t.step(DATABASE_SCHEMA.label, drafted, fallback_database_schema);

        let drafted = self
            .draft::<Vec<ApiEndpoint>>(&API_ENDPOINTS, roadmap, normalize_api_endpoints)
            .await
            .and_then(non_empty);
        let api_endpoints = t.step(API_ENDPOINTS.label, drafted, fallback_api_endpoints);

        let drafted = self
            .draft::<DeploymentStrategy>(&DEPLOYMENT, roadmap, normalize_deployment_strategy)
            .await;
        let deployment_strategy = t.step(DEPLOYMENT.label, drafted, fallback_deployment);

        let drafted = self
            .draft::<SecurityConsiderations>(&SECURITY, roadmap, normalize_security_considerations)
            .await;
        let security_considerations = t.step(SECURITY.label, drafted, fallback_security);

        let drafted = self
            .draft::<IndexMap<String, Vec<ThirdPartyService>>>(&SERVICES, roadmap, normalize_third_party_services)
            .await;
        let third_party_services = t.step(SERVICES.label, drafted, fallback_services);

        let drafted = self
            .draft::<Vec<DevelopmentTool>>(&DEV_TOOLS, roadmap, normalize_development_tools)
            .await
            .and_then(non_empty);
        let development_tools = t.step(DEV_TOOLS.label, drafted, fallback_development_tools);

        let drafted = self
            .draft::<Vec<ImplementationPhase>>(&ROADMAP, roadmap, normalize_implementation_roadmap)
            .await
            .and_then(non_empty);
        let implementation_roadmap = t.step(ROADMAP.label, drafted, || {
            fallback_implementation_roadmap(roadmap)
        });

        let drafted = self.draft_diagram(roadmap).await;
        let architecture_diagram = t.step(DIAGRAM.label, drafted, || DEFAULT_DIAGRAM.to_string());

        t.finish(TechnicalBlueprint {
            startup_idea: roadmap.startup_idea.clone(),
            tech_stack,
            database_schema,
            api_endpoints,
            deployment_strategy,
            security_considerations,
            third_party_services,
            development_tools,
            implementation_roadmap,
            architecture_diagram,
        })
    }

    async fn draft<T: DeserializeOwned>(
        &self,
        step: &Step,
        roadmap: &ProductRoadmap,
        normalize: Normalizer,
    ) -> Result<T> {
        tracing::debug!("Requesting {}", step.label);
        let request = step.call.request(&self.generation, step_prompt(step, roadmap));
        let reply = self.provider.generate(&request).await?;
        let normalized = normalize(&extract_json(&reply))?;
        into_record(normalized, step.label)
    }

    async fn draft_diagram(&self, roadmap: &ProductRoadmap) -> Result<String> {
        let request = DIAGRAM.call.request(&self.generation, step_prompt(&DIAGRAM, roadmap));
        let reply = self.provider.generate(&request).await?;
        Ok(normalize_architecture_diagram(&reply))
    }
}

fn step_prompt(step: &Step, roadmap: &ProductRoadmap) -> String {
    let mut prompt = format!(
        "As a Technical Architect, {} for the following startup idea:\n\n\
         Startup Idea: {}\n\n\
         MVP Features:\n{}\n\n",
        step.task,
        roadmap.startup_idea,
        roadmap.mvp_features.join(", ")
    );

    if step.milestones {
        prompt.push_str(&format!(
            "Post-MVP Features (Milestone 1):\n{}\n\n\
             Post-MVP Features (Milestone 2):\n{}\n\n",
            roadmap.milestone_1_features.join(", "),
            roadmap.milestone_2_features.join(", ")
        ));
    }

    prompt.push_str(step.details);
    prompt
}

fn non_empty<T>(items: Vec<T>) -> Result<Vec<T>> {
    if items.is_empty() {
        anyhow::bail!("reply contained no entries");
    }
    Ok(items)
}

fn non_empty_map<T>(map: IndexMap<String, T>) -> Result<IndexMap<String, T>> {
    if map.is_empty() {
        anyhow::bail!("reply contained no categories");
    }
    Ok(map)
}

fn component(
    name: &str,
    version: &str,
    justification: &str,
    alternatives: &[&str],
    learning_curve: &str,
    community_support: &str,
    documentation_quality: &str,
) -> Vec<TechStackComponent> {
    vec![TechStackComponent {
        name: name.into(),
        version: Some(version.into()),
        justification: justification.into(),
        alternatives_considered: strings(alternatives),
        learning_curve: learning_curve.into(),
        community_support: community_support.into(),
        documentation_quality: documentation_quality.into(),
    }]
}

pub fn fallback_tech_stack() -> IndexMap<String, Vec<TechStackComponent>> {
    IndexMap::from([
        (
            "Frontend".to_string(),
            component(
                "React",
                "18.x",
                "Popular, well-supported framework",
                &["Vue.js", "Angular"],
                "Medium",
                "Excellent",
                "Excellent",
            ),
        ),
        (
            "Backend".to_string(),
            component(
                "Node.js/Express",
                "18.x",
                "Fast development, large ecosystem",
                &["Django", "Flask", "Spring Boot"],
                "Low",
                "Excellent",
                "Good",
            ),
        ),
        (
            "Database".to_string(),
            component(
                "PostgreSQL",
                "15.x",
                "Reliable, feature-rich relational database",
                &["MongoDB", "MySQL"],
                "Medium",
                "Excellent",
                "Excellent",
            ),
        ),
    ])
}

fn columns(columns: Value) -> Vec<Map<String, Value>> {
    match columns {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn table(name: &str, fields: Value, description: &str) -> DatabaseTable {
    DatabaseTable {
        name: name.into(),
        kind: "table".into(),
        fields: columns(fields),
        relationships: Vec::new(),
        indexes: Vec::new(),
        constraints: Vec::new(),
        description: description.into(),
    }
}

pub fn fallback_database_schema() -> Vec<DatabaseTable> {
    vec![
        table(
            "users",
            json!([
                {"name": "id", "type": "uuid", "primary_key": true},
                {"name": "email", "type": "varchar", "unique": true},
                {"name": "password_hash", "type": "varchar"},
                {"name": "created_at", "type": "timestamp"}
            ]),
            "Stores user account information",
        ),
        table(
            "products",
            json!([
                {"name": "id", "type": "uuid", "primary_key": true},
                {"name": "name", "type": "varchar"},
                {"name": "description", "type": "text"},
                {"name": "price", "type": "decimal"}
            ]),
            "Stores product information",
        ),
    ]
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn fallback_api_endpoints() -> Vec<ApiEndpoint> {
    vec![
        ApiEndpoint {
            path: "/api/auth/login".into(),
            method: "POST".into(),
            description: "User login endpoint".into(),
            request_body: Some(object(json!({"email": "string", "password": "string"}))),
            response_structure: object(json!({
                "token": "string",
                "user": {"id": "string", "email": "string"}
            })),
            auth_required: false,
            related_features: strings(&["Authentication"]),
        },
        ApiEndpoint {
            path: "/api/users/me".into(),
            method: "GET".into(),
            description: "Get current user profile".into(),
            request_body: None,
            response_structure: object(json!({
                "id": "string",
                "email": "string",
                "name": "string"
            })),
            auth_required: true,
            related_features: strings(&["User Management"]),
        },
    ]
}

pub fn fallback_deployment() -> DeploymentStrategy {
    DeploymentStrategy {
        recommended_approach: "Containerized deployment on a managed Kubernetes service".into(),
        infrastructure: "AWS EKS or GKE".into(),
        ci_cd_pipeline: string_map(&[
            ("CI", "GitHub Actions"),
            ("CD", "ArgoCD"),
            ("Registry", "Amazon ECR"),
        ]),
        scaling_strategy: "Horizontal pod autoscaling based on CPU and memory usage".into(),
        estimated_costs: "Compute: $150-300/month; Storage: $20-50/month; Network: $10-30/month"
            .into(),
        monitoring_tools: strings(&["Prometheus", "Grafana", "CloudWatch"]),
        backup_strategy: "Daily automated snapshots with 7-day retention policy".into(),
    }
}

pub fn fallback_security() -> SecurityConsiderations {
    SecurityConsiderations {
        authentication_method: "JWT tokens with OAuth 2.0".into(),
        authorization_approach: "Role-based access control (RBAC)".into(),
        data_encryption: string_map(&[("at_rest", "AES-256"), ("in_transit", "TLS 1.3")]),
        security_best_practices: strings(&[
            "Input validation",
            "Sanitize user inputs",
            "Rate limiting",
            "Regular security updates",
        ]),
        compliance_considerations: strings(&["GDPR", "CCPA"]),
        security_testing: strings(&["Regular penetration testing", "OWASP Top 10 scanning"]),
    }
}

fn service(name: &str, description: &str, pricing: &str, complexity: &str) -> Vec<ThirdPartyService> {
    vec![ThirdPartyService {
        name: name.into(),
        description: description.into(),
        pricing_tier: pricing.into(),
        integration_complexity: complexity.into(),
    }]
}

pub fn fallback_services() -> IndexMap<String, Vec<ThirdPartyService>> {
    IndexMap::from([
        (
            "Authentication".to_string(),
            service("Auth0", "Identity platform for web, mobile, IoT", "Freemium", "Low"),
        ),
        (
            "Email".to_string(),
            service("SendGrid", "Email delivery service", "Freemium", "Low"),
        ),
        (
            "Payment".to_string(),
            service(
                "Stripe",
                "Payment processing platform",
                "Paid (per transaction)",
                "Medium",
            ),
        ),
    ])
}

pub fn fallback_development_tools() -> Vec<DevelopmentTool> {
    [
        ("Visual Studio Code", "IDE", "Lightweight, extensible code editor", "Free"),
        ("GitHub", "Version Control", "Code hosting and collaboration", "Freemium"),
        ("Jira", "Project Management", "Issue tracking and project management", "Freemium"),
    ]
    .into_iter()
    .map(|(name, category, description, pricing)| DevelopmentTool {
        name: name.into(),
        category: category.into(),
        description: description.into(),
        pricing: pricing.into(),
    })
    .collect()
}

/// First three of `features`, or all of them when there are three or fewer.
fn leading(features: &[String]) -> Vec<String> {
    features.iter().take(3).cloned().collect()
}

fn phase(
    name: &str,
    description: &str,
    weeks: u64,
    features: Vec<String>,
    deliverables: &[&str],
) -> ImplementationPhase {
    ImplementationPhase {
        name: name.into(),
        description: description.into(),
        duration: PhaseDuration::Weeks(weeks),
        features,
        technical_deliverables: strings(deliverables),
    }
}

/// Five-phase plan built from the roadmap's own feature buckets.
pub fn fallback_implementation_roadmap(roadmap: &ProductRoadmap) -> Vec<ImplementationPhase> {
    let mvp = &roadmap.mvp_features;
    let remaining_mvp = if mvp.len() > 3 {
        mvp[3..].to_vec()
    } else {
        strings(&["Testing", "Bug fixes"])
    };

    vec![
        phase(
            "Foundation",
            "Set up basic infrastructure and project structure",
            2,
            strings(&["Project setup", "CI/CD pipeline", "Basic authentication"]),
            &["Repository", "Infrastructure as Code", "Authentication system"],
        ),
        phase(
            "Core MVP Features",
            "Implement essential features for MVP",
            4,
            leading(mvp),
            &["Database schema", "Backend API", "Frontend components"],
        ),
        phase(
            "MVP Completion",
            "Complete remaining MVP features and testing",
            3,
            remaining_mvp,
            &["Complete application", "Test suite", "Deployment"],
        ),
        phase(
            "Milestone 1",
            "Implement first set of post-MVP features",
            4,
            leading(&roadmap.milestone_1_features),
            &["Feature extensions", "Enhanced UI/UX", "Performance optimizations"],
        ),
        phase(
            "Milestone 2",
            "Implement second set of post-MVP features",
            4,
            leading(&roadmap.milestone_2_features),
            &["Advanced features", "Integrations", "Scalability improvements"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::product::success_metrics;
    use crate::agents::testing::ScriptedProvider;

    fn roadmap(mvp: &[&str]) -> ProductRoadmap {
        ProductRoadmap {
            startup_idea: "AI fitness coach".into(),
            user_personas: Vec::new(),
            features: Vec::new(),
            mvp_features: strings(mvp),
            milestone_1_features: strings(&["Challenges"]),
            milestone_2_features: Vec::new(),
            validation_experiments: Vec::new(),
            success_metrics: success_metrics(),
        }
    }

    /// One reply per step, in step order.
    fn replies() -> Vec<&'static str> {
        vec![
            r#"{"tech_stack": {"Backend": [{"name": "Axum", "alternatives_considered": "Actix, Rocket"}]}}"#,
            r#"{"tables": [{"name": "workouts", "fields": {"id": "uuid", "title": "text"}}]}"#,
            r#"[{"path": "/api/workouts", "method": "get"}]"#,
            r#"{"deployment": {"recommended_approach": "Fly.io", "estimated_costs": {"compute": "$100"}}}"#,
            r#"{"security": {"authentication_method": {"recommended": "OAuth"}}}"#,
            r#"{"Payments": [{"name": "Stripe", "pricing": "Paid"}]}"#,
            r#"{"tools": [{"name": "Cargo", "pricing_tier": "Free"}]}"#,
            r#"{"phases": [{"name": "Kickoff", "duration": "1 week"}, {"duration": 3}]}"#,
            "```mermaid\ngraph LR\n  App --> API\n```",
        ]
    }

    #[tokio::test]
    async fn test_design_with_model_output() {
        let replies = replies();
        let provider = Arc::new(ScriptedProvider::new(replies.into_iter().map(Ok).collect()));
        let architect = TechnicalArchitect::new(provider.clone(), GenerationConfig::default());

        let outcome = architect.design(&roadmap(&["Workout plans"])).await;

        assert_eq!(outcome.status_label(), "success", "{:?}", outcome.reasons());
        let blueprint = outcome.into_record().unwrap();
        let backend = &blueprint.tech_stack["Backend"][0];
        assert_eq!(backend.name, "Axum");
        assert_eq!(backend.alternatives_considered, vec!["Actix", "Rocket"]);
        assert_eq!(blueprint.database_schema[0].fields.len(), 2);
        assert_eq!(blueprint.api_endpoints[0].path, "/api/workouts");
        assert_eq!(blueprint.deployment_strategy.recommended_approach, "Fly.io");
        assert_eq!(blueprint.deployment_strategy.estimated_costs, "compute: $100");
        assert_eq!(blueprint.security_considerations.authentication_method, "OAuth");
        assert_eq!(blueprint.third_party_services["Payments"][0].pricing_tier, "Paid");
        assert_eq!(blueprint.development_tools[0].pricing, "Free");
        assert_eq!(
            blueprint.implementation_roadmap[0].duration,
            PhaseDuration::Label("1 week".into())
        );
        assert_eq!(blueprint.implementation_roadmap[1].name, "Phase 2");
        assert_eq!(blueprint.architecture_diagram, "graph LR\n  App --> API");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 9);
        assert!(requests.iter().all(|r| r.temperature == Some(0.7) && !r.json_mode));
        assert_eq!(requests[0].max_tokens, 2000);
        assert_eq!(requests[3].max_tokens, 1500);
        assert!(requests[7].messages[0]
            .content
            .contains("Post-MVP Features (Milestone 1):\nChallenges"));
        assert!(requests[0].messages[0]
            .content
            .contains("MVP Features:\nWorkout plans"));
    }

    #[tokio::test]
    async fn test_each_step_falls_back_independently() {
        let mut replies: Vec<Result<&str, &str>> = replies().into_iter().map(Ok).collect();
        replies[1] = Ok(r#"{"tables": "users"}"#);
        replies[6] = Err("timeout");
        let architect = TechnicalArchitect::new(
            Arc::new(ScriptedProvider::new(replies)),
            GenerationConfig::default(),
        );

        let outcome = architect.design(&roadmap(&[])).await;

        assert_eq!(outcome.status_label(), "degraded");
        assert_eq!(outcome.reasons().len(), 2);
        let blueprint = outcome.record().unwrap();
        assert_eq!(blueprint.database_schema, fallback_database_schema());
        assert_eq!(blueprint.development_tools, fallback_development_tools());
        assert_eq!(blueprint.tech_stack["Backend"][0].name, "Axum");
    }

    #[tokio::test]
    async fn test_offline_provider_gives_full_fallback() {
        let architect =
            TechnicalArchitect::new(Arc::new(ScriptedProvider::offline()), GenerationConfig::default());
        let roadmap = roadmap(&["A", "B", "C", "D"]);

        let outcome = architect.design(&roadmap).await;

        assert_eq!(outcome.reasons().len(), 9);
        let blueprint = outcome.into_record().unwrap();
        assert_eq!(blueprint.tech_stack, fallback_tech_stack());
        assert_eq!(blueprint.third_party_services.len(), 3);
        assert_eq!(blueprint.architecture_diagram, DEFAULT_DIAGRAM);
        assert_eq!(blueprint.implementation_roadmap.len(), 5);
        assert_eq!(blueprint.implementation_roadmap[1].features, vec!["A", "B", "C"]);
        assert_eq!(blueprint.implementation_roadmap[2].features, vec!["D"]);
    }

    #[test]
    fn test_fallback_roadmap_with_short_mvp() {
        let phases = fallback_implementation_roadmap(&roadmap(&["A"]));
        assert_eq!(phases[1].features, vec!["A"]);
        assert_eq!(phases[2].features, vec!["Testing", "Bug fixes"]);
        assert_eq!(phases[3].features, vec!["Challenges"]);
        assert!(phases[4].features.is_empty());
    }

    #[test]
    fn test_fallback_records_serialize_with_expected_keys() {
        let value = serde_json::to_value(fallback_database_schema()).unwrap();
        assert_eq!(value[0]["type"], "table");
        assert_eq!(value[0]["fields"][0]["primary_key"], true);

        let value = serde_json::to_value(fallback_api_endpoints()).unwrap();
        assert_eq!(value[1]["request_body"], Value::Null);
    }
}
