// Wrapper keys models nest their payload under, per record type

use serde_json::Value;

/// Record name used in errors plus the wrapper keys tried in order.
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    pub record: &'static str,
    pub keys: &'static [&'static str],
}

impl AliasTable {
    /// Descend once into the first alias key present in `data`.
    pub fn unwrap<'a>(&self, data: &'a Value) -> &'a Value {
        match data {
            Value::Object(map) => self
                .keys
                .iter()
                .find_map(|key| map.get(*key))
                .unwrap_or(data),
            _ => data,
        }
    }
}

pub const TECH_STACK: AliasTable = AliasTable {
    record: "tech stack",
    keys: &["tech_stack", "technologies"],
};

pub const API_ENDPOINTS: AliasTable = AliasTable {
    record: "api endpoints",
    keys: &["api_endpoints", "endpoints"],
};

pub const DEPLOYMENT: AliasTable = AliasTable {
    record: "deployment strategy",
    keys: &["deployment_strategy", "deployment"],
};

pub const SECURITY: AliasTable = AliasTable {
    record: "security considerations",
    keys: &["security_considerations", "securityConsiderations", "security"],
};

pub const SERVICES: AliasTable = AliasTable {
    record: "third-party services",
    keys: &["third_party_services", "services"],
};

pub const DATABASE_SCHEMA: AliasTable = AliasTable {
    record: "database schema",
    keys: &["tables", "database_schema"],
};

pub const DEV_TOOLS: AliasTable = AliasTable {
    record: "development tools",
    keys: &["tools", "development_tools"],
};

pub const ROADMAP: AliasTable = AliasTable {
    record: "implementation roadmap",
    keys: &["roadmap", "phases"],
};

pub const PERSONAS: AliasTable = AliasTable {
    record: "user personas",
    keys: &["personas", "user_personas"],
};

pub const FEATURES: AliasTable = AliasTable {
    record: "features",
    keys: &["features"],
};
