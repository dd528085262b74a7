use serde::{Deserialize, Serialize};

/// Structured description of a client project. Source of every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescription {
    pub project_name: String,
    pub client_name: String,
    pub industry: String,
    /// Free text, e.g. "6 months" or "Q3 launch".
    pub timeline: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    pub technical_stack: TechnicalStack,
    pub database_requirements: DatabaseRequirements,
    pub api_requirements: ApiRequirements,
    pub security_requirements: SecurityRequirements,
    pub system_architecture: SystemArchitecture,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalStack {
    pub frontend: Vec<String>,
    pub backend: Vec<String>,
    pub database: Vec<String>,
    pub devops: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseRequirements {
    /// e.g. "SQL", "NoSQL"
    #[serde(alias = "type")]
    pub database_type: String,
    #[serde(default)]
    pub scaling: Option<String>,
    #[serde(default)]
    pub backup: Option<String>,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub specific_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequirements {
    /// e.g. "JWT", "OAuth2", "API key"
    pub authentication_type: String,
    #[serde(default)]
    pub rate_limiting: Option<bool>,
    #[serde(default)]
    pub versioning: Option<bool>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    #[serde(default)]
    pub method: Option<String>,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityRequirements {
    pub authentication: Vec<String>,
    pub authorization: Vec<String>,
    pub data_encryption: Vec<String>,
    #[serde(default)]
    pub compliance: Vec<String>,
    #[serde(default)]
    pub specific_measures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemArchitecture {
    /// e.g. "Monolithic", "Microservices"
    pub architecture_type: String,
    #[serde(default)]
    pub deployment_strategy: Option<String>,
    #[serde(default)]
    pub scaling_strategy: Option<String>,
    #[serde(default)]
    pub specific_requirements: Vec<String>,
}

#[cfg(test)]
pub mod fixtures {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// The "Acme Portal" project used across module tests.
    pub fn acme_portal() -> ProjectDescription {
        ProjectDescription {
            project_name: "Acme Portal".to_string(),
            client_name: "Acme Corp".to_string(),
            industry: "Retail".to_string(),
            timeline: "6 months".to_string(),
            budget: None,
            description: Some("Customer self-service portal".to_string()),
            technical_stack: TechnicalStack {
                frontend: strings(&["React"]),
                backend: strings(&["FastAPI"]),
                database: strings(&["Postgres"]),
                devops: strings(&["Docker"]),
                other: vec![],
            },
            database_requirements: DatabaseRequirements {
                database_type: "SQL".to_string(),
                scaling: None,
                backup: Some("Nightly snapshots".to_string()),
                security: None,
                specific_requirements: vec![],
            },
            api_requirements: ApiRequirements {
                authentication_type: "JWT".to_string(),
                rate_limiting: Some(true),
                versioning: None,
                documentation: None,
                endpoints: vec![EndpointSpec {
                    method: Some("GET".to_string()),
                    path: "/orders".to_string(),
                    description: Some("List customer orders".to_string()),
                }],
            },
            security_requirements: SecurityRequirements {
                authentication: strings(&["SSO"]),
                authorization: strings(&["RBAC"]),
                data_encryption: strings(&["TLS 1.3", "AES-256 at rest"]),
                compliance: strings(&["PCI DSS"]),
                specific_measures: vec![],
            },
            system_architecture: SystemArchitecture {
                architecture_type: "Microservices".to_string(),
                deployment_strategy: Some("Blue/green on Kubernetes".to_string()),
                scaling_strategy: None,
                specific_requirements: vec![],
            },
        }
    }

    /// JSON body matching `acme_portal()`, as the frontend would send it.
    pub fn acme_portal_json() -> serde_json::Value {
        serde_json::to_value(acme_portal()).unwrap()
    }
}
