use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::project::ProjectDescription;

/// Request body for proposal generation, as received over the wire.
/// `format` and `diagram_types` stay raw strings until validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalRequestBody {
    pub project_details: ProjectDescription,
    pub format: String,
    #[serde(default = "default_include_diagrams")]
    pub include_diagrams: bool,
    /// Absent means "all default diagram types".
    #[serde(default)]
    pub diagram_types: Option<Vec<String>>,
}

fn default_include_diagrams() -> bool {
    true
}

/// A validated proposal request. Only `validation::validate_request` builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalRequest {
    pub project_details: ProjectDescription,
    pub format: OutputFormat,
    pub include_diagrams: bool,
    pub diagram_types: BTreeSet<DiagramType>,
}

/// Export format the downstream renderer should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Docx,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            other => Err(format!("must be one of 'pdf', 'docx' (got '{other}')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported diagram type '{0}'")]
pub struct UnsupportedDiagramType(pub String);

/// Closed set of diagrams the prompt builder knows how to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    Workflow,
    Database,
    Class,
    Activity,
}

impl DiagramType {
    pub const ALL: [DiagramType; 4] = [
        DiagramType::Workflow,
        DiagramType::Database,
        DiagramType::Class,
        DiagramType::Activity,
    ];

    /// Types generated when a request does not name any.
    pub fn defaults() -> BTreeSet<DiagramType> {
        Self::ALL.into_iter().collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiagramType::Workflow => "workflow",
            DiagramType::Database => "database",
            DiagramType::Class => "class",
            DiagramType::Activity => "activity",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DiagramType::Workflow => "Workflow Diagram",
            DiagramType::Database => "Database (Entity-Relationship) Diagram",
            DiagramType::Class => "Class Diagram",
            DiagramType::Activity => "Activity Diagram",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = UnsupportedDiagramType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DiagramType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnsupportedDiagramType(s.to_string()))
    }
}
