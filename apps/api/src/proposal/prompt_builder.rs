//! Prompt Builder: renders a `ProjectDescription` into model prompts.
//!
//! Pure and deterministic: same input, byte-identical prompt; no I/O.
//! Placeholder policy: every absent optional field and every empty list renders
//! as `Not specified`, so the model always sees the same prompt shape.

use crate::llm_client::prompts::{fill_template, GROUNDING_INSTRUCTION};
use crate::models::project::{ProjectDescription, TechnicalStack};
use crate::models::proposal::DiagramType;
use crate::proposal::prompts::{
    ACTIVITY_GUIDANCE, CLASS_GUIDANCE, DATABASE_GUIDANCE, DIAGRAM_PROMPT_TEMPLATE,
    SRS_PROMPT_TEMPLATE, WORKFLOW_GUIDANCE,
};
use crate::proposal::sections::SectionKind;

const NOT_SPECIFIED: &str = "Not specified";

/// Builds the prompt for the main SRS document.
pub fn build_main_prompt(project: &ProjectDescription) -> String {
    let section_list = SectionKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}. {}", i + 1, kind.title()))
        .collect::<Vec<_>>()
        .join("\n");

    let project_context = render_project_context(project);

    fill_template(
        SRS_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("project_context", project_context.as_str()),
            ("section_list", section_list.as_str()),
        ],
    )
}

/// Builds the prompt asking for a structured description of one diagram.
pub fn build_diagram_prompt(diagram_type: DiagramType, project: &ProjectDescription) -> String {
    let guidance = match diagram_type {
        DiagramType::Workflow => WORKFLOW_GUIDANCE,
        DiagramType::Database => DATABASE_GUIDANCE,
        DiagramType::Class => CLASS_GUIDANCE,
        DiagramType::Activity => ACTIVITY_GUIDANCE,
    };

    let architecture_type =
        text_or_placeholder(Some(project.system_architecture.architecture_type.as_str()));
    let technical_stack = render_stack(&project.technical_stack).join("\n");

    fill_template(
        DIAGRAM_PROMPT_TEMPLATE,
        &[
            ("diagram_title", diagram_type.title()),
            ("diagram_guidance", guidance),
            ("project_name", project.project_name.trim()),
            ("architecture_type", architecture_type),
            ("technical_stack", technical_stack.as_str()),
            ("grounding_instruction", GROUNDING_INSTRUCTION),
        ],
    )
}

fn render_project_context(project: &ProjectDescription) -> String {
    let mut lines = vec![
        "PROJECT INFORMATION:".to_string(),
        item("Project Name", Some(project.project_name.as_str())),
        item("Client", Some(project.client_name.as_str())),
        item("Industry", Some(project.industry.as_str())),
        item("Timeline", Some(project.timeline.as_str())),
        format!(
            "- Budget: {}",
            project
                .budget
                .map(format_budget)
                .unwrap_or_else(|| NOT_SPECIFIED.to_string())
        ),
        item("Description", project.description.as_deref()),
        String::new(),
        "TECHNICAL STACK:".to_string(),
    ];
    lines.extend(render_stack(&project.technical_stack));

    let db = &project.database_requirements;
    lines.extend([
        String::new(),
        "DATABASE REQUIREMENTS:".to_string(),
        item("Type", Some(db.database_type.as_str())),
        item("Scaling", db.scaling.as_deref()),
        item("Backup", db.backup.as_deref()),
        item("Security", db.security.as_deref()),
        list_item("Specific Requirements", &db.specific_requirements, "; "),
    ]);

    let api = &project.api_requirements;
    lines.extend([
        String::new(),
        "API REQUIREMENTS:".to_string(),
        item("Authentication", Some(api.authentication_type.as_str())),
        format!("- Rate Limiting: {}", requirement_flag(api.rate_limiting)),
        format!("- Versioning: {}", requirement_flag(api.versioning)),
        item("Documentation", api.documentation.as_deref()),
    ]);
    if api.endpoints.is_empty() {
        lines.push(format!("- Endpoints: {NOT_SPECIFIED}"));
    } else {
        lines.push("- Endpoints:".to_string());
        for endpoint in &api.endpoints {
            let route = match endpoint.method.as_deref().map(str::trim) {
                Some(method) if !method.is_empty() => {
                    format!("{} {}", method.to_uppercase(), endpoint.path.trim())
                }
                _ => endpoint.path.trim().to_string(),
            };
            lines.push(format!(
                "  - {route}: {}",
                text_or_placeholder(endpoint.description.as_deref())
            ));
        }
    }

    let security = &project.security_requirements;
    lines.extend([
        String::new(),
        "SECURITY REQUIREMENTS:".to_string(),
        list_item("Authentication", &security.authentication, ", "),
        list_item("Authorization", &security.authorization, ", "),
        list_item("Data Encryption", &security.data_encryption, ", "),
        list_item("Compliance", &security.compliance, ", "),
        list_item("Specific Measures", &security.specific_measures, "; "),
    ]);

    let architecture = &project.system_architecture;
    lines.extend([
        String::new(),
        "SYSTEM ARCHITECTURE:".to_string(),
        item("Type", Some(architecture.architecture_type.as_str())),
        item("Deployment Strategy", architecture.deployment_strategy.as_deref()),
        item("Scaling Strategy", architecture.scaling_strategy.as_deref()),
        list_item(
            "Specific Requirements",
            &architecture.specific_requirements,
            "; ",
        ),
    ]);

    lines.join("\n")
}

fn render_stack(stack: &TechnicalStack) -> Vec<String> {
    vec![
        list_item("Frontend", &stack.frontend, ", "),
        list_item("Backend", &stack.backend, ", "),
        list_item("Database", &stack.database, ", "),
        list_item("DevOps", &stack.devops, ", "),
        list_item("Other", &stack.other, ", "),
    ]
}

fn text_or_placeholder(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => NOT_SPECIFIED,
    }
}

fn item(label: &str, value: Option<&str>) -> String {
    format!("- {label}: {}", text_or_placeholder(value))
}

fn list_item(label: &str, values: &[String], separator: &str) -> String {
    let entries: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if entries.is_empty() {
        format!("- {label}: {NOT_SPECIFIED}")
    } else {
        format!("- {label}: {}", entries.join(separator))
    }
}

fn requirement_flag(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "Required",
        Some(false) => "Not required",
        None => NOT_SPECIFIED,
    }
}

/// Thousands separators, at most two decimals: 50000 → "50,000", 1234.5 → "1,234.50".
fn format_budget(amount: f64) -> String {
    // NaN and negatives never pass validation; clamp so the digits below stay plain.
    let fixed = format!("{:.2}", amount.max(0.0));
    let (digits, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction == "00" {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::fixtures::acme_portal;
    use crate::models::project::*;

    fn sparse_project() -> ProjectDescription {
        ProjectDescription {
            project_name: "Bare".to_string(),
            client_name: "Nobody".to_string(),
            industry: "Unknown".to_string(),
            timeline: "TBD".to_string(),
            budget: None,
            description: None,
            technical_stack: TechnicalStack {
                frontend: vec![],
                backend: vec![],
                database: vec![],
                devops: vec![],
                other: vec![],
            },
            database_requirements: DatabaseRequirements {
                database_type: "SQL".to_string(),
                scaling: None,
                backup: None,
                security: None,
                specific_requirements: vec![],
            },
            api_requirements: ApiRequirements {
                authentication_type: "None".to_string(),
                rate_limiting: None,
                versioning: None,
                documentation: None,
                endpoints: vec![],
            },
            security_requirements: SecurityRequirements {
                authentication: vec![],
                authorization: vec![],
                data_encryption: vec![],
                compliance: vec![],
                specific_measures: vec![],
            },
            system_architecture: SystemArchitecture {
                architecture_type: "Monolithic".to_string(),
                deployment_strategy: None,
                scaling_strategy: None,
                specific_requirements: vec![],
            },
        }
    }

    #[test]
    fn test_main_prompt_is_deterministic() {
        let project = acme_portal();
        assert_eq!(build_main_prompt(&project), build_main_prompt(&project.clone()));
    }

    #[test]
    fn test_main_prompt_lists_sections_in_order() {
        let prompt = build_main_prompt(&acme_portal());
        let mut last = 0;
        for (i, kind) in SectionKind::ALL.iter().enumerate() {
            let line = format!("{}. {}", i + 1, kind.title());
            let pos = prompt
                .find(&line)
                .unwrap_or_else(|| panic!("missing section line '{line}'"));
            assert!(pos >= last, "section '{line}' out of order");
            last = pos;
        }
    }

    #[test]
    fn test_main_prompt_groups_in_fixed_order() {
        let prompt = build_main_prompt(&acme_portal());
        let headers = [
            "PROJECT INFORMATION:",
            "TECHNICAL STACK:",
            "DATABASE REQUIREMENTS:",
            "API REQUIREMENTS:",
            "SECURITY REQUIREMENTS:",
            "SYSTEM ARCHITECTURE:",
            "DOCUMENT STRUCTURE:",
        ];
        let positions: Vec<usize> = headers.iter().map(|h| prompt.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_main_prompt_embeds_identity_and_stack() {
        let prompt = build_main_prompt(&acme_portal());
        assert!(prompt.contains("- Project Name: Acme Portal"));
        assert!(prompt.contains("- Client: Acme Corp"));
        assert!(prompt.contains("- Industry: Retail"));
        assert!(prompt.contains("- Frontend: React"));
        assert!(prompt.contains("- Data Encryption: TLS 1.3, AES-256 at rest"));
        assert!(prompt.contains("- Rate Limiting: Required"));
        assert!(prompt.contains("  - GET /orders: List customer orders"));
    }

    #[test]
    fn test_absent_budget_renders_placeholder() {
        let prompt = build_main_prompt(&acme_portal());
        assert!(!prompt.is_empty());
        assert!(prompt.contains("- Budget: Not specified"));
    }

    #[test]
    fn test_budget_formatting() {
        assert_eq!(format_budget(50_000.0), "50,000");
        assert_eq!(format_budget(1_234.5), "1,234.50");
        assert_eq!(format_budget(999.0), "999");
        assert_eq!(format_budget(0.0), "0");
        assert_eq!(format_budget(1_000_000.0), "1,000,000");
    }

    #[test]
    fn test_huge_budget_is_not_truncated() {
        assert_eq!(format_budget(1e20), "100,000,000,000,000,000,000");
        assert_eq!(format_budget(2.5e17), "250,000,000,000,000,000");

        let mut project = acme_portal();
        project.budget = Some(75_000.0);
        assert!(build_main_prompt(&project).contains("- Budget: 75,000"));
    }

    #[test]
    fn test_sparse_project_renders_placeholders_uniformly() {
        let prompt = build_main_prompt(&sparse_project());
        for line in [
            "- Budget: Not specified",
            "- Description: Not specified",
            "- Frontend: Not specified",
            "- Other: Not specified",
            "- Scaling: Not specified",
            "- Versioning: Not specified",
            "- Endpoints: Not specified",
            "- Compliance: Not specified",
            "- Deployment Strategy: Not specified",
        ] {
            assert!(prompt.contains(line), "expected '{line}' in prompt");
        }
    }

    #[test]
    fn test_blank_optional_text_counts_as_absent() {
        let mut project = acme_portal();
        project.description = Some("   ".to_string());
        assert!(build_main_prompt(&project).contains("- Description: Not specified"));
    }

    #[test]
    fn test_user_text_cannot_inject_placeholders() {
        let mut project = acme_portal();
        project.project_name = "{section_list}".to_string();
        let prompt = build_main_prompt(&project);
        assert!(prompt.contains("- Project Name: {section_list}"));
        assert_eq!(prompt.matches("1. Project Overview").count(), 1);
    }

    #[test]
    fn test_diagram_prompt_contains_project_name_for_every_type() {
        let project = acme_portal();
        for diagram_type in DiagramType::ALL {
            let prompt = build_diagram_prompt(diagram_type, &project);
            assert!(prompt.contains("Acme Portal"), "{diagram_type} prompt lacks project name");
            assert!(prompt.contains("ARCHITECTURE TYPE: Microservices"));
            assert!(prompt.contains("- Backend: FastAPI"));
            assert!(prompt.contains(diagram_type.title()));
            assert!(prompt.contains("do NOT output diagram code"));
        }
    }

    #[test]
    fn test_diagram_prompts_differ_by_type() {
        let project = acme_portal();
        let workflow = build_diagram_prompt(DiagramType::Workflow, &project);
        let database = build_diagram_prompt(DiagramType::Database, &project);
        assert_ne!(workflow, database);
        assert!(database.contains("cardinality"));
        assert!(workflow.contains("decision points"));
    }
}
