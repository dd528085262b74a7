//! Request validation. Runs before any prompt is built or any model is called.

use std::collections::BTreeSet;

use crate::errors::{AppError, FieldError};
use crate::models::project::ProjectDescription;
use crate::models::proposal::{DiagramType, OutputFormat, ProposalRequest, ProposalRequestBody};

/// Validates a request body, collecting every field error before failing.
///
/// Field errors → `AppError::Validation`. Once fields pass, the first unknown
/// diagram tag → `AppError::UnsupportedDiagramType`.
pub fn validate_request(body: ProposalRequestBody) -> Result<ProposalRequest, AppError> {
    let mut errors = validate_project(&body.project_details);

    let format = match body.format.parse::<OutputFormat>() {
        Ok(format) => Some(format),
        Err(message) => {
            errors.push(FieldError::new("format", message));
            None
        }
    };

    let format = match format {
        Some(format) if errors.is_empty() => format,
        _ => return Err(AppError::Validation(errors)),
    };

    let diagram_types = match body.diagram_types {
        Some(tags) => tags
            .iter()
            .map(|tag| tag.parse::<DiagramType>())
            .collect::<Result<BTreeSet<_>, _>>()?,
        None => DiagramType::defaults(),
    };

    Ok(ProposalRequest {
        project_details: body.project_details,
        format,
        include_diagrams: body.include_diagrams,
        diagram_types,
    })
}

/// Checks the shape constraints serde cannot express.
pub fn validate_project(project: &ProjectDescription) -> Vec<FieldError> {
    let mut errors = Vec::new();

    require_text(&mut errors, "project_details.project_name", &project.project_name);
    require_text(&mut errors, "project_details.client_name", &project.client_name);
    require_text(&mut errors, "project_details.industry", &project.industry);
    require_text(&mut errors, "project_details.timeline", &project.timeline);

    if let Some(budget) = project.budget {
        if !budget.is_finite() || budget < 0.0 {
            errors.push(FieldError::new(
                "project_details.budget",
                "must be a non-negative number",
            ));
        }
    }

    let stack = &project.technical_stack;
    require_entries(&mut errors, "project_details.technical_stack.frontend", &stack.frontend);
    require_entries(&mut errors, "project_details.technical_stack.backend", &stack.backend);
    require_entries(&mut errors, "project_details.technical_stack.database", &stack.database);
    require_entries(&mut errors, "project_details.technical_stack.devops", &stack.devops);
    require_entries(&mut errors, "project_details.technical_stack.other", &stack.other);

    let database = &project.database_requirements;
    require_text(
        &mut errors,
        "project_details.database_requirements.database_type",
        &database.database_type,
    );
    require_entries(
        &mut errors,
        "project_details.database_requirements.specific_requirements",
        &database.specific_requirements,
    );

    let api = &project.api_requirements;
    require_text(
        &mut errors,
        "project_details.api_requirements.authentication_type",
        &api.authentication_type,
    );
    for (i, endpoint) in api.endpoints.iter().enumerate() {
        require_text(
            &mut errors,
            &format!("project_details.api_requirements.endpoints[{i}].path"),
            &endpoint.path,
        );
    }

    let security = &project.security_requirements;
    for (name, entries) in [
        ("authentication", &security.authentication),
        ("authorization", &security.authorization),
        ("data_encryption", &security.data_encryption),
        ("compliance", &security.compliance),
        ("specific_measures", &security.specific_measures),
    ] {
        require_entries(
            &mut errors,
            &format!("project_details.security_requirements.{name}"),
            entries,
        );
    }

    let architecture = &project.system_architecture;
    require_text(
        &mut errors,
        "project_details.system_architecture.architecture_type",
        &architecture.architecture_type,
    );
    require_entries(
        &mut errors,
        "project_details.system_architecture.specific_requirements",
        &architecture.specific_requirements,
    );

    errors
}

fn require_text(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be blank"));
    }
}

fn require_entries(errors: &mut Vec<FieldError>, field: &str, entries: &[String]) {
    for (i, entry) in entries.iter().enumerate() {
        if entry.trim().is_empty() {
            errors.push(FieldError::new(format!("{field}[{i}]"), "must not be blank"));
        }
    }
}
