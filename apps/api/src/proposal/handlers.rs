//! Axum route handlers for the Proposal API.

use std::collections::BTreeMap;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::{DiagramType, OutputFormat, ProposalRequestBody};
use crate::proposal::assembler::{assemble, ProposalResult};
use crate::proposal::prompt_builder::{build_diagram_prompt, build_main_prompt};
use crate::proposal::validation::validate_request;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProposalResponse {
    pub proposal_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub format: OutputFormat,
    /// Suggested file name for the rendered document.
    pub filename: String,
    #[serde(flatten)]
    pub result: ProposalResult,
}

#[derive(Debug, Serialize)]
pub struct PromptPreviewResponse {
    pub main_prompt: String,
    pub diagram_prompts: BTreeMap<DiagramType, String>,
}

#[derive(Debug, Serialize)]
pub struct DiagramTypesResponse {
    pub supported: Vec<DiagramType>,
    pub defaults: Vec<DiagramType>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/proposals/generate
///
/// Validates the request, generates the SRS document and requested diagram
/// descriptions, and returns them with section structure for the renderer.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<ProposalRequestBody>, JsonRejection>,
) -> Result<Json<ProposalResponse>, AppError> {
    let Json(body) = payload?;
    let request = validate_request(body)?;

    let result = assemble(state.generator.as_ref(), &request).await?;

    let proposal_id = Uuid::new_v4();
    info!(
        "Generated proposal {} ({})",
        proposal_id,
        request.format.extension()
    );

    Ok(Json(ProposalResponse {
        proposal_id,
        generated_at: Utc::now(),
        format: request.format,
        filename: document_filename(&request.project_details.project_name, request.format),
        result,
    }))
}

/// POST /api/v1/proposals/prompts
///
/// Returns the prompts a generate call would send, without calling the model.
/// Useful for previewing how sparse input will be presented.
pub async fn handle_preview_prompts(
    payload: Result<Json<ProposalRequestBody>, JsonRejection>,
) -> Result<Json<PromptPreviewResponse>, AppError> {
    let Json(body) = payload?;
    let request = validate_request(body)?;
    let project = &request.project_details;

    let diagram_prompts = if request.include_diagrams {
        request
            .diagram_types
            .iter()
            .map(|&t| (t, build_diagram_prompt(t, project)))
            .collect()
    } else {
        BTreeMap::new()
    };

    Ok(Json(PromptPreviewResponse {
        main_prompt: build_main_prompt(project),
        diagram_prompts,
    }))
}

/// GET /api/v1/proposals/diagram-types
pub async fn handle_diagram_types() -> Json<DiagramTypesResponse> {
    Json(DiagramTypesResponse {
        supported: DiagramType::ALL.to_vec(),
        defaults: DiagramType::defaults().into_iter().collect(),
    })
}

/// "Acme Portal" + pdf → "acme-portal-srs.pdf"
fn document_filename(project_name: &str, format: OutputFormat) -> String {
    let slug = project_name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "proposal".to_string() } else { slug };
    format!("{slug}-srs.{}", format.extension())
}
