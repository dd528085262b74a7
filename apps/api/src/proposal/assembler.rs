//! Proposal Assembler: orchestrates prompt building and generation for one request.
//!
//! Flow: build main prompt → generate ─┐
//!       build N diagram prompts → generate (concurrently) ─┴→ shape sections → result
//!
//! The main document is mandatory: if it fails, the whole assembly fails and the
//! in-flight diagram calls are dropped. Diagram failures degrade gracefully and
//! are reported per type.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{strip_code_fences, LlmError, TextGenerator};
use crate::models::proposal::{DiagramType, ProposalRequest};
use crate::proposal::prompt_builder::{build_diagram_prompt, build_main_prompt};
use crate::proposal::prompts::{DIAGRAM_SYSTEM, SRS_SYSTEM};
use crate::proposal::sections::{parse_sections, DocumentSection, SectionKind};

/// Output of the generation pipeline, ready for a document renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalResult {
    pub main_content: String,
    pub preamble: Option<String>,
    pub sections: Vec<DocumentSection>,
    pub missing_sections: Vec<SectionKind>,
    pub diagrams: BTreeMap<DiagramType, String>,
    /// Safe-to-display failure reason per diagram that could not be generated.
    pub diagram_errors: BTreeMap<DiagramType, String>,
}

/// Runs the full pipeline for a validated request.
pub async fn assemble(
    generator: &dyn TextGenerator,
    request: &ProposalRequest,
) -> Result<ProposalResult, AppError> {
    let project = &request.project_details;
    info!(
        "Assembling proposal '{}' for client '{}' ({} diagram types requested)",
        project.project_name,
        project.client_name,
        if request.include_diagrams {
            request.diagram_types.len()
        } else {
            0
        }
    );

    let main_prompt = build_main_prompt(project);
    let main = async {
        match generator.generate(SRS_SYSTEM, &main_prompt).await {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => Err(AppError::Generation(
                "Main document generation returned empty content".to_string(),
            )),
            Err(e) => Err(AppError::Generation(format!(
                "Main document generation failed: {e}"
            ))),
        }
    };

    let diagram_prompts: Vec<(DiagramType, String)> = if request.include_diagrams {
        request
            .diagram_types
            .iter()
            .map(|&diagram_type| (diagram_type, build_diagram_prompt(diagram_type, project)))
            .collect()
    } else {
        Vec::new()
    };

    let diagrams = async {
        let outcomes = join_all(diagram_prompts.iter().map(|(diagram_type, prompt)| async move {
            (*diagram_type, generate_diagram(generator, prompt).await)
        }))
        .await;
        Ok::<_, AppError>(outcomes)
    };

    // try_join! returns as soon as the main call fails, dropping pending diagram calls.
    let (main_content, outcomes) = tokio::try_join!(main, diagrams)?;

    let mut result_diagrams = BTreeMap::new();
    let mut diagram_errors = BTreeMap::new();
    for (diagram_type, outcome) in outcomes {
        match outcome {
            Ok(description) => {
                result_diagrams.insert(diagram_type, description);
            }
            Err(e) => {
                warn!("Diagram '{}' generation failed: {}", diagram_type, e);
                diagram_errors.insert(diagram_type, e.public_message().to_string());
            }
        }
    }

    let parsed = parse_sections(&main_content);
    if !parsed.missing.is_empty() {
        warn!(
            "Generated document for '{}' is missing {} of {} expected sections",
            project.project_name,
            parsed.missing.len(),
            SectionKind::ALL.len()
        );
    }

    info!(
        "Assembled proposal '{}': {} sections, {} diagrams, {} diagram failures",
        project.project_name,
        parsed.sections.len(),
        result_diagrams.len(),
        diagram_errors.len()
    );

    Ok(ProposalResult {
        main_content,
        preamble: parsed.preamble,
        sections: parsed.sections,
        missing_sections: parsed.missing,
        diagrams: result_diagrams,
        diagram_errors,
    })
}

async fn generate_diagram(generator: &dyn TextGenerator, prompt: &str) -> Result<String, LlmError> {
    let text = generator.generate(DIAGRAM_SYSTEM, prompt).await?;
    let description = strip_code_fences(&text);
    if description.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(description.to_string())
}
