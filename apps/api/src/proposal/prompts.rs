// All LLM prompt constants for the Proposal module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for the main SRS document.
pub const SRS_SYSTEM: &str = "You are a senior solutions architect writing a \
    Software Requirements Specification (SRS) for a client proposal. \
    Respond with the requested document text only. \
    Do NOT wrap the answer in code fences. \
    Do NOT add greetings, explanations of what you are doing, or apologies. \
    Write in clear, professional English using Markdown headings and bullet lists.";

/// System prompt for diagram descriptions.
pub const DIAGRAM_SYSTEM: &str = "You are a software architect who prepares precise, \
    structured diagram specifications for a separate diagram-rendering tool. \
    You describe diagrams in plain text; you never draw them, \
    and you never emit Mermaid, PlantUML, Graphviz or any other diagram code.";

/// Main document prompt template.
/// Replace: {grounding_instruction}, {project_context}, {section_list}
pub const SRS_PROMPT_TEMPLATE: &str = r###"Generate a comprehensive Software Requirements Specification (SRS) document for the project described below.

{grounding_instruction}

{project_context}

DOCUMENT STRUCTURE:
The document MUST contain exactly the following sections, in this order.
Introduce each section with a Markdown heading of the form "## <number>. <section name>", using the names exactly as written.
{section_list}

Write concrete, testable requirements. Number functional requirements (FR-1, FR-2, ...) and non-functional requirements (NFR-1, NFR-2, ...)."###;

/// Diagram description prompt template.
/// Replace: {diagram_title}, {diagram_guidance}, {project_name}, {architecture_type},
///          {technical_stack}, {grounding_instruction}
pub const DIAGRAM_PROMPT_TEMPLATE: &str = r#"Prepare a structured description of a {diagram_title} for the project below. The description will be used as input to a separate diagram-generation step, so do NOT draw the diagram and do NOT output diagram code.

PROJECT: {project_name}
ARCHITECTURE TYPE: {architecture_type}
TECHNICAL STACK:
{technical_stack}

WHAT TO DESCRIBE:
{diagram_guidance}

{grounding_instruction}

Return plain text with exactly these three headed blocks:
ELEMENTS:
- one line per element: <identifier>: <short description>
RELATIONSHIPS:
- one line per relationship: <source identifier> -> <target identifier>: <label>
NOTES:
- layout hints, assumptions, or constraints for the renderer"#;

pub const WORKFLOW_GUIDANCE: &str = "\
- Actors (users, external systems) and the steps each one performs
- Start and end points, decision points with their conditions, and transitions
- Hand-offs between the frontend, backend services and data stores";

pub const DATABASE_GUIDANCE: &str = "\
- Entities (tables or collections) with their key attributes and data types
- Primary keys, foreign keys and unique constraints
- Relationships with cardinality (1:1, 1:N, N:M) and join entities where needed";

pub const CLASS_GUIDANCE: &str = "\
- Core domain classes or modules with their main attributes and methods
- Inheritance, interface implementation, association, aggregation and composition
- Multiplicity on associations and the layer each class belongs to";

pub const ACTIVITY_GUIDANCE: &str = "\
- Swimlanes for each actor or component involved
- Activities in execution order, forks and joins for parallel work
- Guards on decision branches, and the initial and final nodes";
