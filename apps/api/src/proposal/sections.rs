//! Response shaping: splits the model's free-text SRS into the ten named sections.
//!
//! The model is asked for `## N. <Title>` headings but is not guaranteed to
//! comply, so detection is lenient about heading style and strict about titles:
//! a line starts a section only if its text canonicalises to a known title.
//! Unknown headings (sub-sections) stay inside the current section body.

use serde::Serialize;

/// The fixed sections every SRS document is expected to cover, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ProjectOverview,
    SystemRequirements,
    FunctionalRequirements,
    NonFunctionalRequirements,
    TechnicalArchitecture,
    DatabaseDesign,
    ApiSpecifications,
    SecurityMeasures,
    TimelineAndMilestones,
    CostEstimation,
}

impl SectionKind {
    pub const ALL: [SectionKind; 10] = [
        SectionKind::ProjectOverview,
        SectionKind::SystemRequirements,
        SectionKind::FunctionalRequirements,
        SectionKind::NonFunctionalRequirements,
        SectionKind::TechnicalArchitecture,
        SectionKind::DatabaseDesign,
        SectionKind::ApiSpecifications,
        SectionKind::SecurityMeasures,
        SectionKind::TimelineAndMilestones,
        SectionKind::CostEstimation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::ProjectOverview => "Project Overview",
            SectionKind::SystemRequirements => "System Requirements",
            SectionKind::FunctionalRequirements => "Functional Requirements",
            SectionKind::NonFunctionalRequirements => "Non-Functional Requirements",
            SectionKind::TechnicalArchitecture => "Technical Architecture",
            SectionKind::DatabaseDesign => "Database Design",
            SectionKind::ApiSpecifications => "API Specifications",
            SectionKind::SecurityMeasures => "Security Measures",
            SectionKind::TimelineAndMilestones => "Timeline and Milestones",
            SectionKind::CostEstimation => "Cost Estimation",
        }
    }

    fn from_heading(heading: &str) -> Option<Self> {
        let key = canonical(heading);
        Self::ALL.into_iter().find(|kind| canonical(kind.title()) == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSection {
    pub kind: SectionKind,
    /// Heading text as the model wrote it, without markup.
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedDocument {
    pub preamble: Option<String>,
    pub sections: Vec<DocumentSection>,
    pub missing: Vec<SectionKind>,
}

/// Numbered lines longer than this are list items, not headings.
const MAX_NUMBERED_HEADING_LEN: usize = 60;

pub fn parse_sections(text: &str) -> ParsedDocument {
    let mut preamble: Vec<&str> = Vec::new();
    let mut sections: Vec<DocumentSection> = Vec::new();
    let mut body: Vec<&str> = Vec::new();

    for line in text.lines() {
        let detected = heading_text(line).and_then(|h| SectionKind::from_heading(h).map(|k| (k, h)));

        match detected {
            Some((kind, heading)) => {
                if let Some(current) = sections.last_mut() {
                    current.body = join_trimmed(&body);
                }
                body.clear();
                sections.push(DocumentSection {
                    kind,
                    heading: clean_heading(heading),
                    body: String::new(),
                });
            }
            None if sections.is_empty() => preamble.push(line),
            None => body.push(line),
        }
    }

    if let Some(current) = sections.last_mut() {
        current.body = join_trimmed(&body);
    }

    let sections = drop_superseded_entries(sections);

    let missing = SectionKind::ALL
        .into_iter()
        .filter(|kind| !sections.iter().any(|s| s.kind == *kind))
        .collect();

    let preamble = join_trimmed(&preamble);

    ParsedDocument {
        preamble: (!preamble.is_empty()).then_some(preamble),
        sections,
        missing,
    }
}

/// Removes empty sections whose kind reappears later, e.g. table-of-contents entries.
fn drop_superseded_entries(sections: Vec<DocumentSection>) -> Vec<DocumentSection> {
    let superseded: Vec<bool> = sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            section.body.is_empty() && sections[i + 1..].iter().any(|later| later.kind == section.kind)
        })
        .collect();

    sections
        .into_iter()
        .zip(superseded)
        .filter(|(_, superseded)| !superseded)
        .map(|(section, _)| section)
        .collect()
}

/// Returns the heading text if `line` looks like a heading at all.
fn heading_text(line: &str) -> Option<&str> {
    let line = line.trim();

    if line.starts_with('#') {
        return Some(line.trim_start_matches('#').trim());
    }

    if let Some(inner) = line
        .strip_prefix("**")
        .and_then(|l| l.strip_suffix("**").or_else(|| l.strip_suffix("**:")))
    {
        return Some(inner.trim());
    }

    let starts_numbered = line.chars().next().is_some_and(|c| c.is_ascii_digit());
    if starts_numbered && line.len() <= MAX_NUMBERED_HEADING_LEN {
        return Some(line);
    }

    None
}

fn strip_numbering(heading: &str) -> &str {
    heading
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')' || c.is_whitespace())
}

fn clean_heading(heading: &str) -> String {
    strip_numbering(heading)
        .trim_matches(|c: char| c == '*' || c == ':' || c.is_whitespace())
        .to_string()
}

/// "## 4. Non-functional requirements:" and "Non Functional Requirement" share a key.
fn canonical(heading: &str) -> String {
    let mut key: String = strip_numbering(heading)
        .to_lowercase()
        .replace('&', "and")
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    if key.ends_with('s') {
        key.pop();
    }
    key
}

fn join_trimmed(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
# Software Requirements Specification: Acme Portal

## 1. Project Overview
Acme Portal gives Acme Corp customers self-service access.

## 2. System Requirements
- Linux hosts

## 3. Functional Requirements
### 3.1 Orders
FR-1: Customers can list orders.
1. Open the portal

## 4. Non-Functional Requirements
NFR-1: p99 latency under 300ms.

## 5. Technical Architecture
Microservices.

## 6. Database Design
Postgres.

## 7. API Specifications
GET /orders

## 8. Security Measures
SSO.

## 9. Timeline and Milestones
6 months.

## 10. Cost Estimation
To be agreed.
";

    #[test]
    fn test_well_formed_document_has_all_sections() {
        let doc = parse_sections(WELL_FORMED);
        assert_eq!(doc.sections.len(), 10);
        assert!(doc.missing.is_empty());
        let kinds: Vec<SectionKind> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
        assert_eq!(
            doc.preamble.as_deref(),
            Some("# Software Requirements Specification: Acme Portal")
        );
    }

    #[test]
    fn test_subsections_stay_in_parent_body() {
        let doc = parse_sections(WELL_FORMED);
        let functional = &doc.sections[2];
        assert_eq!(functional.kind, SectionKind::FunctionalRequirements);
        assert!(functional.body.contains("### 3.1 Orders"));
        assert!(functional.body.contains("1. Open the portal"));
    }

    #[test]
    fn test_heading_text_is_cleaned() {
        let doc = parse_sections(WELL_FORMED);
        assert_eq!(doc.sections[3].heading, "Non-Functional Requirements");
        assert_eq!(doc.sections[0].body, "Acme Portal gives Acme Corp customers self-service access.");
    }

    #[test]
    fn test_lenient_heading_styles() {
        let text = "**Project Overview**\nIntro\n\n3) Functional requirement:\nFR-1\n\n**Timeline & Milestones:**\nQ3\n\n# API Specification\nREST";
        let doc = parse_sections(text);
        let kinds: Vec<SectionKind> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::ProjectOverview,
                SectionKind::FunctionalRequirements,
                SectionKind::TimelineAndMilestones,
                SectionKind::ApiSpecifications,
            ]
        );
        assert!(doc.preamble.is_none());
    }

    #[test]
    fn test_non_functional_not_confused_with_functional() {
        let doc = parse_sections("## Nonfunctional Requirements\nfast");
        assert_eq!(doc.sections[0].kind, SectionKind::NonFunctionalRequirements);
    }

    #[test]
    fn test_missing_sections_reported_in_canonical_order() {
        let doc = parse_sections("## Cost Estimation\n$10k\n## Project Overview\nhi");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.missing.len(), 8);
        assert_eq!(doc.missing[0], SectionKind::SystemRequirements);
        assert_eq!(doc.missing[7], SectionKind::TimelineAndMilestones);
    }

    #[test]
    fn test_long_numbered_line_is_not_a_heading() {
        let text = "## Security Measures\n2. Security measures are enforced at every layer of the stack.";
        let doc = parse_sections(text);
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].body.starts_with("2. Security measures"));
    }

    #[test]
    fn test_table_of_contents_does_not_shadow_real_sections() {
        let text = "## Table of Contents\n1. Project Overview\n2. System Requirements\n\n## 1. Project Overview\nReal overview text.\n\n## 2. System Requirements\nReal sys reqs.";
        let doc = parse_sections(text);

        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].kind, SectionKind::ProjectOverview);
        assert_eq!(doc.sections[0].body, "Real overview text.");
        assert_eq!(doc.sections[1].kind, SectionKind::SystemRequirements);
        assert_eq!(doc.sections[1].body, "Real sys reqs.");
        assert_eq!(doc.preamble.as_deref(), Some("## Table of Contents"));
    }

    #[test]
    fn test_empty_section_without_later_duplicate_is_kept() {
        let doc = parse_sections("## Cost Estimation\n\n## Project Overview\nhi");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].kind, SectionKind::CostEstimation);
        assert!(doc.sections[0].body.is_empty());
    }

    #[test]
    fn test_unstructured_text_is_all_preamble() {
        let doc = parse_sections("The model ignored the structure entirely.");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.missing.len(), 10);
        assert_eq!(
            doc.preamble.as_deref(),
            Some("The model ignored the structure entirely.")
        );
    }
}
