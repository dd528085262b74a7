// Proposal generation engine.
// Implements: request validation, prompt building, generation fan-out, section shaping.
// All model calls go through llm_client; no direct provider calls here.

pub mod assembler;
pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
pub mod sections;
pub mod validation;
