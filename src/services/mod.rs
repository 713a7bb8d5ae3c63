pub mod llm_service;
pub mod prompt;
pub mod response_parser;

pub use llm_service::{GenerationService, LlmService};
pub use prompt::{build_question_prompt, SYSTEM_PROMPT};
pub use response_parser::parse_generated_questions;
