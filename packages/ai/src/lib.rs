// ABOUTME: Generation pipeline boundary for Webforge
// ABOUTME: Wraps the chat-completions API for template selection and plan generation

pub mod prompts;
pub mod service;
pub mod templates;

pub use service::{
    ChatMessage, GenerationError, GenerationResult, GenerationService, PlanResponse, Usage,
};
pub use templates::TemplateKind;
