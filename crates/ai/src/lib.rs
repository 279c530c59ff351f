//! `databox-ai`
//!
//! **Responsibility:** product copy generation boundary.
//!
//! This crate knows nothing about the catalog's state machine:
//! - It turns a raw product snapshot into a prompt.
//! - It calls a generator and returns title/description/category.
//! - It never touches catalog state; callers decide what to do with the result.

pub mod gemini;
pub mod generator;
pub mod language;
pub mod prompt;

pub use gemini::{DEFAULT_MODEL, GeminiContentGenerator};
pub use generator::{ContentGenerator, ContentRequest, GeneratedContent, GenerationError};
pub use language::Language;
pub use prompt::{build_prompt, parse_generated};
