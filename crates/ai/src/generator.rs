use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;

/// Raw product data the generator rewrites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRequest {
    pub raw_title: String,
    pub raw_description: String,
    pub sell_price: f64,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    /// HTML fragment.
    pub description: String,
    pub category: String,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("generator returned no content")]
    EmptyResponse,

    #[error("malformed generator output: {0}")]
    Malformed(String),
}

/// Something that can turn raw supplier data into storefront copy.
#[async_trait]
pub trait ContentGenerator: Send + Sync + 'static {
    async fn generate(
        &self,
        request: &ContentRequest,
        credential: &str,
    ) -> Result<GeneratedContent, GenerationError>;
}
