//! Catalog error model.

use thiserror::Error;

use databox_core::{DomainError, ProductId};

use crate::enrichment::EnrichmentError;
use crate::product::AiStatus;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("product {id} cannot be approved while enrichment is {status}")]
    EnrichmentIncomplete { id: ProductId, status: AiStatus },

    #[error("duplicate product: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
