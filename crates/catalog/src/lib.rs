//! Catalog domain module.
//!
//! Business rules for imported products: margin derivation, the AI enrichment
//! lifecycle, the approval workflow and the read-only filter projection.
//! Implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). The generator call itself lives outside this crate; the state
//! machine only hands out tickets and applies results.

pub mod config;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod product;
pub mod stats;
pub mod workflow;

pub use config::{AppConfig, CsvMapping, RoundingRule, SyncInterval};
pub use enrichment::{EnrichedContent, EnrichmentError, EnrichmentOutcome, EnrichmentTicket};
pub use error::{CatalogError, CatalogResult};
pub use filter::{ProductFilter, ViewMode, filter_products};
pub use product::{
    AiStatus, NewProduct, Product, ProductPatch, WorkflowStatus, apply_manual_edit, is_margin_safe,
    margin_percent, recompute,
};
pub use stats::DashboardStats;
pub use workflow::{ApprovalOutcome, Catalog};
