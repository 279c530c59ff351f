//! AI enrichment lifecycle.
//!
//! `pending` -> `generating` -> `completed` | `failed`. A failed product may be
//! retried; a completed one may be regenerated. The generator call happens
//! between [`Product::begin_enrichment`] and [`Product::resolve_enrichment`],
//! outside of this crate.
//!
//! Every request bumps the product's `enrichment_seq`. A result is only applied
//! when its ticket carries the latest sequence number, so the last *issued*
//! request wins regardless of the order in which responses arrive.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use databox_core::ProductId;

use crate::product::{AiStatus, Product, WorkflowStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("no enrichment API key configured")]
    MissingCredential,

    #[error("content generation failed: {0}")]
    GenerationFailure(String),
}

/// Snapshot of everything the generator needs, plus the request sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentTicket {
    pub product_id: ProductId,
    pub seq: u64,
    pub raw_title: String,
    pub raw_description: String,
    pub sell_price: f64,
}

/// Generated marketing copy for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedContent {
    pub title: String,
    /// HTML fragment.
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Completed,
    Failed,
    /// A newer request (or a reset) was issued after this ticket; nothing was written.
    Superseded { latest_seq: u64 },
}

impl Product {
    /// Move to `generating` and hand out a ticket for the generator call.
    ///
    /// Without a credential the product is left exactly as it was.
    pub fn begin_enrichment(
        &mut self,
        credential: Option<&str>,
    ) -> Result<EnrichmentTicket, EnrichmentError> {
        if credential.map_or(true, |c| c.trim().is_empty()) {
            warn!(product_id = %self.id, "enrichment requested without credential");
            return Err(EnrichmentError::MissingCredential);
        }

        if self.ai_status == AiStatus::Generating {
            debug!(product_id = %self.id, seq = self.enrichment_seq, "superseding in-flight enrichment");
        }

        self.enrichment_seq += 1;
        self.ai_status = AiStatus::Generating;
        info!(product_id = %self.id, seq = self.enrichment_seq, "enrichment started");

        Ok(EnrichmentTicket {
            product_id: self.id.clone(),
            seq: self.enrichment_seq,
            raw_title: self.raw_title.clone(),
            raw_description: self.raw_description.clone(),
            sell_price: self.sell_price,
        })
    }

    /// Apply the generator's result for `ticket`.
    ///
    /// Failures write no content fields. Stale tickets write nothing at all.
    pub fn resolve_enrichment(
        &mut self,
        ticket: &EnrichmentTicket,
        result: Result<EnrichedContent, EnrichmentError>,
    ) -> EnrichmentOutcome {
        if ticket.product_id != self.id || ticket.seq != self.enrichment_seq {
            debug!(
                product_id = %self.id,
                seq = ticket.seq,
                latest_seq = self.enrichment_seq,
                "discarding stale enrichment result"
            );
            return EnrichmentOutcome::Superseded {
                latest_seq: self.enrichment_seq,
            };
        }

        match result {
            Ok(content) => {
                self.ai_title = Some(content.title);
                self.ai_description = Some(content.description);
                self.ai_category = Some(content.category);
                self.ai_status = AiStatus::Completed;
                info!(product_id = %self.id, seq = ticket.seq, "enrichment completed");
                EnrichmentOutcome::Completed
            }
            Err(err) => {
                self.ai_status = AiStatus::Failed;
                warn!(product_id = %self.id, seq = ticket.seq, error = %err, "enrichment failed");
                EnrichmentOutcome::Failed
            }
        }
    }

    /// Re-import: back to `pending` + `draft`.
    ///
    /// Prior AI content is kept but ignored while pending. Prices and stock are
    /// untouched. Any in-flight request is invalidated.
    pub fn reset_enrichment(&mut self) {
        self.enrichment_seq += 1;
        self.ai_status = AiStatus::Pending;
        self.status = WorkflowStatus::Draft;
        info!(product_id = %self.id, "enrichment reset for re-import");
    }
}
