//! Approval workflow over the active product collection.
//!
//! `Catalog` owns the ordered list of products and is the only place where
//! products are added, replaced or removed. Every mutation here is a single
//! synchronous step; callers that share a catalog across threads wrap it in a
//! lock and hold the lock for the whole call.

use tracing::{info, warn};

use databox_core::{ProductId, position_by_id};

use crate::enrichment::{EnrichedContent, EnrichmentError, EnrichmentOutcome, EnrichmentTicket};
use crate::error::{CatalogError, CatalogResult};
use crate::product::{Product, ProductPatch, WorkflowStatus, apply_manual_edit, recompute};

/// Result of a successful approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// First publication of the product.
    Approved,
    /// The product was already online; the approval re-asserted the same state.
    Updated,
}

/// Ordered, in-memory product collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate ids or SKUs.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        position_by_id(&self.products, id).map(|idx| &self.products[idx])
    }

    fn position(&self, id: &ProductId) -> CatalogResult<usize> {
        position_by_id(&self.products, id).ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    fn get_mut(&mut self, id: &ProductId) -> CatalogResult<&mut Product> {
        let idx = self.position(id)?;
        Ok(&mut self.products[idx])
    }

    /// Append a product at the end of the collection.
    pub fn insert(&mut self, product: Product) -> CatalogResult<()> {
        if self.get(&product.id).is_some() {
            return Err(CatalogError::Duplicate(format!("id {}", product.id)));
        }
        if self.products.iter().any(|p| p.sku == product.sku) {
            return Err(CatalogError::Duplicate(format!("sku {}", product.sku)));
        }
        self.products.push(product);
        Ok(())
    }

    /// Replace a product by identity, keeping its position.
    ///
    /// Callers are responsible for keeping derived fields consistent first.
    pub fn update_product(&mut self, product: Product) -> CatalogResult<()> {
        let slot = self.get_mut(&product.id)?;
        *slot = product;
        Ok(())
    }

    /// Publish a product whose enrichment has finished (completed or failed).
    ///
    /// While enrichment is pending or generating nothing changes and
    /// `EnrichmentIncomplete` is returned.
    pub fn approve(&mut self, id: &ProductId) -> CatalogResult<ApprovalOutcome> {
        let product = self.get_mut(id)?;
        if !product.can_approve() {
            warn!(product_id = %id, ai_status = %product.ai_status, "approval blocked");
            return Err(CatalogError::EnrichmentIncomplete {
                id: id.clone(),
                status: product.ai_status,
            });
        }

        let outcome = if product.is_online {
            ApprovalOutcome::Updated
        } else {
            ApprovalOutcome::Approved
        };
        product.status = WorkflowStatus::Approved;
        product.is_online = true;
        info!(product_id = %id, ?outcome, "product approved");
        Ok(outcome)
    }

    /// Remove a product from the collection. There is no undo; the removed
    /// record is handed back to the caller.
    pub fn reject(&mut self, id: &ProductId) -> CatalogResult<Product> {
        let idx = self.position(id)?;
        let mut removed = self.products.remove(idx);
        removed.status = WorkflowStatus::Rejected;
        info!(product_id = %id, "product rejected and removed");
        Ok(removed)
    }

    /// Apply an operator edit and recompute the margin against `min_margin_percent`.
    pub fn edit(
        &mut self,
        id: &ProductId,
        patch: &ProductPatch,
        min_margin_percent: f64,
    ) -> CatalogResult<&Product> {
        let product = self.get_mut(id)?;
        let edited = apply_manual_edit(product, patch, min_margin_percent)?;
        *product = edited;
        info!(product_id = %id, margin = product.margin, "product edited");
        Ok(product)
    }

    /// Re-derive margin fields for every product (configuration changed).
    pub fn recompute_all(&mut self, min_margin_percent: f64) {
        for product in &mut self.products {
            *product = recompute(product, min_margin_percent);
        }
    }

    pub fn begin_enrichment(
        &mut self,
        id: &ProductId,
        credential: Option<&str>,
    ) -> CatalogResult<EnrichmentTicket> {
        let product = self.get_mut(id)?;
        Ok(product.begin_enrichment(credential)?)
    }

    /// Apply a generator result. A product removed in the meantime is reported
    /// as `NotFound` and the result is dropped.
    pub fn resolve_enrichment(
        &mut self,
        ticket: &EnrichmentTicket,
        result: Result<EnrichedContent, EnrichmentError>,
    ) -> CatalogResult<EnrichmentOutcome> {
        let product = self.get_mut(&ticket.product_id)?;
        Ok(product.resolve_enrichment(ticket, result))
    }

    pub fn reset_enrichment(&mut self, id: &ProductId) -> CatalogResult<&Product> {
        let product = self.get_mut(id)?;
        product.reset_enrichment();
        Ok(product)
    }
}
