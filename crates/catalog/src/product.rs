use serde::{Deserialize, Serialize};

use databox_core::{DomainError, DomainResult, Entity, ProductId, Sku, non_negative_finite, round_half_up};

use crate::config::RoundingRule;

/// AI enrichment lifecycle of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiStatus {
    Pending,
    Generating,
    Completed,
    Failed,
}

impl AiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiStatus::Pending => "pending",
            AiStatus::Generating => "generating",
            AiStatus::Completed => "completed",
            AiStatus::Failed => "failed",
        }
    }

    /// Approval is only offered once a generation attempt has finished.
    pub fn allows_approval(&self) -> bool {
        matches!(self, AiStatus::Completed | AiStatus::Failed)
    }
}

impl core::fmt::Display for AiStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval workflow status.
///
/// Not to be confused with the "draft" view mode of the filter, which is keyed
/// on the publication flag instead (see [`crate::filter::ViewMode::Draft`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Draft,
    Approved,
    Rejected,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Draft => "draft",
            WorkflowStatus::Approved => "approved",
            WorkflowStatus::Rejected => "rejected",
        }
    }
}

/// Raw supplier data for a product entering the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: ProductId,
    pub sku: Sku,
    pub raw_title: String,
    pub raw_description: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub stock: u32,
}

/// Operator edit of a product. Only these fields may be changed by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub raw_title: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub stock: Option<u32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.raw_title.is_none()
            && self.buy_price.is_none()
            && self.sell_price.is_none()
            && self.stock.is_none()
    }
}

/// A catalog item undergoing import, enrichment and approval.
///
/// `margin` and `margin_safe` are derived. They are only ever written by
/// [`Product::refresh_margin`], which every price-changing path goes through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub(crate) id: ProductId,
    pub(crate) sku: Sku,
    pub(crate) raw_title: String,
    pub(crate) raw_description: String,
    pub(crate) buy_price: f64,
    pub(crate) sell_price: f64,
    pub(crate) stock: u32,
    pub(crate) is_online: bool,
    pub(crate) ai_title: Option<String>,
    pub(crate) ai_description: Option<String>,
    pub(crate) ai_category: Option<String>,
    pub(crate) ai_status: AiStatus,
    pub(crate) status: WorkflowStatus,
    pub(crate) margin: i64,
    pub(crate) margin_safe: bool,
    #[serde(skip)]
    pub(crate) enrichment_seq: u64,
}

impl Product {
    /// Bring a supplier record into the catalog: pending enrichment, draft, offline.
    pub fn import(new: NewProduct, min_margin_percent: f64) -> DomainResult<Self> {
        let buy_price = non_negative_finite("buy_price", new.buy_price)?;
        let sell_price = non_negative_finite("sell_price", new.sell_price)?;

        let mut product = Self {
            id: new.id,
            sku: new.sku,
            raw_title: new.raw_title,
            raw_description: new.raw_description,
            buy_price,
            sell_price,
            stock: new.stock,
            is_online: false,
            ai_title: None,
            ai_description: None,
            ai_category: None,
            ai_status: AiStatus::Pending,
            status: WorkflowStatus::Draft,
            margin: 0,
            margin_safe: false,
            enrichment_seq: 0,
        };
        product.refresh_margin(min_margin_percent);
        Ok(product)
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn raw_title(&self) -> &str {
        &self.raw_title
    }

    pub fn raw_description(&self) -> &str {
        &self.raw_description
    }

    pub fn buy_price(&self) -> f64 {
        self.buy_price
    }

    pub fn sell_price(&self) -> f64 {
        self.sell_price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn ai_title(&self) -> Option<&str> {
        self.ai_title.as_deref()
    }

    pub fn ai_description(&self) -> Option<&str> {
        self.ai_description.as_deref()
    }

    pub fn ai_category(&self) -> Option<&str> {
        self.ai_category.as_deref()
    }

    pub fn ai_status(&self) -> AiStatus {
        self.ai_status
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn margin(&self) -> i64 {
        self.margin
    }

    pub fn margin_safe(&self) -> bool {
        self.margin_safe
    }

    /// Sequence number of the latest enrichment request issued for this product.
    pub fn enrichment_seq(&self) -> u64 {
        self.enrichment_seq
    }

    /// Storefront price after applying the configured rounding rule.
    pub fn retail_price(&self, rule: RoundingRule) -> f64 {
        rule.apply(self.sell_price)
    }

    /// Whether the approve control should be enabled.
    pub fn can_approve(&self) -> bool {
        self.ai_status.allows_approval()
    }

    pub(crate) fn refresh_margin(&mut self, min_margin_percent: f64) {
        self.margin = margin_percent(self.buy_price, self.sell_price);
        self.margin_safe = is_margin_safe(self.margin, min_margin_percent);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Margin in whole percent of the sell price.
///
/// A zero sell price has no meaningful margin and resolves to 0.
pub fn margin_percent(buy_price: f64, sell_price: f64) -> i64 {
    if sell_price == 0.0 {
        return 0;
    }
    let ratio = (sell_price - buy_price) / sell_price * 100.0;
    if !ratio.is_finite() {
        return 0;
    }
    round_half_up(ratio) as i64
}

pub fn is_margin_safe(margin: i64, min_margin_percent: f64) -> bool {
    margin as f64 >= min_margin_percent
}

/// Copy of `product` with derived margin fields recalculated against `min_margin_percent`.
pub fn recompute(product: &Product, min_margin_percent: f64) -> Product {
    let mut next = product.clone();
    next.refresh_margin(min_margin_percent);
    next
}

/// Merge an operator edit into `product` and recompute its margin.
///
/// The patch is validated as a whole before anything is merged, so a rejected
/// edit never leaves a half-applied product behind.
pub fn apply_manual_edit(
    product: &Product,
    patch: &ProductPatch,
    min_margin_percent: f64,
) -> DomainResult<Product> {
    if let Some(title) = &patch.raw_title {
        if title.trim().is_empty() {
            return Err(DomainError::validation("raw title cannot be empty"));
        }
    }
    let buy_price = patch
        .buy_price
        .map(|v| non_negative_finite("buy_price", v))
        .transpose()?;
    let sell_price = patch
        .sell_price
        .map(|v| non_negative_finite("sell_price", v))
        .transpose()?;

    let mut next = product.clone();
    if let Some(title) = &patch.raw_title {
        next.raw_title = title.clone();
    }
    if let Some(v) = buy_price {
        next.buy_price = v;
    }
    if let Some(v) = sell_price {
        next.sell_price = v;
    }
    if let Some(v) = patch.stock {
        next.stock = v;
    }
    next.refresh_margin(min_margin_percent);
    Ok(next)
}
