use serde::{Deserialize, Serialize};

use databox_ai::Language;
use databox_auth::{SessionToken, UserProfile};
use databox_catalog::{ApprovalOutcome, Product, RoundingRule};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: Language,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub q: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnrichQuery {
    /// Wait for the generator instead of answering `202 Accepted` right away.
    #[serde(default)]
    pub wait: bool,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: SessionToken,
    pub user: UserProfile,
}

/// Product as shown in the review queue, with the storefront price.
#[derive(Debug, Serialize)]
pub struct ProductView<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub retail_price: f64,
}

pub fn product_to_json(product: &Product, rule: RoundingRule) -> serde_json::Value {
    serde_json::to_value(ProductView {
        product,
        retail_price: product.retail_price(rule),
    })
    .unwrap_or_else(|_| serde_json::json!({ "id": product.id().as_str() }))
}

pub fn approval_outcome_str(outcome: ApprovalOutcome) -> &'static str {
    match outcome {
        ApprovalOutcome::Approved => "approved",
        ApprovalOutcome::Updated => "updated",
    }
}
