//! Business configuration (per operator account).
//!
//! Connection fields are carried opaquely; only `min_margin_percent`,
//! `rounding_rule` and the enrichment credential influence catalog behaviour.

use serde::{Deserialize, Serialize};

use databox_core::{DomainResult, non_negative_finite};

/// How often the wholesaler feed would be synchronised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncInterval {
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "60min")]
    Hourly,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "manual")]
    Manual,
}

/// Price ending applied when presenting storefront prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingRule {
    #[serde(rename = "none")]
    Exact,
    #[serde(rename = ".99")]
    NinetyNine,
    #[serde(rename = ".95")]
    NinetyFive,
}

impl RoundingRule {
    pub fn apply(&self, price: f64) -> f64 {
        if !price.is_finite() || price <= 0.0 {
            return 0.0;
        }
        match self {
            RoundingRule::Exact => (price * 100.0).round() / 100.0,
            RoundingRule::NinetyNine => price.floor() + 0.99,
            RoundingRule::NinetyFive => price.floor() + 0.95,
        }
    }
}

/// Mapping from catalog fields to supplier CSV column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvMapping {
    pub sku: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub stock: String,
}

impl Default for CsvMapping {
    fn default() -> Self {
        Self {
            sku: "Artikelnummer".to_string(),
            title: "Bezeichnung".to_string(),
            description: "Langtext".to_string(),
            price: "EK_Preis".to_string(),
            stock: "Bestand".to_string(),
        }
    }
}

/// Process-wide business configuration. Replaced wholesale on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub ftp_host: String,
    pub ftp_user: String,
    pub shopify_url: String,
    pub shopify_access_token: String,
    /// Credential for the content generator. Blank means "not configured".
    pub google_api_key: String,
    pub sync_interval: SyncInterval,
    pub min_margin_percent: f64,
    pub rounding_rule: RoundingRule,
    pub csv_mapping: CsvMapping,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ftp_host: "ftp.suppliers.com".to_string(),
            ftp_user: "wholesale_connect".to_string(),
            shopify_url: String::new(),
            shopify_access_token: String::new(),
            google_api_key: String::new(),
            sync_interval: SyncInterval::Daily,
            min_margin_percent: 25.0,
            rounding_rule: RoundingRule::NinetyNine,
            csv_mapping: CsvMapping::default(),
        }
    }
}

impl AppConfig {
    /// Reject configurations that would make margin checks meaningless.
    pub fn validate(&self) -> DomainResult<()> {
        non_negative_finite("min_margin_percent", self.min_margin_percent)?;
        Ok(())
    }

    pub fn enrichment_credential(&self) -> Option<&str> {
        let key = self.google_api_key.trim();
        if key.is_empty() { None } else { Some(key) }
    }
}
