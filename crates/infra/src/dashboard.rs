//! Shared dashboard controller.
//!
//! Owns the product catalog, the active business configuration, the operator
//! language and the notification feed. Catalog and configuration share one
//! lock, so every margin is derived from the configuration it is read with.
//! Every transition holds that lock for its whole read-modify-write. The generator call is the only
//! suspension point and runs with no lock held: [`Dashboard::begin_enrichment`]
//! flips the product to `generating` and [`Dashboard::finish_enrichment`]
//! awaits the generator and applies the result.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info, warn};

use databox_ai::{ContentGenerator, ContentRequest, Language};
use databox_catalog::{
    AppConfig, ApprovalOutcome, Catalog, CatalogError, CatalogResult, DashboardStats, EnrichedContent,
    EnrichmentError, EnrichmentOutcome, EnrichmentTicket, Product, ProductFilter, ProductPatch,
};
use databox_core::ProductId;

use crate::notifications::{NotificationCenter, NotificationSink};

pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate content. Please check your API Key in Configuration.";
pub const REJECTED_MESSAGE: &str = "Product removed from queue";
pub const CONFIG_SAVED_MESSAGE: &str = "Configuration saved successfully.";
pub const UPDATED_MESSAGE: &str = "Update Successful";

fn approved_message(language: Language) -> String {
    let label = match language {
        Language::En => "Approve & Sync",
        Language::De => "Freigeben & Sync",
        Language::Ch => "Freigäh & Sync",
    };
    format!("{label} Successful")
}

fn missing_key_message(language: Language) -> &'static str {
    match language {
        Language::En => "Enter your Gemini API Key",
        Language::De => "Gemini API Key eingeben",
        Language::Ch => "Gemini API Key iigäh",
    }
}

/// An enrichment that has been started and is waiting for the generator.
///
/// Credential and language are captured when the request is issued.
#[derive(Debug, Clone)]
pub struct PendingEnrichment {
    ticket: EnrichmentTicket,
    credential: String,
    language: Language,
}

impl PendingEnrichment {
    pub fn ticket(&self) -> &EnrichmentTicket {
        &self.ticket
    }

    pub fn product_id(&self) -> &ProductId {
        &self.ticket.product_id
    }
}

/// Catalog plus the configuration its derived fields were computed against.
#[derive(Debug)]
struct DashboardState {
    catalog: Catalog,
    config: AppConfig,
}

impl DashboardState {
    fn min_margin_percent(&self) -> f64 {
        self.config.min_margin_percent
    }
}

pub struct Dashboard {
    state: RwLock<DashboardState>,
    language: RwLock<Language>,
    generator: Arc<dyn ContentGenerator>,
    notifications: Arc<NotificationCenter>,
    fallback_credential: Option<String>,
}

impl Dashboard {
    pub fn new(
        mut catalog: Catalog,
        config: AppConfig,
        generator: Arc<dyn ContentGenerator>,
        notifications: Arc<NotificationCenter>,
    ) -> CatalogResult<Self> {
        config.validate()?;
        catalog.recompute_all(config.min_margin_percent);
        Ok(Self {
            state: RwLock::new(DashboardState { catalog, config }),
            language: RwLock::new(Language::default()),
            generator,
            notifications,
            fallback_credential: None,
        })
    }

    /// Credential used when the active configuration carries no key.
    pub fn with_fallback_credential(mut self, credential: Option<String>) -> Self {
        self.fallback_credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    fn read_state(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Configuration / session
    // ─────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> AppConfig {
        self.read_state().config.clone()
    }

    /// Replace the configuration (e.g. on login) and re-derive all margins.
    ///
    /// Readers never observe the new configuration next to stale margins.
    pub fn install_config(&self, config: AppConfig) -> CatalogResult<()> {
        config.validate()?;
        let min = config.min_margin_percent;
        let mut state = self.write_state();
        state.config = config;
        state.catalog.recompute_all(min);
        drop(state);
        info!(min_margin_percent = min, "configuration installed");
        Ok(())
    }

    /// Operator-initiated save: same as [`Self::install_config`] plus a notification.
    pub fn save_config(&self, config: AppConfig) -> CatalogResult<()> {
        self.install_config(config)?;
        self.notifications.success(CONFIG_SAVED_MESSAGE);
        Ok(())
    }

    pub fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_language(&self, language: Language) {
        *self.language.write().unwrap_or_else(|e| e.into_inner()) = language;
        info!(%language, "language changed");
    }

    /// Configured key, else the process-wide fallback.
    pub fn credential(&self) -> Option<String> {
        self.credential_for(&self.read_state().config)
    }

    fn credential_for(&self, config: &AppConfig) -> Option<String> {
        config
            .enrichment_credential()
            .map(str::to_string)
            .or_else(|| self.fallback_credential.clone())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.read_state().catalog.get(id).cloned()
    }

    pub fn products(&self, filter: &ProductFilter) -> Vec<Product> {
        let state = self.read_state();
        filter.apply(state.catalog.products()).into_iter().cloned().collect()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_products(self.read_state().catalog.products())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Workflow
    // ─────────────────────────────────────────────────────────────────────

    pub fn edit(&self, id: &ProductId, patch: &ProductPatch) -> CatalogResult<Product> {
        let mut state = self.write_state();
        let min = state.min_margin_percent();
        state.catalog.edit(id, patch, min).cloned()
    }

    pub fn approve(&self, id: &ProductId) -> CatalogResult<ApprovalOutcome> {
        let outcome = self.write_state().catalog.approve(id)?;
        match outcome {
            ApprovalOutcome::Approved => self.notifications.success(&approved_message(self.language())),
            ApprovalOutcome::Updated => self.notifications.success(UPDATED_MESSAGE),
        }
        Ok(outcome)
    }

    pub fn reject(&self, id: &ProductId) -> CatalogResult<Product> {
        let removed = self.write_state().catalog.reject(id)?;
        self.notifications.info(REJECTED_MESSAGE);
        Ok(removed)
    }

    pub fn reset(&self, id: &ProductId) -> CatalogResult<Product> {
        self.write_state().catalog.reset_enrichment(id).cloned()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Enrichment
    // ─────────────────────────────────────────────────────────────────────

    /// Move the product to `generating`. Without a credential nothing changes.
    pub fn begin_enrichment(&self, id: &ProductId) -> CatalogResult<PendingEnrichment> {
        let language = self.language();
        let mut state = self.write_state();
        let Some(credential) = self.credential_for(&state.config) else {
            drop(state);
            warn!(product_id = %id, "enrichment rejected: no credential");
            self.notifications.error(missing_key_message(language));
            return Err(CatalogError::Enrichment(EnrichmentError::MissingCredential));
        };

        let ticket = state.catalog.begin_enrichment(id, Some(credential.as_str()))?;
        drop(state);
        Ok(PendingEnrichment {
            ticket,
            credential,
            language,
        })
    }

    /// Await the generator for `pending` and apply its result.
    ///
    /// Generator failures mark the product `failed` and are reported through
    /// notifications; they are not returned as errors.
    pub async fn finish_enrichment(&self, pending: PendingEnrichment) -> CatalogResult<EnrichmentOutcome> {
        let ticket = &pending.ticket;
        let request = ContentRequest {
            raw_title: ticket.raw_title.clone(),
            raw_description: ticket.raw_description.clone(),
            sell_price: ticket.sell_price,
            language: pending.language,
        };

        let result = self
            .generator
            .generate(&request, &pending.credential)
            .await
            .map(|c| EnrichedContent {
                title: c.title,
                description: c.description,
                category: c.category,
            })
            .map_err(|e| {
                error!(product_id = %ticket.product_id, seq = ticket.seq, error = %e, "content generation failed");
                EnrichmentError::GenerationFailure(e.to_string())
            });

        let resolved = self.write_state().catalog.resolve_enrichment(ticket, result);
        let outcome = match resolved {
            Ok(outcome) => outcome,
            Err(CatalogError::NotFound(id)) => {
                debug!(product_id = %id, "product removed before enrichment finished");
                return Err(CatalogError::NotFound(id));
            }
            Err(e) => return Err(e),
        };

        if outcome == EnrichmentOutcome::Failed {
            self.notifications.error(GENERATION_FAILED_MESSAGE);
        }
        Ok(outcome)
    }

    /// Begin and finish in one call.
    pub async fn request_enrichment(&self, id: &ProductId) -> CatalogResult<EnrichmentOutcome> {
        let pending = self.begin_enrichment(id)?;
        self.finish_enrichment(pending).await
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("products", &self.read_state().catalog.len())
            .field("language", &self.language())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use databox_ai::{GeneratedContent, GenerationError};
    use databox_catalog::{AiStatus, ViewMode, WorkflowStatus, fixtures::sample_catalog};
    use tokio::sync::oneshot;

    use crate::notifications::NotificationKind;

    struct EchoGenerator {
        calls: AtomicUsize,
    }

    impl EchoGenerator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ContentGenerator for EchoGenerator {
        async fn generate(
            &self,
            request: &ContentRequest,
            _credential: &str,
        ) -> Result<GeneratedContent, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GeneratedContent {
                title: format!("{} [{}]", request.raw_title, request.language),
                description: "<p>copy</p>".to_string(),
                category: "Test > Category".to_string(),
            })
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ContentGenerator for FailingGenerator {
        async fn generate(&self, _: &ContentRequest, _: &str) -> Result<GeneratedContent, GenerationError> {
            Err(GenerationError::Api {
                status: 400,
                message: "API key not valid".to_string(),
            })
        }
    }

    /// Answers the n-th call only when its gate is released.
    struct GatedGenerator {
        gates: std::sync::Mutex<Vec<oneshot::Receiver<String>>>,
    }

    #[async_trait]
    impl ContentGenerator for GatedGenerator {
        async fn generate(&self, _: &ContentRequest, _: &str) -> Result<GeneratedContent, GenerationError> {
            let gate = self.gates.lock().unwrap().remove(0);
            let title = gate.await.map_err(|e| GenerationError::Network(e.to_string()))?;
            Ok(GeneratedContent {
                title,
                description: String::new(),
                category: String::new(),
            })
        }
    }

    fn keyed_config() -> AppConfig {
        AppConfig {
            google_api_key: "test-key".to_string(),
            ..AppConfig::default()
        }
    }

    fn dashboard(generator: Arc<dyn ContentGenerator>, config: AppConfig) -> Dashboard {
        Dashboard::new(
            sample_catalog(config.min_margin_percent).unwrap(),
            config,
            generator,
            Arc::new(NotificationCenter::default()),
        )
        .unwrap()
    }

    fn mouse() -> ProductId {
        ProductId::new("2")
    }

    #[tokio::test]
    async fn enrichment_completes_with_generated_copy() {
        let generator = EchoGenerator::new();
        let dash = dashboard(generator.clone(), keyed_config());
        dash.set_language(Language::En);

        let outcome = dash.request_enrichment(&mouse()).await.unwrap();
        assert_eq!(outcome, EnrichmentOutcome::Completed);

        let product = dash.product(&mouse()).unwrap();
        assert_eq!(product.ai_status(), AiStatus::Completed);
        assert_eq!(product.ai_title(), Some("Gaming Mouse 2400DPI RGB Led [en]"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_credential_makes_no_call_and_no_change() {
        let generator = EchoGenerator::new();
        let dash = dashboard(generator.clone(), AppConfig::default());
        let before = dash.product(&mouse()).unwrap();

        let err = dash.request_enrichment(&mouse()).await.unwrap_err();
        assert_eq!(err, CatalogError::Enrichment(EnrichmentError::MissingCredential));
        assert_eq!(dash.product(&mouse()).unwrap(), before);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

        let last = dash.notifications().recent().pop().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.message, "Gemini API Key eingeben");
    }

    #[tokio::test]
    async fn fallback_credential_is_used_when_config_has_none() {
        let generator = EchoGenerator::new();
        let dash = dashboard(generator.clone(), AppConfig::default())
            .with_fallback_credential(Some("env-key".to_string()));

        assert_eq!(dash.credential().as_deref(), Some("env-key"));
        assert_eq!(
            dash.request_enrichment(&mouse()).await.unwrap(),
            EnrichmentOutcome::Completed
        );
    }

    #[tokio::test]
    async fn generator_failure_marks_failed_and_notifies() {
        let dash = dashboard(Arc::new(FailingGenerator), keyed_config());

        let outcome = dash.request_enrichment(&mouse()).await.unwrap();
        assert_eq!(outcome, EnrichmentOutcome::Failed);
        let product = dash.product(&mouse()).unwrap();
        assert_eq!(product.ai_status(), AiStatus::Failed);
        assert_eq!(product.ai_title(), None);

        let last = dash.notifications().recent().pop().unwrap();
        assert_eq!(last.message, GENERATION_FAILED_MESSAGE);

        // Failed products may still be published.
        assert_eq!(dash.approve(&mouse()).unwrap(), ApprovalOutcome::Approved);
    }

    #[tokio::test]
    async fn last_issued_request_wins_out_of_order() {
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let generator = Arc::new(GatedGenerator {
            gates: std::sync::Mutex::new(vec![rx1, rx2]),
        });
        let dash = Arc::new(dashboard(generator, keyed_config()));

        let first = dash.begin_enrichment(&mouse()).unwrap();
        let second = dash.begin_enrichment(&mouse()).unwrap();

        let d1 = dash.clone();
        let h1 = tokio::spawn(async move { d1.finish_enrichment(first).await });
        tokio::task::yield_now().await;
        let d2 = dash.clone();
        let h2 = tokio::spawn(async move { d2.finish_enrichment(second).await });
        tokio::task::yield_now().await;

        // The second request answers first, then the stale one arrives.
        tx2.send("second".to_string()).unwrap();
        assert_eq!(h2.await.unwrap().unwrap(), EnrichmentOutcome::Completed);
        tx1.send("first".to_string()).unwrap();
        assert!(matches!(
            h1.await.unwrap().unwrap(),
            EnrichmentOutcome::Superseded { .. }
        ));

        assert_eq!(dash.product(&mouse()).unwrap().ai_title(), Some("second"));
    }

    #[tokio::test]
    async fn generating_product_cannot_be_approved() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        let pending = dash.begin_enrichment(&mouse()).unwrap();

        assert!(matches!(
            dash.approve(&mouse()),
            Err(CatalogError::EnrichmentIncomplete { status: AiStatus::Generating, .. })
        ));

        dash.finish_enrichment(pending).await.unwrap();
        assert_eq!(dash.approve(&mouse()).unwrap(), ApprovalOutcome::Approved);
        let product = dash.product(&mouse()).unwrap();
        assert!(product.is_online());
        assert_eq!(product.status(), WorkflowStatus::Approved);
    }

    #[tokio::test]
    async fn reject_during_generation_drops_result() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        let pending = dash.begin_enrichment(&mouse()).unwrap();
        dash.reject(&mouse()).unwrap();

        assert!(matches!(
            dash.finish_enrichment(pending).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(dash.product(&mouse()).is_none());
    }

    #[tokio::test]
    async fn reset_during_generation_discards_result() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        let pending = dash.begin_enrichment(&mouse()).unwrap();
        dash.reset(&mouse()).unwrap();

        assert!(matches!(
            dash.finish_enrichment(pending).await.unwrap(),
            EnrichmentOutcome::Superseded { .. }
        ));
        assert_eq!(dash.product(&mouse()).unwrap().ai_status(), AiStatus::Pending);
    }

    #[test]
    fn approve_notifies_in_operator_language() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        dash.set_language(Language::En);

        // Product 1 is already online.
        assert_eq!(dash.approve(&ProductId::new("1")).unwrap(), ApprovalOutcome::Updated);
        assert_eq!(dash.notifications().recent().pop().unwrap().message, UPDATED_MESSAGE);

        // Blocked approvals are not announced.
        assert!(dash.approve(&mouse()).is_err());
        assert_eq!(dash.notifications().recent().len(), 1);
    }

    #[test]
    fn save_config_recomputes_margins_and_notifies() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        assert!(dash.product(&ProductId::new("3")).unwrap().margin_safe());

        let stricter = AppConfig {
            min_margin_percent: 50.0,
            ..keyed_config()
        };
        dash.save_config(stricter).unwrap();

        // Mixer margin is 47.
        assert!(!dash.product(&ProductId::new("3")).unwrap().margin_safe());
        assert_eq!(
            dash.notifications().recent().pop().unwrap().message,
            CONFIG_SAVED_MESSAGE
        );
    }

    #[test]
    fn invalid_config_is_rejected_without_change() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        let bad = AppConfig {
            min_margin_percent: f64::INFINITY,
            ..keyed_config()
        };

        assert!(matches!(dash.save_config(bad), Err(CatalogError::Domain(_))));
        assert_eq!(dash.config(), keyed_config());
        assert!(dash.notifications().recent().is_empty());
    }

    #[test]
    fn edit_uses_current_threshold() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        let patch = ProductPatch {
            buy_price: Some(20.0),
            ..ProductPatch::default()
        };

        let edited = dash.edit(&mouse(), &patch).unwrap();
        assert_eq!(edited.margin(), 9);
        assert!(!edited.margin_safe());
    }

    fn margin_matches_config(dash: &Dashboard, id: &ProductId) -> bool {
        let state = dash.read_state();
        let product = state.catalog.get(id).unwrap();
        product.margin_safe() == (product.margin() as f64 >= state.config.min_margin_percent)
    }

    #[test]
    fn edits_racing_config_saves_never_leave_stale_margins() {
        use std::sync::Barrier;

        let dash = dashboard(EchoGenerator::new(), keyed_config());
        let mixer = ProductId::new("3");
        let strict = AppConfig {
            min_margin_percent: 50.0,
            ..keyed_config()
        };

        for round in 0..500u32 {
            let barrier = Barrier::new(2);
            let patch = ProductPatch {
                stock: Some(round),
                ..ProductPatch::default()
            };
            let config = if round % 2 == 0 { strict.clone() } else { keyed_config() };

            std::thread::scope(|s| {
                s.spawn(|| {
                    barrier.wait();
                    dash.edit(&mixer, &patch).unwrap();
                });
                s.spawn(|| {
                    barrier.wait();
                    dash.install_config(config).unwrap();
                });
            });

            assert!(margin_matches_config(&dash, &mixer), "stale margin in round {round}");
        }
    }

    #[test]
    fn stats_and_filter_reflect_catalog() {
        let dash = dashboard(EchoGenerator::new(), keyed_config());
        let stats = dash.stats();
        assert_eq!(stats.total, 53);

        let mice = dash.products(&ProductFilter::new("mouse", ViewMode::Draft));
        assert_eq!(mice.len(), 1);
        assert_eq!(mice[0].id(), &mouse());

        dash.reject(&mouse()).unwrap();
        assert_eq!(dash.stats().total, 52);
    }
}
