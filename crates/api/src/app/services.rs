//! Shared application state and the operations routes call into.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use databox_ai::{ContentGenerator, GeminiContentGenerator};
use databox_auth::{AuthError, FileUserStore, SessionRegistry, SessionToken, UserProfile, UserStore};
use databox_catalog::{AppConfig, Catalog, CatalogError, fixtures::sample_catalog};
use databox_infra::{Dashboard, NotificationCenter, Settings};

/// Errors from operations that touch both the user store and the catalog.
#[derive(Debug)]
pub enum ServiceError {
    Auth(AuthError),
    Catalog(CatalogError),
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<CatalogError> for ServiceError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

#[derive(Clone)]
pub struct AppServices {
    dashboard: Arc<Dashboard>,
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionRegistry>,
}

/// Wire the production services from runtime settings.
pub fn build_services(settings: &Settings) -> anyhow::Result<AppServices> {
    let users = FileUserStore::open(settings.users_file()).context("opening user store")?;
    let generator = GeminiContentGenerator::new(settings.ai_model.clone()).context("building content generator")?;

    let defaults = AppConfig::default();
    let catalog = if settings.seed_catalog {
        sample_catalog(defaults.min_margin_percent).context("building sample catalog")?
    } else {
        Catalog::new()
    };

    let dashboard = Dashboard::new(
        catalog,
        defaults,
        Arc::new(generator),
        Arc::new(NotificationCenter::default()),
    )
    .context("building dashboard")?
    .with_fallback_credential(settings.ai_api_key.clone());

    tracing::info!(
        data_dir = %settings.data_dir.display(),
        model = %settings.ai_model,
        products = dashboard.stats().total,
        "services ready"
    );

    Ok(AppServices::new(Arc::new(dashboard), Arc::new(users)))
}

impl AppServices {
    pub fn new(dashboard: Arc<Dashboard>, users: Arc<dyn UserStore>) -> Self {
        Self {
            dashboard,
            users,
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    /// In-memory wiring around an arbitrary generator (tests/dev).
    pub fn in_memory(
        catalog: Catalog,
        generator: Arc<dyn ContentGenerator>,
    ) -> Result<Self, CatalogError> {
        let dashboard = Dashboard::new(
            catalog,
            AppConfig::default(),
            generator,
            Arc::new(NotificationCenter::default()),
        )?;
        Ok(Self::new(
            Arc::new(dashboard),
            Arc::new(databox_auth::InMemoryUserStore::new()),
        ))
    }

    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Log in and make the operator's configuration the active one.
    pub fn login(&self, email: &str, password: &str) -> Result<(SessionToken, UserProfile), ServiceError> {
        let user = self.users.login(email, password)?;
        self.dashboard.install_config(user.config.clone())?;
        let token = self.sessions.issue(&user.email);
        tracing::info!(email = %user.email, "operator logged in");
        Ok((token, user.profile()))
    }

    /// Create an account with the default configuration and log it in.
    pub fn register(&self, email: &str, password: &str) -> Result<(SessionToken, UserProfile), ServiceError> {
        let user = self.users.register(email, password, AppConfig::default())?;
        self.dashboard.install_config(user.config.clone())?;
        let token = self.sessions.issue(&user.email);
        tracing::info!(email = %user.email, "operator registered");
        Ok((token, user.profile()))
    }

    pub fn logout(&self, email: &str, token: &SessionToken) -> Result<(), AuthError> {
        self.sessions.revoke(token);
        self.users.logout(email)
    }

    /// Validate, persist for `email`, then apply.
    pub fn save_config(&self, email: &str, config: AppConfig) -> Result<(), ServiceError> {
        config.validate().map_err(CatalogError::from)?;
        self.users.save_config(email, config.clone())?;
        self.dashboard.save_config(config)?;
        Ok(())
    }
}

/// Live notification feed as server-sent events (event name = kind).
pub fn notification_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.dashboard.notifications().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(n) => {
            let kind = serde_json::to_value(n.kind)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "info".to_string());
            let data = serde_json::to_string(&n).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(kind).data(data)))
        }
        // Lagged receivers skip what they missed.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
