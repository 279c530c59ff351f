use anyhow::Context;

use databox_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    databox_observability::init();

    let settings = Settings::from_env().context("loading settings")?;
    if settings.ai_api_key.is_none() {
        tracing::warn!("DATABOX_AI_API_KEY not set; enrichment needs a key in the operator configuration");
    }

    let services = databox_api::app::services::build_services(&settings).context("building services")?;
    let app = databox_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
