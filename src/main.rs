use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meal_admin_api::{config::Config, create_router, services::drafts, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    info!("Relaying to backend {}", config.backend_url);

    let sweep_every = config.draft_idle_timeout / 4;
    let state = AppState::new(config)?;
    drafts::start_eviction(state.drafts.clone(), sweep_every);
    let app = create_router(state);

    info!("meal-admin API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
