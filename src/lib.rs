//! Back-office gateway for the meal-subscription kitchen dashboard.
//!
//! Relays the dashboard's calls to the remote REST backend and hosts the weekly
//! menu editor as server-side drafts.

pub mod config;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use services::{backend::BackendClient, drafts::DraftRegistry};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub config: Arc<Config>,
    pub drafts: Arc<DraftRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&config.backend_url, config.backend_timeout)?;
        let drafts = Arc::new(DraftRegistry::new(config.draft_idle_timeout));
        Ok(Self {
            backend,
            config: Arc::new(config),
            drafts,
        })
    }
}

/// Allow the dashboard origin; localhost is always accepted for development.
fn cors_layer(app_base_url: &str) -> CorsLayer {
    let base = app_base_url.trim_end_matches('/').to_string();
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let Ok(o) = origin.to_str() else {
            return false;
        };
        o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true)
        .allow_origin(origin)
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/{id}", get(routes::auth::get_user).put(routes::auth::update_user))
        // Plats
        .route("/plats/filter/{filter}", get(routes::dishes::list_plats))
        .route("/plats/add", post(routes::dishes::create_plat))
        .route("/plats/update/{id}", put(routes::dishes::update_plat))
        .route("/plats/delete/{id}", delete(routes::dishes::delete_plat))
        .route("/plats/menujours/plats-details", get(routes::dishes::plats_details))
        .route("/plats/{id}", get(routes::dishes::get_plat))
        .route("/plats/{id}/stats-week", get(routes::dishes::stats_week))
        .route("/plats/{id}/allergy-stats/week", get(routes::dishes::allergy_stats_week))
        .route("/plats/{id}/upload-photo", post(routes::dishes::upload_photo))
        .route("/plat-calories/{id}/{type}", get(routes::dishes::plat_calories))
        // Menu weeks
        .route("/menu-week/by-date", get(routes::menu_week::by_date))
        .route("/menu-week/month", get(routes::menu_week::month))
        .route("/menu-week/create", post(routes::menu_week::create))
        .route("/menu-week/{id}/status", put(routes::menu_week::update_status))
        // Livreurs
        .route("/livreurs", get(routes::delivery::list_livreurs).post(routes::delivery::create_livreur))
        .route("/livreurs/affecter-commandes", post(routes::delivery::assign_commandes))
        .route("/livreurs/desaffecter-commandes", post(routes::delivery::unassign_commandes))
        .route(
            "/livreurs/{id}",
            get(routes::delivery::get_livreur)
                .put(routes::delivery::update_livreur)
                .delete(routes::delivery::delete_livreur),
        )
        // Emballage
        .route("/emballage/all", get(routes::delivery::list_emballages))
        .route("/emballage/{id}", get(routes::delivery::get_emballage))
        // Clients
        .route("/client/clients-light", get(routes::clients::list_clients))
        .route("/client/{id}", get(routes::clients::get_client))
        .route("/client/{id}/update", put(routes::clients::update_client))
        // Commandes
        .route("/commandes/by-date", get(routes::orders::by_date))
        .route("/commandes/by-date-range", get(routes::orders::by_date_range))
        .route("/commandes/client/{id}", get(routes::orders::by_client));

    let max_upload_bytes = state.config.max_upload_bytes;
    let cors = cors_layer(&state.config.app_base_url);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Menu drafts
        .route("/menu-drafts", post(routes::menu_drafts::create_draft))
        .route(
            "/menu-drafts/{id}",
            get(routes::menu_drafts::get_draft).delete(routes::menu_drafts::delete_draft),
        )
        .route("/menu-drafts/{id}/week", put(routes::menu_drafts::select_week))
        .route("/menu-drafts/{id}/save", post(routes::menu_drafts::save_draft))
        .route(
            "/menu-drafts/{id}/days/{date}/selections",
            post(routes::menu_drafts::add_selection),
        )
        .route(
            "/menu-drafts/{id}/days/{date}/selections/{field}/{dish_id}",
            delete(routes::menu_drafts::remove_selection),
        )
        .route("/menu-drafts/{id}/days/{date}/cancel", post(routes::menu_drafts::cancel_day))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
