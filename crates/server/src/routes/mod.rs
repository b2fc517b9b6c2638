use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::DeploymentImpl;

pub mod calendar;
pub mod harvests;
pub mod health;
pub mod reference;
pub mod user_settings;
pub mod vegetables;

/// `?user_id=` on user-owned routes; absent means the configured default user
#[derive(Debug, Default, Deserialize)]
pub struct UserScope {
    pub user_id: Option<String>,
}

pub fn router(deployment: DeploymentImpl) -> Router {
    let api_routes = Router::new()
        .merge(health::router(&deployment))
        .merge(calendar::router(&deployment))
        .merge(reference::router(&deployment))
        .merge(vegetables::router(&deployment))
        .merge(harvests::router(&deployment))
        .merge(user_settings::router(&deployment));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(deployment)
}
