//! Read-only reference tables, served from the copy loaded at startup.

use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::{climate::Climate, sowing_type::SowingType};
use utils::response::ApiResponse;

use crate::DeploymentImpl;

pub async fn get_climates(
    State(deployment): State<DeploymentImpl>,
) -> ResponseJson<ApiResponse<Vec<Climate>>> {
    let climates = deployment.calendar().reference().climates.clone();
    ResponseJson(ApiResponse::success(climates))
}

pub async fn get_sowing_types(
    State(deployment): State<DeploymentImpl>,
) -> ResponseJson<ApiResponse<Vec<SowingType>>> {
    let sowing_types = deployment.calendar().reference().sowing_types.clone();
    ResponseJson(ApiResponse::success(sowing_types))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new()
        .route("/climates", get(get_climates))
        .route("/sowing-types", get(get_sowing_types))
}
