use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::models::harvest::{CreateHarvest, Harvest};
use services::services::garden::HarvestSummary;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

/// GET /api/harvests
/// Newest first
pub async fn get_harvests(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Harvest>>>, ApiError> {
    let harvests = deployment.garden().list_harvests().await?;
    Ok(ResponseJson(ApiResponse::success(harvests)))
}

pub async fn create_harvest(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateHarvest>,
) -> Result<ResponseJson<ApiResponse<Harvest>>, ApiError> {
    let harvest = deployment.garden().create_harvest(&payload).await?;
    Ok(ResponseJson(ApiResponse::success(harvest)))
}

pub async fn delete_harvest(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    deployment.garden().delete_harvest(id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// GET /api/harvests/summary
pub async fn get_harvest_summary(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<HarvestSummary>>>, ApiError> {
    let summary = deployment.garden().harvest_summary().await?;
    Ok(ResponseJson(ApiResponse::success(summary)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/harvests",
        Router::new()
            .route("/", get(get_harvests).post(create_harvest))
            .route("/summary", get(get_harvest_summary))
            .route("/{id}", delete(delete_harvest)),
    )
}
