use axum::{
    Router, extract::State, response::Json as ResponseJson, routing::get,
};
use db::models::vegetable::{CreateVegetable, DeleteVegetable, Vegetable};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

pub async fn get_vegetables(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Vegetable>>>, ApiError> {
    let vegetables = deployment.garden().list_vegetables().await?;
    Ok(ResponseJson(ApiResponse::success(vegetables)))
}

/// POST /api/vegetables
/// Registers the (name, variety) pair or refreshes its unit and image
pub async fn upsert_vegetable(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateVegetable>,
) -> Result<ResponseJson<ApiResponse<Vegetable>>, ApiError> {
    let vegetable = deployment.garden().upsert_vegetable(&payload).await?;
    Ok(ResponseJson(ApiResponse::success(vegetable)))
}

pub async fn delete_vegetable(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<DeleteVegetable>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    deployment
        .garden()
        .delete_vegetable(&payload.name, payload.variety.as_deref())
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().route(
        "/vegetables",
        get(get_vegetables)
            .post(upsert_vegetable)
            .delete(delete_vegetable),
    )
}
