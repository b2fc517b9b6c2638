use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user_settings::{UpdateUserSettings, UserSettings};
use utils::response::ApiResponse;

use super::UserScope;
use crate::{DeploymentImpl, error::ApiError};

pub async fn get_user_settings(
    State(deployment): State<DeploymentImpl>,
    Query(scope): Query<UserScope>,
) -> Result<ResponseJson<ApiResponse<UserSettings>>, ApiError> {
    let user_id = deployment.user_id(scope.user_id.as_deref());
    let settings = deployment.settings().get_or_create(user_id).await?;
    Ok(ResponseJson(ApiResponse::success(settings)))
}

pub async fn update_user_settings(
    State(deployment): State<DeploymentImpl>,
    Query(scope): Query<UserScope>,
    axum::Json(payload): axum::Json<UpdateUserSettings>,
) -> Result<ResponseJson<ApiResponse<UserSettings>>, ApiError> {
    let user_id = deployment.user_id(scope.user_id.as_deref());
    let settings = deployment.settings().update(user_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(settings)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().route(
        "/user-settings",
        get(get_user_settings).put(update_user_settings),
    )
}
