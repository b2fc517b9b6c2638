//! Routes for the effective sowing/harvest calendar and its overrides.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use chrono::Local;
use db::models::calendar_override::{
    CreateCalendarOverride, UpdateCalendarOverride, UserCalendarOverride,
};
use serde::Deserialize;
use services::services::{
    calendar::{CalendarEntryDisplay, DecadeOverview, decade_overview},
    calendar_resolution::CalendarFilter,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use super::UserScope;
use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub user_id: Option<String>,
    pub vegetable: Option<String>,
    pub climate_id: Option<i64>,
}

/// GET /api/calendar?user_id=&vegetable=&climate_id=
pub async fn get_calendar(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<CalendarQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<CalendarEntryDisplay>>>, ApiError> {
    let user_id = deployment.user_id(query.user_id.as_deref());
    let filter = CalendarFilter {
        vegetable: query.vegetable.clone(),
        climate_id: query.climate_id,
    };
    let entries = deployment.calendar().list(user_id, &filter).await?;
    Ok(ResponseJson(ApiResponse::success(entries)))
}

/// POST /api/calendar
/// Create the user's override, or update it when the key already exists
pub async fn upsert_override(
    State(deployment): State<DeploymentImpl>,
    Query(scope): Query<UserScope>,
    axum::Json(payload): axum::Json<CreateCalendarOverride>,
) -> Result<ResponseJson<ApiResponse<UserCalendarOverride>>, ApiError> {
    let user_id = deployment.user_id(scope.user_id.as_deref());
    let row = deployment.calendar().upsert_override(user_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn update_override(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
    Query(scope): Query<UserScope>,
    axum::Json(payload): axum::Json<UpdateCalendarOverride>,
) -> Result<ResponseJson<ApiResponse<UserCalendarOverride>>, ApiError> {
    let user_id = deployment.user_id(scope.user_id.as_deref());
    let row = deployment
        .calendar()
        .update_override(id, user_id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn delete_override(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
    Query(scope): Query<UserScope>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let user_id = deployment.user_id(scope.user_id.as_deref());
    deployment.calendar().delete_override(id, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// GET /api/calendar/decades
pub async fn get_decades() -> ResponseJson<ApiResponse<DecadeOverview>> {
    ResponseJson(ApiResponse::success(decade_overview(
        Local::now().date_naive(),
    )))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/calendar",
        Router::new()
            .route("/", get(get_calendar).post(upsert_override))
            .route("/decades", get(get_decades))
            .route("/{id}", put(update_override).delete(delete_override)),
    )
}
