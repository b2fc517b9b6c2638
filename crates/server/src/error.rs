use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use services::services::{
    calendar::CalendarError, garden::GardenError, user_settings::SettingsError,
};
use thiserror::Error;
use utils::{decade::DecadeError, response::ApiResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Garden(#[from] GardenError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Decade(#[from] DecadeError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Calendar(CalendarError::Validation(_) | CalendarError::OutOfRange(_))
            | ApiError::Garden(GardenError::Validation(_))
            | ApiError::Settings(SettingsError::Validation(_))
            | ApiError::Decade(_) => StatusCode::BAD_REQUEST,
            ApiError::Calendar(CalendarError::NotFound) | ApiError::Garden(GardenError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Calendar(CalendarError::Database(_))
            | ApiError::Garden(GardenError::Database(_))
            | ApiError::Settings(SettingsError::Database(_))
            | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };
        let body = ApiResponse::<()>::error(&message);
        (status, ResponseJson(body)).into_response()
    }
}
