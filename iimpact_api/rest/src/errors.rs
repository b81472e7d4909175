use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
