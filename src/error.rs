use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure kinds shared by every client and handler in the request chain.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid zipcode")]
    InvalidCode,
    #[error("can not find zipcode")]
    CodeNotFound,
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCode => StatusCode::UNPROCESSABLE_ENTITY,
            Error::CodeNotFound => StatusCode::NOT_FOUND,
            Error::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Error::InvalidCode => "invalid zipcode",
            Error::CodeNotFound => "can not find zipcode",
            Error::Unclassified(_) => "internal server error",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Unclassified(err) => {
                tracing::error!(error = ?err, "internal server error");
            }
            Error::InvalidCode | Error::CodeNotFound => {
                tracing::info!(reason = %self, "request rejected");
            }
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                message: self.message().to_string(),
            }),
        )
            .into_response()
    }
}
