use axum::http::StatusCode;

/// Failure of a single call against the life-log API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(
        "server rejected the request: {}",
        .message.as_deref().unwrap_or("no details")
    )]
    Rejected { message: Option<String> },

    #[error("server answered {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

impl ApiError {
    /// Text shown to the user: the server's own message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
            }
            | ApiError::Status {
                message: Some(message),
                ..
            } => format!("{fallback}: {message}"),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::bad_request(format!("multipart error: {err}"))
    }
}

impl From<crate::models::FieldError> for AppError {
    fn from(err: crate::models::FieldError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
