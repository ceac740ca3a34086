//! Shared error type for the three HTTP clients.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    Malformed(String),

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Turn a non-2xx response into [`ApiError::Api`], carrying whatever body the
/// server sent.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}
