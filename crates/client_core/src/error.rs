use thiserror::Error;

/// Every way a page fetch can fail on the client side. The page controller
/// turns all of them into an error message; none escape it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("backend request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),
    #[error("backend server error: {body} (status: {status})")]
    UpstreamStatus { status: u16, body: String },
    #[error("API error: {message} (code: {code})")]
    UpstreamLogic { code: String, message: String },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
