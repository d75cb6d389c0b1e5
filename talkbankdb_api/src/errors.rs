//! Error types for the API client.

/// Errors that can occur when building or sending TalkBankDB requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required query field was absent or empty. No request was sent.
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    /// A corpus path does not descend through the path tree. No request was sent.
    #[error("Invalid corpus path {} at depth {depth}", .path.join("/"))]
    InvalidPath { path: Vec<String>, depth: usize },

    /// The service rejected the supplied credentials. The message is the
    /// service's response body, unchanged.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authentication was requested but no credential provider is configured.
    #[error("Authentication requested but no credential provider is configured")]
    MissingCredentials,

    /// The response could not be reshaped into the expected structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A query given as JSON could not be read.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The configured service URL could not be used to build a request URL.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Network-level failure (connection refused, timeout, DNS).
    #[error("Request failed")]
    Transport(#[from] reqwest::Error),

    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },

    /// The request was abandoned before completion: a deadline expired or
    /// the credential prompt was cancelled.
    #[error("Request cancelled: {0}")]
    RequestCancelled(String),
}
