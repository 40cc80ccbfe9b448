use thiserror::Error;

/// Fatal document-level failures, surfaced to the caller.
///
/// Everything below this level (a failed remote verification, an
/// unparseable metadata field) is recovered inside the signal builders
/// and never aborts a request.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Empty document")]
    EmptyDocument,

    #[error("Corrupt document: {0}")]
    Corrupt(String),
}

/// Why a single remote verification attempt was abandoned.
///
/// A cascade failure is terminal for the attempt — no retries — and the
/// caller substitutes the local fallback outcome instead. It is logged at
/// debug level and never surfaced in a response.
#[derive(Debug, Error)]
pub enum CascadeFailure {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Response carried an error field: {0}")]
    ApiError(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Failure of an AI-content analyzer backend.
///
/// The full-detection path degrades to an "unavailable" signal on this
/// error rather than propagating it into the aggregate.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analyzer error: {0}")]
    Backend(String),
}
