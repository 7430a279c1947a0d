use thiserror::Error;

/// Errors that can arise while loading a snapshot from upstream.
///
/// None of these reach query callers: a failed load leaves the previous
/// index in service.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading a snapshot file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure.
    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Built without the `http` feature.
    #[error("http sources require the `http` feature")]
    HttpDisabled,

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Body was not valid JSON.
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    /// Body parsed but carried no `regions` / `schedules` scheme.
    #[error("snapshot scheme not found in payload")]
    MissingScheme,

    /// HTML page without an embedded `__NEXT_DATA__` script.
    #[error("__NEXT_DATA__ script not found in page")]
    NextDataNotFound,
}
