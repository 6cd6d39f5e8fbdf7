/// Error types shared by the guest store and the HTTP backend.
///
/// These represent failures of the persistence layer. Request-level errors
/// (authorization, validation) live in the backend crate and wrap `CommonError`
/// via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("guest store io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("guest store json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("guest store entry {index} is invalid: {reason}")]
    InvalidEntry { index: usize, reason: String },
}
