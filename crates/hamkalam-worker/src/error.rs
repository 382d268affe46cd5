use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to fetch asset '{asset}': {reason}")]
    AssetFetch { asset: String, reason: String },

    #[error("Failed to show notification: {0}")]
    Presenter(String),

    #[error("Window client error: {0}")]
    Windows(String),
}
