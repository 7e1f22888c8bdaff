#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unsupported file extension '{extension}'")]
    UnsupportedExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Upload exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },
}
