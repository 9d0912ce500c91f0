use thiserror::Error;

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A value could not be encoded as BSON.
    #[error("BSON encoding error: {0}")]
    BsonEncoding(#[from] mongodb::bson::ser::Error),

    /// A document could not be decoded from BSON.
    #[error("BSON decoding error: {0}")]
    BsonDecoding(#[from] mongodb::bson::de::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
