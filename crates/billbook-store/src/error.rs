//! Error types for billbook storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The counter transaction could not commit within the retry budget.
    ///
    /// Transient: no state was written, and the whole operation is safe to
    /// retry from scratch. It does not mean any invoice number was taken.
    #[error("counter busy: transaction conflicted {attempts} times")]
    Busy {
        /// How many commit attempts were made.
        attempts: usize,
    },
}
