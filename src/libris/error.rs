use thiserror::Error;

/// Every failure the core can signal. All of these are non-fatal: the caller
/// (normally the CLI) reports them and resumes. Nothing in the library
/// terminates the process.
#[derive(Error, Debug)]
pub enum LibrisError {
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Authentication failed for user: {0}")]
    AuthFailed(String),

    #[error("Item already borrowed: {0}")]
    AlreadyBorrowed(String),

    #[error("Borrow limit exceeded: {user_id} may hold at most {limit} items")]
    BorrowLimitExceeded { user_id: String, limit: usize },

    #[error("No active borrow of {item_id} by {user_id}")]
    NoActiveBorrow { user_id: String, item_id: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LibrisError>;
