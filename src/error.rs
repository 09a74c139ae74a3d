use thiserror::Error;

#[derive(Error, Debug)]
pub enum KmyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Unknown payee: {0}")]
    UnknownPayee(String),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("No account name contains: {0}")]
    AccountNotFound(String),

    #[error("Account hierarchy does not reach a root from: {0}")]
    CycleOrMissingParent(String),

    #[error("Malformed numeric value: {0:?}")]
    MalformedNumeric(String),

    #[error("Invalid account type code: {0}")]
    InvalidAccountType(i64),

    #[error("Invalid reconcile flag: {0:?}")]
    InvalidReconcileFlag(String),

    #[error("Duplicate tag name: {0}")]
    DuplicateTag(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, KmyError>;
