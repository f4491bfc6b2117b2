/// Failures of the item ordering and hierarchy operations.
///
/// Every variant is terminal for the call that produced it; nothing in the
/// item core retries.
#[derive(thiserror::Error, Debug)]
pub enum ItemError {
    #[error("{0}")]
    NotAuthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store operation failed")]
    Store(#[source] anyhow::Error),
}

impl From<anyhow::Error> for ItemError {
    fn from(err: anyhow::Error) -> Self {
        ItemError::Store(err)
    }
}
