use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserveError {
    #[error("cannot observe a {kind} value; only objects and arrays are observable")]
    NotObservable { kind: &'static str },
    #[error("invalid observe options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
