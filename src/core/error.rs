use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcarError {
    /// Requested an operation that has no meaning in a headless auto-resolve.
    /// Rejected explicitly so integration bugs are not silently masked.
    #[error("operation not supported in auto-resolve mode: {0}")]
    UnsupportedInAutoResolve(&'static str),

    /// The phase loop ran past the defensive round cap without a decision.
    #[error("battle undecided after {rounds} rounds, aborting resolution")]
    RoundLimitExceeded { rounds: u32 },
}

pub type Result<T> = std::result::Result<T, AcarError>;
