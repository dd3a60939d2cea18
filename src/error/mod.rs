mod hirelink;

pub use hirelink::{ApiErrorBody, ApiErrorObject, ConstraintKind, HirelinkError};

/// Whether an error stems from a transient condition.
///
/// Informational only: the storage layer never retries on its own, and the
/// pool is responsible for evicting broken connections.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
