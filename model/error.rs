use thiserror::Error;

/// Rejections raised while building posts and queries, before anything
/// reaches a store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid location: latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate,

    #[error("invalid content: must not be empty")]
    EmptyContent,

    #[error("invalid duration: {0} (expected 1..3599 seconds)")]
    LifetimeOutOfRange(i64),

    #[error("invalid radius: {0} (expected a finite value >= 0)")]
    InvalidRadius(f64),
}
