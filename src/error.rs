//! Error taxonomy for consignment operations.

use tonic::{Code, Status};

use crate::repository::StorageError;
use crate::vessel::LookupError;

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors returned by the consignment orchestrator.
///
/// Every variant except [`ServiceError::Storage`] guarantees that nothing was
/// persisted, so the caller can retry safely.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed request, rejected before any remote call.
    #[error("invalid consignment: {0}")]
    Validation(String),

    /// The vessel lookup did not produce an assignable vessel.
    #[error("vessel lookup failed: {0}")]
    VesselLookup(#[from] LookupError),

    /// The repository rejected the write.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The caller withdrew the request before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl ServiceError {
    /// True when the failure happened before any write was attempted.
    pub fn is_side_effect_free(&self) -> bool {
        !matches!(self, ServiceError::Storage(_))
    }

    /// gRPC status code for this error.
    pub fn code(&self) -> Code {
        match self {
            ServiceError::Validation(_) => Code::InvalidArgument,
            ServiceError::VesselLookup(LookupError::NotFound(_)) => Code::NotFound,
            ServiceError::VesselLookup(LookupError::Unavailable(_)) => Code::Unavailable,
            ServiceError::VesselLookup(LookupError::Timeout) => Code::DeadlineExceeded,
            ServiceError::Storage(_) => Code::Internal,
            ServiceError::Cancelled => Code::Cancelled,
        }
    }
}

impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        Status::new(error.code(), error.to_string())
    }
}
