//! Vessel lookup across the remote vessel-domain boundary.
//!
//! Implementations:
//! - `GrpcVesselLocator`: calls the vessel service's `FindAvailable` over gRPC
//! - `MockVesselLocator`: scripted outcomes for tests

use async_trait::async_trait;
use tokio::time::Instant;

use crate::proto::vessel::{Specification, Vessel};

mod grpc;
pub mod mock;

pub use grpc::GrpcVesselLocator;
pub use mock::MockVesselLocator;

/// Why a vessel lookup produced no vessel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No vessel satisfies the specification. A business outcome.
    #[error("no available vessel: {0}")]
    NotFound(String),

    /// The vessel service could not be reached or failed. Outcome unknown.
    #[error("vessel service unavailable: {0}")]
    Unavailable(String),

    /// The lookup did not finish in time. Outcome unknown.
    #[error("vessel lookup timed out")]
    Timeout,
}

impl LookupError {
    /// True only for `NotFound`; transport faults say nothing about the fleet.
    pub fn is_definitive(&self) -> bool {
        matches!(self, LookupError::NotFound(_))
    }
}

/// Finds a vessel able to carry a consignment.
///
/// Selection criteria belong to the vessel domain. Implementations block on a
/// remote call and may fail for transport reasons independent of the answer.
/// `deadline` is when the caller stops waiting; remote calls should not be
/// given longer than that.
#[async_trait]
pub trait VesselLocator: Send + Sync {
    async fn find_available(
        &self,
        specification: Specification,
        deadline: Option<Instant>,
    ) -> Result<Vessel, LookupError>;
}
