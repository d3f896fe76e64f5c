//! Consignment orchestration.
//!
//! A creation attempt moves through
//! `Received -> Validated -> VesselRequested -> {VesselAssigned | LookupFailed}
//! -> {Stored | StorageFailed}`. Only `Stored` leaves anything behind.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::context::RequestContext;
use crate::error::{Result, ServiceError};
use crate::proto::consignment::{Consignment, ConsignmentStatus, GetRequest, Response};
use crate::proto::vessel::Specification;
use crate::repository::ConsignmentRepository;
use crate::vessel::{LookupError, VesselLocator};

/// Sequences the vessel lookup with persistence.
///
/// Holds no mutable state of its own; all shared state lives in the
/// repository, so one instance serves any number of concurrent callers.
pub struct ConsignmentOrchestrator {
    repository: Arc<dyn ConsignmentRepository>,
    vessels: Arc<dyn VesselLocator>,
}

impl ConsignmentOrchestrator {
    pub fn new(repository: Arc<dyn ConsignmentRepository>, vessels: Arc<dyn VesselLocator>) -> Self {
        Self {
            repository,
            vessels,
        }
    }

    /// Assign a vessel to `consignment` and store it.
    ///
    /// Nothing is persisted unless the lookup returns a vessel with a
    /// non-empty id. Lookup failures are returned unchanged and never
    /// retried here.
    pub async fn create_consignment(
        &self,
        ctx: &RequestContext,
        mut consignment: Consignment,
    ) -> Result<Response> {
        consignment.set_status(ConsignmentStatus::Pending);
        validate(&consignment)?;

        let specification = specification_for(&consignment)?;
        info!(
            max_weight = specification.max_weight,
            capacity = specification.capacity,
            "Requesting vessel"
        );

        let vessel = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                warn!("Caller cancelled during vessel lookup");
                return Err(ServiceError::Cancelled);
            }
            _ = ctx.expired() => {
                warn!("Request deadline passed during vessel lookup");
                return Err(LookupError::Timeout.into());
            }
            result = self.vessels.find_available(specification, ctx.deadline()) => {
                result.map_err(|e| {
                    warn!(error = %e, definitive = e.is_definitive(), "Vessel lookup failed");
                    e
                })?
            }
        };

        if vessel.id.is_empty() {
            warn!(vessel_name = %vessel.name, "Vessel lookup returned a vessel without id");
            return Err(LookupError::NotFound("vessel has no id".to_string()).into());
        }

        info!(vessel_id = %vessel.id, vessel_name = %vessel.name, "Found vessel");
        consignment.vessel_id = vessel.id;
        consignment.set_status(ConsignmentStatus::Assigned);

        if ctx.is_cancelled() {
            warn!(vessel_id = %consignment.vessel_id, "Caller cancelled before persistence");
            return Err(ServiceError::Cancelled);
        }

        let stored = self.repository.create(consignment).await.map_err(|e| {
            error!(error = %e, "Failed to store consignment");
            ServiceError::Storage(e)
        })?;

        info!(id = %stored.id, vessel_id = %stored.vessel_id, "Consignment created");
        Ok(Response {
            created: true,
            consignment: Some(stored),
            consignments: vec![],
        })
    }

    /// List every stored consignment. Read-only.
    pub async fn get_consignments(&self, _request: GetRequest) -> Result<Response> {
        let consignments = self.repository.get_all().await.map_err(|e| {
            error!(error = %e, "Failed to list consignments");
            ServiceError::Storage(e)
        })?;

        Ok(Response {
            created: false,
            consignment: None,
            consignments,
        })
    }
}

fn validate(consignment: &Consignment) -> Result<()> {
    if consignment.weight <= 0 {
        return Err(ServiceError::Validation(format!(
            "weight must be positive, got {}",
            consignment.weight
        )));
    }
    if consignment.containers.is_empty() {
        return Err(ServiceError::Validation(
            "at least one container is required".to_string(),
        ));
    }
    Ok(())
}

/// Vessel requirements for a consignment: its weight and container count.
pub fn specification_for(consignment: &Consignment) -> Result<Specification> {
    let capacity = i32::try_from(consignment.containers.len()).map_err(|_| {
        ServiceError::Validation(format!(
            "too many containers: {}",
            consignment.containers.len()
        ))
    })?;

    Ok(Specification {
        max_weight: consignment.weight,
        capacity,
    })
}
