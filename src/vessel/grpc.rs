//! gRPC vessel locator.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tonic::transport::Channel;
use tonic::{Code, Request, Status};
use tracing::{debug, warn};

use super::{LookupError, VesselLocator};
use crate::proto::vessel::vessel_service_client::VesselServiceClient;
use crate::proto::vessel::{Specification, Vessel};

/// Vessel locator backed by the vessel service's `FindAvailable` RPC.
///
/// Each call carries a `grpc-timeout` and is also bounded locally, so a
/// stalled connection surfaces as [`LookupError::Timeout`]. The bound is the
/// configured timeout, shortened to whatever remains of the caller's deadline.
#[derive(Clone)]
pub struct GrpcVesselLocator {
    client: VesselServiceClient<Channel>,
    timeout: Duration,
}

impl GrpcVesselLocator {
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Self {
            client: VesselServiceClient::new(channel),
            timeout,
        }
    }

    /// Time allowed for one call: the configured timeout, capped by `deadline`.
    fn call_timeout(&self, deadline: Option<Instant>) -> Duration {
        match deadline {
            Some(deadline) => self
                .timeout
                .min(deadline.saturating_duration_since(Instant::now())),
            None => self.timeout,
        }
    }
}

#[async_trait]
impl VesselLocator for GrpcVesselLocator {
    async fn find_available(
        &self,
        specification: Specification,
        deadline: Option<Instant>,
    ) -> Result<Vessel, LookupError> {
        let timeout = self.call_timeout(deadline);
        if timeout.is_zero() {
            return Err(LookupError::Timeout);
        }

        let mut client = self.client.clone();
        let mut request = Request::new(specification);
        request.set_timeout(timeout);
        let started = Instant::now();

        let response = match tokio::time::timeout(timeout, client.find_available(request)).await {
            Ok(Ok(response)) => response.into_inner(),
            Ok(Err(status)) => {
                // The peer enforces the same deadline and reports expiry as Cancelled
                let expired = started.elapsed() >= timeout;
                let error = if status.code() == Code::Cancelled && expired {
                    LookupError::Timeout
                } else {
                    classify_status(&status)
                };
                warn!(code = ?status.code(), message = %status.message(), "FindAvailable failed");
                return Err(error);
            }
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "FindAvailable timed out");
                return Err(LookupError::Timeout);
            }
        };

        match response.vessel {
            Some(vessel) if !vessel.id.is_empty() => {
                debug!(vessel_id = %vessel.id, "FindAvailable returned vessel");
                Ok(vessel)
            }
            _ => Err(LookupError::NotFound(
                "vessel service returned no assignable vessel".to_string(),
            )),
        }
    }
}

/// Map a remote status onto the lookup taxonomy.
///
/// Only codes that state a business answer become `NotFound`; anything else
/// leaves the outcome unknown.
fn classify_status(status: &Status) -> LookupError {
    match status.code() {
        Code::NotFound | Code::FailedPrecondition | Code::ResourceExhausted => {
            LookupError::NotFound(status.message().to_string())
        }
        Code::DeadlineExceeded => LookupError::Timeout,
        code => LookupError::Unavailable(format!("{:?}: {}", code, status.message())),
    }
}
