//! gRPC adapter for the shipping service.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::info;

use super::ConsignmentOrchestrator;
use crate::context::RequestContext;
use crate::proto::consignment::shipping_service_server::ShippingService;
use crate::proto::consignment::{Consignment, GetRequest, Response as ShippingResponse};
use crate::transport::handler_timeout;

/// Serves `ShippingService` by delegating to the orchestrator.
///
/// The inbound `grpc-timeout`, less a small headroom, becomes the request
/// deadline, so an expired caller deadline is answered with
/// `DEADLINE_EXCEEDED` rather than tonic's own `CANCELLED`. A client that
/// disconnects makes tonic drop the handler future, which abandons the
/// lookup before anything is stored.
pub struct ShippingServiceImpl {
    orchestrator: Arc<ConsignmentOrchestrator>,
}

impl ShippingServiceImpl {
    pub fn new(orchestrator: Arc<ConsignmentOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

#[tonic::async_trait]
impl ShippingService for ShippingServiceImpl {
    async fn create_consignment(
        &self,
        request: Request<Consignment>,
    ) -> Result<Response<ShippingResponse>, Status> {
        let mut ctx = RequestContext::background();
        if let Some(timeout) = handler_timeout(request.metadata()) {
            ctx = ctx.with_timeout(timeout);
        }

        let consignment = request.into_inner();
        info!(
            weight = consignment.weight,
            containers = consignment.containers.len(),
            "CreateConsignment"
        );

        let response = self
            .orchestrator
            .create_consignment(&ctx, consignment)
            .await?;
        Ok(Response::new(response))
    }

    async fn get_consignments(
        &self,
        request: Request<GetRequest>,
    ) -> Result<Response<ShippingResponse>, Status> {
        let response = self
            .orchestrator
            .get_consignments(request.into_inner())
            .await?;
        info!(count = response.consignments.len(), "GetConsignments");
        Ok(Response::new(response))
    }
}
