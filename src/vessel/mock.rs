//! Mock vessel locator for testing.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{LookupError, VesselLocator};
use crate::proto::vessel::{Specification, Vessel};

/// Vessel locator with scripted outcomes.
///
/// Queued outcomes are consumed one per call; once the queue is empty every
/// call gets the default outcome. Every received specification and deadline
/// is recorded.
pub struct MockVesselLocator {
    queued: RwLock<VecDeque<Result<Vessel, LookupError>>>,
    default_outcome: RwLock<Result<Vessel, LookupError>>,
    delay: RwLock<Option<Duration>>,
    calls: RwLock<Vec<Specification>>,
    deadlines: RwLock<Vec<Option<Instant>>>,
}

impl MockVesselLocator {
    /// Always answers with `vessel`.
    pub fn returning(vessel: Vessel) -> Self {
        Self::with_default(Ok(vessel))
    }

    /// Always fails with `error`.
    pub fn failing(error: LookupError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(outcome: Result<Vessel, LookupError>) -> Self {
        Self {
            queued: RwLock::new(VecDeque::new()),
            default_outcome: RwLock::new(outcome),
            delay: RwLock::new(None),
            calls: RwLock::new(Vec::new()),
            deadlines: RwLock::new(Vec::new()),
        }
    }

    /// Queue an outcome for a single upcoming call.
    pub async fn push_outcome(&self, outcome: Result<Vessel, LookupError>) {
        self.queued.write().await.push_back(outcome);
    }

    pub async fn set_default_outcome(&self, outcome: Result<Vessel, LookupError>) {
        *self.default_outcome.write().await = outcome;
    }

    /// Make each call wait before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn calls(&self) -> Vec<Specification> {
        self.calls.read().await.clone()
    }

    pub async fn deadlines(&self) -> Vec<Option<Instant>> {
        self.deadlines.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

impl Default for MockVesselLocator {
    fn default() -> Self {
        Self::failing(LookupError::NotFound("no vessels registered".to_string()))
    }
}

/// A vessel with the given id and generous limits.
pub fn vessel(id: &str, name: &str) -> Vessel {
    Vessel {
        id: id.to_string(),
        name: name.to_string(),
        capacity: 500,
        max_weight: 200_000,
        available: true,
        owner_id: "shippy".to_string(),
    }
}

#[async_trait]
impl VesselLocator for MockVesselLocator {
    async fn find_available(
        &self,
        specification: Specification,
        deadline: Option<Instant>,
    ) -> Result<Vessel, LookupError> {
        self.calls.write().await.push(specification);
        self.deadlines.write().await.push(deadline);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(outcome) = self.queued.write().await.pop_front() {
            return outcome;
        }
        self.default_outcome.read().await.clone()
    }
}
