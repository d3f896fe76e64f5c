//! In-memory consignment repository.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ConsignmentRepository, Result};
use crate::proto::consignment::{Consignment, ConsignmentStatus};

#[derive(Default)]
struct Log {
    last_id: u64,
    consignments: Vec<Consignment>,
}

/// Append log guarded by a single lock.
///
/// Id assignment and the append happen in one critical section, and reads
/// clone the log under the same lock, so snapshots never see half an append.
/// Ids are the decimal form of a counter starting at 1.
#[derive(Default)]
pub struct InMemoryConsignmentRepository {
    log: RwLock<Log>,
}

impl InMemoryConsignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored consignments.
    pub async fn len(&self) -> usize {
        self.log.read().await.consignments.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ConsignmentRepository for InMemoryConsignmentRepository {
    async fn create(&self, mut consignment: Consignment) -> Result<Consignment> {
        let mut log = self.log.write().await;
        log.last_id += 1;
        consignment.id = log.last_id.to_string();
        consignment.set_status(ConsignmentStatus::Stored);
        log.consignments.push(consignment.clone());

        debug!(
            id = %consignment.id,
            vessel_id = %consignment.vessel_id,
            "Consignment stored"
        );
        Ok(consignment)
    }

    async fn get_all(&self) -> Result<Vec<Consignment>> {
        Ok(self.log.read().await.consignments.clone())
    }
}
