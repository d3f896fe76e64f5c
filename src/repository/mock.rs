//! Mock consignment repository for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ConsignmentRepository, InMemoryConsignmentRepository, Result, StorageError};
use crate::proto::consignment::Consignment;

/// In-memory repository that counts calls and can be told to fail.
#[derive(Default)]
pub struct MockConsignmentRepository {
    inner: InMemoryConsignmentRepository,
    fail_on_create: RwLock<bool>,
    create_calls: AtomicUsize,
}

impl MockConsignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_create(&self, fail: bool) {
        *self.fail_on_create.write().await = fail;
    }

    /// Number of `create` calls received, including failed ones.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }
}

#[async_trait]
impl ConsignmentRepository for MockConsignmentRepository {
    async fn create(&self, consignment: Consignment) -> Result<Consignment> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_on_create.read().await {
            return Err(StorageError::Rejected("mock storage failure".to_string()));
        }
        self.inner.create(consignment).await
    }

    async fn get_all(&self) -> Result<Vec<Consignment>> {
        self.inner.get_all().await
    }
}
