//! Consignment repositories.
//!
//! Implementations:
//! - `InMemoryConsignmentRepository`: append log behind one `RwLock` (default)
//! - `SqliteConsignmentRepository`: SQLite storage (`sqlite` feature)
//! - `MockConsignmentRepository`: in-memory store with failure injection for tests

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StorageConfig, StorageType};
use crate::proto::consignment::Consignment;

mod memory;
pub mod mock;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryConsignmentRepository;
pub use mock::MockConsignmentRepository;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConsignmentRepository;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised by a repository backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Write rejected: {0}")]
    Rejected(String),

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Append-only store of consignments.
///
/// Implementations must linearize `create` and `get_all`: a snapshot holds
/// either all or none of any concurrent append, and no append is lost.
/// The store assigns the consignment id and marks it stored; the caller
/// hands in an otherwise complete consignment, vessel id included.
#[async_trait]
pub trait ConsignmentRepository: Send + Sync {
    /// Append a consignment, returning it as stored.
    async fn create(&self, consignment: Consignment) -> Result<Consignment>;

    /// Snapshot of every stored consignment, in creation order.
    async fn get_all(&self) -> Result<Vec<Consignment>>;
}

/// Initialize the repository backend selected by configuration.
pub async fn init_repository(
    config: &StorageConfig,
) -> std::result::Result<Arc<dyn ConsignmentRepository>, Box<dyn std::error::Error>> {
    match config.storage_type {
        StorageType::Memory => {
            info!("Storage: in-memory");
            Ok(Arc::new(InMemoryConsignmentRepository::new()))
        }
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            let path = &config.sqlite.path;
            info!("Storage: sqlite at {}", path);

            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", path)).await?;
            let repository = SqliteConsignmentRepository::new(pool);
            repository.init().await?;

            Ok(Arc::new(repository))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => {
            tracing::error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err("SQLite feature not enabled".into())
        }
    }
}
