//! SQLite implementation of the consignment repository.

use async_trait::async_trait;
use prost::Message;
use sea_query::{Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::schema::{Consignments, CREATE_CONSIGNMENTS_TABLE};
use super::{ConsignmentRepository, Result};
use crate::proto::consignment::{Consignment, ConsignmentStatus};

/// SQLite implementation of ConsignmentRepository.
///
/// Each consignment is one prost-encoded row. The id is not stored in the
/// blob; it is the row's `seq` and is filled in on the way out.
pub struct SqliteConsignmentRepository {
    pool: SqlitePool,
}

impl SqliteConsignmentRepository {
    /// Create a new SQLite consignment repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_CONSIGNMENTS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ConsignmentRepository for SqliteConsignmentRepository {
    async fn create(&self, mut consignment: Consignment) -> Result<Consignment> {
        consignment.id.clear();
        consignment.set_status(ConsignmentStatus::Stored);
        let consignment_data = consignment.encode_to_vec();

        let (sql, values) = Query::insert()
            .into_table(Consignments::Table)
            .columns([Consignments::ConsignmentData])
            .values_panic([consignment_data.into()])
            .build_sqlx(SqliteQueryBuilder);

        // Single-row insert: the append is atomic without an explicit transaction
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        consignment.id = result.last_insert_rowid().to_string();

        debug!(
            id = %consignment.id,
            vessel_id = %consignment.vessel_id,
            "Consignment stored"
        );
        Ok(consignment)
    }

    async fn get_all(&self) -> Result<Vec<Consignment>> {
        let (sql, values) = Query::select()
            .columns([Consignments::Seq, Consignments::ConsignmentData])
            .from(Consignments::Table)
            .order_by(Consignments::Seq, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_with(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        let mut consignments = Vec::with_capacity(rows.len());
        for row in rows {
            let seq: i64 = row.get("seq");
            let consignment_data: Vec<u8> = row.get("consignment_data");
            let mut consignment = Consignment::decode(consignment_data.as_slice())?;
            consignment.id = seq.to_string();
            consignments.push(consignment);
        }

        Ok(consignments)
    }
}
