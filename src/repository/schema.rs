//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Consignments table schema.
#[derive(Iden)]
pub enum Consignments {
    Table,
    #[iden = "seq"]
    Seq,
    #[iden = "consignment_data"]
    ConsignmentData,
}

/// SQL for creating the consignments table.
///
/// `seq` doubles as the consignment id and fixes the creation order.
pub const CREATE_CONSIGNMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS consignments (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    consignment_data BLOB NOT NULL
);
"#;
