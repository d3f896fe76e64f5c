//! Service implementations.

pub mod consignment;
pub mod shipping;

pub use consignment::ConsignmentOrchestrator;
pub use shipping::ShippingServiceImpl;
