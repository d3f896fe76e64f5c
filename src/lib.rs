//! Shippy consignment service.
//!
//! Accepts consignments, asks the vessel service for a vessel able to carry
//! each one, and stores the assigned consignment. Also lists everything
//! stored so far.

pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod repository;
pub mod services;
pub mod transport;
pub mod utils;
pub mod vessel;

pub mod proto {
    pub mod consignment {
        tonic::include_proto!("shippy.consignment");
    }

    pub mod vessel {
        tonic::include_proto!("shippy.vessel");
    }
}
