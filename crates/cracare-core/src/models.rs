//! Domain models for CRACare.
//!
//! These are the core types shared across all crates.

pub mod order;
pub mod patient;
pub mod role;
pub mod shift;
pub mod staff;
pub mod supply_request;
pub mod visit;
