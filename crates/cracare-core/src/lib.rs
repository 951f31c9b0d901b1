//! Core domain types for CRACare: models, errors, repository traits and the
//! role-based access rules shared by every other crate.

pub mod access;
pub mod error;
pub mod models;
pub mod repository;
