//! SurrealDB repository implementations.

mod appointment;
mod medication;
mod patient;
mod shift;
mod staff;
mod supply_request;
mod treatment;
mod visitor;

pub use appointment::SurrealAppointmentRepository;
pub use medication::SurrealMedicationOrderRepository;
pub use patient::SurrealPatientRepository;
pub use shift::SurrealShiftRepository;
pub use staff::{SurrealStaffRepository, hash_password};
pub use supply_request::SurrealSupplyRequestRepository;
pub use treatment::SurrealTreatmentOrderRepository;
pub use visitor::SurrealVisitorRepository;

use chrono::NaiveDate;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid UUID '{value}': {e}")))
}

fn parse_opt_uuid(value: Option<String>) -> Result<Option<Uuid>, DbError> {
    value.as_deref().map(parse_uuid).transpose()
}

fn parse_date(value: &str) -> Result<NaiveDate, DbError> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| DbError::Decode(format!("invalid date '{value}': {e}")))
}

fn parse_opt_date(value: Option<String>) -> Result<Option<NaiveDate>, DbError> {
    value.as_deref().map(parse_date).transpose()
}

fn parse_code<T>(value: &str) -> Result<T, DbError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| DbError::Decode(e.to_string()))
}
