//! Resident (patient) domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    pub active: bool,
    /// Owning `RAA` team lead.
    pub team_lead_id: Option<Uuid>,
    pub allergies: Option<String>,
    pub conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatient {
    pub first_name: String,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    pub active: bool,
    pub team_lead_id: Option<Uuid>,
    pub allergies: Option<String>,
    pub conditions: Option<String>,
}

/// Partial update. For optional columns `Some(None)` clears the value.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePatient {
    pub first_name: Option<String>,
    pub last_name: Option<Option<String>>,
    pub national_id: Option<Option<String>>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub admission_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
    pub team_lead_id: Option<Option<Uuid>>,
    pub allergies: Option<Option<String>>,
    pub conditions: Option<Option<String>>,
}
