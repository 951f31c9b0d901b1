//! Staff member domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    /// Team lead this member reports to. Only set for `ENFERMERA` (a `RAS`)
    /// and `OSS` (a `RAA`).
    pub supervisor_id: Option<Uuid>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub department: Option<String>,
    pub active: bool,
    pub hired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaffMember {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaff {
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub supervisor_id: Option<Uuid>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub department: Option<String>,
}

/// Partial update. For optional columns `Some(None)` clears the value.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateStaff {
    pub first_name: Option<String>,
    pub last_name: Option<Option<String>>,
    pub national_id: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub role: Option<Role>,
    pub supervisor_id: Option<Option<Uuid>>,
    pub license_number: Option<Option<String>>,
    pub specialty: Option<Option<String>>,
    pub department: Option<Option<String>>,
    pub active: Option<bool>,
    /// Raw password; re-hashed before storage.
    pub password: Option<String>,
}
