//! Clinical orders attached to a resident: medications and treatments.
//!
//! Both carry an "administered" flag. The administering staff member and
//! timestamp are stamped once on the false -> true transition and cleared
//! when the flag goes back to false.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// Administration state of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Administration {
    pub administered: bool,
    pub administered_by: Option<Uuid>,
    pub administered_at: Option<DateTime<Utc>>,
}

impl Administration {
    /// Resolve a requested flag against the current state.
    ///
    /// Returns the new state to persist, or `None` when nothing changes
    /// (no request, or `true` requested on an already administered order).
    pub fn transition(
        &self,
        requested: Option<bool>,
        caller_id: Uuid,
        now: DateTime<Utc>,
    ) -> Option<Administration> {
        match requested {
            Some(true) if !self.administered => Some(Administration {
                administered: true,
                administered_by: Some(caller_id),
                administered_at: Some(now),
            }),
            Some(false) => Some(Administration::default()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationOrder {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medication: String,
    pub dose: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    #[serde(flatten)]
    pub administration: Administration,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicationOrder {
    pub patient_id: Uuid,
    pub medication: String,
    pub dose: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateMedicationOrder {
    pub medication: Option<String>,
    pub dose: Option<Option<String>>,
    pub frequency: Option<Option<String>>,
    pub instructions: Option<Option<String>>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub administration: Option<Administration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentOrder {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub description: String,
    pub created_by: Option<Uuid>,
    #[serde(flatten)]
    pub administration: Administration,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTreatmentOrder {
    pub patient_id: Uuid,
    pub description: String,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTreatmentOrder {
    pub description: Option<String>,
    pub administration: Option<Administration>,
}

/// Resident shown next to an order in the facility-wide medication views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResidentSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Treatment descriptions; only filled by the medication grid.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub treatments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub role: Role,
}

/// A medication order with its resident and administering staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationEntry {
    #[serde(flatten)]
    pub order: MedicationOrder,
    pub patient: ResidentSummary,
    pub administering_staff: Option<StaffSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_administration_stamps_caller_and_time() {
        let caller = Uuid::new_v4();
        let now = Utc::now();
        let next = Administration::default()
            .transition(Some(true), caller, now)
            .unwrap();
        assert!(next.administered);
        assert_eq!(next.administered_by, Some(caller));
        assert_eq!(next.administered_at, Some(now));
    }

    #[test]
    fn repeated_administration_keeps_original_stamp() {
        let current = Administration {
            administered: true,
            administered_by: Some(Uuid::new_v4()),
            administered_at: Some(Utc::now()),
        };
        assert!(current
            .transition(Some(true), Uuid::new_v4(), Utc::now())
            .is_none());
    }

    #[test]
    fn reversal_clears_stamp() {
        let current = Administration {
            administered: true,
            administered_by: Some(Uuid::new_v4()),
            administered_at: Some(Utc::now()),
        };
        let next = current
            .transition(Some(false), Uuid::new_v4(), Utc::now())
            .unwrap();
        assert_eq!(next, Administration::default());
    }

    #[test]
    fn absent_flag_changes_nothing() {
        assert!(Administration::default()
            .transition(None, Uuid::new_v4(), Utc::now())
            .is_none());
    }
}
