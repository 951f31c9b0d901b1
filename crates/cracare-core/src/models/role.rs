//! Staff role model.
//!
//! Roles form a fixed hierarchy:
//! - `ADMINISTRADOR`: facility administration
//! - `MEDICO`, `RAS`, `RAA`: clinical and team leadership
//! - `ENFERMERA`, `OSS`, `FISIOTERAPEUTA`, `RECEPCIONISTA`: operational staff
//!
//! `RAS` leads the nursing team (`ENFERMERA`), `RAA` leads the operational
//! assistants (`OSS`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CraError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "ADMINISTRADOR")]
    Administrator,
    #[serde(rename = "MEDICO")]
    Doctor,
    #[serde(rename = "RAS")]
    NursingLead,
    #[serde(rename = "ENFERMERA")]
    Nurse,
    #[serde(rename = "RAA")]
    AssistantLead,
    #[serde(rename = "OSS")]
    CareAssistant,
    #[serde(rename = "FISIOTERAPEUTA")]
    Physiotherapist,
    #[serde(rename = "RECEPCIONISTA")]
    Receptionist,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Administrator,
        Role::Doctor,
        Role::NursingLead,
        Role::Nurse,
        Role::AssistantLead,
        Role::CareAssistant,
        Role::Physiotherapist,
        Role::Receptionist,
    ];

    /// Wire and storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "ADMINISTRADOR",
            Role::Doctor => "MEDICO",
            Role::NursingLead => "RAS",
            Role::Nurse => "ENFERMERA",
            Role::AssistantLead => "RAA",
            Role::CareAssistant => "OSS",
            Role::Physiotherapist => "FISIOTERAPEUTA",
            Role::Receptionist => "RECEPCIONISTA",
        }
    }

    /// The team-lead role this role reports to, if any.
    pub fn reports_to(&self) -> Option<Role> {
        match self {
            Role::Nurse => Some(Role::NursingLead),
            Role::CareAssistant => Some(Role::AssistantLead),
            _ => None,
        }
    }

    pub fn is_team_lead(&self) -> bool {
        matches!(self, Role::NursingLead | Role::AssistantLead)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
                CraError::validation(format!(
                    "invalid role '{s}', expected one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_name_roundtrips() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn serde_uses_storage_name() {
        let json = serde_json::to_string(&Role::AssistantLead).unwrap();
        assert_eq!(json, "\"RAA\"");
        let role: Role = serde_json::from_str("\"ENFERMERA\"").unwrap();
        assert_eq!(role, Role::Nurse);
    }

    #[test]
    fn only_nurses_and_assistants_report_to_a_lead() {
        assert_eq!(Role::Nurse.reports_to(), Some(Role::NursingLead));
        assert_eq!(Role::CareAssistant.reports_to(), Some(Role::AssistantLead));
        assert_eq!(Role::Doctor.reports_to(), None);
        assert_eq!(Role::Receptionist.reports_to(), None);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("SUPERVISOR".parse::<Role>().is_err());
    }
}
