//! Supply request domain model.
//!
//! A team lead raises a request for a missing supply. The administrator
//! acknowledges it and marks it ready; the original requester confirms
//! physical receipt:
//!
//! `PENDIENTE -> RECIBIDA -> PEDIDO_LISTO -> COMPLETADA`

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CraError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SupplyRequestStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "RECIBIDA")]
    Received,
    #[serde(rename = "PEDIDO_LISTO")]
    Ready,
    #[serde(rename = "COMPLETADA")]
    Completed,
}

impl SupplyRequestStatus {
    pub const ALL: [SupplyRequestStatus; 4] = [
        SupplyRequestStatus::Pending,
        SupplyRequestStatus::Received,
        SupplyRequestStatus::Ready,
        SupplyRequestStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyRequestStatus::Pending => "PENDIENTE",
            SupplyRequestStatus::Received => "RECIBIDA",
            SupplyRequestStatus::Ready => "PEDIDO_LISTO",
            SupplyRequestStatus::Completed => "COMPLETADA",
        }
    }

    /// Transition an administrator may apply from this state.
    pub fn admin_next(&self) -> Option<SupplyRequestStatus> {
        match self {
            SupplyRequestStatus::Pending => Some(SupplyRequestStatus::Received),
            SupplyRequestStatus::Received => Some(SupplyRequestStatus::Ready),
            _ => None,
        }
    }
}

impl fmt::Display for SupplyRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupplyRequestStatus {
    type Err = CraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SupplyRequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CraError::validation(format!(
                    "invalid status '{s}', expected one of: PENDIENTE, RECIBIDA, PEDIDO_LISTO, COMPLETADA"
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyRequest {
    pub id: Uuid,
    /// Fixed at creation.
    pub requester_id: Uuid,
    pub description: String,
    pub status: SupplyRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupplyRequest {
    pub requester_id: Uuid,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_moves_forward_one_step() {
        assert_eq!(
            SupplyRequestStatus::Pending.admin_next(),
            Some(SupplyRequestStatus::Received)
        );
        assert_eq!(
            SupplyRequestStatus::Received.admin_next(),
            Some(SupplyRequestStatus::Ready)
        );
        assert_eq!(SupplyRequestStatus::Ready.admin_next(), None);
        assert_eq!(SupplyRequestStatus::Completed.admin_next(), None);
    }

    #[test]
    fn status_names_parse() {
        for status in SupplyRequestStatus::ALL {
            assert_eq!(status.as_str().parse::<SupplyRequestStatus>().unwrap(), status);
        }
        assert!("LISTO".parse::<SupplyRequestStatus>().is_err());
    }
}
