//! Role-based access rules.
//!
//! Two layers:
//! - [`authorize`]: a static `Action -> allowed roles` table. Anything not
//!   listed is denied.
//! - [`PatientAccess`]: record-level rules for residents, based on the
//!   caller's role, the caller's id and the record's owning team lead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CraError, CraResult};
use crate::models::role::Role;
use crate::models::shift::ShiftTrack;

/// An authenticated staff member performing a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Fail with `AuthorizationDenied` unless the matrix allows `action`.
    pub fn require(&self, action: Action) -> CraResult<()> {
        if authorize(self.role, action) {
            Ok(())
        } else {
            Err(CraError::denied(format!(
                "role {} may not perform {action:?}",
                self.role
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    StaffManage,
    PatientRead,
    PatientWrite,
    ClinicalOrders,
    MedicationOverview,
    SupplyRequestList,
    SupplyRequestRaise,
    SupplyRequestAdvance,
    SupplyRequestComplete,
    OperationalSchedule,
    OperationalMine,
    NursingSchedule,
    NursingMine,
    Visits,
}

impl Action {
    /// Calendar-editing action of a shift track.
    pub fn schedule(track: ShiftTrack) -> Action {
        match track {
            ShiftTrack::Operational => Action::OperationalSchedule,
            ShiftTrack::Nursing => Action::NursingSchedule,
        }
    }

    /// Own-calendar action of a shift track.
    pub fn mine(track: ShiftTrack) -> Action {
        match track {
            ShiftTrack::Operational => Action::OperationalMine,
            ShiftTrack::Nursing => Action::NursingMine,
        }
    }
}

use Role::*;

const ANY_ROLE: &[Role] = &Role::ALL;
const TEAM_LEADS: &[Role] = &[AssistantLead, NursingLead];

static MATRIX: &[(Action, &[Role])] = &[
    (Action::StaffManage, &[Administrator]),
    (Action::PatientRead, ANY_ROLE),
    (Action::PatientWrite, &[Administrator, AssistantLead]),
    (
        Action::ClinicalOrders,
        &[Administrator, NursingLead, Doctor, Nurse],
    ),
    (
        Action::MedicationOverview,
        &[Administrator, NursingLead, Doctor, Nurse, AssistantLead],
    ),
    (
        Action::SupplyRequestList,
        &[Administrator, AssistantLead, NursingLead],
    ),
    (Action::SupplyRequestRaise, TEAM_LEADS),
    (Action::SupplyRequestAdvance, &[Administrator]),
    (Action::SupplyRequestComplete, TEAM_LEADS),
    (Action::OperationalSchedule, &[AssistantLead]),
    (Action::OperationalMine, &[CareAssistant]),
    (Action::NursingSchedule, &[NursingLead]),
    (Action::NursingMine, &[Nurse]),
    (Action::Visits, &[Receptionist]),
];

/// Whether `role` may perform `action`. Fails closed.
pub fn authorize(role: Role, action: Action) -> bool {
    MATRIX
        .iter()
        .find(|(a, _)| *a == action)
        .is_some_and(|(_, roles)| roles.contains(&role))
}

/// Listing scope for residents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientScope {
    All,
    OwnedBy(Uuid),
}

impl PatientScope {
    pub fn owner(&self) -> Option<Uuid> {
        match self {
            PatientScope::All => None,
            PatientScope::OwnedBy(id) => Some(*id),
        }
    }
}

/// Record-level access to residents.
pub struct PatientAccess;

impl PatientAccess {
    /// `RAA` sees only the residents it owns; every other role lists all.
    pub fn list_scope(caller: &Caller) -> PatientScope {
        match caller.role {
            AssistantLead => PatientScope::OwnedBy(caller.id),
            _ => PatientScope::All,
        }
    }

    pub fn can_view(caller: &Caller, owner_id: Option<Uuid>) -> bool {
        match caller.role {
            Administrator | NursingLead | Doctor | Nurse => true,
            AssistantLead => owner_id == Some(caller.id),
            _ => false,
        }
    }

    pub fn can_edit(caller: &Caller, owner_id: Option<Uuid>) -> bool {
        match caller.role {
            Administrator => true,
            AssistantLead => owner_id == Some(caller.id),
            _ => false,
        }
    }

    pub fn require_view(caller: &Caller, owner_id: Option<Uuid>) -> CraResult<()> {
        if Self::can_view(caller, owner_id) {
            Ok(())
        } else {
            Err(CraError::denied("resident is outside the caller's scope"))
        }
    }

    pub fn require_edit(caller: &Caller, owner_id: Option<Uuid>) -> CraResult<()> {
        if Self::can_edit(caller, owner_id) {
            Ok(())
        } else {
            Err(CraError::denied("caller may not modify this resident"))
        }
    }
}
