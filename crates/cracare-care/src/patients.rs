//! Residents, filtered by the caller's record-level scope.

use cracare_core::access::{Action, Caller, PatientAccess};
use cracare_core::error::{CraError, CraResult};
use cracare_core::models::patient::{CreatePatient, Patient, UpdatePatient};
use cracare_core::models::role::Role;
use cracare_core::repository::{PatientRepository, StaffRepository};
use tracing::info;
use uuid::Uuid;

use crate::input::{nullable, optional, required, required_patch};

pub struct PatientService<P: PatientRepository, S: StaffRepository> {
    patients: P,
    staff: S,
}

impl<P: PatientRepository, S: StaffRepository> PatientService<P, S> {
    pub fn new(patients: P, staff: S) -> Self {
        Self { patients, staff }
    }

    pub async fn list(&self, caller: &Caller) -> CraResult<Vec<Patient>> {
        caller.require(Action::PatientRead)?;
        let scope = PatientAccess::list_scope(caller);
        self.patients.list(scope.owner()).await
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> CraResult<Patient> {
        caller.require(Action::PatientRead)?;
        let patient = self.patients.get_by_id(id).await?;
        PatientAccess::require_view(caller, patient.team_lead_id)?;
        Ok(patient)
    }

    /// Admit a resident. An `RAA` always becomes the owner of what it
    /// creates; an administrator may name any active `RAA`.
    pub async fn create(&self, caller: &Caller, input: CreatePatient) -> CraResult<Patient> {
        caller.require(Action::PatientWrite)?;

        let team_lead_id = match caller.role {
            Role::AssistantLead => Some(caller.id),
            _ => match input.team_lead_id {
                Some(id) => Some(self.check_team_lead(id).await?),
                None => None,
            },
        };
        PatientAccess::require_edit(caller, team_lead_id)?;

        let patient = self
            .patients
            .create(CreatePatient {
                first_name: required("first_name", &input.first_name)?,
                last_name: optional(input.last_name),
                national_id: optional(input.national_id),
                birth_date: input.birth_date,
                admission_date: input.admission_date,
                active: input.active,
                team_lead_id,
                allergies: optional(input.allergies),
                conditions: optional(input.conditions),
            })
            .await?;

        info!(patient_id = %patient.id, created_by = %caller.id, "Resident created");
        Ok(patient)
    }

    /// Partial update. Only an administrator can reassign the owner; the
    /// field is ignored for anyone else.
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        input: UpdatePatient,
    ) -> CraResult<Patient> {
        caller.require(Action::PatientWrite)?;
        let current = self.patients.get_by_id(id).await?;
        PatientAccess::require_edit(caller, current.team_lead_id)?;

        let team_lead_id = match (caller.role, input.team_lead_id) {
            (Role::Administrator, Some(Some(lead))) => Some(Some(self.check_team_lead(lead).await?)),
            (Role::Administrator, Some(None)) => Some(None),
            _ => None,
        };

        let patient = self
            .patients
            .update(
                id,
                UpdatePatient {
                    first_name: required_patch("first_name", input.first_name)?,
                    last_name: nullable(input.last_name),
                    national_id: nullable(input.national_id),
                    birth_date: input.birth_date,
                    admission_date: input.admission_date,
                    active: input.active,
                    team_lead_id,
                    allergies: nullable(input.allergies),
                    conditions: nullable(input.conditions),
                },
            )
            .await?;

        info!(patient_id = %patient.id, updated_by = %caller.id, "Resident updated");
        Ok(patient)
    }

    /// Remove a resident together with its orders and appointments.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> CraResult<()> {
        caller.require(Action::PatientWrite)?;
        let current = self.patients.get_by_id(id).await?;
        PatientAccess::require_edit(caller, current.team_lead_id)?;

        self.patients.delete(id).await?;
        info!(patient_id = %id, deleted_by = %caller.id, "Resident deleted");
        Ok(())
    }

    async fn check_team_lead(&self, id: Uuid) -> CraResult<Uuid> {
        let lead = match self.staff.get_by_id(id).await {
            Ok(lead) => lead,
            Err(CraError::NotFound { .. }) => {
                return Err(CraError::validation(format!("team lead {id} does not exist")));
            }
            Err(e) => return Err(e),
        };
        if lead.role != Role::AssistantLead || !lead.active {
            return Err(CraError::validation("team lead must be an active RAA"));
        }
        Ok(lead.id)
    }
}
