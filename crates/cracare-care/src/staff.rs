//! Staff administration.

use cracare_core::access::{Action, Caller};
use cracare_core::error::{CraError, CraResult};
use cracare_core::models::role::Role;
use cracare_core::models::staff::{CreateStaff, StaffMember, UpdateStaff};
use cracare_core::repository::StaffRepository;
use tracing::info;
use uuid::Uuid;

use crate::input::{nullable, optional, required, required_patch};

pub struct StaffService<S: StaffRepository> {
    repo: S,
}

impl<S: StaffRepository> StaffService<S> {
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    pub async fn list(&self, caller: &Caller) -> CraResult<Vec<StaffMember>> {
        caller.require(Action::StaffManage)?;
        self.repo.list().await
    }

    pub async fn get(&self, caller: &Caller, id: Uuid) -> CraResult<StaffMember> {
        caller.require(Action::StaffManage)?;
        self.repo.get_by_id(id).await
    }

    /// Register a staff member. The email must be unused; the supervisor,
    /// when the role has one, must be an active lead of the matching role.
    pub async fn create(&self, caller: &Caller, input: CreateStaff) -> CraResult<StaffMember> {
        caller.require(Action::StaffManage)?;

        if input.password.trim().is_empty() {
            return Err(CraError::validation("password is required"));
        }

        let supervisor_id = match input.supervisor_id {
            Some(id) => self.check_supervisor(input.role, id).await?,
            None => None,
        };

        let staff = self
            .repo
            .create(CreateStaff {
                email: required("email", &input.email)?,
                password: input.password,
                first_name: required("first_name", &input.first_name)?,
                last_name: optional(input.last_name),
                national_id: optional(input.national_id),
                phone: optional(input.phone),
                role: input.role,
                supervisor_id,
                license_number: optional(input.license_number),
                specialty: optional(input.specialty),
                department: optional(input.department),
            })
            .await?;

        info!(staff_id = %staff.id, role = %staff.role, created_by = %caller.id, "Staff member created");
        Ok(staff)
    }

    /// Partial update. A role change re-applies the supervisor rules: the
    /// supervisor is dropped unless a valid one for the new role is given.
    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        input: UpdateStaff,
    ) -> CraResult<StaffMember> {
        caller.require(Action::StaffManage)?;

        if id == caller.id && input.active == Some(false) {
            return Err(CraError::validation("you cannot deactivate your own account"));
        }

        let current = self.repo.get_by_id(id).await?;
        let role = input.role.unwrap_or(current.role);

        let supervisor_id = match input.supervisor_id {
            Some(Some(lead)) => Some(self.check_supervisor(role, lead).await?),
            Some(None) => Some(None),
            None if role != current.role && current.supervisor_id.is_some() => Some(None),
            None => None,
        };

        let password = match input.password {
            Some(p) if p.trim().is_empty() => {
                return Err(CraError::validation("password must not be blank"));
            }
            other => other,
        };

        let staff = self
            .repo
            .update(
                id,
                UpdateStaff {
                    first_name: required_patch("first_name", input.first_name)?,
                    last_name: nullable(input.last_name),
                    national_id: nullable(input.national_id),
                    phone: nullable(input.phone),
                    role: input.role,
                    supervisor_id,
                    license_number: nullable(input.license_number),
                    specialty: nullable(input.specialty),
                    department: nullable(input.department),
                    active: input.active,
                    password,
                },
            )
            .await?;

        info!(staff_id = %staff.id, updated_by = %caller.id, "Staff member updated");
        Ok(staff)
    }

    /// Soft-delete. Callers cannot deactivate themselves.
    pub async fn deactivate(&self, caller: &Caller, id: Uuid) -> CraResult<()> {
        caller.require(Action::StaffManage)?;

        if id == caller.id {
            return Err(CraError::validation("you cannot deactivate your own account"));
        }

        self.repo.deactivate(id).await?;
        info!(staff_id = %id, deactivated_by = %caller.id, "Staff member deactivated");
        Ok(())
    }

    /// Resolve the supervisor to store for a member of `role`.
    ///
    /// Roles without a lead never store one. Otherwise `lead_id` must name
    /// an active staff member holding the lead role.
    async fn check_supervisor(&self, role: Role, lead_id: Uuid) -> CraResult<Option<Uuid>> {
        let Some(lead_role) = role.reports_to() else {
            return Ok(None);
        };

        let lead = match self.repo.get_by_id(lead_id).await {
            Ok(lead) => lead,
            Err(CraError::NotFound { .. }) => {
                return Err(CraError::validation(format!(
                    "supervisor {lead_id} does not exist"
                )));
            }
            Err(e) => return Err(e),
        };

        if lead.role != lead_role || !lead.active {
            return Err(CraError::validation(format!(
                "supervisor of a {role} must be an active {lead_role}"
            )));
        }

        Ok(Some(lead.id))
    }
}
