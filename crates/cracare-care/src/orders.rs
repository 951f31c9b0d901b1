//! Medication and treatment orders.
//!
//! Both services require [`Action::ClinicalOrders`] plus visibility of the
//! order's resident. Setting `administered` stamps the caller and the
//! current time on the first transition to `true`; setting it back to
//! `false` clears the stamp.
//!
//! The cross-resident grid and diary use [`Action::MedicationOverview`];
//! an `RAA` caller only gets orders of the residents it owns.

use chrono::{DateTime, Utc};
use cracare_core::access::{Action, Caller, PatientAccess};
use cracare_core::error::CraResult;
use cracare_core::models::order::{
    CreateMedicationOrder, CreateTreatmentOrder, MedicationEntry, MedicationOrder, TreatmentOrder,
    UpdateMedicationOrder, UpdateTreatmentOrder,
};
use cracare_core::models::patient::Patient;
use cracare_core::repository::{
    MedicationOrderRepository, PatientRepository, TreatmentOrderRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::input::{nullable, optional, required, required_patch};

/// Rows returned by the administration diary.
pub const MEDICATION_DIARY_LIMIT: u64 = 300;

#[derive(Debug, Clone, Default)]
pub struct NewMedication {
    pub medication: String,
    pub dose: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct MedicationPatch {
    pub medication: Option<String>,
    pub dose: Option<Option<String>>,
    pub frequency: Option<Option<String>>,
    pub instructions: Option<Option<String>>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub administered: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct TreatmentPatch {
    pub description: Option<String>,
    pub administered: Option<bool>,
}

/// Load a resident and check the caller may see it.
async fn visible_patient<P: PatientRepository>(
    patients: &P,
    caller: &Caller,
    patient_id: Uuid,
) -> CraResult<Patient> {
    let patient = patients.get_by_id(patient_id).await?;
    PatientAccess::require_view(caller, patient.team_lead_id)?;
    Ok(patient)
}

pub struct MedicationService<O: MedicationOrderRepository, P: PatientRepository> {
    orders: O,
    patients: P,
}

impl<O: MedicationOrderRepository, P: PatientRepository> MedicationService<O, P> {
    pub fn new(orders: O, patients: P) -> Self {
        Self { orders, patients }
    }

    pub async fn list(&self, caller: &Caller, patient_id: Uuid) -> CraResult<Vec<MedicationOrder>> {
        caller.require(Action::ClinicalOrders)?;
        visible_patient(&self.patients, caller, patient_id).await?;
        self.orders.list_by_patient(patient_id).await
    }

    pub async fn create(
        &self,
        caller: &Caller,
        patient_id: Uuid,
        input: NewMedication,
    ) -> CraResult<MedicationOrder> {
        caller.require(Action::ClinicalOrders)?;
        let medication = required("medication", &input.medication)?;
        visible_patient(&self.patients, caller, patient_id).await?;

        let order = self
            .orders
            .create(CreateMedicationOrder {
                patient_id,
                medication,
                dose: optional(input.dose),
                frequency: optional(input.frequency),
                instructions: optional(input.instructions),
                scheduled_at: input.scheduled_at,
                created_by: Some(caller.id),
            })
            .await?;

        info!(order_id = %order.id, %patient_id, created_by = %caller.id, "Medication order created");
        Ok(order)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        patch: MedicationPatch,
    ) -> CraResult<MedicationOrder> {
        caller.require(Action::ClinicalOrders)?;
        let current = self.orders.get_by_id(id).await?;
        visible_patient(&self.patients, caller, current.patient_id).await?;

        let administration =
            current
                .administration
                .transition(patch.administered, caller.id, Utc::now());
        let stamped = administration.as_ref().map(|a| a.administered);

        let order = self
            .orders
            .update(
                id,
                UpdateMedicationOrder {
                    medication: required_patch("medication", patch.medication)?,
                    dose: nullable(patch.dose),
                    frequency: nullable(patch.frequency),
                    instructions: nullable(patch.instructions),
                    scheduled_at: patch.scheduled_at,
                    administration,
                },
            )
            .await?;

        info!(order_id = %order.id, updated_by = %caller.id, administered = ?stamped, "Medication order updated");
        Ok(order)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> CraResult<()> {
        caller.require(Action::ClinicalOrders)?;
        let current = self.orders.get_by_id(id).await?;
        visible_patient(&self.patients, caller, current.patient_id).await?;

        self.orders.delete(id).await?;
        info!(order_id = %id, deleted_by = %caller.id, "Medication order deleted");
        Ok(())
    }

    /// Every visible order, pending first, with resident and administering staff.
    pub async fn grid(&self, caller: &Caller) -> CraResult<Vec<MedicationEntry>> {
        caller.require(Action::MedicationOverview)?;
        let owner = PatientAccess::list_scope(caller).owner();
        self.orders.list_grid(owner).await
    }

    /// Administered orders, most recent first.
    pub async fn diary(&self, caller: &Caller) -> CraResult<Vec<MedicationEntry>> {
        caller.require(Action::MedicationOverview)?;
        let owner = PatientAccess::list_scope(caller).owner();
        self.orders
            .list_administered(owner, MEDICATION_DIARY_LIMIT)
            .await
    }
}

pub struct TreatmentService<O: TreatmentOrderRepository, P: PatientRepository> {
    orders: O,
    patients: P,
}

impl<O: TreatmentOrderRepository, P: PatientRepository> TreatmentService<O, P> {
    pub fn new(orders: O, patients: P) -> Self {
        Self { orders, patients }
    }

    pub async fn list(&self, caller: &Caller, patient_id: Uuid) -> CraResult<Vec<TreatmentOrder>> {
        caller.require(Action::ClinicalOrders)?;
        visible_patient(&self.patients, caller, patient_id).await?;
        self.orders.list_by_patient(patient_id).await
    }

    pub async fn create(
        &self,
        caller: &Caller,
        patient_id: Uuid,
        description: &str,
    ) -> CraResult<TreatmentOrder> {
        caller.require(Action::ClinicalOrders)?;
        let description = required("description", description)?;
        visible_patient(&self.patients, caller, patient_id).await?;

        let order = self
            .orders
            .create(CreateTreatmentOrder {
                patient_id,
                description,
                created_by: Some(caller.id),
            })
            .await?;

        info!(order_id = %order.id, %patient_id, created_by = %caller.id, "Treatment order created");
        Ok(order)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        patch: TreatmentPatch,
    ) -> CraResult<TreatmentOrder> {
        caller.require(Action::ClinicalOrders)?;
        let current = self.orders.get_by_id(id).await?;
        visible_patient(&self.patients, caller, current.patient_id).await?;

        let administration =
            current
                .administration
                .transition(patch.administered, caller.id, Utc::now());

        let order = self
            .orders
            .update(
                id,
                UpdateTreatmentOrder {
                    description: required_patch("description", patch.description)?,
                    administration,
                },
            )
            .await?;

        info!(order_id = %order.id, updated_by = %caller.id, "Treatment order updated");
        Ok(order)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> CraResult<()> {
        caller.require(Action::ClinicalOrders)?;
        let current = self.orders.get_by_id(id).await?;
        visible_patient(&self.patients, caller, current.patient_id).await?;

        self.orders.delete(id).await?;
        info!(order_id = %id, deleted_by = %caller.id, "Treatment order deleted");
        Ok(())
    }
}
