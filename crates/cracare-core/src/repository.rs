//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Services depend on these traits
//! only, so the storage engine is injected at construction time.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CraResult;
use crate::models::{
    order::{
        CreateMedicationOrder, CreateTreatmentOrder, MedicationEntry, MedicationOrder,
        TreatmentOrder, UpdateMedicationOrder, UpdateTreatmentOrder,
    },
    patient::{CreatePatient, Patient, UpdatePatient},
    role::Role,
    shift::{ShiftAssignment, ShiftSlot, ShiftTrack},
    staff::{CreateStaff, StaffMember, UpdateStaff},
    supply_request::{CreateSupplyRequest, SupplyRequest, SupplyRequestStatus},
    visit::{
        Appointment, AppointmentFilter, CreateAppointment, CreateVisitor, UpdateAppointment,
        UpdateVisitor, Visitor,
    },
};

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

pub trait StaffRepository: Send + Sync {
    fn create(&self, input: CreateStaff) -> impl Future<Output = CraResult<StaffMember>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CraResult<StaffMember>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CraResult<StaffMember>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateStaff,
    ) -> impl Future<Output = CraResult<StaffMember>> + Send;
    /// Soft-delete: sets `active` to false. Staff records are never removed.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = CraResult<()>> + Send;
    /// All staff, ordered by first name.
    fn list(&self) -> impl Future<Output = CraResult<Vec<StaffMember>>> + Send;
    /// Active staff of `role` reporting to `supervisor_id`, ordered by name.
    fn list_subordinates(
        &self,
        supervisor_id: Uuid,
        role: Role,
    ) -> impl Future<Output = CraResult<Vec<StaffMember>>> + Send;
    fn count(&self) -> impl Future<Output = CraResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Residents
// ---------------------------------------------------------------------------

pub trait PatientRepository: Send + Sync {
    fn create(&self, input: CreatePatient) -> impl Future<Output = CraResult<Patient>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CraResult<Patient>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdatePatient,
    ) -> impl Future<Output = CraResult<Patient>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CraResult<()>> + Send;
    /// Patients ordered by first name, optionally restricted to one owning
    /// team lead.
    fn list(
        &self,
        team_lead_id: Option<Uuid>,
    ) -> impl Future<Output = CraResult<Vec<Patient>>> + Send;
}

// ---------------------------------------------------------------------------
// Shift assignments
// ---------------------------------------------------------------------------

/// Storage for one shift track, keyed by `(supervisor_id, date, slot)`.
pub trait ShiftRepository: Send + Sync {
    fn track(&self) -> ShiftTrack;

    /// Create or overwrite the row for the key.
    fn upsert(
        &self,
        supervisor_id: Uuid,
        date: NaiveDate,
        slot: ShiftSlot,
        staff_id: Uuid,
    ) -> impl Future<Output = CraResult<ShiftAssignment>> + Send;

    /// Delete the row for the key. Returns whether a row existed.
    fn remove(
        &self,
        supervisor_id: Uuid,
        date: NaiveDate,
        slot: ShiftSlot,
    ) -> impl Future<Output = CraResult<bool>> + Send;

    /// Rows of one supervisor with `first <= date <= last`.
    fn list_by_supervisor(
        &self,
        supervisor_id: Uuid,
        first: NaiveDate,
        last: NaiveDate,
    ) -> impl Future<Output = CraResult<Vec<ShiftAssignment>>> + Send;

    /// Rows assigned to one staff member with `first <= date <= last`.
    fn list_by_staff(
        &self,
        staff_id: Uuid,
        first: NaiveDate,
        last: NaiveDate,
    ) -> impl Future<Output = CraResult<Vec<ShiftAssignment>>> + Send;
}

// ---------------------------------------------------------------------------
// Clinical orders
// ---------------------------------------------------------------------------

pub trait MedicationOrderRepository: Send + Sync {
    fn create(
        &self,
        input: CreateMedicationOrder,
    ) -> impl Future<Output = CraResult<MedicationOrder>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CraResult<MedicationOrder>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateMedicationOrder,
    ) -> impl Future<Output = CraResult<MedicationOrder>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CraResult<()>> + Send;
    /// Orders of one resident, newest first.
    fn list_by_patient(
        &self,
        patient_id: Uuid,
    ) -> impl Future<Output = CraResult<Vec<MedicationOrder>>> + Send;
    /// Every order, pending first and then newest first, with each resident's
    /// treatments. `team_lead_id` restricts the result to residents it owns.
    fn list_grid(
        &self,
        team_lead_id: Option<Uuid>,
    ) -> impl Future<Output = CraResult<Vec<MedicationEntry>>> + Send;
    /// Administered orders, most recently administered first.
    fn list_administered(
        &self,
        team_lead_id: Option<Uuid>,
        limit: u64,
    ) -> impl Future<Output = CraResult<Vec<MedicationEntry>>> + Send;
}

pub trait TreatmentOrderRepository: Send + Sync {
    fn create(
        &self,
        input: CreateTreatmentOrder,
    ) -> impl Future<Output = CraResult<TreatmentOrder>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CraResult<TreatmentOrder>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTreatmentOrder,
    ) -> impl Future<Output = CraResult<TreatmentOrder>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CraResult<()>> + Send;
    /// Orders of one resident, newest first.
    fn list_by_patient(
        &self,
        patient_id: Uuid,
    ) -> impl Future<Output = CraResult<Vec<TreatmentOrder>>> + Send;
}

// ---------------------------------------------------------------------------
// Supply requests
// ---------------------------------------------------------------------------

pub trait SupplyRequestRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSupplyRequest,
    ) -> impl Future<Output = CraResult<SupplyRequest>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CraResult<SupplyRequest>> + Send;
    fn set_status(
        &self,
        id: Uuid,
        status: SupplyRequestStatus,
    ) -> impl Future<Output = CraResult<SupplyRequest>> + Send;
    /// Requests newest first, optionally restricted to one requester.
    fn list(
        &self,
        requester_id: Option<Uuid>,
    ) -> impl Future<Output = CraResult<Vec<SupplyRequest>>> + Send;
}

// ---------------------------------------------------------------------------
// Visitors & appointments
// ---------------------------------------------------------------------------

pub trait VisitorRepository: Send + Sync {
    fn create(&self, input: CreateVisitor) -> impl Future<Output = CraResult<Visitor>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CraResult<Visitor>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateVisitor,
    ) -> impl Future<Output = CraResult<Visitor>> + Send;
    /// Case-insensitive search over name, phone and email, ordered by name.
    fn search(
        &self,
        query: Option<&str>,
        limit: u64,
    ) -> impl Future<Output = CraResult<Vec<Visitor>>> + Send;
}

pub trait AppointmentRepository: Send + Sync {
    fn create(
        &self,
        input: CreateAppointment,
    ) -> impl Future<Output = CraResult<Appointment>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CraResult<Appointment>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAppointment,
    ) -> impl Future<Output = CraResult<Appointment>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CraResult<()>> + Send;
    /// Appointments matching `filter`, earliest first.
    fn list(
        &self,
        filter: AppointmentFilter,
    ) -> impl Future<Output = CraResult<Vec<Appointment>>> + Send;
}
