//! Shared application state.
//!
//! Holds the database handle and the authentication service. Domain
//! services are built per request from cheap clones of the handle.

use std::sync::Arc;

use cracare_auth::{AuthConfig, AuthService};
use cracare_care::{
    MedicationService, PatientService, ScheduleService, StaffService, SupplyRequestService,
    TreatmentService, VisitService,
};
use cracare_core::models::shift::ShiftTrack;
use cracare_db::repository::{
    SurrealAppointmentRepository, SurrealMedicationOrderRepository, SurrealPatientRepository,
    SurrealShiftRepository, SurrealStaffRepository, SurrealSupplyRequestRepository,
    SurrealTreatmentOrderRepository, SurrealVisitorRepository,
};
use surrealdb::{Connection, Surreal};

pub struct AppState<C: Connection> {
    db: Surreal<C>,
    auth: Arc<AuthService<SurrealStaffRepository<C>>>,
}

impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<C: Connection> AppState<C> {
    pub fn new(db: Surreal<C>, auth_config: AuthConfig) -> Self {
        let staff_repo = SurrealStaffRepository::with_pepper(db.clone(), auth_config.pepper.clone());
        Self {
            db,
            auth: Arc::new(AuthService::new(staff_repo, auth_config)),
        }
    }

    pub fn auth(&self) -> &AuthService<SurrealStaffRepository<C>> {
        &self.auth
    }

    pub fn auth_config(&self) -> &AuthConfig {
        self.auth.config()
    }

    fn staff_repo(&self) -> SurrealStaffRepository<C> {
        SurrealStaffRepository::with_pepper(self.db.clone(), self.auth_config().pepper.clone())
    }

    pub fn staff(&self) -> StaffService<SurrealStaffRepository<C>> {
        StaffService::new(self.staff_repo())
    }

    pub fn patients(&self) -> PatientService<SurrealPatientRepository<C>, SurrealStaffRepository<C>> {
        PatientService::new(SurrealPatientRepository::new(self.db.clone()), self.staff_repo())
    }

    pub fn medications(
        &self,
    ) -> MedicationService<SurrealMedicationOrderRepository<C>, SurrealPatientRepository<C>> {
        MedicationService::new(
            SurrealMedicationOrderRepository::new(self.db.clone()),
            SurrealPatientRepository::new(self.db.clone()),
        )
    }

    pub fn treatments(
        &self,
    ) -> TreatmentService<SurrealTreatmentOrderRepository<C>, SurrealPatientRepository<C>> {
        TreatmentService::new(
            SurrealTreatmentOrderRepository::new(self.db.clone()),
            SurrealPatientRepository::new(self.db.clone()),
        )
    }

    pub fn supply_requests(&self) -> SupplyRequestService<SurrealSupplyRequestRepository<C>> {
        SupplyRequestService::new(SurrealSupplyRequestRepository::new(self.db.clone()))
    }

    pub fn schedule(
        &self,
        track: ShiftTrack,
    ) -> ScheduleService<SurrealShiftRepository<C>, SurrealStaffRepository<C>> {
        ScheduleService::new(
            SurrealShiftRepository::new(self.db.clone(), track),
            self.staff_repo(),
        )
    }

    pub fn visits(
        &self,
    ) -> VisitService<
        SurrealVisitorRepository<C>,
        SurrealAppointmentRepository<C>,
        SurrealPatientRepository<C>,
    > {
        VisitService::new(
            SurrealVisitorRepository::new(self.db.clone()),
            SurrealAppointmentRepository::new(self.db.clone()),
            SurrealPatientRepository::new(self.db.clone()),
        )
    }
}
