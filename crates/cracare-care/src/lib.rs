//! Domain services for CRACare.
//!
//! Each service is generic over the repository traits in `cracare-core`
//! and takes the authenticated [`Caller`](cracare_core::access::Caller)
//! explicitly, so authorization happens here rather than in the HTTP layer.

mod input;
pub mod orders;
pub mod patients;
pub mod schedule;
pub mod staff;
pub mod supply;
pub mod visits;

pub use orders::{
    MedicationPatch, MedicationService, NewMedication, TreatmentPatch, TreatmentService,
};
pub use patients::PatientService;
pub use schedule::ScheduleService;
pub use staff::StaffService;
pub use supply::SupplyRequestService;
pub use visits::{AppointmentQuery, VisitService};
