//! Integration tests for residents and their clinical orders.

use chrono::NaiveDate;
use cracare_care::{
    MedicationPatch, MedicationService, NewMedication, PatientService, TreatmentPatch,
    TreatmentService,
};
use cracare_core::access::Caller;
use cracare_core::error::CraError;
use cracare_core::models::patient::{CreatePatient, UpdatePatient};
use cracare_core::models::role::Role;
use cracare_core::models::staff::CreateStaff;
use cracare_core::repository::StaffRepository;
use cracare_db::repository::{
    SurrealMedicationOrderRepository, SurrealPatientRepository, SurrealStaffRepository,
    SurrealTreatmentOrderRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

struct Fixture {
    db: Surreal<Db>,
    admin: Caller,
    raa: Caller,
    other_raa: Caller,
}

impl Fixture {
    async fn new() -> Self {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        cracare_db::run_migrations(&db).await.unwrap();

        let admin = caller(&db, Role::Administrator).await;
        let raa = caller(&db, Role::AssistantLead).await;
        let other_raa = caller(&db, Role::AssistantLead).await;
        Self {
            db,
            admin,
            raa,
            other_raa,
        }
    }

    fn patients(&self) -> PatientService<SurrealPatientRepository<Db>, SurrealStaffRepository<Db>> {
        PatientService::new(
            SurrealPatientRepository::new(self.db.clone()),
            SurrealStaffRepository::new(self.db.clone()),
        )
    }

    fn medications(
        &self,
    ) -> MedicationService<SurrealMedicationOrderRepository<Db>, SurrealPatientRepository<Db>>
    {
        MedicationService::new(
            SurrealMedicationOrderRepository::new(self.db.clone()),
            SurrealPatientRepository::new(self.db.clone()),
        )
    }

    fn treatments(
        &self,
    ) -> TreatmentService<SurrealTreatmentOrderRepository<Db>, SurrealPatientRepository<Db>> {
        TreatmentService::new(
            SurrealTreatmentOrderRepository::new(self.db.clone()),
            SurrealPatientRepository::new(self.db.clone()),
        )
    }
}

async fn caller(db: &Surreal<Db>, role: Role) -> Caller {
    let staff = SurrealStaffRepository::new(db.clone())
        .create(CreateStaff {
            email: format!("{}@cracare.es", Uuid::new_v4()),
            password: "turno-de-noche".into(),
            first_name: role.as_str().into(),
            last_name: None,
            national_id: None,
            phone: None,
            role,
            supervisor_id: None,
            license_number: None,
            specialty: None,
            department: None,
        })
        .await
        .unwrap();
    Caller::new(staff.id, staff.role)
}

fn resident(first_name: &str, team_lead_id: Option<Uuid>) -> CreatePatient {
    CreatePatient {
        first_name: first_name.into(),
        last_name: None,
        national_id: None,
        birth_date: NaiveDate::from_ymd_opt(1940, 5, 17),
        admission_date: None,
        active: true,
        team_lead_id,
        allergies: Some(" ".into()),
        conditions: None,
    }
}

#[tokio::test]
async fn team_lead_lists_only_owned_residents() {
    let fx = Fixture::new().await;
    let service = fx.patients();

    let mine = service.create(&fx.raa, resident("Carmen", None)).await.unwrap();
    service
        .create(&fx.admin, resident("Dolores", Some(fx.other_raa.id)))
        .await
        .unwrap();
    service.create(&fx.admin, resident("Elena", None)).await.unwrap();

    let listed = service.list(&fx.raa).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![mine.id]);

    assert_eq!(service.list(&fx.admin).await.unwrap().len(), 3);
}

#[tokio::test]
async fn team_lead_owns_what_it_creates() {
    let fx = Fixture::new().await;
    let service = fx.patients();

    let patient = service
        .create(&fx.raa, resident("Carmen", Some(fx.other_raa.id)))
        .await
        .unwrap();

    assert_eq!(patient.team_lead_id, Some(fx.raa.id));
    assert_eq!(patient.allergies, None);
}

#[tokio::test]
async fn record_scope_applies_to_get_update_and_delete() {
    let fx = Fixture::new().await;
    let service = fx.patients();

    let patient = service
        .create(&fx.admin, resident("Dolores", Some(fx.other_raa.id)))
        .await
        .unwrap();

    let err = service.get(&fx.raa, patient.id).await.unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));

    let err = service
        .update(&fx.raa, patient.id, UpdatePatient::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));

    let err = service.delete(&fx.raa, patient.id).await.unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));

    let doctor = caller(&fx.db, Role::Doctor).await;
    assert_eq!(service.get(&doctor, patient.id).await.unwrap().id, patient.id);
    let err = service
        .update(&doctor, patient.id, UpdatePatient::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn only_the_administrator_reassigns_the_owner() {
    let fx = Fixture::new().await;
    let service = fx.patients();

    let patient = service.create(&fx.raa, resident("Carmen", None)).await.unwrap();

    let updated = service
        .update(
            &fx.raa,
            patient.id,
            UpdatePatient {
                first_name: Some(" Carmela ".into()),
                team_lead_id: Some(Some(fx.other_raa.id)),
                ..UpdatePatient::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Carmela");
    assert_eq!(updated.team_lead_id, Some(fx.raa.id));

    let moved = service
        .update(
            &fx.admin,
            patient.id,
            UpdatePatient {
                team_lead_id: Some(Some(fx.other_raa.id)),
                ..UpdatePatient::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.team_lead_id, Some(fx.other_raa.id));

    let err = service
        .update(
            &fx.admin,
            patient.id,
            UpdatePatient {
                team_lead_id: Some(Some(fx.admin.id)),
                ..UpdatePatient::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));
}

#[tokio::test]
async fn medication_administration_is_stamped_once_and_cleared() {
    let fx = Fixture::new().await;
    let patient = fx
        .patients()
        .create(&fx.admin, resident("Carmen", Some(fx.raa.id)))
        .await
        .unwrap();
    let nurse = caller(&fx.db, Role::Nurse).await;
    let other_nurse = caller(&fx.db, Role::Nurse).await;
    let service = fx.medications();

    let order = service
        .create(
            &nurse,
            patient.id,
            NewMedication {
                medication: "Paracetamol".into(),
                dose: Some("1g".into()),
                ..NewMedication::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(order.created_by, Some(nurse.id));
    assert!(!order.administration.administered);

    let given = service
        .update(
            &nurse,
            order.id,
            MedicationPatch {
                administered: Some(true),
                ..MedicationPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(given.administration.administered);
    assert_eq!(given.administration.administered_by, Some(nurse.id));
    let stamped_at = given.administration.administered_at;
    assert!(stamped_at.is_some());

    let again = service
        .update(
            &other_nurse,
            order.id,
            MedicationPatch {
                administered: Some(true),
                ..MedicationPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(again.administration.administered_by, Some(nurse.id));
    assert_eq!(again.administration.administered_at, stamped_at);

    let reverted = service
        .update(
            &other_nurse,
            order.id,
            MedicationPatch {
                administered: Some(false),
                ..MedicationPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(!reverted.administration.administered);
    assert_eq!(reverted.administration.administered_by, None);
    assert_eq!(reverted.administration.administered_at, None);
}

#[tokio::test]
async fn medication_requires_a_name_and_a_visible_resident() {
    let fx = Fixture::new().await;
    let nurse = caller(&fx.db, Role::Nurse).await;
    let service = fx.medications();

    let err = service
        .create(&nurse, Uuid::new_v4(), NewMedication::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));

    let err = service
        .create(
            &nurse,
            Uuid::new_v4(),
            NewMedication {
                medication: "Ibuprofeno".into(),
                ..NewMedication::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));

    let err = service.list(&fx.raa, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn treatments_follow_the_same_rules() {
    let fx = Fixture::new().await;
    let patient = fx
        .patients()
        .create(&fx.admin, resident("Carmen", None))
        .await
        .unwrap();
    let doctor = caller(&fx.db, Role::Doctor).await;
    let service = fx.treatments();

    let err = service.create(&doctor, patient.id, "   ").await.unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));

    let order = service
        .create(&doctor, patient.id, "Curas diarias")
        .await
        .unwrap();
    let done = service
        .update(
            &doctor,
            order.id,
            TreatmentPatch {
                administered: Some(true),
                ..TreatmentPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.administration.administered_by, Some(doctor.id));
    assert_eq!(done.description, "Curas diarias");

    assert_eq!(service.list(&doctor, patient.id).await.unwrap().len(), 1);
    service.delete(&doctor, order.id).await.unwrap();
    assert!(service.list(&doctor, patient.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_resident_removes_its_orders() {
    let fx = Fixture::new().await;
    let patients = fx.patients();
    let patient = patients
        .create(&fx.raa, resident("Carmen", None))
        .await
        .unwrap();
    let medications = fx.medications();

    let order = medications
        .create(
            &fx.admin,
            patient.id,
            NewMedication {
                medication: "Omeprazol".into(),
                ..NewMedication::default()
            },
        )
        .await
        .unwrap();

    patients.delete(&fx.raa, patient.id).await.unwrap();

    let err = patients.get(&fx.admin, patient.id).await.unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));
    let err = medications
        .update(&fx.admin, order.id, MedicationPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));
}

#[tokio::test]
async fn medication_grid_and_diary_follow_resident_ownership() {
    let fx = Fixture::new().await;
    let patients = fx.patients();
    let mine = patients
        .create(&fx.raa, resident("Carmen", None))
        .await
        .unwrap();
    let theirs = patients
        .create(&fx.admin, resident("Dolores", Some(fx.other_raa.id)))
        .await
        .unwrap();
    let nurse = caller(&fx.db, Role::Nurse).await;
    let medications = fx.medications();
    fx.treatments()
        .create(&nurse, mine.id, "Curas diarias")
        .await
        .unwrap();

    let mut orders = Vec::new();
    for (patient, name) in [
        (mine.id, "Paracetamol"),
        (mine.id, "Omeprazol"),
        (theirs.id, "Ibuprofeno"),
    ] {
        let order = medications
            .create(
                &nurse,
                patient,
                NewMedication {
                    medication: name.into(),
                    ..NewMedication::default()
                },
            )
            .await
            .unwrap();
        orders.push(order);
    }
    for order in [&orders[0], &orders[2]] {
        medications
            .update(
                &nurse,
                order.id,
                MedicationPatch {
                    administered: Some(true),
                    ..MedicationPatch::default()
                },
            )
            .await
            .unwrap();
    }

    let grid = medications.grid(&nurse).await.unwrap();
    assert_eq!(grid.len(), 3);
    assert_eq!(grid[0].order.id, orders[1].id);
    assert!(!grid[0].order.administration.administered);
    assert!(grid[1..].iter().all(|e| e.order.administration.administered));
    assert_eq!(grid[0].patient.treatments, vec!["Curas diarias".to_string()]);

    let own_grid = medications.grid(&fx.raa).await.unwrap();
    assert_eq!(own_grid.len(), 2);
    assert!(own_grid.iter().all(|e| e.patient.id == mine.id));

    let diary = medications.diary(&nurse).await.unwrap();
    assert_eq!(diary.len(), 2);
    assert!(diary.iter().all(|e| e.order.administration.administered));
    let given_by = diary[0].administering_staff.as_ref().unwrap();
    assert_eq!(given_by.id, nurse.id);
    assert_eq!(given_by.role, Role::Nurse);

    let own_diary = medications.diary(&fx.raa).await.unwrap();
    let ids: Vec<Uuid> = own_diary.iter().map(|e| e.order.id).collect();
    assert_eq!(ids, vec![orders[0].id]);

    let receptionist = caller(&fx.db, Role::Receptionist).await;
    let err = medications.grid(&receptionist).await.unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));
    let err = medications.diary(&receptionist).await.unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));
}
