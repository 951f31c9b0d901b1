//! Integration tests for supply requests and the reception desk.

use chrono::{Duration, Utc};
use cracare_care::{AppointmentQuery, SupplyRequestService, VisitService};
use cracare_core::access::Caller;
use cracare_core::error::CraError;
use cracare_core::models::patient::CreatePatient;
use cracare_core::models::role::Role;
use cracare_core::models::supply_request::SupplyRequestStatus;
use cracare_core::models::visit::{
    AppointmentStatus, CreateAppointment, CreateVisitor, UpdateAppointment,
};
use cracare_core::repository::PatientRepository;
use cracare_db::repository::{
    SurrealAppointmentRepository, SurrealPatientRepository, SurrealSupplyRequestRepository,
    SurrealVisitorRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    cracare_db::run_migrations(&db).await.unwrap();
    db
}

fn caller(role: Role) -> Caller {
    Caller::new(Uuid::new_v4(), role)
}

fn visit_service(
    db: &Surreal<Db>,
) -> VisitService<
    SurrealVisitorRepository<Db>,
    SurrealAppointmentRepository<Db>,
    SurrealPatientRepository<Db>,
> {
    VisitService::new(
        SurrealVisitorRepository::new(db.clone()),
        SurrealAppointmentRepository::new(db.clone()),
        SurrealPatientRepository::new(db.clone()),
    )
}

fn visitor(first_name: &str, phone: Option<&str>) -> CreateVisitor {
    CreateVisitor {
        first_name: first_name.into(),
        last_name: Some("García".into()),
        phone: phone.map(Into::into),
        email: None,
        relationship: Some("hija".into()),
        document: None,
    }
}

#[tokio::test]
async fn supply_request_full_workflow() {
    let service = SupplyRequestService::new(SurrealSupplyRequestRepository::new(setup().await));
    let admin = caller(Role::Administrator);
    let requester = caller(Role::AssistantLead);
    let other_lead = caller(Role::NursingLead);

    let request = service.raise(&requester, " Guantes talla M ").await.unwrap();
    assert_eq!(request.status, SupplyRequestStatus::Pending);
    assert_eq!(request.description, "Guantes talla M");

    let err = service.complete(&requester, request.id).await.unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));

    let received = service
        .advance(&admin, request.id, SupplyRequestStatus::Received)
        .await
        .unwrap();
    assert_eq!(received.status, SupplyRequestStatus::Received);

    let ready = service
        .advance(&admin, request.id, SupplyRequestStatus::Ready)
        .await
        .unwrap();
    assert_eq!(ready.status, SupplyRequestStatus::Ready);

    let err = service.complete(&other_lead, request.id).await.unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));

    let done = service.complete(&requester, request.id).await.unwrap();
    assert_eq!(done.status, SupplyRequestStatus::Completed);
}

#[tokio::test]
async fn administrator_cannot_skip_or_repeat_steps() {
    let service = SupplyRequestService::new(SurrealSupplyRequestRepository::new(setup().await));
    let admin = caller(Role::Administrator);
    let lead = caller(Role::NursingLead);

    let request = service.raise(&lead, "Jeringas").await.unwrap();

    let err = service
        .advance(&admin, request.id, SupplyRequestStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));

    let err = service
        .advance(&admin, request.id, SupplyRequestStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));

    service
        .advance(&admin, request.id, SupplyRequestStatus::Received)
        .await
        .unwrap();
    let err = service
        .advance(&admin, request.id, SupplyRequestStatus::Received)
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));

    let err = service
        .advance(&lead, request.id, SupplyRequestStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn leads_list_their_own_requests() {
    let service = SupplyRequestService::new(SurrealSupplyRequestRepository::new(setup().await));
    let admin = caller(Role::Administrator);
    let raa = caller(Role::AssistantLead);
    let ras = caller(Role::NursingLead);

    service.raise(&raa, "Pañales").await.unwrap();
    service.raise(&ras, "Gasas").await.unwrap();

    let own = service.list(&raa).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].requester_id, raa.id);
    assert_eq!(service.list(&admin).await.unwrap().len(), 2);

    let err = service.raise(&admin, "Sábanas").await.unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));
    let err = service.raise(&raa, "  ").await.unwrap_err();
    assert!(matches!(err, CraError::Validation { .. }));
}

#[tokio::test]
async fn visitor_search_is_case_insensitive() {
    let db = setup().await;
    let service = visit_service(&db);
    let desk = caller(Role::Receptionist);

    service
        .create_visitor(&desk, visitor("Lucía", Some("600111222")))
        .await
        .unwrap();
    service
        .create_visitor(&desk, visitor("Pedro", None))
        .await
        .unwrap();

    let found = service.search_visitors(&desk, Some("LUC")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Lucía");

    let by_phone = service.search_visitors(&desk, Some("0111")).await.unwrap();
    assert_eq!(by_phone.len(), 1);

    assert_eq!(service.search_visitors(&desk, Some("  ")).await.unwrap().len(), 2);

    let err = service
        .search_visitors(&caller(Role::Nurse), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn appointments_require_existing_resident_and_visitor() {
    let db = setup().await;
    let service = visit_service(&db);
    let desk = caller(Role::Receptionist);

    let patient = SurrealPatientRepository::new(db.clone())
        .create(CreatePatient {
            first_name: "Carmen".into(),
            last_name: None,
            national_id: None,
            birth_date: None,
            admission_date: None,
            active: true,
            team_lead_id: None,
            allergies: None,
            conditions: None,
        })
        .await
        .unwrap();
    let guest = service
        .create_visitor(&desk, visitor("Lucía", None))
        .await
        .unwrap();

    let err = service
        .create_appointment(
            &desk,
            CreateAppointment {
                patient_id: Uuid::new_v4(),
                visitor_id: guest.id,
                scheduled_at: Utc::now() + Duration::days(1),
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));

    let err = service
        .create_appointment(
            &desk,
            CreateAppointment {
                patient_id: patient.id,
                visitor_id: Uuid::new_v4(),
                scheduled_at: Utc::now() + Duration::days(1),
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));

    let tomorrow = service
        .create_appointment(
            &desk,
            CreateAppointment {
                patient_id: patient.id,
                visitor_id: guest.id,
                scheduled_at: Utc::now() + Duration::days(1),
                notes: Some("  ".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(tomorrow.status, AppointmentStatus::Scheduled);
    assert_eq!(tomorrow.notes, None);

    let next_week = service
        .create_appointment(
            &desk,
            CreateAppointment {
                patient_id: patient.id,
                visitor_id: guest.id,
                scheduled_at: Utc::now() + Duration::days(7),
                notes: None,
            },
        )
        .await
        .unwrap();

    service
        .update_appointment(
            &desk,
            next_week.id,
            UpdateAppointment {
                status: Some(AppointmentStatus::Cancelled),
                ..UpdateAppointment::default()
            },
        )
        .await
        .unwrap();

    let upcoming = service.upcoming(&desk).await.unwrap();
    let ids: Vec<Uuid> = upcoming.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![tomorrow.id]);

    let all = service
        .list_appointments(
            &desk,
            AppointmentQuery {
                patient_id: Some(patient.id),
                ..AppointmentQuery::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, tomorrow.id);

    let cancelled = service
        .list_appointments(
            &desk,
            AppointmentQuery {
                status: Some(AppointmentStatus::Cancelled),
                ..AppointmentQuery::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);

    service.delete_appointment(&desk, tomorrow.id).await.unwrap();
    let err = service
        .get_appointment(&desk, tomorrow.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));
}
