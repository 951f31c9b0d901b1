//! Integration tests for the staff repository using in-memory SurrealDB.

use cracare_core::error::CraError;
use cracare_core::models::role::Role;
use cracare_core::models::staff::{CreateStaff, UpdateStaff};
use cracare_core::repository::StaffRepository;
use cracare_db::repository::SurrealStaffRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> SurrealStaffRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    cracare_db::run_migrations(&db).await.unwrap();
    SurrealStaffRepository::new(db)
}

fn staff(email: &str, first_name: &str, role: Role, supervisor_id: Option<Uuid>) -> CreateStaff {
    CreateStaff {
        email: email.into(),
        password: "correct-horse".into(),
        first_name: first_name.into(),
        last_name: None,
        national_id: None,
        phone: None,
        role,
        supervisor_id,
        license_number: None,
        specialty: None,
        department: None,
    }
}

#[tokio::test]
async fn create_and_get_staff() {
    let repo = setup().await;

    let created = repo
        .create(staff("  Ana@Example.COM ", "Ana", Role::Administrator, None))
        .await
        .unwrap();

    assert_eq!(created.email, "ana@example.com");
    assert!(created.active);
    assert!(created.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.role, Role::Administrator);

    let by_email = repo.get_by_email("ANA@example.com").await.unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let repo = setup().await;

    repo.create(staff("dup@example.com", "Uno", Role::Doctor, None))
        .await
        .unwrap();
    let err = repo
        .create(staff("DUP@example.com", "Dos", Role::Nurse, None))
        .await
        .unwrap_err();

    assert!(matches!(err, CraError::AlreadyExists { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_staff_is_not_found() {
    let repo = setup().await;

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));

    let err = repo.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));
}

#[tokio::test]
async fn partial_update_sets_and_clears_fields() {
    let repo = setup().await;
    let mut input = staff("eva@example.com", "Eva", Role::Doctor, None);
    input.phone = Some("600000000".into());
    let created = repo.create(input).await.unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateStaff {
                first_name: Some("Eva María".into()),
                phone: Some(None),
                specialty: Some(Some("Geriatría".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Eva María");
    assert_eq!(updated.phone, None);
    assert_eq!(updated.specialty.as_deref(), Some("Geriatría"));
    assert_eq!(updated.email, "eva@example.com");
    assert_eq!(updated.password_hash, created.password_hash);
}

#[tokio::test]
async fn password_update_rehashes() {
    let repo = setup().await;
    let created = repo
        .create(staff("pw@example.com", "Pw", Role::Receptionist, None))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateStaff {
                password: Some("another-secret".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_ne!(updated.password_hash, created.password_hash);
}

#[tokio::test]
async fn deactivate_is_a_soft_delete() {
    let repo = setup().await;
    let created = repo
        .create(staff("gone@example.com", "Gone", Role::Physiotherapist, None))
        .await
        .unwrap();

    repo.deactivate(created.id).await.unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert!(!fetched.active);
    assert_eq!(repo.count().await.unwrap(), 1);

    let err = repo.deactivate(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CraError::NotFound { .. }));
}

#[tokio::test]
async fn subordinates_are_active_members_of_the_role_ordered_by_name() {
    let repo = setup().await;
    let lead = repo
        .create(staff("raa@example.com", "Lead", Role::AssistantLead, None))
        .await
        .unwrap();
    let other_lead = repo
        .create(staff("raa2@example.com", "Other", Role::AssistantLead, None))
        .await
        .unwrap();

    repo.create(staff("b@example.com", "Berta", Role::CareAssistant, Some(lead.id)))
        .await
        .unwrap();
    repo.create(staff("a@example.com", "Alba", Role::CareAssistant, Some(lead.id)))
        .await
        .unwrap();
    let inactive = repo
        .create(staff("c@example.com", "Carla", Role::CareAssistant, Some(lead.id)))
        .await
        .unwrap();
    repo.deactivate(inactive.id).await.unwrap();
    repo.create(staff("d@example.com", "Dora", Role::CareAssistant, Some(other_lead.id)))
        .await
        .unwrap();

    let team = repo
        .list_subordinates(lead.id, Role::CareAssistant)
        .await
        .unwrap();
    let names: Vec<_> = team.iter().map(|s| s.first_name.as_str()).collect();
    assert_eq!(names, ["Alba", "Berta"]);

    let nurses = repo.list_subordinates(lead.id, Role::Nurse).await.unwrap();
    assert!(nurses.is_empty());
}

#[tokio::test]
async fn list_orders_by_first_name() {
    let repo = setup().await;
    for (email, name) in [("z@x.es", "Zoe"), ("m@x.es", "Marta"), ("a@x.es", "Andrés")] {
        repo.create(staff(email, name, Role::Doctor, None))
            .await
            .unwrap();
    }

    let names: Vec<_> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.first_name)
        .collect();
    assert_eq!(names, ["Andrés", "Marta", "Zoe"]);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[tokio::test]
async fn count_starts_at_zero_and_includes_inactive_staff() {
    let repo = setup().await;
    assert_eq!(repo.count().await.unwrap(), 0);

    let first = repo
        .create(staff("uno@example.com", "Uno", Role::Doctor, None))
        .await
        .unwrap();
    repo.create(staff("dos@example.com", "Dos", Role::Nurse, None))
        .await
        .unwrap();
    repo.deactivate(first.id).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
}
