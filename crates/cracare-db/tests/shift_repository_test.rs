//! Integration tests for the shift repositories using in-memory SurrealDB.

use chrono::NaiveDate;
use cracare_core::models::shift::{ShiftSlot, ShiftTrack};
use cracare_core::repository::ShiftRepository;
use cracare_db::repository::SurrealShiftRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    cracare_db::run_migrations(&db).await.unwrap();
    db
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn upsert_overwrites_the_same_slot() {
    let repo = SurrealShiftRepository::operational(setup().await);
    let lead = Uuid::new_v4();
    let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
    let date = day(2024, 3, 1);

    repo.upsert(lead, date, ShiftSlot::Morning1, first)
        .await
        .unwrap();
    let row = repo
        .upsert(lead, date, ShiftSlot::Morning1, second)
        .await
        .unwrap();

    assert_eq!(row.staff_id, second);
    assert_eq!(row.track, ShiftTrack::Operational);

    let rows = repo
        .list_by_supervisor(lead, date, date)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].staff_id, second);
}

#[tokio::test]
async fn remove_reports_whether_a_row_existed() {
    let repo = SurrealShiftRepository::nursing(setup().await);
    let lead = Uuid::new_v4();
    let date = day(2024, 3, 1);

    assert!(!repo.remove(lead, date, ShiftSlot::Morning3).await.unwrap());

    repo.upsert(lead, date, ShiftSlot::Morning3, Uuid::new_v4())
        .await
        .unwrap();
    assert!(repo.remove(lead, date, ShiftSlot::Morning3).await.unwrap());
    assert!(!repo.remove(lead, date, ShiftSlot::Morning3).await.unwrap());
}

#[tokio::test]
async fn range_is_inclusive_and_sorted_by_date_then_slot() {
    let repo = SurrealShiftRepository::operational(setup().await);
    let lead = Uuid::new_v4();
    let oss = Uuid::new_v4();

    repo.upsert(lead, day(2024, 2, 29), ShiftSlot::Morning1, oss)
        .await
        .unwrap();
    repo.upsert(lead, day(2024, 3, 2), ShiftSlot::OnCall, oss)
        .await
        .unwrap();
    repo.upsert(lead, day(2024, 3, 2), ShiftSlot::Morning2, oss)
        .await
        .unwrap();
    repo.upsert(lead, day(2024, 3, 1), ShiftSlot::Afternoon1, oss)
        .await
        .unwrap();
    repo.upsert(lead, day(2024, 4, 1), ShiftSlot::Morning1, oss)
        .await
        .unwrap();

    let rows = repo
        .list_by_supervisor(lead, day(2024, 3, 1), day(2024, 3, 31))
        .await
        .unwrap();
    let keys: Vec<_> = rows.iter().map(|r| (r.date, r.slot)).collect();
    assert_eq!(
        keys,
        [
            (day(2024, 3, 1), ShiftSlot::Afternoon1),
            (day(2024, 3, 2), ShiftSlot::Morning2),
            (day(2024, 3, 2), ShiftSlot::OnCall),
        ]
    );
}

#[tokio::test]
async fn list_by_staff_spans_supervisors() {
    let repo = SurrealShiftRepository::operational(setup().await);
    let oss = Uuid::new_v4();

    repo.upsert(Uuid::new_v4(), day(2024, 3, 5), ShiftSlot::Morning1, oss)
        .await
        .unwrap();
    repo.upsert(Uuid::new_v4(), day(2024, 3, 6), ShiftSlot::Afternoon2, oss)
        .await
        .unwrap();
    repo.upsert(Uuid::new_v4(), day(2024, 3, 6), ShiftSlot::Morning1, Uuid::new_v4())
        .await
        .unwrap();

    let rows = repo
        .list_by_staff(oss, day(2024, 3, 1), day(2024, 3, 31))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.staff_id == oss));
}

#[tokio::test]
async fn tracks_are_stored_separately() {
    let db = setup().await;
    let operational = SurrealShiftRepository::operational(db.clone());
    let nursing = SurrealShiftRepository::nursing(db);
    let lead = Uuid::new_v4();
    let date = day(2024, 3, 1);

    operational
        .upsert(lead, date, ShiftSlot::Morning1, Uuid::new_v4())
        .await
        .unwrap();

    let nursing_rows = nursing
        .list_by_supervisor(lead, date, date)
        .await
        .unwrap();
    assert!(nursing_rows.is_empty());
}

#[tokio::test]
async fn last_day_of_year_9999_is_listed() {
    let repo = SurrealShiftRepository::operational(setup().await);
    let lead = Uuid::new_v4();
    let oss = Uuid::new_v4();

    repo.upsert(lead, day(9999, 12, 15), ShiftSlot::Morning1, oss)
        .await
        .unwrap();
    repo.upsert(lead, day(9999, 12, 31), ShiftSlot::OnCall, oss)
        .await
        .unwrap();

    let rows = repo
        .list_by_supervisor(lead, day(9999, 12, 1), day(9999, 12, 31))
        .await
        .unwrap();
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(9999, 12, 15), day(9999, 12, 31)]);
}
