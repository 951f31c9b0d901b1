//! SurrealDB implementation of [`ShiftRepository`].
//!
//! Each track lives in its own table. A row's record id is derived from
//! its key (`<supervisor>_<date>_<slot>`), so writes are plain UPSERTs and
//! two concurrent writers of the same slot resolve to last-write-wins.

use chrono::{DateTime, NaiveDate, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::shift::{ShiftAssignment, ShiftSlot, ShiftTrack};
use cracare_core::repository::ShiftRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_code, parse_date, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ShiftRow {
    supervisor_id: String,
    date: String,
    slot: String,
    staff_id: String,
    updated_at: DateTime<Utc>,
}

impl ShiftRow {
    fn try_into_assignment(self, track: ShiftTrack) -> Result<ShiftAssignment, DbError> {
        Ok(ShiftAssignment {
            track,
            supervisor_id: parse_uuid(&self.supervisor_id)?,
            date: parse_date(&self.date)?,
            slot: parse_code::<ShiftSlot>(&self.slot)?,
            staff_id: parse_uuid(&self.staff_id)?,
            updated_at: self.updated_at,
        })
    }
}

fn table(track: ShiftTrack) -> &'static str {
    match track {
        ShiftTrack::Operational => "operational_shift",
        ShiftTrack::Nursing => "nursing_shift",
    }
}

fn record_key(supervisor_id: Uuid, date: NaiveDate, slot: ShiftSlot) -> String {
    format!("{supervisor_id}_{date}_{}", slot.code())
}

#[derive(Clone)]
pub struct SurrealShiftRepository<C: Connection> {
    db: Surreal<C>,
    track: ShiftTrack,
}

impl<C: Connection> SurrealShiftRepository<C> {
    pub fn new(db: Surreal<C>, track: ShiftTrack) -> Self {
        Self { db, track }
    }

    pub fn operational(db: Surreal<C>) -> Self {
        Self::new(db, ShiftTrack::Operational)
    }

    pub fn nursing(db: Surreal<C>) -> Self {
        Self::new(db, ShiftTrack::Nursing)
    }

    async fn list_where(
        &self,
        column: &'static str,
        owner: Uuid,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<ShiftAssignment>, DbError> {
        let query = format!(
            "SELECT * FROM {} WHERE {column} = $owner \
             AND date >= $first AND date <= $last ORDER BY date ASC",
            table(self.track)
        );

        let mut result = self
            .db
            .query(query)
            .bind(("owner", owner.to_string()))
            .bind(("first", first.to_string()))
            .bind(("last", last.to_string()))
            .await?;

        let rows: Vec<ShiftRow> = result.take(0)?;
        let mut assignments = rows
            .into_iter()
            .map(|row| row.try_into_assignment(self.track))
            .collect::<Result<Vec<_>, DbError>>()?;

        let track = self.track;
        assignments.sort_by_key(|a| (a.date, track.slot_index(a.slot)));
        Ok(assignments)
    }
}

impl<C: Connection> ShiftRepository for SurrealShiftRepository<C> {
    fn track(&self) -> ShiftTrack {
        self.track
    }

    async fn upsert(
        &self,
        supervisor_id: Uuid,
        date: NaiveDate,
        slot: ShiftSlot,
        staff_id: Uuid,
    ) -> CraResult<ShiftAssignment> {
        let key = record_key(supervisor_id, date, slot);
        let query = format!(
            "UPSERT type::record('{table}', $id) SET \
             supervisor_id = $supervisor_id, date = $date, slot = $slot, \
             staff_id = $staff_id, updated_at = time::now(); \
             SELECT * FROM type::record('{table}', $id);",
            table = table(self.track)
        );

        let result = self
            .db
            .query(query)
            .bind(("id", key.clone()))
            .bind(("supervisor_id", supervisor_id.to_string()))
            .bind(("date", date.to_string()))
            .bind(("slot", slot.code().to_string()))
            .bind(("staff_id", staff_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(table(self.track), e))?;

        let rows: Vec<ShiftRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(table(self.track), &key))?;

        Ok(row.try_into_assignment(self.track)?)
    }

    async fn remove(&self, supervisor_id: Uuid, date: NaiveDate, slot: ShiftSlot) -> CraResult<bool> {
        let query = format!(
            "DELETE type::record('{}', $id) RETURN BEFORE",
            table(self.track)
        );

        let mut result = self
            .db
            .query(query)
            .bind(("id", record_key(supervisor_id, date, slot)))
            .await
            .map_err(DbError::from)?;

        let removed: Vec<surrealdb_types::Value> = result.take(0).map_err(DbError::from)?;
        Ok(!removed.is_empty())
    }

    async fn list_by_supervisor(
        &self,
        supervisor_id: Uuid,
        first: NaiveDate,
        last: NaiveDate,
    ) -> CraResult<Vec<ShiftAssignment>> {
        Ok(self
            .list_where("supervisor_id", supervisor_id, first, last)
            .await?)
    }

    async fn list_by_staff(
        &self,
        staff_id: Uuid,
        first: NaiveDate,
        last: NaiveDate,
    ) -> CraResult<Vec<ShiftAssignment>> {
        Ok(self.list_where("staff_id", staff_id, first, last).await?)
    }
}
