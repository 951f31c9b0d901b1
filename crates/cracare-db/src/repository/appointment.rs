//! SurrealDB implementation of [`AppointmentRepository`].

use chrono::{DateTime, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::visit::{
    Appointment, AppointmentFilter, AppointmentStatus, CreateAppointment, UpdateAppointment,
};
use cracare_core::repository::AppointmentRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_code, parse_uuid};
use crate::error::DbError;

const ENTITY: &str = "appointment";

const SELECT_ONE: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('appointment', $id)";

#[derive(Debug, SurrealValue)]
struct AppointmentRow {
    record_id: String,
    patient_id: String,
    visitor_id: String,
    scheduled_at: DateTime<Utc>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn try_into_appointment(self) -> Result<Appointment, DbError> {
        Ok(Appointment {
            id: parse_uuid(&self.record_id)?,
            patient_id: parse_uuid(&self.patient_id)?,
            visitor_id: parse_uuid(&self.visitor_id)?,
            scheduled_at: self.scheduled_at,
            status: parse_code::<AppointmentStatus>(&self.status)?,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealAppointmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAppointmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AppointmentRepository for SurrealAppointmentRepository<C> {
    async fn create(&self, input: CreateAppointment) -> CraResult<Appointment> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('appointment', $id) SET \
                 patient_id = $patient_id, visitor_id = $visitor_id, \
                 scheduled_at = $scheduled_at, status = $status, \
                 notes = $notes; \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("patient_id", input.patient_id.to_string()))
            .bind(("visitor_id", input.visitor_id.to_string()))
            .bind(("scheduled_at", input.scheduled_at))
            .bind(("status", AppointmentStatus::Scheduled.as_str().to_string()))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<AppointmentRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_appointment()?)
    }

    async fn get_by_id(&self, id: Uuid) -> CraResult<Appointment> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_appointment()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAppointment) -> CraResult<Appointment> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.scheduled_at.is_some() {
            sets.push("scheduled_at = $scheduled_at");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('appointment', $id) SET {}; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(scheduled_at) = input.scheduled_at {
            builder = builder.bind(("scheduled_at", scheduled_at));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(notes) = input.notes {
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<AppointmentRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_appointment()?)
    }

    async fn delete(&self, id: Uuid) -> CraResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('appointment', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<surrealdb_types::Value> = result.take(0).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::not_found(ENTITY, id_str).into());
        }
        Ok(())
    }

    async fn list(&self, filter: AppointmentFilter) -> CraResult<Vec<Appointment>> {
        let mut conditions = Vec::new();
        if filter.patient_id.is_some() {
            conditions.push("patient_id = $patient_id");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.from.is_some() {
            conditions.push("scheduled_at >= $from");
        }
        if filter.until.is_some() {
            conditions.push("scheduled_at <= $until");
        }

        let mut query = String::from("SELECT meta::id(id) AS record_id, * FROM appointment");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY scheduled_at ASC");
        if filter.limit > 0 {
            query.push_str(" LIMIT $limit");
        }

        let mut builder = self.db.query(query).bind(("limit", filter.limit));

        if let Some(patient_id) = filter.patient_id {
            builder = builder.bind(("patient_id", patient_id.to_string()));
        }
        if let Some(status) = filter.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(from) = filter.from {
            builder = builder.bind(("from", from));
        }
        if let Some(until) = filter.until {
            builder = builder.bind(("until", until));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(AppointmentRow::try_into_appointment)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
