//! SurrealDB implementation of [`PatientRepository`].

use chrono::{DateTime, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::patient::{CreatePatient, Patient, UpdatePatient};
use cracare_core::repository::PatientRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_opt_date, parse_opt_uuid, parse_uuid};
use crate::error::DbError;

const ENTITY: &str = "patient";

const SELECT_ONE: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('patient', $id)";

#[derive(Debug, SurrealValue)]
struct PatientRow {
    record_id: String,
    first_name: String,
    last_name: Option<String>,
    national_id: Option<String>,
    birth_date: Option<String>,
    admission_date: Option<String>,
    active: bool,
    team_lead_id: Option<String>,
    allergies: Option<String>,
    conditions: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PatientRow {
    fn try_into_patient(self) -> Result<Patient, DbError> {
        Ok(Patient {
            id: parse_uuid(&self.record_id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            national_id: self.national_id,
            birth_date: parse_opt_date(self.birth_date)?,
            admission_date: parse_opt_date(self.admission_date)?,
            active: self.active,
            team_lead_id: parse_opt_uuid(self.team_lead_id)?,
            allergies: self.allergies,
            conditions: self.conditions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealPatientRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPatientRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PatientRepository for SurrealPatientRepository<C> {
    async fn create(&self, input: CreatePatient) -> CraResult<Patient> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('patient', $id) SET \
                 first_name = $first_name, last_name = $last_name, \
                 national_id = $national_id, birth_date = $birth_date, \
                 admission_date = $admission_date, active = $active, \
                 team_lead_id = $team_lead_id, allergies = $allergies, \
                 conditions = $conditions; \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("national_id", input.national_id))
            .bind(("birth_date", input.birth_date.map(|d| d.to_string())))
            .bind(("admission_date", input.admission_date.map(|d| d.to_string())))
            .bind(("active", input.active))
            .bind(("team_lead_id", input.team_lead_id.map(|id| id.to_string())))
            .bind(("allergies", input.allergies))
            .bind(("conditions", input.conditions))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<PatientRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_patient()?)
    }

    async fn get_by_id(&self, id: Uuid) -> CraResult<Patient> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PatientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_patient()?)
    }

    async fn update(&self, id: Uuid, input: UpdatePatient) -> CraResult<Patient> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.first_name.is_some() {
            sets.push("first_name = $first_name");
        }
        if input.last_name.is_some() {
            sets.push("last_name = $last_name");
        }
        if input.national_id.is_some() {
            sets.push("national_id = $national_id");
        }
        if input.birth_date.is_some() {
            sets.push("birth_date = $birth_date");
        }
        if input.admission_date.is_some() {
            sets.push("admission_date = $admission_date");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        if input.team_lead_id.is_some() {
            sets.push("team_lead_id = $team_lead_id");
        }
        if input.allergies.is_some() {
            sets.push("allergies = $allergies");
        }
        if input.conditions.is_some() {
            sets.push("conditions = $conditions");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('patient', $id) SET {}; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(first_name) = input.first_name {
            builder = builder.bind(("first_name", first_name));
        }
        if let Some(last_name) = input.last_name {
            builder = builder.bind(("last_name", last_name));
        }
        if let Some(national_id) = input.national_id {
            builder = builder.bind(("national_id", national_id));
        }
        if let Some(birth_date) = input.birth_date {
            builder = builder.bind(("birth_date", birth_date.map(|d| d.to_string())));
        }
        if let Some(admission_date) = input.admission_date {
            builder = builder.bind(("admission_date", admission_date.map(|d| d.to_string())));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }
        if let Some(team_lead_id) = input.team_lead_id {
            builder = builder.bind(("team_lead_id", team_lead_id.map(|id| id.to_string())));
        }
        if let Some(allergies) = input.allergies {
            builder = builder.bind(("allergies", allergies));
        }
        if let Some(conditions) = input.conditions {
            builder = builder.bind(("conditions", conditions));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<PatientRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_patient()?)
    }

    async fn delete(&self, id: Uuid) -> CraResult<()> {
        let id_str = id.to_string();

        // Orders hang off the resident; remove them together.
        let mut result = self
            .db
            .query(
                "DELETE medication_order WHERE patient_id = $id; \
                 DELETE treatment_order WHERE patient_id = $id; \
                 DELETE appointment WHERE patient_id = $id; \
                 DELETE type::record('patient', $id) RETURN BEFORE;",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<surrealdb_types::Value> = result.take(3).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::not_found(ENTITY, id_str).into());
        }
        Ok(())
    }

    async fn list(&self, team_lead_id: Option<Uuid>) -> CraResult<Vec<Patient>> {
        let mut result = match team_lead_id {
            Some(lead) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM patient \
                     WHERE team_lead_id = $team_lead_id \
                     ORDER BY first_name ASC, last_name ASC",
                )
                .bind(("team_lead_id", lead.to_string()))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM patient \
                     ORDER BY first_name ASC, last_name ASC",
                )
                .await
                .map_err(DbError::from)?,
        };

        let rows: Vec<PatientRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(PatientRow::try_into_patient)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
