//! SurrealDB implementation of [`TreatmentOrderRepository`].

use chrono::{DateTime, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::order::{
    Administration, CreateTreatmentOrder, TreatmentOrder, UpdateTreatmentOrder,
};
use cracare_core::repository::TreatmentOrderRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_opt_uuid, parse_uuid};
use crate::error::DbError;

const ENTITY: &str = "treatment_order";

const SELECT_ONE: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('treatment_order', $id)";

#[derive(Debug, SurrealValue)]
struct TreatmentOrderRow {
    record_id: String,
    patient_id: String,
    description: String,
    created_by: Option<String>,
    administered: bool,
    administered_by: Option<String>,
    administered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TreatmentOrderRow {
    fn try_into_order(self) -> Result<TreatmentOrder, DbError> {
        Ok(TreatmentOrder {
            id: parse_uuid(&self.record_id)?,
            patient_id: parse_uuid(&self.patient_id)?,
            description: self.description,
            created_by: parse_opt_uuid(self.created_by)?,
            administration: Administration {
                administered: self.administered,
                administered_by: parse_opt_uuid(self.administered_by)?,
                administered_at: self.administered_at,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealTreatmentOrderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTreatmentOrderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TreatmentOrderRepository for SurrealTreatmentOrderRepository<C> {
    async fn create(&self, input: CreateTreatmentOrder) -> CraResult<TreatmentOrder> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('treatment_order', $id) SET \
                 patient_id = $patient_id, description = $description, \
                 created_by = $created_by, administered = false; \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("patient_id", input.patient_id.to_string()))
            .bind(("description", input.description))
            .bind(("created_by", input.created_by.map(|id| id.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<TreatmentOrderRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_order()?)
    }

    async fn get_by_id(&self, id: Uuid) -> CraResult<TreatmentOrder> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TreatmentOrderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_order()?)
    }

    async fn update(&self, id: Uuid, input: UpdateTreatmentOrder) -> CraResult<TreatmentOrder> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.administration.is_some() {
            sets.push("administered = $administered");
            sets.push("administered_by = $administered_by");
            sets.push("administered_at = $administered_at");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('treatment_order', $id) SET {}; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(administration) = input.administration {
            builder = builder
                .bind(("administered", administration.administered))
                .bind((
                    "administered_by",
                    administration.administered_by.map(|id| id.to_string()),
                ))
                .bind(("administered_at", administration.administered_at));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<TreatmentOrderRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_order()?)
    }

    async fn delete(&self, id: Uuid) -> CraResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('treatment_order', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<surrealdb_types::Value> = result.take(0).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::not_found(ENTITY, id_str).into());
        }
        Ok(())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> CraResult<Vec<TreatmentOrder>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM treatment_order \
                 WHERE patient_id = $patient_id ORDER BY created_at DESC",
            )
            .bind(("patient_id", patient_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TreatmentOrderRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(TreatmentOrderRow::try_into_order)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
