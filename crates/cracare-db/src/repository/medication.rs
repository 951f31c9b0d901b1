//! SurrealDB implementation of [`MedicationOrderRepository`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::order::{
    Administration, CreateMedicationOrder, MedicationEntry, MedicationOrder, ResidentSummary,
    StaffSummary, UpdateMedicationOrder,
};
use cracare_core::models::role::Role;
use cracare_core::repository::MedicationOrderRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_code, parse_opt_uuid, parse_uuid};
use crate::error::DbError;

const ENTITY: &str = "medication_order";

const SELECT_ONE: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('medication_order', $id)";

/// Restricts orders to residents owned by `$team_lead_id`.
const OWNED_BY_LEAD: &str = "patient_id IN \
     (SELECT VALUE meta::id(id) FROM patient WHERE team_lead_id = $team_lead_id)";

#[derive(Debug, SurrealValue)]
struct MedicationOrderRow {
    record_id: String,
    patient_id: String,
    medication: String,
    dose: Option<String>,
    frequency: Option<String>,
    instructions: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    created_by: Option<String>,
    administered: bool,
    administered_by: Option<String>,
    administered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MedicationOrderRow {
    fn try_into_order(self) -> Result<MedicationOrder, DbError> {
        Ok(MedicationOrder {
            id: parse_uuid(&self.record_id)?,
            patient_id: parse_uuid(&self.patient_id)?,
            medication: self.medication,
            dose: self.dose,
            frequency: self.frequency,
            instructions: self.instructions,
            scheduled_at: self.scheduled_at,
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

#[derive(Debug, SurrealValue)]
struct ResidentRow {
    record_id: String,
    first_name: String,
    last_name: Option<String>,
}

#[derive(Debug, SurrealValue)]
struct StaffSummaryRow {
    record_id: String,
    first_name: String,
    last_name: Option<String>,
    role: String,
}

#[derive(Debug, SurrealValue)]
struct TreatmentLine {
    patient_id: String,
    description: String,
}

#[derive(Clone)]
pub struct SurrealMedicationOrderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMedicationOrderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn select_orders(
        &self,
        mut conditions: Vec<&'static str>,
        order_by: &str,
        team_lead_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<MedicationOrder>, DbError> {
        if team_lead_id.is_some() {
            conditions.push(OWNED_BY_LEAD);
        }

        let mut query =
            String::from("SELECT meta::id(id) AS record_id, * FROM medication_order");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY ");
        query.push_str(order_by);
        if limit.is_some() {
            query.push_str(" LIMIT $limit");
        }

        let mut result = self
            .db
            .query(query)
            .bind(("team_lead_id", team_lead_id.map(|id| id.to_string())))
            .bind(("limit", limit.unwrap_or(0)))
            .await?;

        let rows: Vec<MedicationOrderRow> = result.take(0)?;
        rows.into_iter()
            .map(MedicationOrderRow::try_into_order)
            .collect()
    }

    /// Attach resident and administering staff summaries to each order.
    async fn attach(
        &self,
        orders: Vec<MedicationOrder>,
        with_treatments: bool,
    ) -> Result<Vec<MedicationEntry>, DbError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let mut patient_ids: Vec<String> =
            orders.iter().map(|o| o.patient_id.to_string()).collect();
        patient_ids.sort();
        patient_ids.dedup();
        let mut staff_ids: Vec<String> = orders
            .iter()
            .filter_map(|o| o.administration.administered_by)
            .map(|id| id.to_string())
            .collect();
        staff_ids.sort();
        staff_ids.dedup();

        let mut query = String::from(
            "SELECT meta::id(id) AS record_id, first_name, last_name FROM patient \
             WHERE meta::id(id) IN $patient_ids; \
             SELECT meta::id(id) AS record_id, first_name, last_name, role FROM staff \
             WHERE meta::id(id) IN $staff_ids;",
        );
        if with_treatments {
            query.push_str(
                " SELECT patient_id, description, created_at FROM treatment_order \
                 WHERE patient_id IN $patient_ids ORDER BY created_at ASC;",
            );
        }

        let mut result = self
            .db
            .query(query)
            .bind(("patient_ids", patient_ids))
            .bind(("staff_ids", staff_ids))
            .await?;

        let resident_rows: Vec<ResidentRow> = result.take(0)?;
        let staff_rows: Vec<StaffSummaryRow> = result.take(1)?;
        let treatment_lines: Vec<TreatmentLine> = if with_treatments {
            result.take(2)?
        } else {
            Vec::new()
        };

        let mut residents = HashMap::new();
        for row in resident_rows {
            let id = parse_uuid(&row.record_id)?;
            residents.insert(
                id,
                ResidentSummary {
                    id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    treatments: Vec::new(),
                },
            );
        }
        for line in treatment_lines {
            if let Some(resident) = residents.get_mut(&parse_uuid(&line.patient_id)?) {
                resident.treatments.push(line.description);
            }
        }

        let mut staff = HashMap::new();
        for row in staff_rows {
            let id = parse_uuid(&row.record_id)?;
            staff.insert(
                id,
                StaffSummary {
                    id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    role: parse_code::<Role>(&row.role)?,
                },
            );
        }

        // Orders whose resident is gone are dropped.
        Ok(orders
            .into_iter()
            .filter_map(|order| {
                let patient = residents.get(&order.patient_id)?.clone();
                let administering_staff = order
                    .administration
                    .administered_by
                    .and_then(|id| staff.get(&id).cloned());
                Some(MedicationEntry {
                    order,
                    patient,
                    administering_staff,
                })
            })
            .collect())
    }
}

impl<C: Connection> MedicationOrderRepository for SurrealMedicationOrderRepository<C> {
    async fn create(&self, input: CreateMedicationOrder) -> CraResult<MedicationOrder> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('medication_order', $id) SET \
                 patient_id = $patient_id, medication = $medication, \
                 dose = $dose, frequency = $frequency, \
                 instructions = $instructions, scheduled_at = $scheduled_at, \
                 created_by = $created_by, administered = false; \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("patient_id", input.patient_id.to_string()))
            .bind(("medication", input.medication))
            .bind(("dose", input.dose))
            .bind(("frequency", input.frequency))
            .bind(("instructions", input.instructions))
            .bind(("scheduled_at", input.scheduled_at))
            .bind(("created_by", input.created_by.map(|id| id.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<MedicationOrderRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_order()?)
    }

    async fn get_by_id(&self, id: Uuid) -> CraResult<MedicationOrder> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MedicationOrderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_order()?)
    }

    async fn update(&self, id: Uuid, input: UpdateMedicationOrder) -> CraResult<MedicationOrder> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.medication.is_some() {
            sets.push("medication = $medication");
        }
        if input.dose.is_some() {
            sets.push("dose = $dose");
        }
        if input.frequency.is_some() {
            sets.push("frequency = $frequency");
        }
        if input.instructions.is_some() {
            sets.push("instructions = $instructions");
        }
        if input.scheduled_at.is_some() {
            sets.push("scheduled_at = $scheduled_at");
        }
        if input.administration.is_some() {
            sets.push("administered = $administered");
            sets.push("administered_by = $administered_by");
            sets.push("administered_at = $administered_at");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('medication_order', $id) SET {}; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(medication) = input.medication {
            builder = builder.bind(("medication", medication));
        }
        if let Some(dose) = input.dose {
            builder = builder.bind(("dose", dose));
        }
        if let Some(frequency) = input.frequency {
            builder = builder.bind(("frequency", frequency));
        }
        if let Some(instructions) = input.instructions {
            builder = builder.bind(("instructions", instructions));
        }
        if let Some(scheduled_at) = input.scheduled_at {
            builder = builder.bind(("scheduled_at", scheduled_at));
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

        let rows: Vec<MedicationOrderRow> = result.take(1).map_err(DbError::from)?;
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
            .query("DELETE type::record('medication_order', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<surrealdb_types::Value> = result.take(0).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::not_found(ENTITY, id_str).into());
        }
        Ok(())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> CraResult<Vec<MedicationOrder>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM medication_order \
                 WHERE patient_id = $patient_id ORDER BY created_at DESC",
            )
            .bind(("patient_id", patient_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MedicationOrderRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(MedicationOrderRow::try_into_order)
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_grid(&self, team_lead_id: Option<Uuid>) -> CraResult<Vec<MedicationEntry>> {
        let orders = self
            .select_orders(
                Vec::new(),
                "administered ASC, created_at DESC",
                team_lead_id,
                None,
            )
            .await?;
        Ok(self.attach(orders, true).await?)
    }

    async fn list_administered(
        &self,
        team_lead_id: Option<Uuid>,
        limit: u64,
    ) -> CraResult<Vec<MedicationEntry>> {
        let orders = self
            .select_orders(
                vec!["administered = true"],
                "administered_at DESC",
                team_lead_id,
                Some(limit),
            )
            .await?;
        Ok(self.attach(orders, false).await?)
    }
}
