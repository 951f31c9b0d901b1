//! SurrealDB implementation of [`SupplyRequestRepository`].

use chrono::{DateTime, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::supply_request::{
    CreateSupplyRequest, SupplyRequest, SupplyRequestStatus,
};
use cracare_core::repository::SupplyRequestRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_code, parse_uuid};
use crate::error::DbError;

const ENTITY: &str = "supply_request";

const SELECT_ONE: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('supply_request', $id)";

#[derive(Debug, SurrealValue)]
struct SupplyRequestRow {
    record_id: String,
    requester_id: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SupplyRequestRow {
    fn try_into_request(self) -> Result<SupplyRequest, DbError> {
        Ok(SupplyRequest {
            id: parse_uuid(&self.record_id)?,
            requester_id: parse_uuid(&self.requester_id)?,
            description: self.description,
            status: parse_code::<SupplyRequestStatus>(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealSupplyRequestRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSupplyRequestRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SupplyRequestRepository for SurrealSupplyRequestRepository<C> {
    async fn create(&self, input: CreateSupplyRequest) -> CraResult<SupplyRequest> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('supply_request', $id) SET \
                 requester_id = $requester_id, description = $description, \
                 status = $status; \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("requester_id", input.requester_id.to_string()))
            .bind(("description", input.description))
            .bind(("status", SupplyRequestStatus::Pending.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<SupplyRequestRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_request()?)
    }

    async fn get_by_id(&self, id: Uuid) -> CraResult<SupplyRequest> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SupplyRequestRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_request()?)
    }

    async fn set_status(&self, id: Uuid, status: SupplyRequestStatus) -> CraResult<SupplyRequest> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(format!(
                "UPDATE type::record('supply_request', $id) SET \
                 status = $status, updated_at = time::now(); \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("status", status.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<SupplyRequestRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_request()?)
    }

    async fn list(&self, requester_id: Option<Uuid>) -> CraResult<Vec<SupplyRequest>> {
        let mut result = match requester_id {
            Some(requester) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM supply_request \
                     WHERE requester_id = $requester_id ORDER BY created_at DESC",
                )
                .bind(("requester_id", requester.to_string()))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM supply_request \
                     ORDER BY created_at DESC",
                )
                .await
                .map_err(DbError::from)?,
        };

        let rows: Vec<SupplyRequestRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(SupplyRequestRow::try_into_request)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
