//! SurrealDB implementation of [`VisitorRepository`].

use chrono::{DateTime, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::visit::{CreateVisitor, UpdateVisitor, Visitor};
use cracare_core::repository::VisitorRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

const ENTITY: &str = "visitor";

const SELECT_ONE: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('visitor', $id)";

#[derive(Debug, SurrealValue)]
struct VisitorRow {
    record_id: String,
    first_name: String,
    last_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    relationship: Option<String>,
    document: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VisitorRow {
    fn try_into_visitor(self) -> Result<Visitor, DbError> {
        Ok(Visitor {
            id: parse_uuid(&self.record_id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            relationship: self.relationship,
            document: self.document,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealVisitorRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealVisitorRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> VisitorRepository for SurrealVisitorRepository<C> {
    async fn create(&self, input: CreateVisitor) -> CraResult<Visitor> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('visitor', $id) SET \
                 first_name = $first_name, last_name = $last_name, \
                 phone = $phone, email = $email, \
                 relationship = $relationship, document = $document; \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("phone", input.phone))
            .bind(("email", input.email))
            .bind(("relationship", input.relationship))
            .bind(("document", input.document))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<VisitorRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_visitor()?)
    }

    async fn get_by_id(&self, id: Uuid) -> CraResult<Visitor> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VisitorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_visitor()?)
    }

    async fn update(&self, id: Uuid, input: UpdateVisitor) -> CraResult<Visitor> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.first_name.is_some() {
            sets.push("first_name = $first_name");
        }
        if input.last_name.is_some() {
            sets.push("last_name = $last_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.relationship.is_some() {
            sets.push("relationship = $relationship");
        }
        if input.document.is_some() {
            sets.push("document = $document");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('visitor', $id) SET {}; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(first_name) = input.first_name {
            builder = builder.bind(("first_name", first_name));
        }
        if let Some(last_name) = input.last_name {
            builder = builder.bind(("last_name", last_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(relationship) = input.relationship {
            builder = builder.bind(("relationship", relationship));
        }
        if let Some(document) = input.document {
            builder = builder.bind(("document", document));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<VisitorRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_visitor()?)
    }

    async fn search(&self, query: Option<&str>, limit: u64) -> CraResult<Vec<Visitor>> {
        let needle = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let mut result = match needle {
            Some(needle) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM visitor \
                     WHERE string::contains(string::lowercase(first_name), $q) \
                     OR string::contains(string::lowercase(last_name ?? ''), $q) \
                     OR string::contains(string::lowercase(phone ?? ''), $q) \
                     OR string::contains(string::lowercase(email ?? ''), $q) \
                     ORDER BY first_name ASC, last_name ASC LIMIT $limit",
                )
                .bind(("q", needle))
                .bind(("limit", limit))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM visitor \
                     ORDER BY first_name ASC, last_name ASC LIMIT $limit",
                )
                .bind(("limit", limit))
                .await
                .map_err(DbError::from)?,
        };

        let rows: Vec<VisitorRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(VisitorRow::try_into_visitor)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
