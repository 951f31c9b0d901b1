//! SurrealDB implementation of [`StaffRepository`].
//!
//! Passwords are hashed with Argon2id (m=19 MiB, t=2, p=1) and a random
//! per-hash salt. An optional pepper is prepended to the password before
//! hashing. Emails are trimmed and lower-cased before they are stored or
//! looked up.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use cracare_core::error::CraResult;
use cracare_core::models::role::Role;
use cracare_core::models::staff::{CreateStaff, StaffMember, UpdateStaff};
use cracare_core::repository::StaffRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_code, parse_opt_uuid, parse_uuid};
use crate::error::DbError;

const ENTITY: &str = "staff";

const SELECT_ONE: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('staff', $id)";

#[derive(Debug, SurrealValue)]
struct StaffRow {
    record_id: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: Option<String>,
    national_id: Option<String>,
    phone: Option<String>,
    role: String,
    supervisor_id: Option<String>,
    license_number: Option<String>,
    specialty: Option<String>,
    department: Option<String>,
    active: bool,
    hired_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StaffRow {
    fn try_into_staff(self) -> Result<StaffMember, DbError> {
        Ok(StaffMember {
            id: parse_uuid(&self.record_id)?,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            national_id: self.national_id,
            phone: self.phone,
            role: parse_code::<Role>(&self.role)?,
            supervisor_id: parse_opt_uuid(self.supervisor_id)?,
            license_number: self.license_number,
            specialty: self.specialty,
            department: self.department,
            active: self.active,
            hired_at: self.hired_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password with Argon2id.
///
/// Exposed so callers seeding fixtures can produce hashes the auth layer
/// accepts.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hash(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

#[derive(Clone)]
pub struct SurrealStaffRepository<C: Connection> {
    db: Surreal<C>,
    pepper: Option<String>,
}

impl<C: Connection> SurrealStaffRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: Option<String>) -> Self {
        Self { db, pepper }
    }

    async fn select_many(
        &self,
        query: &str,
        vars: Vec<(&'static str, String)>,
    ) -> Result<Vec<StaffMember>, DbError> {
        let mut builder = self.db.query(query);
        for var in vars {
            builder = builder.bind(var);
        }
        let mut result = builder.await?;
        let rows: Vec<StaffRow> = result.take(0)?;
        rows.into_iter().map(StaffRow::try_into_staff).collect()
    }
}

impl<C: Connection> StaffRepository for SurrealStaffRepository<C> {
    async fn create(&self, input: CreateStaff) -> CraResult<StaffMember> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(format!(
                "CREATE type::record('staff', $id) SET \
                 email = $email, password_hash = $password_hash, \
                 first_name = $first_name, last_name = $last_name, \
                 national_id = $national_id, phone = $phone, \
                 role = $role, supervisor_id = $supervisor_id, \
                 license_number = $license_number, \
                 specialty = $specialty, department = $department, \
                 active = true; \
                 {SELECT_ONE};"
            ))
            .bind(("id", id_str.clone()))
            .bind(("email", normalize_email(&input.email)))
            .bind(("password_hash", password_hash))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("national_id", input.national_id))
            .bind(("phone", input.phone))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("supervisor_id", input.supervisor_id.map(|s| s.to_string())))
            .bind(("license_number", input.license_number))
            .bind(("specialty", input.specialty))
            .bind(("department", input.department))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<StaffRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_staff()?)
    }

    async fn get_by_id(&self, id: Uuid) -> CraResult<StaffMember> {
        let id_str = id.to_string();
        let found = self
            .select_many(SELECT_ONE, vec![("id", id_str.clone())])
            .await?;
        Ok(found
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?)
    }

    async fn get_by_email(&self, email: &str) -> CraResult<StaffMember> {
        let email = normalize_email(email);
        let found = self
            .select_many(
                "SELECT meta::id(id) AS record_id, * FROM staff WHERE email = $email",
                vec![("email", email.clone())],
            )
            .await?;
        Ok(found
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, format!("email={email}")))?)
    }

    async fn update(&self, id: Uuid, input: UpdateStaff) -> CraResult<StaffMember> {
        let id_str = id.to_string();

        let password_hash = match input.password.as_deref() {
            Some(password) => Some(hash_password(password, self.pepper.as_deref())?),
            None => None,
        };

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
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.supervisor_id.is_some() {
            sets.push("supervisor_id = $supervisor_id");
        }
        if input.license_number.is_some() {
            sets.push("license_number = $license_number");
        }
        if input.specialty.is_some() {
            sets.push("specialty = $specialty");
        }
        if input.department.is_some() {
            sets.push("department = $department");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        if password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('staff', $id) SET {}; {SELECT_ONE};",
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
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role.as_str().to_string()));
        }
        if let Some(supervisor_id) = input.supervisor_id {
            builder = builder.bind(("supervisor_id", supervisor_id.map(|s| s.to_string())));
        }
        if let Some(license_number) = input.license_number {
            builder = builder.bind(("license_number", license_number));
        }
        if let Some(specialty) = input.specialty {
            builder = builder.bind(("specialty", specialty));
        }
        if let Some(department) = input.department {
            builder = builder.bind(("department", department));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }
        if let Some(password_hash) = password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        let rows: Vec<StaffRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, &id_str))?;

        Ok(row.try_into_staff()?)
    }

    async fn deactivate(&self, id: Uuid) -> CraResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('staff', $id) SET \
                 active = false, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let updated: Vec<surrealdb_types::Value> = result.take(0).map_err(DbError::from)?;
        if updated.is_empty() {
            return Err(DbError::not_found(ENTITY, id_str).into());
        }
        Ok(())
    }

    async fn list(&self) -> CraResult<Vec<StaffMember>> {
        Ok(self
            .select_many(
                "SELECT meta::id(id) AS record_id, * FROM staff \
                 ORDER BY first_name ASC, last_name ASC",
                Vec::new(),
            )
            .await?)
    }

    async fn list_subordinates(
        &self,
        supervisor_id: Uuid,
        role: Role,
    ) -> CraResult<Vec<StaffMember>> {
        Ok(self
            .select_many(
                "SELECT meta::id(id) AS record_id, * FROM staff \
                 WHERE supervisor_id = $supervisor_id AND role = $role \
                 AND active = true \
                 ORDER BY first_name ASC, last_name ASC",
                vec![
                    ("supervisor_id", supervisor_id.to_string()),
                    ("role", role.as_str().to_string()),
                ],
            )
            .await?)
    }

    async fn count(&self) -> CraResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM staff GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
