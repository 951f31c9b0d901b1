//! Schema definitions and migration runner for SurrealDB.
//!
//! All tables are SCHEMAFULL. UUIDs are stored as strings and used as
//! record ids. Calendar dates are stored as ISO `YYYY-MM-DD` strings so
//! range filters compare lexicographically. Enums are stored by their wire
//! code with ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Staff
-- =======================================================================
DEFINE TABLE staff SCHEMAFULL;
DEFINE FIELD email ON TABLE staff TYPE string;
DEFINE FIELD password_hash ON TABLE staff TYPE string;
DEFINE FIELD first_name ON TABLE staff TYPE string;
DEFINE FIELD last_name ON TABLE staff TYPE option<string>;
DEFINE FIELD national_id ON TABLE staff TYPE option<string>;
DEFINE FIELD phone ON TABLE staff TYPE option<string>;
DEFINE FIELD role ON TABLE staff TYPE string \
    ASSERT $value IN ['ADMINISTRADOR', 'MEDICO', 'RAS', 'ENFERMERA', \
    'RAA', 'OSS', 'FISIOTERAPEUTA', 'RECEPCIONISTA'];
DEFINE FIELD supervisor_id ON TABLE staff TYPE option<string>;
DEFINE FIELD license_number ON TABLE staff TYPE option<string>;
DEFINE FIELD specialty ON TABLE staff TYPE option<string>;
DEFINE FIELD department ON TABLE staff TYPE option<string>;
DEFINE FIELD active ON TABLE staff TYPE bool DEFAULT true;
DEFINE FIELD hired_at ON TABLE staff TYPE datetime DEFAULT time::now();
DEFINE FIELD created_at ON TABLE staff TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE staff TYPE datetime DEFAULT time::now();
DEFINE INDEX idx_staff_email ON TABLE staff COLUMNS email UNIQUE;
DEFINE INDEX idx_staff_supervisor ON TABLE staff \
    COLUMNS supervisor_id, role;

-- =======================================================================
-- Residents
-- =======================================================================
DEFINE TABLE patient SCHEMAFULL;
DEFINE FIELD first_name ON TABLE patient TYPE string;
DEFINE FIELD last_name ON TABLE patient TYPE option<string>;
DEFINE FIELD national_id ON TABLE patient TYPE option<string>;
DEFINE FIELD birth_date ON TABLE patient TYPE option<string>;
DEFINE FIELD admission_date ON TABLE patient TYPE option<string>;
DEFINE FIELD active ON TABLE patient TYPE bool DEFAULT true;
DEFINE FIELD team_lead_id ON TABLE patient TYPE option<string>;
DEFINE FIELD allergies ON TABLE patient TYPE option<string>;
DEFINE FIELD conditions ON TABLE patient TYPE option<string>;
DEFINE FIELD created_at ON TABLE patient TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE patient TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_patient_team_lead ON TABLE patient COLUMNS team_lead_id;

-- =======================================================================
-- Shift assignments, one table per track.
-- Record id is `<supervisor>_<date>_<slot>`.
-- =======================================================================
DEFINE TABLE operational_shift SCHEMAFULL;
DEFINE FIELD supervisor_id ON TABLE operational_shift TYPE string;
DEFINE FIELD date ON TABLE operational_shift TYPE string;
DEFINE FIELD slot ON TABLE operational_shift TYPE string \
    ASSERT $value IN ['MANANA_1', 'MANANA_2', 'TARDE_1', 'TARDE_2', \
    'GUARDIA'];
DEFINE FIELD staff_id ON TABLE operational_shift TYPE string;
DEFINE FIELD updated_at ON TABLE operational_shift TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_operational_shift_key ON TABLE operational_shift \
    COLUMNS supervisor_id, date, slot UNIQUE;
DEFINE INDEX idx_operational_shift_staff ON TABLE operational_shift \
    COLUMNS staff_id, date;

DEFINE TABLE nursing_shift SCHEMAFULL;
DEFINE FIELD supervisor_id ON TABLE nursing_shift TYPE string;
DEFINE FIELD date ON TABLE nursing_shift TYPE string;
DEFINE FIELD slot ON TABLE nursing_shift TYPE string \
    ASSERT $value IN ['MANANA_1', 'MANANA_2', 'MANANA_3', 'TARDE_1', \
    'TARDE_2'];
DEFINE FIELD staff_id ON TABLE nursing_shift TYPE string;
DEFINE FIELD updated_at ON TABLE nursing_shift TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_nursing_shift_key ON TABLE nursing_shift \
    COLUMNS supervisor_id, date, slot UNIQUE;
DEFINE INDEX idx_nursing_shift_staff ON TABLE nursing_shift \
    COLUMNS staff_id, date;

-- =======================================================================
-- Clinical orders
-- =======================================================================
DEFINE TABLE medication_order SCHEMAFULL;
DEFINE FIELD patient_id ON TABLE medication_order TYPE string;
DEFINE FIELD medication ON TABLE medication_order TYPE string;
DEFINE FIELD dose ON TABLE medication_order TYPE option<string>;
DEFINE FIELD frequency ON TABLE medication_order TYPE option<string>;
DEFINE FIELD instructions ON TABLE medication_order TYPE option<string>;
DEFINE FIELD scheduled_at ON TABLE medication_order TYPE option<datetime>;
DEFINE FIELD created_by ON TABLE medication_order TYPE option<string>;
DEFINE FIELD administered ON TABLE medication_order TYPE bool \
    DEFAULT false;
DEFINE FIELD administered_by ON TABLE medication_order \
    TYPE option<string>;
DEFINE FIELD administered_at ON TABLE medication_order \
    TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE medication_order TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE medication_order TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_medication_order_patient ON TABLE medication_order \
    COLUMNS patient_id;

DEFINE TABLE treatment_order SCHEMAFULL;
DEFINE FIELD patient_id ON TABLE treatment_order TYPE string;
DEFINE FIELD description ON TABLE treatment_order TYPE string;
DEFINE FIELD created_by ON TABLE treatment_order TYPE option<string>;
DEFINE FIELD administered ON TABLE treatment_order TYPE bool \
    DEFAULT false;
DEFINE FIELD administered_by ON TABLE treatment_order \
    TYPE option<string>;
DEFINE FIELD administered_at ON TABLE treatment_order \
    TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE treatment_order TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE treatment_order TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_treatment_order_patient ON TABLE treatment_order \
    COLUMNS patient_id;

-- =======================================================================
-- Supply requests
-- =======================================================================
DEFINE TABLE supply_request SCHEMAFULL;
DEFINE FIELD requester_id ON TABLE supply_request TYPE string;
DEFINE FIELD description ON TABLE supply_request TYPE string;
DEFINE FIELD status ON TABLE supply_request TYPE string \
    ASSERT $value IN ['PENDIENTE', 'RECIBIDA', 'PEDIDO_LISTO', \
    'COMPLETADA'];
DEFINE FIELD created_at ON TABLE supply_request TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE supply_request TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_supply_request_requester ON TABLE supply_request \
    COLUMNS requester_id;

-- =======================================================================
-- Visitors and appointments
-- =======================================================================
DEFINE TABLE visitor SCHEMAFULL;
DEFINE FIELD first_name ON TABLE visitor TYPE string;
DEFINE FIELD last_name ON TABLE visitor TYPE option<string>;
DEFINE FIELD phone ON TABLE visitor TYPE option<string>;
DEFINE FIELD email ON TABLE visitor TYPE option<string>;
DEFINE FIELD relationship ON TABLE visitor TYPE option<string>;
DEFINE FIELD document ON TABLE visitor TYPE option<string>;
DEFINE FIELD created_at ON TABLE visitor TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE visitor TYPE datetime \
    DEFAULT time::now();

DEFINE TABLE appointment SCHEMAFULL;
DEFINE FIELD patient_id ON TABLE appointment TYPE string;
DEFINE FIELD visitor_id ON TABLE appointment TYPE string;
DEFINE FIELD scheduled_at ON TABLE appointment TYPE datetime;
DEFINE FIELD status ON TABLE appointment TYPE string \
    ASSERT $value IN ['AGENDADA', 'REALIZADA', 'CANCELADA', 'NO_ASISTIO'];
DEFINE FIELD notes ON TABLE appointment TYPE option<string>;
DEFINE FIELD created_at ON TABLE appointment TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE appointment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_appointment_time ON TABLE appointment \
    COLUMNS scheduled_at;
DEFINE INDEX idx_appointment_patient ON TABLE appointment \
    COLUMNS patient_id, scheduled_at;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Apply every migration newer than the recorded schema version.
///
/// Safe to call on every startup.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
    {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "could not record v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Raw DDL of schema version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
