//! Connection to the CRACare SurrealDB instance.
//!
//! [`DbManager::open`] hands back a handle that is signed in, scoped to the
//! configured namespace and database, and migrated to the latest schema.

use std::fmt;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema::run_migrations;

/// The `CRACARE_DB_*` settings.
#[derive(Clone)]
pub struct DbConfig {
    /// `host:port` of the WebSocket endpoint; a `ws://` prefix is accepted.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl DbConfig {
    pub const DEFAULT_URL: &'static str = "127.0.0.1:8000";
    pub const DEFAULT_NAMESPACE: &'static str = "cracare";
    pub const DEFAULT_DATABASE: &'static str = "main";

    /// Address passed to the WebSocket engine, without scheme.
    pub fn endpoint(&self) -> &str {
        let url = self.url.trim();
        url.strip_prefix("ws://").unwrap_or(url).trim_end_matches('/')
    }

    fn validate(&self) -> Result<(), DbError> {
        let required = [
            ("url", self.endpoint()),
            ("namespace", self.namespace.trim()),
            ("database", self.database.trim()),
            ("user", self.username.trim()),
        ];
        match required.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(DbError::Config(format!("database {name} is empty"))),
            None => Ok(()),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT_URL.into(),
            namespace: Self::DEFAULT_NAMESPACE.into(),
            database: Self::DEFAULT_DATABASE.into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url)
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Owns the client handle for the CRACare database.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, sign in, select the namespace and database, then apply
    /// pending migrations.
    pub async fn open(config: &DbConfig) -> Result<Self, DbError> {
        config.validate()?;
        info!(
            endpoint = %config.endpoint(),
            namespace = %config.namespace,
            database = %config.database,
            "Opening CRACare database"
        );

        let db = Surreal::new::<Ws>(config.endpoint()).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(config.namespace.trim())
            .use_db(config.database.trim())
            .await?;

        run_migrations(&db).await?;
        info!("CRACare database ready");

        Ok(Self { db })
    }

    /// Consume the manager, returning the client handle.
    pub fn into_client(self) -> Surreal<Client> {
        self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_drops_the_scheme() {
        let config = DbConfig {
            url: " ws://db.cracare.local:8000/ ".into(),
            ..DbConfig::default()
        };
        assert_eq!(config.endpoint(), "db.cracare.local:8000");
        assert_eq!(DbConfig::default().endpoint(), DbConfig::DEFAULT_URL);
    }

    #[test]
    fn blank_settings_are_rejected() {
        assert!(DbConfig::default().validate().is_ok());

        let config = DbConfig {
            namespace: "  ".into(),
            ..DbConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(&err, DbError::Config(msg) if msg.contains("namespace")));

        let config = DbConfig {
            url: "ws://".into(),
            ..DbConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_hides_the_password() {
        let config = DbConfig {
            password: "s3cr3t-planta".into(),
            ..DbConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cr3t-planta"));
        assert!(rendered.contains("cracare"));
    }
}
