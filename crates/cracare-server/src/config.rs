//! Server configuration from command-line flags and environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use cracare_auth::AuthConfig;
use cracare_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bootstrap administrator needs both an email and a password")]
    IncompleteBootstrap,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "cracare")]
#[command(version)]
#[command(about = "CRACare care-facility administration API")]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[arg(long, env = "CRACARE_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    // === SurrealDB ===
    /// SurrealDB WebSocket address
    #[arg(long, env = "CRACARE_DB_URL", default_value = DbConfig::DEFAULT_URL)]
    pub db_url: String,

    #[arg(long, env = "CRACARE_DB_NS", default_value = DbConfig::DEFAULT_NAMESPACE)]
    pub db_namespace: String,

    #[arg(long, env = "CRACARE_DB_DB", default_value = DbConfig::DEFAULT_DATABASE)]
    pub db_database: String,

    #[arg(long, env = "CRACARE_DB_USER", default_value = "root")]
    pub db_user: String,

    #[arg(long, env = "CRACARE_DB_PASS", default_value = "root", hide_env_values = true)]
    pub db_password: String,

    // === Tokens and passwords ===
    /// PEM-encoded Ed25519 private key used to sign access tokens
    #[arg(long, env = "CRACARE_JWT_PRIVATE_KEY_FILE")]
    pub jwt_private_key_file: PathBuf,

    /// PEM-encoded Ed25519 public key used to verify access tokens
    #[arg(long, env = "CRACARE_JWT_PUBLIC_KEY_FILE")]
    pub jwt_public_key_file: PathBuf,

    #[arg(long, env = "CRACARE_JWT_ISSUER", default_value = "cracare")]
    pub jwt_issuer: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "CRACARE_TOKEN_TTL_SECS", default_value_t = 604_800)]
    pub token_ttl_secs: u64,

    #[arg(long, env = "CRACARE_PASSWORD_PEPPER", hide_env_values = true)]
    pub password_pepper: Option<String>,

    #[arg(long, env = "CRACARE_MIN_PASSWORD_LENGTH", default_value_t = 8)]
    pub min_password_length: usize,

    // === First start ===
    /// Administrator created when the staff table is empty
    #[arg(long, env = "CRACARE_BOOTSTRAP_ADMIN_EMAIL")]
    pub bootstrap_admin_email: Option<String>,

    #[arg(long, env = "CRACARE_BOOTSTRAP_ADMIN_PASSWORD", hide_env_values = true)]
    pub bootstrap_admin_password: Option<String>,
}

impl ServerConfig {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            username: self.db_user.clone(),
            password: self.db_password.clone(),
        }
    }

    /// Build the auth configuration, reading both key files.
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        Ok(AuthConfig {
            jwt_private_key_pem: read_key(&self.jwt_private_key_file)?,
            jwt_public_key_pem: read_key(&self.jwt_public_key_file)?,
            access_token_lifetime_secs: self.token_ttl_secs,
            jwt_issuer: self.jwt_issuer.clone(),
            pepper: self.password_pepper.clone(),
            min_password_length: self.min_password_length,
        })
    }

    /// Bootstrap credentials, if configured.
    pub fn bootstrap_admin(&self) -> Result<Option<(&str, &str)>, ConfigError> {
        match (&self.bootstrap_admin_email, &self.bootstrap_admin_password) {
            (Some(email), Some(password)) => Ok(Some((email, password))),
            (None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteBootstrap),
        }
    }
}

fn read_key(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::KeyFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 5] = [
        "cracare",
        "--jwt-private-key-file",
        "/keys/private.pem",
        "--jwt-public-key-file",
        "/keys/public.pem",
    ];

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::try_parse_from(REQUIRED).unwrap();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.token_ttl_secs, 604_800);

        let db = config.db_config();
        assert_eq!(db.namespace, "cracare");
        assert_eq!(db.database, "main");
    }

    #[test]
    fn bootstrap_needs_both_halves() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--bootstrap-admin-email", "admin@cracare.es"]);
        let config = ServerConfig::try_parse_from(args).unwrap();
        assert!(matches!(
            config.bootstrap_admin(),
            Err(ConfigError::IncompleteBootstrap)
        ));
    }

    #[test]
    fn missing_key_file_is_reported() {
        let config = ServerConfig::try_parse_from(REQUIRED).unwrap();
        let err = config.auth_config().unwrap_err();
        assert!(err.to_string().contains("/keys/private.pem"));
    }
}
