//! CRACare Auth: staff login, password verification and JWT bearer tokens.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, AuthenticatedStaff, LoginOutput};
pub use token::AccessTokenClaims;
