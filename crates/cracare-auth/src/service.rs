//! Authentication service: login and bearer-token authentication.

use cracare_core::access::Caller;
use cracare_core::error::{CraError, CraResult};
use cracare_core::models::role::Role;
use cracare_core::models::staff::StaffMember;
use cracare_core::repository::StaffRepository;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub staff: StaffMember,
}

/// Identity resolved from a bearer token against the current staff row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedStaff {
    pub id: Uuid,
    pub role: Role,
    pub active: bool,
}

impl AuthenticatedStaff {
    pub fn caller(&self) -> Caller {
        Caller::new(self.id, self.role)
    }
}

/// Authentication service.
///
/// Generic over the staff repository so the auth layer has no dependency
/// on the database crate.
pub struct AuthService<S: StaffRepository> {
    staff_repo: S,
    config: AuthConfig,
}

impl<S: StaffRepository> AuthService<S> {
    pub fn new(staff_repo: S, config: AuthConfig) -> Self {
        Self { staff_repo, config }
    }

    /// Verify email + password and issue an access token.
    ///
    /// Unknown email, wrong password and inactive account all answer
    /// `AuthenticationFailed` with the same reason.
    pub async fn login(&self, email: &str, password: &str) -> CraResult<LoginOutput> {
        let staff = match self.staff_repo.get_by_email(email).await {
            Ok(staff) => staff,
            Err(CraError::NotFound { .. }) => {
                warn!(email = %email.trim(), "Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            password,
            &staff.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            warn!(staff_id = %staff.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !staff.active {
            warn!(staff_id = %staff.id, "Login rejected: inactive account");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = token::issue_access_token(staff.id, staff.role, &self.config)?;

        info!(staff_id = %staff.id, role = %staff.role, "Staff logged in");

        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
            staff,
        })
    }

    /// Resolve a bearer token to the staff member it was issued for.
    ///
    /// The staff row is re-read on every call, so deactivation and role
    /// changes take effect before the token expires.
    pub async fn authenticate(&self, bearer: &str) -> CraResult<AuthenticatedStaff> {
        let claims = token::decode_access_token(bearer, &self.config)?;
        let staff_id = claims.staff_id()?;

        let staff = match self.staff_repo.get_by_id(staff_id).await {
            Ok(staff) => staff,
            Err(CraError::NotFound { .. }) => {
                return Err(AuthError::TokenInvalid("unknown subject".into()).into());
            }
            Err(e) => return Err(e),
        };

        if !staff.active {
            return Err(AuthError::AccountInactive.into());
        }

        Ok(AuthenticatedStaff {
            id: staff.id,
            role: staff.role,
            active: staff.active,
        })
    }

    /// Load the full staff record behind an authenticated caller.
    pub async fn current(&self, caller: &Caller) -> CraResult<StaffMember> {
        self.staff_repo.get_by_id(caller.id).await
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
