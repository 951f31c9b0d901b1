//! First-start seeding.

use cracare_core::error::CraResult;
use cracare_core::models::role::Role;
use cracare_core::models::staff::{CreateStaff, StaffMember};
use cracare_core::repository::StaffRepository;
use tracing::info;

/// Create an administrator when no staff exists yet.
///
/// Returns the new account, or `None` when the table already had rows.
pub async fn ensure_admin<S: StaffRepository>(
    repo: &S,
    email: &str,
    password: &str,
) -> CraResult<Option<StaffMember>> {
    if repo.count().await? > 0 {
        return Ok(None);
    }

    let admin = repo
        .create(CreateStaff {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Administrador".into(),
            last_name: None,
            national_id: None,
            phone: None,
            role: Role::Administrator,
            supervisor_id: None,
            license_number: None,
            specialty: None,
            department: None,
        })
        .await?;

    info!(staff_id = %admin.id, email = %admin.email, "Bootstrap administrator created");
    Ok(Some(admin))
}
