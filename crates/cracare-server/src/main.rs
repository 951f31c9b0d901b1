//! CRACare Server: application entry point.

use clap::Parser;
use cracare_auth::password;
use cracare_db::DbManager;
use cracare_db::repository::SurrealStaffRepository;
use cracare_server::config::ServerConfig;
use cracare_server::{AppState, bootstrap, router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_DIRECTIVES: [&str; 4] = [
    "cracare_server=info",
    "cracare_care=info",
    "cracare_auth=info",
    "cracare_db=info",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut filter = EnvFilter::from_default_env();
    for directive in LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    let config = ServerConfig::parse();
    let auth_config = config.auth_config()?;

    let db = DbManager::open(&config.db_config()).await?.into_client();

    if let Some((email, pass)) = config.bootstrap_admin()? {
        password::check_policy(pass, &auth_config)?;
        let repo = SurrealStaffRepository::with_pepper(db.clone(), auth_config.pepper.clone());
        bootstrap::ensure_admin(&repo, email, pass).await?;
    }

    let app = router(AppState::new(db, auth_config));

    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "CRACare API listening");
    axum::serve(listener, app).await?;

    info!("CRACare server stopped");
    Ok(())
}
