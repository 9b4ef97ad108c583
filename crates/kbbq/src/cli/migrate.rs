//! `kbbq migrate`.

use kbbq_database::{establish_connection, run_migrations};
use tracing::info;

/// Apply every pending migration against `DATABASE_URL`.
pub fn migrate() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let mut conn = establish_connection()?;
    let applied = run_migrations(&mut conn)?;
    info!(applied, "Database is up to date");
    Ok(())
}
