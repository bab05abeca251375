use crate::{Connection, Result};
use tracing::info;

embed_migrations!("migrations");

/// Applies every migration that has not been run yet.
pub fn run(conn: &Connection) -> Result<()> {
    info!("Running pending migrations");
    embedded_migrations::run(conn)?;
    Ok(())
}
