use log::{debug, error};
use rusqlite::Connection;
use rusqlite::Result;

// Embed migrations from the migrations directory
refinery::embed_migrations!("migrations");

/// Opens the database and brings its schema up to date
pub fn init_connection(db_path: &str) -> Result<Connection> {
    let mut conn = Connection::open(db_path)?;

    match migrations::runner().run(&mut conn) {
        Ok(report) => {
            debug!(
                "Migrations completed for {} ({} applied)",
                db_path,
                report.applied_migrations().len()
            );
        }
        Err(e) => {
            error!("Migration of {} failed: {}", db_path, e);
            return Err(rusqlite::Error::ExecuteReturnedResults);
        }
    }

    Ok(conn)
}
