//! Connection pool, PRAGMAs, and embedded migrations.

use log::{error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use billfold_core::errors::{DatabaseError, Error, Result};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub mod write_actor;
pub use write_actor::{spawn_writer, WriteHandle};

/// Applies the per-connection PRAGMAs every pooled connection needs.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA journal_mode = WAL;\
             PRAGMA foreign_keys = ON;\
             PRAGMA busy_timeout = 5000;\
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Ensures the data directory exists and returns the database file path.
pub fn init(app_data_dir: &str) -> Result<String> {
    let db_path = get_db_path(app_data_dir);
    if let Some(db_dir) = Path::new(&db_path).parent() {
        if !db_dir.exists() {
            fs::create_dir_all(db_dir)?;
        }
    }
    Ok(db_path)
}

/// The database file path, `DATABASE_URL` taking precedence over the
/// application data directory.
pub fn get_db_path(app_data_dir: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        Path::new(app_data_dir)
            .join("billfold.db")
            .to_string_lossy()
            .to_string()
    })
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(8)
        .min_idle(Some(1))
        .connection_timeout(std::time::Duration::from_secs(30))
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    Ok(Arc::new(pool))
}

pub fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Running database migrations");
    let mut connection = get_connection(pool)?;

    let applied = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        error!("Database migration failed: {}", e);
        Error::Database(DatabaseError::MigrationFailed(e.to_string()))
    })?;

    if applied.is_empty() {
        info!("No pending migrations to apply.");
    } else {
        for migration_version in &applied {
            info!("Applied migration {}", migration_version);
        }
    }
    Ok(())
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get()
        .map_err(|e| Error::Database(DatabaseError::ConnectionFailed(e.to_string())))
}
