use camino::Utf8PathBuf as PathBuf;
use diesel::connection::SimpleConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use eyre::{eyre, Context, Result};
use tracing::{info, instrument, Span};

pub(super) const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbConn = diesel::SqliteConnection;

/// Handle to the SQLite database file.
///
/// There is no connection pool: every call to [`Database::interact`] opens a new
/// connection on a blocking thread, runs a single closure against it and closes it again.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Database { path: path.into() }
    }

    /// Opens a connection, creating the database file if it does not exist yet.
    pub fn open(&self) -> Result<DbConn> {
        let mut conn = DbConn::establish(self.path.as_str())
            .wrap_err_with(|| format!("could not open database {}", self.path))?;
        connection_setup(&mut conn).wrap_err("error configuring database connection")?;
        Ok(conn)
    }

    pub async fn interact<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut DbConn) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.clone();
        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let mut conn = db.open()?;
            f(&mut conn)
        })
        .await
        .map_err(|err| {
            if err.is_panic() {
                eyre!("database interaction panicked")
            } else {
                eyre!("database interaction was aborted")
            }
        })?
    }
}

#[cfg(test)]
pub fn open_in_memory_and_migrate() -> DbConn {
    let mut conn = DbConn::establish(":memory:").expect("error opening in memory db");
    connection_setup(&mut conn).expect("error configuring in memory db connection");
    migrate(&mut conn).expect("error running migrations on in memory connection");
    conn
}

/// Applies pending migrations. Also switches the database file to WAL mode,
/// which is persistent so connections opened later don't need to repeat it.
#[instrument(skip(conn), level = "debug")]
pub fn migrate(conn: &mut DbConn) -> Result<()> {
    conn.batch_execute(
        r#"
PRAGMA journal_mode = wal;
    "#,
    )
    .wrap_err("error enabling WAL journal mode")?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| eyre!("error running migrations: {}", err))?;
    for version in applied {
        info!(%version, "applied migration");
    }
    Ok(())
}

/// Reverts every migration and applies them again, dropping all stored rows.
#[instrument(skip(conn), level = "debug")]
pub fn reset(conn: &mut DbConn) -> Result<()> {
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|err| eyre!("error reverting migrations: {}", err))?;
    migrate(conn)
}

/// Wait on locks held by other connections instead of failing right away.
const BUSY_TIMEOUT_MS: u32 = 5000;

fn connection_setup(conn: &mut DbConn) -> Result<()> {
    conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
    Ok(())
}
