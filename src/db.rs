#[cfg(feature = "server")]
pub mod server_db {
    use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
    use diesel::RunQueryDsl;
    use diesel::SqliteConnection;
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
    use dioxus::logger::tracing::info;
    use once_cell::sync::Lazy;

    pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

    pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

    // Cascading deletes depend on foreign_keys being enabled per connection.
    #[derive(Debug)]
    struct ConnectionOptions;

    impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
        fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
            diesel::sql_query("PRAGMA foreign_keys = ON;")
                .execute(conn)
                .map_err(r2d2::Error::QueryError)?;
            diesel::sql_query("PRAGMA busy_timeout = 5000;")
                .execute(conn)
                .map_err(r2d2::Error::QueryError)?;
            Ok(())
        }
    }

    pub static DB_POOL: Lazy<Pool> = Lazy::new(|| {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)
            .expect("Failed to create pool.");

        let mut conn = pool.get().expect("Failed to get connection");
        diesel::sql_query("PRAGMA journal_mode = WAL;")
            .execute(&mut conn)
            .ok();
        diesel::sql_query("PRAGMA synchronous = NORMAL;")
            .execute(&mut conn)
            .ok();

        pool
    });

    pub fn connection() -> diesel::r2d2::PooledConnection<ConnectionManager<SqliteConnection>> {
        DB_POOL.get().expect("Failed to get DB connection")
    }

    pub fn run_migrations() {
        let mut conn = connection();
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
        info!("database migrations up to date");
    }
}

#[cfg(feature = "server")]
pub use server_db::*;
