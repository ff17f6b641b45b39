use crate::env::get_database_pool_size;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{self, FromRequest, Outcome};
use rocket::{Request, State};
use std::ops::{Deref, DerefMut};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; \
     PRAGMA busy_timeout = 5000; \
     PRAGMA journal_mode = WAL;";

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        connection
            .batch_execute(CONNECTION_PRAGMAS)
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn init_pool(database_url: String) -> Pool {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    Pool::builder()
        .max_size(get_database_pool_size())
        .connection_customizer(Box::new(ConnectionPragmas))
        .build(manager)
        .expect("Database pool")
}

pub fn establish_connection(database_url: &str) -> ConnectionResult<SqliteConnection> {
    let mut connection = SqliteConnection::establish(database_url)?;
    connection
        .batch_execute(CONNECTION_PRAGMAS)
        .map_err(|error| ConnectionError::BadConnection(error.to_string()))?;

    Ok(connection)
}

pub fn run_migrations(
    connection: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    connection.run_pending_migrations(MIGRATIONS)?;

    Ok(())
}

pub struct DbConnection(pub r2d2::PooledConnection<ConnectionManager<SqliteConnection>>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for DbConnection {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<DbConnection, ()> {
        let pool = try_outcome!(request.guard::<&State<Pool>>().await);
        match pool.get() {
            Ok(connection) => Outcome::Success(DbConnection(connection)),
            Err(error) => {
                tracing::error!(error = %error, "database pool exhausted");
                Outcome::Error((Status::ServiceUnavailable, ()))
            }
        }
    }
}

impl Deref for DbConnection {
    type Target = SqliteConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
