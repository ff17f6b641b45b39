use rocket::Error;
use sentence_lab::database::{establish_connection, run_migrations};
use sentence_lab::env::get_database_url;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url = get_database_url();
    let mut database_connection =
        establish_connection(&database_url).expect("database connection should be established");
    run_migrations(&mut database_connection).expect("migrations should run");
    tracing::info!(database_url = %database_url, "database ready");

    sentence_lab::rocket(&database_url).launch().await?;

    Ok(())
}
