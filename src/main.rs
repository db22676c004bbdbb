use tracing_subscriber::EnvFilter;

use vicinity::config::Config;
use vicinity::engine::Engine;
use vicinity::error::Error;
use vicinity::server::serve;
use vicinity::store::PgStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = PgStore::new(&config.database_url, config.max_connections).await?;
    store.ensure_schema().await?;

    serve(Engine::new(store), config.bind_address).await
}
