use std::sync::Arc;

use walkability::config::Config;
use walkability::db::PgStore;
use walkability::engine::Engine;
use walkability::error::Error;
use walkability::external::nominatim::Nominatim;
use walkability::isochrone::Calculator;
use walkability::network;
use walkability::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    // schema and network are ready before the listener is bound
    let store = PgStore::connect(&config.database_url, config.database_max_connections).await?;
    let network = network::load(&config).await?;

    let calculator = Calculator::new(
        Arc::new(network),
        config.walking_speed_kph,
        config.network_max_snap_meters,
    );
    let geocoder = Nominatim::new(&config.nominatim_api_base, &config.nominatim_user_agent);

    let engine = Engine::new(Arc::new(store), Arc::new(geocoder), calculator);

    serve(engine, config.bind_address).await
}
