use std::env;

use carrus::engine::Engine;
use carrus::external::records::RecordStore;
use carrus::filter::{JsonFileStore, LocationFilter};
use carrus::server::serve;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let store = RecordStore::from_env().unwrap();
    let engine = Engine::new(store);

    let email = env::var("DRIVER_EMAIL").unwrap();
    let driver = engine.find_driver_by_email(&email).await.unwrap();

    let filter = LocationFilter::load(Box::new(JsonFileStore::from_env().unwrap())).unwrap();

    serve(engine, driver, filter).await;
}
