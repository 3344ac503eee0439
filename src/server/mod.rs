mod handlers;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::Extension,
    routing::{get, patch},
    Router,
};

use crate::api::{DynAPI, API};
use crate::entities::Driver;
use crate::filter::LocationFilter;
use crate::server::handlers::{filter, notifications, offers, requests, vehicles};

/// The saved radius filter, shared between the request-list and filter
/// handlers.
pub type SharedFilter = Arc<Mutex<LocationFilter>>;

pub async fn serve<T: API + Sync + Send + 'static>(api: T, driver: Driver, filter: LocationFilter) {
    tracing_subscriber::fmt::init();

    let api = Arc::new(api) as DynAPI;
    let filter: SharedFilter = Arc::new(Mutex::new(filter));

    let app = Router::new()
        .route("/requests", get(requests::list))
        .route("/requests/:id", get(requests::find))
        .route("/requests/:id/path", get(requests::resolve_path))
        .route("/offers", get(offers::list).post(offers::create))
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .route(
            "/vehicles/:id",
            axum::routing::put(vehicles::update).delete(vehicles::remove),
        )
        .route(
            "/notifications",
            get(notifications::list).post(notifications::create),
        )
        .route("/notifications/read_all", patch(notifications::read_all))
        .route(
            "/filter",
            get(filter::find).put(filter::save).delete(filter::clear),
        )
        .route("/filter/geocode", get(filter::geocode))
        .route("/filter/reverse_geocode", get(filter::reverse_geocode))
        .layer(Extension(api))
        .layer(Extension(driver))
        .layer(Extension(filter));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
