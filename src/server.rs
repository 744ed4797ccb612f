use std::collections::HashMap;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

use crate::model::Coordinate;
use crate::query;
use crate::PropertyStore;

// Mirrors the 50MB body cap of the ingestion feed.
const MAX_BODY_BYTES: u64 = 50 * 1024 * 1024;

pub struct PropertyServer {
    store: Arc<PropertyStore>,
    radius_miles: f64,
    received_path: PathBuf,
}

impl PropertyServer {
    pub fn new(store: Arc<PropertyStore>, radius_miles: f64, received_path: PathBuf) -> Self {
        Self {
            store,
            radius_miles,
            received_path,
        }
    }

    pub async fn run(self, port: u16) {
        let routes = self.routes();
        println!("Server is running on port {}", port);
        warp::serve(routes).run(([0, 0, 0, 0], port)).await;
    }

    /// The full route set, separable from the listener so tests can drive
    /// it through `warp::test`.
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        // 1. GET /properties_within_radius?latitude=..&longitude=..
        let within_radius = warp::get()
            .and(warp::path("properties_within_radius"))
            .and(warp::path::end())
            .and(warp::query::<HashMap<String, String>>())
            .and(with_store(self.store.clone()))
            .and(with_radius(self.radius_miles))
            .and_then(handle_within_radius);

        // 2. POST /update_properties
        let update = warp::post()
            .and(warp::path("update_properties"))
            .and(warp::path::end())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::json())
            .and(with_received_path(self.received_path.clone()))
            .and_then(handle_update_properties);

        within_radius.or(update)
    }
}

fn with_store(
    store: Arc<PropertyStore>,
) -> impl Filter<Extract = (Arc<PropertyStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_radius(radius_miles: f64) -> impl Filter<Extract = (f64,), Error = Infallible> + Clone {
    warp::any().map(move || radius_miles)
}

fn with_received_path(
    path: PathBuf,
) -> impl Filter<Extract = (PathBuf,), Error = Infallible> + Clone {
    warp::any().map(move || path.clone())
}

async fn handle_within_radius(
    params: HashMap<String, String>,
    store: Arc<PropertyStore>,
    radius_miles: f64,
) -> Result<impl warp::Reply, warp::Rejection> {
    // An empty value counts as absent, same as a missing parameter.
    let (latitude, longitude) = match (
        params.get("latitude").filter(|v| !v.is_empty()),
        params.get("longitude").filter(|v| !v.is_empty()),
    ) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            let body = json!({ "message": "Latitude and longitude are required parameters." });
            return Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    // Unparseable values fall through as NaN: every distance comparison
    // fails and the result is empty rather than an error.
    let center = Coordinate {
        latitude: latitude.parse().unwrap_or(f64::NAN),
        longitude: longitude.parse().unwrap_or(f64::NAN),
    };

    let snapshot = store.current();
    let matches = query::within_radius(center, radius_miles, &snapshot);

    let body = json!({ "propertiesWithinRadius": matches });
    Ok(warp::reply::with_status(
        warp::reply::json(&body),
        StatusCode::OK,
    ))
}

async fn handle_update_properties(
    body: Value,
    received_path: PathBuf,
) -> Result<impl warp::Reply, warp::Rejection> {
    match write_received(&received_path, &body) {
        Ok(()) => {
            let reply = json!({
                "message": "Properties updated successfully",
                "properties": body,
            });
            Ok(warp::reply::with_status(
                warp::reply::json(&reply),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            eprintln!("[HTTP] update_properties write failed: {}", e);
            let reply = json!({ "message": format!("An error occurred: {}", e) });
            Ok(warp::reply::with_status(
                warp::reply::json(&reply),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Raw payload dump, unrelated to the watched snapshot file.
fn write_received(path: &Path, body: &Value) -> std::io::Result<()> {
    let pretty = serde_json::to_string_pretty(body)?;
    std::fs::write(path, pretty)
}
