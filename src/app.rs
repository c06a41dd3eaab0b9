//! The greeting application: one route, one fixed JSON payload.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub const GREETING: &str = "Hello World";

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greeting {
    pub message: String,
}

impl Default for Greeting {
    fn default() -> Self {
        Greeting {
            message: GREETING.to_owned(),
        }
    }
}

async fn root() -> Json<Greeting> {
    Json(Greeting::default())
}

/// Builds the router shared by the Lambda adapter and the HTTP server.
///
/// Unknown paths and methods fall through to axum's own 404 and 405.
/// `HEAD /` is served by the GET route with the body dropped.
pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .layer(TraceLayer::new_for_http())
}
