// --- File: crates/bookify_common/src/routes.rs ---
use axum::{routing::get, Router};

/// Creates a router containing routes shared by every deployment.
///
/// `/ping` answers `pong` as a liveness probe.
pub fn routes() -> Router {
    Router::new().route("/ping", get(|| async { "pong" }))
}
