//! Application assembly: middleware order, routes and state.

use crate::api::{self, products, users};
use crate::config::Config;
use crate::health;
use crate::middleware::statics::ServeDir;
use crate::middleware::trace;
use crate::router::Router;
use crate::store::SharedStore;

/// Builds the full application router around `store`.
///
/// Layers, outermost first:
/// 1. static files from `config.static_dir`
/// 2. access logging, development only
///
/// then the routes below. A static file therefore shadows a route with the
/// same path, and static hits are not access-logged.
pub fn router(config: &Config, store: SharedStore) -> Router {
    let mut router = Router::new().layer(ServeDir::new(&config.static_dir));
    if config.environment.is_development() {
        router = router.layer(trace::log_requests);
    }

    router
        .with_state(store)
        .get("/", api::greeting)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .get("/api/productos", products::list)
        .get("/api/usuarios", users::list)
        .post("/api/usuarios", users::create)
        .get("/api/usuarios/{id}", users::get)
        .put("/api/usuarios/{id}", users::update)
        .delete("/api/usuarios/{id}", users::delete)
        // One parameter name per segment position: `{id}` here is the year.
        .get("/api/usuarios/{id}/{month}", users::echo_query)
}
