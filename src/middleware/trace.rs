//! Access logging.
//!
//! One `info` event per request in the shape
//! `GET /api/usuarios 200 142 - 0.311 ms`, emitted inside a `request` span
//! that carries the method and path so handler logs nest under it.

use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::middleware::Next;
use crate::request::Request;
use crate::response::Response;

/// Logs method, path, status, body length and latency for every request.
///
/// Install it first so the latency covers the rest of the chain:
///
/// ```rust,no_run
/// use usuarios::{Router, middleware::trace};
///
/// let app = Router::new().layer(trace::log_requests);
/// ```
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.path().to_owned();
    let span = info_span!("request", %method, %path);

    async move {
        let started = Instant::now();
        let res = next.run(req).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        info!(
            status = res.status_code(),
            length = res.body().len(),
            "{method} {path} {} {} - {elapsed_ms:.3} ms",
            res.status_code(),
            res.body().len(),
        );
        res
    }
    .instrument(span)
    .await
}
