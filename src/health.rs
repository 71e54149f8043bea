//! Liveness and readiness checks.
//!
//! | Check | Path | Answers |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Can the process answer HTTP at all? |
//! | **Readiness** | `/readyz` | Is the user store attached and usable? |
//!
//! Both reply with `cache-control: no-store` so intermediaries never serve a
//! stale health result.

use crate::store::SharedStore;
use crate::{Request, Response, Status};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::builder()
        .header("cache-control", "no-store")
        .text("ok")
}

/// `200 OK` with body `"ready"` once the router carries a user store,
/// `503` otherwise.
pub async fn readiness(req: Request) -> Response {
    let Some(store) = req.state::<SharedStore>() else {
        return Response::builder()
            .status(Status::ServiceUnavailable)
            .header("cache-control", "no-store")
            .no_body();
    };

    let users = store.lock().len();
    Response::builder()
        .header("cache-control", "no-store")
        .header("x-user-count", &users.to_string())
        .text("ready")
}
