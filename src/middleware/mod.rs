//! Middleware layer.
//!
//! Middleware intercepts requests before routing and sees the response on the
//! way back out. Layers run in the order they were registered with
//! [`Router::layer`](crate::Router::layer); each one either answers the
//! request itself or hands it on with [`Next::run`].
//!
//! ```text
//! request ──▶ layer 0 ──▶ layer 1 ──▶ … ──▶ route handler
//! response ◀─ layer 0 ◀─ layer 1 ◀─ … ◀──┘
//! ```
//!
//! Any `Fn(Request, Next) -> impl Future<Output = Response>` is a middleware:
//!
//! ```rust,no_run
//! use usuarios::middleware::Next;
//! use usuarios::{Request, Response, Router};
//!
//! async fn server_header(req: Request, next: Next) -> Response {
//!     let mut res = next.run(req).await;
//!     res.set_header("server", "usuarios");
//!     res
//! }
//!
//! let app = Router::new().layer(server_header);
//! ```
//!
//! Built-in middleware:
//! - [`trace::log_requests`]: one access-log event per request
//! - [`statics::ServeDir`]: serve files from a directory, fall through otherwise

pub mod statics;
pub mod trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::BoxedHandler;
use crate::request::Request;
use crate::response::Response;

pub use crate::handler::BoxFuture;

/// A request interceptor. Implemented for every matching `Fn`; implement it
/// directly on a struct when the middleware carries configuration.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin(self(req, next))
    }
}

/// The remainder of the chain after the current layer.
pub struct Next {
    layers: Arc<[BoxedMiddleware]>,
    endpoint: BoxedHandler,
    index: usize,
}

impl Next {
    pub(crate) fn new(layers: Arc<[BoxedMiddleware]>, endpoint: BoxedHandler) -> Self {
        Self { layers, endpoint, index: 0 }
    }

    /// Passes the request to the next layer, or to the router once every
    /// layer has run.
    pub async fn run(mut self, req: Request) -> Response {
        match self.layers.get(self.index).cloned() {
            Some(layer) => {
                self.index += 1;
                layer.call(req, self).await
            }
            None => self.endpoint.call(req).await,
        }
    }
}
