//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. A [`Router`] is the
//! builder; [`Router::into_service`] freezes it into a cheaply cloneable
//! [`Service`] that runs the middleware chain and then the matched handler.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Each registration returns `self` so calls chain naturally. Path
/// parameters use `{name}` syntax and are read with
/// [`Request::param`](crate::Request::param).
///
/// ```rust,no_run
/// # use usuarios::{Method, Request, Response, Router};
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// # async fn create_user(_: Request) -> Response { Response::text("") }
/// # async fn delete_user(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .on(Method::Delete, "/api/usuarios/{id}", delete_user)
///     .get("/api/usuarios/{id}", get_user)
///     .post("/api/usuarios", create_user);
/// ```
pub struct Router {
    routes: Routes,
    layers: Vec<BoxedMiddleware>,
    state: http::Extensions,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Routes { trees: HashMap::new() },
            layers: Vec::new(),
            state: http::Extensions::new(),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for the same method. Routes are fixed at startup, so this
    /// is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes.trees
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Append a middleware. Layers run in registration order.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Attach a value every handler can read with
    /// [`Request::state`](crate::Request::state). One value per type.
    pub fn with_state<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.state.insert(value);
        self
    }

    /// Freeze the routing table and middleware chain.
    pub fn into_service(self) -> Service {
        Service {
            layers: self.layers.into(),
            endpoint: Arc::new(self.routes),
            state: self.state,
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// A frozen [`Router`]: the unit the server drives per request.
///
/// Also the entry point for in-process tests, which skip the network and
/// call [`Service::call`] with an already-buffered request.
#[derive(Clone)]
pub struct Service {
    layers: Arc<[BoxedMiddleware]>,
    endpoint: BoxedHandler,
    state: http::Extensions,
}

impl Service {
    /// Runs one request through the middleware chain and the router.
    pub async fn call(&self, req: http::Request<Bytes>) -> Response {
        let mut req = Request::from_http(req);
        req.extensions.extend(self.state.clone());
        Next::new(Arc::clone(&self.layers), Arc::clone(&self.endpoint))
            .run(req)
            .await
    }
}

// ── Route table ───────────────────────────────────────────────────────────────

/// The innermost link of the chain: picks a handler by method and path.
struct Routes {
    trees: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Routes {
    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let matched = self.trees.get(&method)?.at(route_path(path)).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Methods with a route matching `path`, for the `allow` header.
    fn allowed(&self, path: &str) -> Vec<Method> {
        Method::ALL.into_iter()
            .filter(|m| self.trees.get(m).is_some_and(|tree| tree.at(route_path(path)).is_ok()))
            .collect()
    }
}

/// A single trailing slash is not significant: `/api/usuarios/` routes like
/// `/api/usuarios`. The root path is left alone.
fn route_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

impl ErasedHandler for Routes {
    fn call(&self, mut req: Request) -> BoxFuture {
        let method = Method::try_from(req.method()).ok();

        if let Some((handler, params)) = method.and_then(|m| self.lookup(m, req.path())) {
            req.params = params;
            return handler.call(req);
        }

        let allowed = self.allowed(req.path());
        let res = if allowed.is_empty() {
            Response::builder()
                .status(Status::NotFound)
                .text(format!("Cannot {} {}", req.method(), req.path()))
        } else {
            let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            Response::builder()
                .status(Status::MethodNotAllowed)
                .header("allow", &allow)
                .no_body()
        };
        Box::pin(async move { res })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::IntoResponse;

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    fn request(method: &str, path: &str) -> http::Request<Bytes> {
        http::Request::builder().method(method).uri(path).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn extracts_path_params() {
        let app = Router::new().get("/api/usuarios/{id}", echo_id).into_service();
        let res = app.call(request("GET", "/api/usuarios/42")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let app = Router::new().get("/", echo_id).into_service();
        let res = app.call(request("GET", "/nope")).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.body(), b"Cannot GET /nope");
    }

    #[tokio::test]
    async fn one_trailing_slash_is_ignored() {
        let app = Router::new()
            .get("/", |_req: Request| async { "root" })
            .get("/api/usuarios", |_req: Request| async { "list" })
            .get("/api/usuarios/{id}", echo_id)
            .into_service();

        assert_eq!(app.call(request("GET", "/")).await.body(), b"root");
        assert_eq!(app.call(request("GET", "/api/usuarios/")).await.body(), b"list");
        assert_eq!(app.call(request("GET", "/api/usuarios/7/")).await.body(), b"7");
        assert_eq!(app.call(request("DELETE", "/api/usuarios/")).await.status_code(), 405);
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let app = Router::new()
            .get("/api/usuarios/{id}", echo_id)
            .delete("/api/usuarios/{id}", echo_id)
            .into_service();

        let res = app.call(request("PATCH", "/api/usuarios/1")).await;
        assert_eq!(res.status_code(), 405);
        assert_eq!(res.header("allow"), Some("GET, DELETE"));
    }

    #[tokio::test]
    async fn layers_run_in_registration_order() {
        async fn first(req: Request, next: Next) -> Response {
            let mut res = next.run(req).await;
            res.set_header("x-order", &format!("first>{}", res.header("x-order").unwrap_or("")));
            res
        }
        async fn second(req: Request, next: Next) -> Response {
            let mut res = next.run(req).await;
            res.set_header("x-order", "second");
            res
        }

        let app = Router::new()
            .layer(first)
            .layer(second)
            .get("/", |_req: Request| async { "ok" })
            .into_service();

        let res = app.call(request("GET", "/")).await;
        assert_eq!(res.header("x-order"), Some("first>second"));
    }

    #[tokio::test]
    async fn layer_can_short_circuit() {
        async fn deny(_req: Request, _next: Next) -> Response {
            Status::ServiceUnavailable.into_response()
        }

        let app = Router::new().layer(deny).get("/", echo_id).into_service();
        assert_eq!(app.call(request("GET", "/")).await.status_code(), 503);
    }

    #[tokio::test]
    async fn handlers_read_attached_state() {
        #[derive(Clone)]
        struct Greeting(&'static str);

        let app = Router::new()
            .with_state(Greeting("hola"))
            .get("/", |req: Request| async move {
                req.state::<Greeting>().map_or("missing", |g| g.0)
            })
            .into_service();

        assert_eq!(app.call(request("GET", "/")).await.body(), b"hola");
    }
}
