//! # usuarios
//!
//! A small REST service over an in-memory list of users, built on a minimal
//! hyper-based router.
//!
//! ## Layout
//!
//! - [`validate`]: the user-name rule
//! - [`store`]: the in-memory user collection and its shared handle
//! - [`api`]: one handler per operation, plus the product list
//! - [`Router`], [`middleware`], [`Server`]: the HTTP plumbing
//! - [`app::router`]: everything wired together
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use usuarios::{Config, Server, SharedStore, UserStore, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), usuarios::Error> {
//!     let config = Config::from_env()?;
//!     let router = app::router(&config, SharedStore::new(UserStore::seeded()));
//!     Server::bind(config.addr()).serve(router).await
//! }
//! ```
//!
//! Handlers are plain async functions over a [`Request`]:
//!
//! ```rust,no_run
//! use usuarios::{Json, Request, Router, SharedStore, Status, User};
//!
//! async fn first_user(req: Request) -> Result<Json<User>, Status> {
//!     let store = req.state::<SharedStore>().ok_or(Status::InternalServerError)?;
//!     let first = store.lock().list().first().cloned();
//!     first.map(Json).ok_or(Status::NotFound)
//! }
//!
//! let _router = Router::new().get("/api/usuarios/first", first_user);
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod app;
pub mod config;
pub mod health;
pub mod middleware;
pub mod store;
pub mod validate;

pub use config::{Config, Environment};
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::{BodyError, Request};
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Router, Service};
pub use server::{MAX_BODY_BYTES, Server};
pub use status::Status;
pub use store::{SharedStore, User, UserStore};
