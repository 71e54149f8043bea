//! HTTP resource handlers.
//!
//! Every handler takes a [`Request`] and returns something that implements
//! [`IntoResponse`]; failures are [`ApiError`]s, which render as a status
//! code plus a plain-text message. Exactly one response leaves each handler.

pub mod products;
pub mod users;

use thiserror::Error;
use tracing::{debug, error};

use crate::request::{BodyError, Request};
use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::validate::ValidationError;

/// Plain-text greeting served at `/`.
pub const GREETING: &str = "Hola mundo desde Express!!";

/// `GET /`
pub async fn greeting(_req: Request) -> &'static str {
    GREETING
}

/// Every way a resource handler can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The id in the path does not resolve to a stored record. Carries the
    /// path segment exactly as the client sent it.
    #[error("El usuario {0} no se encuentra")]
    NotFound(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Body(#[from] BodyError),

    /// The router was assembled without state a handler depends on.
    #[error("{0} is not configured")]
    MissingState(&'static str),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound(_) => Status::NotFound,
            Self::Validation(_) | Self::Body(_) => Status::BadRequest,
            Self::MissingState(_) => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::MissingState(what) = self {
            error!(state = what, "handler state missing");
            return Response::builder().status(status).text("Internal Server Error");
        }

        debug!(status = u16::from(status), "{self}");
        Response::builder().status(status).text(self.to_string())
    }
}
