//! Fixed product catalogue.

use crate::request::Request;
use crate::response::Json;

pub const PRODUCTS: [&str; 3] = ["mouse", "teclado", "bocinas"];

/// `GET /api/productos`
pub async fn list(_req: Request) -> Json<[&'static str; 3]> {
    Json(PRODUCTS)
}
