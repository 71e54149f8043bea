//! `/api/usuarios` resource.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/usuarios` | all users | |
//! | GET | `/api/usuarios/{id}` | the user | 404 |
//! | POST | `/api/usuarios` | the new user | 400 |
//! | PUT | `/api/usuarios/{id}` | the updated user | 404, then 400 |
//! | DELETE | `/api/usuarios/{id}` | the removed user | 404 |
//! | GET | `/api/usuarios/{year}/{month}` | the query string as an object | |
//!
//! The last route is registered as `{id}/{month}`, since the router allows one
//! parameter name per segment position.

use serde::Deserialize;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use tracing::info;

use crate::api::ApiError;
use crate::request::Request;
use crate::response::Json;
use crate::store::{SharedStore, User, parse_id};
use crate::validate::validate_name;

/// Body accepted by create and update. `nombre` stays untyped here so the
/// validator can tell a missing field from one of the wrong type.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub nombre: Option<Value>,
}

fn store(req: &Request) -> Result<&SharedStore, ApiError> {
    req.state::<SharedStore>().ok_or(ApiError::MissingState("user store"))
}

/// The `{id}` path segment, raw and parsed.
fn id_param(req: &Request) -> (String, Option<u64>) {
    let raw = req.param("id").unwrap_or_default();
    (raw.to_owned(), parse_id(raw))
}

/// `GET /api/usuarios`
pub async fn list(req: Request) -> Result<Json<Vec<User>>, ApiError> {
    let users = store(&req)?.lock().list().to_vec();
    Ok(Json(users))
}

/// `GET /api/usuarios/{id}`
pub async fn get(req: Request) -> Result<Json<User>, ApiError> {
    let (raw, id) = id_param(&req);
    let store = store(&req)?.lock();

    id.and_then(|id| store.find_by_id(id).ok())
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound(raw))
}

/// `POST /api/usuarios`
pub async fn create(req: Request) -> Result<Json<User>, ApiError> {
    let payload: UserPayload = req.payload()?;
    let name = validate_name(payload.nombre.as_ref())?;

    let user = store(&req)?.lock().create(name);
    info!(id = user.id, "user created");
    Ok(Json(user))
}

/// `PUT /api/usuarios/{id}`
///
/// Existence is checked before the body is looked at, so an unknown id is a
/// 404 even when the body is also invalid.
pub async fn update(req: Request) -> Result<Json<User>, ApiError> {
    let (raw, id) = id_param(&req);
    let mut store = store(&req)?.lock();

    let Some(id) = id.filter(|&id| store.find_by_id(id).is_ok()) else {
        return Err(ApiError::NotFound(raw));
    };

    let payload: UserPayload = req.payload()?;
    let name = validate_name(payload.nombre.as_ref())?;

    let user = store.update_name(id, name).map_err(|_| ApiError::NotFound(raw))?;
    info!(id = user.id, "user renamed");
    Ok(Json(user))
}

/// `DELETE /api/usuarios/{id}`
pub async fn delete(req: Request) -> Result<Json<User>, ApiError> {
    let (raw, id) = id_param(&req);
    let mut store = store(&req)?.lock();

    let user = id
        .and_then(|id| store.delete(id).ok())
        .ok_or(ApiError::NotFound(raw))?;
    info!(id = user.id, "user deleted");
    Ok(Json(user))
}

/// `GET /api/usuarios/{year}/{month}`
///
/// Echoes the query string as a JSON object. A key given more than once
/// becomes an array of its values.
pub async fn echo_query(req: Request) -> Json<Map<String, Value>> {
    let mut query = Map::new();
    for (key, value) in req.query_pairs() {
        match query.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Value::String(value));
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(values) => values.push(Value::String(value)),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
            },
        }
    }
    Json(query)
}
