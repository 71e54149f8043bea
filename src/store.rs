//! In-memory user store.
//!
//! [`UserStore`] owns every [`User`] for the lifetime of the process and
//! keeps them in insertion order. Ids come from a counter that only moves
//! forward, so an id freed by a delete is never handed out again.
//!
//! Handlers reach the store through [`SharedStore`], a mutex-guarded handle
//! attached to the router as state. Every operation is a short, non-async
//! critical section.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::ValidName;

/// A user record as stored and as sent over the wire.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: u64,
    pub nombre: String,
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(u64),
}

/// Names loaded by [`UserStore::seeded`], given ids 1 through 4.
pub const SEED_NAMES: [&str; 4] = ["Juan", "Karen", "Diego", "Luis"];

/// Ordered collection of users with monotonic id assignment.
#[derive(Debug)]
pub struct UserStore {
    users: Vec<User>,
    next_id: u64,
}

impl UserStore {
    pub fn new() -> Self {
        Self { users: Vec::new(), next_id: 1 }
    }

    /// A store holding [`SEED_NAMES`] as users 1 to 4.
    pub fn seeded() -> Self {
        Self::with_users(SEED_NAMES.iter().zip(1..).map(|(name, id)| User {
            id,
            nombre: (*name).to_owned(),
        }))
    }

    /// A store preloaded with `users`, in order. A record whose id is
    /// already present is skipped so ids stay unique. The next assigned id
    /// is one past the largest id seen.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let mut store = Self::new();
        for user in users {
            if store.position(user.id).is_some() {
                continue;
            }
            store.next_id = store.next_id.max(user.id.saturating_add(1));
            store.users.push(user);
        }
        store
    }

    /// All users in insertion order.
    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn find_by_id(&self, id: u64) -> Result<&User, StoreError> {
        self.users.iter()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Appends a user under the next free id and returns it.
    pub fn create(&mut self, name: ValidName) -> User {
        let user = User { id: self.next_id, nombre: name.into_inner() };
        self.next_id += 1;
        self.users.push(user.clone());
        user
    }

    pub fn update_name(&mut self, id: u64, name: ValidName) -> Result<User, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let user = &mut self.users[index];
        user.nombre = name.into_inner();
        Ok(user.clone())
    }

    /// Removes a user, returning the removed record.
    pub fn delete(&mut self, id: u64) -> Result<User, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        Ok(self.users.remove(index))
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }
}

impl Default for UserStore {
    fn default() -> Self { Self::new() }
}

/// Parses a user id from a path segment.
///
/// Leading whitespace and one optional `+` are skipped, then the leading
/// run of ASCII digits is read, so `"42"`, `"+42"` and `"42abc"` all yield
/// `42`. Anything without leading digits, or too large for a `u64`, yields
/// `None`.
pub fn parse_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// A cloneable handle to a [`UserStore`] shared by all request handlers.
#[derive(Clone, Debug, Default)]
pub struct SharedStore(Arc<Mutex<UserStore>>);

impl SharedStore {
    pub fn new(store: UserStore) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    /// Locks the store. A panic in another handler while it held the lock
    /// cannot leave a half-applied operation behind (each one is a single
    /// `Vec` mutation), so a poisoned lock is recovered rather than
    /// propagated.
    pub fn lock(&self) -> MutexGuard<'_, UserStore> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
