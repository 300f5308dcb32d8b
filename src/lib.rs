//! Aeroparc quote engine.
//!
//! Turns a parking stay, the active price plan, selected add-on options, and
//! a party size into a deterministic price breakdown. The booking forms and
//! the admin pricing calculator call this service over HTTP/JSON; the
//! calculation core itself is pure and side-effect free.

pub mod cache;
pub mod error;
pub mod quote;

use sqlx::PgPool;

use crate::cache::AppCache;

/// Shared application state for axum handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}
