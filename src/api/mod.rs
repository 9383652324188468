//! # API Layer
//!
//! JSON over HTTP in front of the [`GuestStore`](crate::store::GuestStore).
//!
//! # Endpoints (under `/api/v1`)
//!
//! - `POST   /guests/` - create a guest
//! - `GET    /guests/` - list guests
//! - `GET    /guests/{id}` - fetch a guest
//! - `PATCH  /guests/{id}` - partial update, with accompanist cascades
//! - `DELETE /guests/{id}` - delete a guest and its accompanists
//! - `POST   /guests/{id}/accompanists/` - add an accompanist
//! - `PUT    /guests/{id}/accompanists/{aid}` - rename an accompanist
//! - `DELETE /guests/{id}/accompanists/{aid}` - delete an accompanist

mod errors;
mod request;
mod response;
mod routes;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use request::{AccompanistCreate, AppJson, AppPath, GuestCreate, GuestUpdate};
pub use response::{AccompanistResponse, GuestResponse, HealthResponse, MessageResponse};
pub use routes::{guest_routes, health_routes, AppState};
