//! guestlist - guests, their accompanists and the quota between them
//!
//! A small REST service over SQLite:
//! - `store`: the Guest Store and its quota/cascade rules
//! - `api`: HTTP request/response mapping
//! - `server`, `config`, `cli`, `telemetry`: process plumbing

pub mod api;
pub mod cli;
pub mod config;
pub mod server;
pub mod store;
pub mod telemetry;

pub use config::AppConfig;
pub use server::{build_router, HttpServer, API_PREFIX};
pub use store::{GuestStore, StoreError, StoreResult};
