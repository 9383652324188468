//! # Guest Store
//!
//! Persistent guests and accompanists, and the rules tying them together:
//!
//! - an accompanist always belongs to an existing guest
//! - a guest never holds more accompanists than its quota
//! - deleting or disconfirming a guest removes its accompanists
//! - lowering a quota removes the most recently added accompanists first

mod errors;
mod guest_store;
mod model;

pub use errors::{StoreError, StoreResult};
pub use guest_store::GuestStore;
pub use model::{
    validate_name, validate_quota, Accompanist, Cascade, Guest, GuestPatch, NewGuest, MAX_NAME_LEN,
};
