//! # Response Formatting

use serde::{Deserialize, Serialize};

use crate::store::{Accompanist, Guest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccompanistResponse {
    pub id: i64,
    pub name: String,
}

impl From<Accompanist> for AccompanistResponse {
    fn from(accompanist: Accompanist) -> Self {
        Self {
            id: accompanist.id,
            name: accompanist.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestResponse {
    pub id: i64,
    pub name: String,
    pub confirmed: bool,
    pub quota: u32,
    pub accompanists: Vec<AccompanistResponse>,
}

impl From<Guest> for GuestResponse {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            name: guest.name,
            confirmed: guest.confirmed,
            quota: guest.quota,
            accompanists: guest.accompanists.into_iter().map(Into::into).collect(),
        }
    }
}

/// Confirmation body for deletions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
