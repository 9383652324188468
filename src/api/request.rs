//! # Request Bodies
//!
//! JSON payloads accepted by the guest endpoints. The older field names
//! (`guest_name`, `confirmation`, `quotas`, `accompanist_name`) are accepted
//! as aliases.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;

use crate::store::{GuestPatch, NewGuest};

use super::errors::ApiError;

/// `Json` extractor whose rejections render as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Path` extractor whose rejections render as [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Body of `POST /guests/`
#[derive(Debug, Clone, Deserialize)]
pub struct GuestCreate {
    #[serde(alias = "guest_name")]
    pub name: String,
    #[serde(default, alias = "confirmation")]
    pub confirmed: bool,
    #[serde(alias = "quotas")]
    pub quota: i64,
}

impl From<GuestCreate> for NewGuest {
    fn from(body: GuestCreate) -> Self {
        NewGuest::new(body.name, body.confirmed, body.quota)
    }
}

/// Body of `PATCH /guests/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestUpdate {
    #[serde(default, alias = "guest_name")]
    pub name: Option<String>,
    #[serde(default, alias = "confirmation")]
    pub confirmed: Option<bool>,
    #[serde(default, alias = "quotas")]
    pub quota: Option<i64>,
}

impl From<GuestUpdate> for GuestPatch {
    fn from(body: GuestUpdate) -> Self {
        GuestPatch {
            name: body.name,
            confirmed: body.confirmed,
            quota: body.quota,
        }
    }
}

/// Body of `POST /guests/{id}/accompanists/` and `PUT /guests/{id}/accompanists/{aid}`
#[derive(Debug, Clone, Deserialize)]
pub struct AccompanistCreate {
    #[serde(alias = "accompanist_name")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_create_defaults_unconfirmed() {
        let body: GuestCreate = serde_json::from_str(r#"{"name": "Ana", "quota": 2}"#).unwrap();
        assert!(!body.confirmed);
        assert_eq!(body.quota, 2);
    }

    #[test]
    fn test_guest_create_aliases() {
        let body: GuestCreate = serde_json::from_str(
            r#"{"guest_name": "Ana", "confirmation": true, "quotas": 3}"#,
        )
        .unwrap();
        assert_eq!(body.name, "Ana");
        assert!(body.confirmed);
        assert_eq!(body.quota, 3);
    }

    #[test]
    fn test_guest_create_requires_quota() {
        assert!(serde_json::from_str::<GuestCreate>(r#"{"name": "Ana"}"#).is_err());
    }

    #[test]
    fn test_guest_update_absent_fields() {
        let body: GuestUpdate = serde_json::from_str(r#"{"quota": 1}"#).unwrap();
        let patch = GuestPatch::from(body);
        assert_eq!(patch.quota, Some(1));
        assert!(patch.name.is_none());
        assert!(patch.confirmed.is_none());

        let empty: GuestUpdate = serde_json::from_str("{}").unwrap();
        let patch = GuestPatch::from(empty);
        assert!(patch.name.is_none() && patch.confirmed.is_none() && patch.quota.is_none());
    }

    #[test]
    fn test_accompanist_alias() {
        let body: AccompanistCreate =
            serde_json::from_str(r#"{"accompanist_name": "Luis"}"#).unwrap();
        assert_eq!(body.name, "Luis");
    }
}
