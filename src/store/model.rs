//! Guest Store data model
//!
//! A `Guest` owns its accompanists. An accompanist never outlives its guest
//! and a guest never holds more accompanists than its quota.

use sqlx::FromRow;

use super::errors::{StoreError, StoreResult};

/// Maximum stored length of guest and accompanist names.
pub const MAX_NAME_LEN: usize = 100;

/// A guest together with its accompanists, ordered by creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub confirmed: bool,
    pub quota: u32,
    pub accompanists: Vec<Accompanist>,
}

impl Guest {
    /// Number of accompanist slots still free.
    pub fn remaining_quota(&self) -> u32 {
        self.quota
            .saturating_sub(u32::try_from(self.accompanists.len()).unwrap_or(u32::MAX))
    }
}

/// A person attached to a guest.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Accompanist {
    pub id: i64,
    pub name: String,
    pub guest_id: i64,
}

/// Row shape of the `guests` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct GuestRow {
    pub id: i64,
    pub name: String,
    pub confirmed: bool,
    pub quota: u32,
}

impl GuestRow {
    pub(crate) fn with_accompanists(self, accompanists: Vec<Accompanist>) -> Guest {
        Guest {
            id: self.id,
            name: self.name,
            confirmed: self.confirmed,
            quota: self.quota,
            accompanists,
        }
    }
}

/// Input for `create_guest`. Quota is signed so that negative values coming
/// from callers can be rejected rather than wrapped.
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub name: String,
    pub confirmed: bool,
    pub quota: i64,
}

impl NewGuest {
    pub fn new(name: impl Into<String>, confirmed: bool, quota: i64) -> Self {
        Self {
            name: name.into(),
            confirmed,
            quota,
        }
    }
}

/// Partial update for a guest. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct GuestPatch {
    pub name: Option<String>,
    pub confirmed: Option<bool>,
    pub quota: Option<i64>,
}

impl GuestPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = Some(confirmed);
        self
    }

    pub fn quota(mut self, quota: i64) -> Self {
        self.quota = Some(quota);
        self
    }
}

/// Reject empty, blank or over-long names.
pub fn validate_name(field: &'static str, name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::validation(field, "must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(StoreError::validation(
            field,
            format!("must be at most {} characters", MAX_NAME_LEN),
        ));
    }
    Ok(())
}

/// Narrow a caller-supplied quota to the stored representation.
pub fn validate_quota(quota: i64) -> StoreResult<u32> {
    if quota < 0 {
        return Err(StoreError::validation("quota", "must not be negative"));
    }
    u32::try_from(quota).map_err(|_| StoreError::validation("quota", "is too large"))
}

/// Accompanist removal triggered by a guest update.
///
/// Rules are evaluated in a fixed order: disconfirmation wins over a quota
/// reduction, so at most one of them applies per update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    /// Nothing to remove.
    None,
    /// Guest cancelled; every accompanist goes.
    RemoveAll,
    /// Quota dropped below the current count; remove this many, newest first.
    RemoveNewest(usize),
}

impl Cascade {
    /// Decide the cascade for a patch, given the accompanist count before the update.
    pub fn plan(confirmed: Option<bool>, quota: Option<u32>, current_count: usize) -> Self {
        if confirmed == Some(false) {
            return Cascade::RemoveAll;
        }
        match quota {
            Some(quota) if (quota as usize) < current_count => {
                Cascade::RemoveNewest(current_count - quota as usize)
            }
            _ => Cascade::None,
        }
    }

    /// Pick the accompanist ids to delete out of the guest's current ids.
    pub fn victims(&self, ids: &[i64]) -> Vec<i64> {
        match *self {
            Cascade::None => Vec::new(),
            Cascade::RemoveAll => ids.to_vec(),
            Cascade::RemoveNewest(count) => {
                let mut sorted = ids.to_vec();
                sorted.sort_unstable_by(|a, b| b.cmp(a));
                sorted.truncate(count);
                sorted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Ana").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_quota() {
        assert_eq!(validate_quota(0).unwrap(), 0);
        assert_eq!(validate_quota(3).unwrap(), 3);
        let err = validate_quota(-1).unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "quota", .. }));
        assert!(validate_quota(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_disconfirmation_removes_everything() {
        assert_eq!(Cascade::plan(Some(false), None, 2), Cascade::RemoveAll);
        // Even when the quota grows in the same patch.
        assert_eq!(Cascade::plan(Some(false), Some(10), 2), Cascade::RemoveAll);
        assert_eq!(Cascade::plan(Some(false), None, 0), Cascade::RemoveAll);
    }

    #[test]
    fn test_quota_reduction_trims_excess() {
        assert_eq!(Cascade::plan(None, Some(1), 3), Cascade::RemoveNewest(2));
        assert_eq!(Cascade::plan(Some(true), Some(0), 3), Cascade::RemoveNewest(3));
    }

    #[test]
    fn test_no_cascade() {
        assert_eq!(Cascade::plan(None, None, 3), Cascade::None);
        assert_eq!(Cascade::plan(Some(true), None, 3), Cascade::None);
        assert_eq!(Cascade::plan(None, Some(3), 3), Cascade::None);
        assert_eq!(Cascade::plan(None, Some(5), 3), Cascade::None);
    }

    #[test]
    fn test_victims_are_highest_ids() {
        let ids = [10, 42, 11, 7];
        assert_eq!(Cascade::RemoveNewest(2).victims(&ids), vec![42, 11]);
        assert_eq!(Cascade::RemoveNewest(0).victims(&ids), Vec::<i64>::new());
        assert_eq!(Cascade::RemoveAll.victims(&ids).len(), 4);
        assert!(Cascade::None.victims(&ids).is_empty());
    }

    #[test]
    fn test_remaining_quota() {
        let guest = Guest {
            id: 1,
            name: "Ana".to_string(),
            confirmed: true,
            quota: 2,
            accompanists: vec![Accompanist {
                id: 10,
                name: "Luis".to_string(),
                guest_id: 1,
            }],
        };
        assert_eq!(guest.remaining_quota(), 1);
    }

    #[test]
    fn test_patch_builder() {
        let patch = GuestPatch::default().quota(1).confirmed(true);
        assert_eq!(patch.quota, Some(1));
        assert_eq!(patch.confirmed, Some(true));
        assert!(patch.name.is_none());
    }
}
