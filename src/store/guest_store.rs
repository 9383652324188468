//! # Guest Store
//!
//! SQLite-backed persistence for guests and accompanists.
//!
//! Every mutating operation runs in a single `BEGIN IMMEDIATE` transaction. Cascaded deletions
//! (guest removal, disconfirmation, quota reduction) commit together with the
//! change that triggered them or not at all.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, instrument};

use super::errors::{StoreError, StoreResult};
use super::model::{
    validate_name, validate_quota, Accompanist, Cascade, Guest, GuestPatch, GuestRow, NewGuest,
};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS guests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(100) NOT NULL,
        confirmed BOOLEAN NOT NULL DEFAULT 0,
        quota INTEGER NOT NULL CHECK (quota >= 0)
    )",
    "CREATE TABLE IF NOT EXISTS accompanists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(100) NOT NULL,
        guest_id INTEGER NOT NULL REFERENCES guests(id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_accompanists_guest_id ON accompanists (guest_id)",
];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns all guest and accompanist state.
#[derive(Debug, Clone)]
pub struct GuestStore {
    pool: SqlitePool,
}

impl GuestStore {
    /// Open (creating if missing) the database behind `url` and apply the schema.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.migrate().await?;
        info!(url, "guest store ready");
        Ok(store)
    }

    /// Private in-memory database, mainly for tests.
    ///
    /// An in-memory SQLite database lives and dies with its connection, so the
    /// pool is pinned to one connection that never expires.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the tables if they do not exist yet.
    pub async fn migrate(&self) -> StoreResult<()> {
        let mut tx = self.begin_write().await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        debug!("schema applied");
        Ok(())
    }

    /// Round trip to the database.
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Open a transaction that holds the write lock from its first statement.
    ///
    /// A deferred transaction that reads before writing cannot be upgraded
    /// while another writer is active; SQLite then fails with `SQLITE_BUSY`
    /// without consulting the busy timeout. `BEGIN IMMEDIATE` waits instead.
    async fn begin_write(&self) -> StoreResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn create_guest(&self, new_guest: NewGuest) -> StoreResult<Guest> {
        validate_name("name", &new_guest.name)?;
        let quota = validate_quota(new_guest.quota)?;

        let mut tx = self.begin_write().await?;
        let id = sqlx::query("INSERT INTO guests (name, confirmed, quota) VALUES (?, ?, ?)")
            .bind(new_guest.name.as_str())
            .bind(new_guest.confirmed)
            .bind(quota)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        let guest = load_guest(&mut tx, id).await?;
        tx.commit().await?;

        info!(guest_id = id, quota, "guest created");
        Ok(guest)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_guest(&self, id: i64) -> StoreResult<Guest> {
        let mut conn = self.pool.acquire().await?;
        load_guest(&mut conn, id).await
    }

    /// All guests in creation order.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_guests(&self) -> StoreResult<Vec<Guest>> {
        // One transaction so guests and accompanists come from the same snapshot.
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, GuestRow>(
            "SELECT id, name, confirmed, quota FROM guests ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;
        let accompanists = sqlx::query_as::<_, Accompanist>(
            "SELECT id, name, guest_id FROM accompanists ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let mut by_guest: HashMap<i64, Vec<Accompanist>> = HashMap::new();
        for accompanist in accompanists {
            by_guest
                .entry(accompanist.guest_id)
                .or_default()
                .push(accompanist);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let owned = by_guest.remove(&row.id).unwrap_or_default();
                row.with_accompanists(owned)
            })
            .collect())
    }

    /// Attach a new accompanist, refusing once the quota is used up.
    #[instrument(level = "debug", skip(self))]
    pub async fn add_accompanist(&self, guest_id: i64, name: &str) -> StoreResult<Guest> {
        validate_name("name", name)?;

        let mut tx = self.begin_write().await?;
        let guest = fetch_guest_row(&mut tx, guest_id)
            .await?
            .ok_or(StoreError::GuestNotFound(guest_id))?;

        // Check and insert in one statement so concurrent adds cannot both pass.
        let inserted = sqlx::query(
            "INSERT INTO accompanists (name, guest_id)
             SELECT ?, g.id FROM guests g
             WHERE g.id = ?
               AND g.quota > (SELECT COUNT(*) FROM accompanists a WHERE a.guest_id = g.id)",
        )
        .bind(name)
        .bind(guest_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(StoreError::QuotaExceeded {
                guest_id,
                quota: guest.quota,
            });
        }

        let updated = load_guest(&mut tx, guest_id).await?;
        tx.commit().await?;

        debug!(guest_id, remaining = updated.remaining_quota(), "accompanist added");
        Ok(updated)
    }

    /// Delete a guest together with all of its accompanists.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_guest(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.begin_write().await?;
        let removed = sqlx::query("DELETE FROM accompanists WHERE guest_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let deleted = sqlx::query("DELETE FROM guests WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::GuestNotFound(id));
        }
        tx.commit().await?;

        info!(guest_id = id, accompanists_removed = removed, "guest deleted");
        Ok(())
    }

    /// Delete an accompanist, but only if it belongs to `guest_id`.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_accompanist(&self, guest_id: i64, accompanist_id: i64) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM accompanists WHERE id = ? AND guest_id = ?")
            .bind(accompanist_id)
            .bind(guest_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::AccompanistNotFound {
                guest_id,
                accompanist_id,
            });
        }
        Ok(())
    }

    /// Rename an accompanist scoped to its owning guest.
    #[instrument(level = "debug", skip(self))]
    pub async fn rename_accompanist(
        &self,
        guest_id: i64,
        accompanist_id: i64,
        name: &str,
    ) -> StoreResult<Accompanist> {
        validate_name("name", name)?;

        let mut tx = self.begin_write().await?;
        let updated = sqlx::query("UPDATE accompanists SET name = ? WHERE id = ? AND guest_id = ?")
            .bind(name)
            .bind(accompanist_id)
            .bind(guest_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(StoreError::AccompanistNotFound {
                guest_id,
                accompanist_id,
            });
        }

        let accompanist = sqlx::query_as::<_, Accompanist>(
            "SELECT id, name, guest_id FROM accompanists WHERE id = ?",
        )
        .bind(accompanist_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(accompanist)
    }

    /// Apply a partial update, then the disconfirmation or quota cascade.
    #[instrument(level = "debug", skip(self))]
    pub async fn update_guest(&self, guest_id: i64, patch: GuestPatch) -> StoreResult<Guest> {
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        let quota = patch.quota.map(validate_quota).transpose()?;

        let mut tx = self.begin_write().await?;
        if fetch_guest_row(&mut tx, guest_id).await?.is_none() {
            return Err(StoreError::GuestNotFound(guest_id));
        }
        let current_ids = accompanist_ids(&mut tx, guest_id).await?;

        sqlx::query(
            "UPDATE guests
             SET name = COALESCE(?, name),
                 confirmed = COALESCE(?, confirmed),
                 quota = COALESCE(?, quota)
             WHERE id = ?",
        )
        .bind(patch.name.as_deref())
        .bind(patch.confirmed)
        .bind(quota)
        .bind(guest_id)
        .execute(&mut *tx)
        .await?;

        let cascade = Cascade::plan(patch.confirmed, quota, current_ids.len());
        let victims = cascade.victims(&current_ids);
        for accompanist_id in victims.iter().copied() {
            sqlx::query("DELETE FROM accompanists WHERE id = ?")
                .bind(accompanist_id)
                .execute(&mut *tx)
                .await?;
        }

        let guest = load_guest(&mut tx, guest_id).await?;
        tx.commit().await?;

        if !victims.is_empty() {
            info!(guest_id, ?cascade, removed = victims.len(), "accompanists cascaded");
        }
        Ok(guest)
    }
}

async fn fetch_guest_row(conn: &mut SqliteConnection, id: i64) -> StoreResult<Option<GuestRow>> {
    let row = sqlx::query_as::<_, GuestRow>(
        "SELECT id, name, confirmed, quota FROM guests WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

async fn accompanist_ids(conn: &mut SqliteConnection, guest_id: i64) -> StoreResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM accompanists WHERE guest_id = ? ORDER BY id",
    )
    .bind(guest_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ids)
}

async fn load_guest(conn: &mut SqliteConnection, id: i64) -> StoreResult<Guest> {
    let row = fetch_guest_row(conn, id)
        .await?
        .ok_or(StoreError::GuestNotFound(id))?;
    let accompanists = sqlx::query_as::<_, Accompanist>(
        "SELECT id, name, guest_id FROM accompanists WHERE guest_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(row.with_accompanists(accompanists))
}
