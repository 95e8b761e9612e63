//! [`SqliteStore`]: the SQLite implementation of [`RegistryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, Transaction};

use parish_core::{
  baptism::{BaptismDetails, BaptismRecord, BaptismView},
  marriage::{MarriageRecord, NewMarriage},
  member::{Member, MemberPatch, MemberQuery, NewMember},
  sacrament::{NewSacrament, Sacrament, SacramentSummary},
  store::RegistryStore,
};

use crate::{Error, Result, register, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A parish registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the database thread outside an explicit transaction.
  async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside one transaction. It commits if `f` succeeds and rolls
  /// back otherwise, so none of the rows `f` wrote survive a failure.
  async fn transact<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match f(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          Err(e) => {
            tx.rollback()?;
            tracing::warn!(error = %e, "register write rolled back");
            Ok(Err(e))
          }
        }
      })
      .await?
  }
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = Error;

  // ── Members ───────────────────────────────────────────────────────────────

  async fn add_member(&self, input: NewMember) -> Result<Member> {
    self
      .with_conn(move |conn| register::insert_member(conn, input, Utc::now()))
      .await
  }

  async fn get_member(&self, member_id: i64) -> Result<Option<Member>> {
    self.with_conn(move |conn| register::member(conn, member_id)).await
  }

  async fn list_members<'a>(&'a self, query: &'a MemberQuery) -> Result<Vec<Member>> {
    let query = query.clone();
    self
      .with_conn(move |conn| register::list_members(conn, &query))
      .await
  }

  async fn update_member(&self, member_id: i64, patch: MemberPatch) -> Result<Member> {
    self
      .transact(move |conn| register::update_member(conn, member_id, patch, Utc::now()))
      .await
  }

  // ── Sacrament facts ───────────────────────────────────────────────────────

  async fn record_sacrament(&self, input: NewSacrament, recorded_by: i64) -> Result<Sacrament> {
    self
      .transact(move |tx| register::record_sacrament(tx, &input, recorded_by, Utc::now()))
      .await
  }

  async fn get_sacrament(&self, sacrament_id: i64) -> Result<Option<Sacrament>> {
    self
      .with_conn(move |conn| register::sacrament(conn, sacrament_id))
      .await
  }

  async fn list_sacraments(&self, member_id: i64) -> Result<Vec<Sacrament>> {
    self
      .with_conn(move |conn| register::sacraments_for(conn, member_id))
      .await
  }

  async fn sacrament_summary(&self, member_id: i64) -> Result<Option<SacramentSummary>> {
    self.with_conn(move |conn| register::summary(conn, member_id)).await
  }

  // ── Baptism register ──────────────────────────────────────────────────────

  async fn record_baptism(
    &self,
    input: BaptismDetails,
    recorded_by: i64,
  ) -> Result<BaptismRecord> {
    self
      .transact(move |tx| register::record_baptism(tx, &input, recorded_by, Utc::now()))
      .await
  }

  async fn baptism_for_member(&self, member_id: i64) -> Result<Option<BaptismView>> {
    self
      .with_conn(move |conn| register::baptism_view(conn, member_id))
      .await
  }

  async fn delete_baptism(&self, record_id: i64) -> Result<()> {
    self
      .transact(move |tx| register::delete_baptism(tx, record_id))
      .await
  }

  // ── Marriage register ─────────────────────────────────────────────────────

  async fn record_marriage(
    &self,
    input: NewMarriage,
    recorded_by: i64,
  ) -> Result<MarriageRecord> {
    self
      .transact(move |tx| register::record_marriage(tx, input, recorded_by, Utc::now()))
      .await
  }

  async fn marriage_for_member(&self, member_id: i64) -> Result<Option<MarriageRecord>> {
    self
      .with_conn(move |conn| register::marriage_for(conn, member_id))
      .await
  }

  async fn ensure_marriage_record(
    &self,
    member_id: i64,
    recorded_by: i64,
  ) -> Result<MarriageRecord> {
    self
      .transact(move |tx| register::ensure_marriage(tx, member_id, recorded_by, Utc::now()))
      .await
  }

  async fn delete_marriage(&self, record_id: i64) -> Result<()> {
    self
      .transact(move |tx| register::delete_marriage(tx, record_id))
      .await
  }
}

// ─── Test hooks ──────────────────────────────────────────────────────────────

#[cfg(test)]
impl SqliteStore {
  /// Run raw SQL, e.g. to install a failing trigger.
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .with_conn(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await
  }

  pub(crate) async fn count_rows(&self, table: &'static str) -> Result<i64> {
    self
      .with_conn(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
      })
      .await
  }
}
