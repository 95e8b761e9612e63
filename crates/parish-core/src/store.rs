//! The `RegistryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `parish-store-sqlite`).
//! Higher layers (`parish-api`, `parish-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  Classify,
  baptism::{BaptismDetails, BaptismRecord, BaptismView},
  marriage::{MarriageRecord, NewMarriage},
  member::{Member, MemberPatch, MemberQuery, NewMember},
  sacrament::{NewSacrament, Sacrament, SacramentSummary},
};

/// Abstraction over a parish registry backend.
///
/// Every write that touches more than one row (a sacrament plus its detail
/// record plus member summary fields) is atomic: either all rows are
/// written or none are.
///
/// `recorded_by` is the id of the acting user; it is stored on sacrament
/// facts and as the parish priest of marriage records.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Members ───────────────────────────────────────────────────────────

  fn add_member(
    &self,
    input: NewMember,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_member(
    &self,
    member_id: i64,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + '_;

  fn list_members<'a>(
    &'a self,
    query: &'a MemberQuery,
  ) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Fails with a not-found error if absent.
  fn update_member(
    &self,
    member_id: i64,
    patch: MemberPatch,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  // ── Sacrament facts ───────────────────────────────────────────────────

  /// Record a sacrament that has no detailed register entry.
  ///
  /// Baptism and confirmation dates are copied to the member's summary
  /// fields when those are empty.
  fn record_sacrament(
    &self,
    input: NewSacrament,
    recorded_by: i64,
  ) -> impl Future<Output = Result<Sacrament, Self::Error>> + Send + '_;

  fn get_sacrament(
    &self,
    sacrament_id: i64,
  ) -> impl Future<Output = Result<Option<Sacrament>, Self::Error>> + Send + '_;

  /// All sacraments of a member, oldest first.
  fn list_sacraments(
    &self,
    member_id: i64,
  ) -> impl Future<Output = Result<Vec<Sacrament>, Self::Error>> + Send + '_;

  /// Summary derived from sacrament rows. `None` if the member is absent.
  fn sacrament_summary(
    &self,
    member_id: i64,
  ) -> impl Future<Output = Result<Option<SacramentSummary>, Self::Error>> + Send + '_;

  // ── Baptism register ──────────────────────────────────────────────────

  /// Write a baptism record, its baptism fact and any follow-up facts, and
  /// fill empty member summary dates, in one transaction.
  fn record_baptism(
    &self,
    input: BaptismDetails,
    recorded_by: i64,
  ) -> impl Future<Output = Result<BaptismRecord, Self::Error>> + Send + '_;

  /// The member's latest baptism record with its linked facts.
  fn baptism_for_member(
    &self,
    member_id: i64,
  ) -> impl Future<Output = Result<Option<BaptismView>, Self::Error>> + Send + '_;

  /// Delete a baptism record together with its baptism fact.
  fn delete_baptism(
    &self,
    record_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Marriage register ─────────────────────────────────────────────────

  /// Write a marriage record and its marriage fact, and mark member spouses
  /// as married, in one transaction.
  fn record_marriage(
    &self,
    input: NewMarriage,
    recorded_by: i64,
  ) -> impl Future<Output = Result<MarriageRecord, Self::Error>> + Send + '_;

  /// The latest marriage record naming the member as husband or wife.
  fn marriage_for_member(
    &self,
    member_id: i64,
  ) -> impl Future<Output = Result<Option<MarriageRecord>, Self::Error>> + Send + '_;

  /// Return the member's marriage record, fabricating a placeholder record
  /// first if the member is flagged married but has none.
  ///
  /// Repeated calls return the same record.
  fn ensure_marriage_record(
    &self,
    member_id: i64,
    recorded_by: i64,
  ) -> impl Future<Output = Result<MarriageRecord, Self::Error>> + Send + '_;

  /// Delete a marriage record together with its marriage fact.
  fn delete_marriage(
    &self,
    record_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
