//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Datelike as _, NaiveDate, Utc};
use parish_core::{
  Classify as _, ErrorClass,
  baptism::BaptismDetails,
  marriage::{MarriageDetails, MarriageParticulars, NewMarriage, NOT_SPECIFIED, TO_BE_PROVIDED},
  member::{Gender, MatrimonyStatus, Member, MemberPatch, MemberQuery, MembershipStatus, NewMember},
  sacrament::{DetailedRecord, NewSacrament, SacramentType},
  store::RegistryStore,
};

use crate::{Error, SqliteStore};

const CLERK: i64 = 1;

const FAIL_MEMBER_UPDATES: &str = "
  CREATE TRIGGER fail_member_update BEFORE UPDATE ON members
  BEGIN SELECT RAISE(ABORT, 'forced failure'); END;";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn add(s: &SqliteStore, first: &str, last: &str) -> Member {
  s.add_member(NewMember::new(first, last)).await.unwrap()
}

/// Adds `n` members and returns the last one.
async fn add_many(s: &SqliteStore, n: usize) -> Member {
  let mut last = None;
  for i in 0..n {
    last = Some(add(s, &format!("Person{i}"), "Ouma").await);
  }
  last.expect("n > 0")
}

fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

fn year() -> i32 { Utc::now().year() }

async fn counts(s: &SqliteStore) -> (i64, i64, i64) {
  (
    s.count_rows("sacraments").await.unwrap(),
    s.count_rows("baptism_records").await.unwrap(),
    s.count_rows("marriage_records").await.unwrap(),
  )
}

fn baptism(member_id: i64) -> BaptismDetails {
  BaptismDetails {
    member_id,
    father_name: "Joseph Ouma".into(),
    mother_name: "Mary Atieno".into(),
    tribe: "Luo".into(),
    birth_village: "Kanyamwa".into(),
    county: "Homa Bay".into(),
    birth_date: date("2024-01-15"),
    residence: "Kisumu".into(),
    baptism_location: "St Joseph".into(),
    baptism_date: date("2024-03-10"),
    baptized_by: "Fr. Otieno".into(),
    sponsor: "Peter Odhiambo".into(),
    certificate_number: Some("C-12".into()),
    book_number: Some("4".into()),
    page_number: Some("87".into()),
    notes: None,
    eucharist_location: None,
    eucharist_date: None,
    confirmation_location: None,
    confirmation_date: None,
    confirmation_register_number: None,
    confirmation_number: None,
    marriage_spouse: None,
    marriage_location: None,
    marriage_date: None,
  }
}

fn marriage(husband_id: Option<i64>, wife_id: Option<i64>) -> NewMarriage {
  NewMarriage {
    record_number: None,
    details:       MarriageDetails {
      husband_id,
      wife_id,
      husband_name: husband_id.is_none().then(|| "Tom Mboya".into()),
      wife_name: wife_id.is_none().then(|| "Grace Wanjiru".into()),
      marriage_date: date("2024-08-17"),
      marriage_church: "St Joseph".into(),
      district: None,
      province: None,
      presence_of: "Fr. Otieno".into(),
      delegated_by: None,
      delegation_date: None,
      particulars: MarriageParticulars {
        male_witness_full_name: Some("Peter Odhiambo".into()),
        female_witness_full_name: Some("Ann Njeri".into()),
        ..Default::default()
      },
    },
  }
}

async fn mark_married(s: &SqliteStore, member_id: i64) {
  s.update_member(member_id, MemberPatch {
    matrimony_status: Some(MatrimonyStatus::Married),
    ..Default::default()
  })
  .await
  .unwrap();
}

// ─── Members ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_member() {
  let s = store().await;

  let m = add(&s, "Mary", "Akinyi").await;
  assert_eq!(m.membership_status, MembershipStatus::Active);
  assert_eq!(m.matrimony_status, MatrimonyStatus::Single);

  let fetched = s.get_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(fetched, m);
}

#[tokio::test]
async fn get_member_missing_returns_none() {
  let s = store().await;
  assert!(s.get_member(42).await.unwrap().is_none());
}

#[tokio::test]
async fn add_member_rejects_blank_names() {
  let s = store().await;
  let err = s.add_member(NewMember::new(" ", "")).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::Invalid);
  let fields = err.validation().unwrap();
  assert!(fields.get("first_name").is_some());
  assert!(fields.get("last_name").is_some());
  assert_eq!(s.count_rows("members").await.unwrap(), 0);
}

#[tokio::test]
async fn list_members_filters_and_orders() {
  let s = store().await;
  add(&s, "Zeno", "Achieng").await;
  let b = add(&s, "Anna", "Barasa").await;
  add(&s, "Alice", "Achieng").await;
  s.update_member(b.member_id, MemberPatch {
    membership_status: Some(MembershipStatus::Transferred),
    ..Default::default()
  })
  .await
  .unwrap();

  let all = s.list_members(&MemberQuery::default()).await.unwrap();
  let names: Vec<_> = all.iter().map(Member::full_name).collect();
  assert_eq!(names, ["Alice Achieng", "Zeno Achieng", "Anna Barasa"]);

  let by_text = s
    .list_members(&MemberQuery { text: Some("ACHI".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_text.len(), 2);

  let transferred = s
    .list_members(&MemberQuery {
      membership_status: Some(MembershipStatus::Transferred),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(transferred.len(), 1);
  assert_eq!(transferred[0].member_id, b.member_id);

  let page = s
    .list_members(&MemberQuery { limit: Some(1), offset: Some(1), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].first_name, "Zeno");
}

#[tokio::test]
async fn list_members_text_matches_wildcards_literally() {
  let s = store().await;
  add(&s, "Zeno", "Achieng").await;
  let marked = add(&s, "Anna", "Barasa_100%").await;

  let search = |text: &str| MemberQuery { text: Some(text.into()), ..Default::default() };

  assert_eq!(s.list_members(&search("%")).await.unwrap().len(), 1);
  assert!(s.list_members(&search("z_no")).await.unwrap().is_empty());

  let found = s.list_members(&search("a_100%")).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].member_id, marked.member_id);
}

#[tokio::test]
async fn update_member_assigns_any_status() {
  let s = store().await;
  let m = add(&s, "Mary", "Akinyi").await;

  let updated = s
    .update_member(m.member_id, MemberPatch {
      phone: Some("0700 000 000".into()),
      membership_status: Some(MembershipStatus::Deceased),
      matrimony_status: Some(MatrimonyStatus::Widowed),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.phone.as_deref(), Some("0700 000 000"));
  assert_eq!(updated.membership_status, MembershipStatus::Deceased);

  let back = s
    .update_member(m.member_id, MemberPatch {
      membership_status: Some(MembershipStatus::Active),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(back.membership_status, MembershipStatus::Active);
  assert_eq!(back.matrimony_status, MatrimonyStatus::Widowed);
}

#[tokio::test]
async fn update_member_missing_is_not_found() {
  let s = store().await;
  let err = s.update_member(9, MemberPatch::default()).await.unwrap_err();
  assert!(matches!(err, Error::MemberNotFound(9)));
}

// ─── Baptism register ────────────────────────────────────────────────────────

#[tokio::test]
async fn baptism_without_follow_ups() {
  let s = store().await;
  let m = add_many(&s, 7).await;
  assert_eq!(m.member_id, 7);

  let record = s.record_baptism(baptism(7), CLERK).await.unwrap();
  assert_eq!(record.record_number, format!("BAP-{}-00001", year()));
  assert_eq!(record.eucharist_sacrament_id, None);
  assert_eq!(record.confirmation_sacrament_id, None);
  assert_eq!(record.marriage_sacrament_id, None);
  assert_eq!(record.recorded_by, Some(CLERK));
  assert_eq!(counts(&s).await, (1, 1, 0));

  let fact = s.get_sacrament(record.baptism_sacrament_id).await.unwrap().unwrap();
  assert_eq!(fact.sacrament_type, SacramentType::Baptism);
  assert_eq!(fact.member_id, Some(7));
  assert_eq!(fact.celebrant.as_deref(), Some("Fr. Otieno"));
  assert_eq!(fact.witness_1.as_deref(), Some("Peter Odhiambo"));
  assert_eq!(fact.certificate_number.as_deref(), Some("C-12"));
  assert_eq!(fact.recorded_by, Some(CLERK));
  assert_eq!(fact.detailed_record, Some(DetailedRecord::BaptismRecord(record.record_id)));

  let member = s.get_member(7).await.unwrap().unwrap();
  assert_eq!(member.baptism_date, Some(date("2024-03-10")));
  assert_eq!(member.confirmation_date, None);
}

#[tokio::test]
async fn baptism_with_every_follow_up() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;

  let record = s
    .record_baptism(
      BaptismDetails {
        eucharist_location: Some("St Joseph".into()),
        eucharist_date: Some(date("2032-05-01")),
        confirmation_location: Some("Cathedral".into()),
        confirmation_date: Some(date("2036-06-12")),
        confirmation_register_number: Some("R-3".into()),
        confirmation_number: Some("CF-77".into()),
        marriage_spouse: Some("Grace Wanjiru".into()),
        marriage_location: Some("St Joseph".into()),
        marriage_date: Some(date("2050-02-14")),
        ..baptism(m.member_id)
      },
      CLERK,
    )
    .await
    .unwrap();
  assert_eq!(counts(&s).await, (4, 1, 0));

  let view = s.baptism_for_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(view.record, record);
  let eucharist = view.eucharist.unwrap();
  assert_eq!(eucharist.sacrament_type, SacramentType::Eucharist);
  assert_eq!(eucharist.detailed_record, None);

  let confirmation = view.confirmation.unwrap();
  assert_eq!(confirmation.certificate_number.as_deref(), Some("CF-77"));
  assert_eq!(confirmation.book_number.as_deref(), Some("R-3"));

  let marriage = view.marriage.unwrap();
  assert_eq!(marriage.sacrament_type, SacramentType::Marriage);
  assert_eq!(marriage.witness_1.as_deref(), Some("Grace Wanjiru"));

  let member = s.get_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(member.confirmation_date, Some(date("2036-06-12")));
  // a baptism-book marriage entry does not change matrimony status
  assert_eq!(member.matrimony_status, MatrimonyStatus::Single);
}

#[tokio::test]
async fn follow_up_needs_both_date_and_location() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;

  let record = s
    .record_baptism(
      BaptismDetails {
        eucharist_date: Some(date("2032-05-01")),
        confirmation_location: Some("Cathedral".into()),
        ..baptism(m.member_id)
      },
      CLERK,
    )
    .await
    .unwrap();

  assert_eq!(record.eucharist_sacrament_id, None);
  assert_eq!(record.confirmation_sacrament_id, None);
  assert_eq!(counts(&s).await, (1, 1, 0));
}

#[tokio::test]
async fn existing_baptism_date_is_kept() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;
  s.update_member(m.member_id, MemberPatch {
    baptism_date: Some(date("2020-01-01")),
    ..Default::default()
  })
  .await
  .unwrap();

  s.record_baptism(baptism(m.member_id), CLERK).await.unwrap();

  let member = s.get_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(member.baptism_date, Some(date("2020-01-01")));
}

#[tokio::test]
async fn baptism_for_unknown_member_writes_nothing() {
  let s = store().await;
  let err = s.record_baptism(baptism(404), CLERK).await.unwrap_err();
  assert!(matches!(err, Error::MemberNotFound(404)));
  assert_eq!(err.class(), ErrorClass::NotFound);
  assert_eq!(counts(&s).await, (0, 0, 0));
}

#[tokio::test]
async fn failed_member_update_rolls_back_baptism() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;
  s.execute_batch(FAIL_MEMBER_UPDATES).await.unwrap();

  let err = s
    .record_baptism(
      BaptismDetails {
        eucharist_location: Some("St Joseph".into()),
        eucharist_date: Some(date("2032-05-01")),
        ..baptism(m.member_id)
      },
      CLERK,
    )
    .await
    .unwrap_err();
  assert_eq!(err.class(), ErrorClass::Internal);
  assert!(err.to_string().contains("forced failure"));

  assert_eq!(counts(&s).await, (0, 0, 0));
  let member = s.get_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(member.baptism_date, None);
}

#[tokio::test]
async fn sequential_record_numbers_do_not_repeat() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;

  let mut numbers = Vec::new();
  for _ in 0..3 {
    numbers.push(s.record_baptism(baptism(m.member_id), CLERK).await.unwrap().record_number);
  }
  let y = year();
  assert_eq!(numbers, [
    format!("BAP-{y}-00001"),
    format!("BAP-{y}-00002"),
    format!("BAP-{y}-00003"),
  ]);

  // the latest record is the one shown
  let view = s.baptism_for_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(view.record.record_number, numbers[2]);
}

#[tokio::test]
async fn baptism_for_member_without_record_is_none() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;
  assert!(s.baptism_for_member(m.member_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_baptism_keeps_follow_ups() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;
  let record = s
    .record_baptism(
      BaptismDetails {
        eucharist_location: Some("St Joseph".into()),
        eucharist_date: Some(date("2032-05-01")),
        ..baptism(m.member_id)
      },
      CLERK,
    )
    .await
    .unwrap();

  s.delete_baptism(record.record_id).await.unwrap();

  assert_eq!(counts(&s).await, (1, 0, 0));
  assert!(s.get_sacrament(record.baptism_sacrament_id).await.unwrap().is_none());
  let eucharist_id = record.eucharist_sacrament_id.unwrap();
  assert!(s.get_sacrament(eucharist_id).await.unwrap().is_some());

  let member = s.get_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(member.baptism_date, Some(date("2024-03-10")));

  let err = s.delete_baptism(record.record_id).await.unwrap_err();
  assert!(matches!(err, Error::BaptismRecordNotFound(_)));
}

// ─── Marriage register ───────────────────────────────────────────────────────

#[tokio::test]
async fn marriage_with_husband_only() {
  let s = store().await;
  let husband = add_many(&s, 3).await;
  assert_eq!(husband.member_id, 3);

  let record = s.record_marriage(marriage(Some(3), None), CLERK).await.unwrap();
  assert_eq!(record.record_number, format!("MAR-{}-00001", year()));
  assert_eq!(record.details.husband_name.as_deref(), Some("Person2 Ouma"));
  assert_eq!(record.details.wife_name.as_deref(), Some("Grace Wanjiru"));
  assert_eq!(record.parish_priest_id, Some(CLERK));
  assert_eq!(counts(&s).await, (1, 0, 1));

  let fact = s.get_sacrament(record.sacrament_id.unwrap()).await.unwrap().unwrap();
  assert_eq!(fact.sacrament_type, SacramentType::Marriage);
  assert_eq!(fact.member_id, Some(3));
  assert_eq!(fact.celebrant.as_deref(), Some("Fr. Otieno"));
  assert_eq!(fact.witness_1.as_deref(), Some("Peter Odhiambo"));
  assert_eq!(fact.witness_2.as_deref(), Some("Ann Njeri"));
  assert_eq!(fact.detailed_record, Some(DetailedRecord::MarriageRecord(record.record_id)));

  for id in 1..=3 {
    let m = s.get_member(id).await.unwrap().unwrap();
    let expected = if id == 3 { MatrimonyStatus::Married } else { MatrimonyStatus::Single };
    assert_eq!(m.matrimony_status, expected, "member {id}");
  }
}

#[tokio::test]
async fn marriage_with_both_spouses_marks_both() {
  let s = store().await;
  let h = add(&s, "John", "Ouma").await;
  let w = s
    .add_member(NewMember { gender: Some(Gender::Female), ..NewMember::new("Grace", "Wanjiru") })
    .await
    .unwrap();

  let record = s
    .record_marriage(marriage(Some(h.member_id), Some(w.member_id)), CLERK)
    .await
    .unwrap();

  let fact = s.get_sacrament(record.sacrament_id.unwrap()).await.unwrap().unwrap();
  assert_eq!(fact.member_id, Some(h.member_id));
  for id in [h.member_id, w.member_id] {
    let m = s.get_member(id).await.unwrap().unwrap();
    assert_eq!(m.matrimony_status, MatrimonyStatus::Married);
  }

  let by_wife = s.marriage_for_member(w.member_id).await.unwrap().unwrap();
  assert_eq!(by_wife.record_id, record.record_id);
}

#[tokio::test]
async fn marriage_between_non_members() {
  let s = store().await;
  let record = s.record_marriage(marriage(None, None), CLERK).await.unwrap();
  let fact = s.get_sacrament(record.sacrament_id.unwrap()).await.unwrap().unwrap();
  assert_eq!(fact.member_id, None);
}

#[tokio::test]
async fn marriage_with_unknown_spouse_writes_nothing() {
  let s = store().await;
  let h = add(&s, "John", "Ouma").await;

  let err = s
    .record_marriage(marriage(Some(h.member_id), Some(999)), CLERK)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MemberNotFound(999)));
  assert_eq!(counts(&s).await, (0, 0, 0));

  let m = s.get_member(h.member_id).await.unwrap().unwrap();
  assert_eq!(m.matrimony_status, MatrimonyStatus::Single);
}

#[tokio::test]
async fn failed_member_update_rolls_back_marriage() {
  let s = store().await;
  let h = add(&s, "John", "Ouma").await;
  s.execute_batch(FAIL_MEMBER_UPDATES).await.unwrap();

  let err = s
    .record_marriage(marriage(Some(h.member_id), None), CLERK)
    .await
    .unwrap_err();
  assert_eq!(err.class(), ErrorClass::Internal);
  assert_eq!(counts(&s).await, (0, 0, 0));
}

#[tokio::test]
async fn explicit_record_number_is_kept() {
  let s = store().await;

  let explicit = s
    .record_marriage(
      NewMarriage { record_number: Some("OLD-BOOK-7".into()), ..marriage(None, None) },
      CLERK,
    )
    .await
    .unwrap();
  assert_eq!(explicit.record_number, "OLD-BOOK-7");

  let generated = s.record_marriage(marriage(None, None), CLERK).await.unwrap();
  assert_eq!(generated.record_number, format!("MAR-{}-00001", year()));

  let err = s
    .record_marriage(
      NewMarriage { record_number: Some("OLD-BOOK-7".into()), ..marriage(None, None) },
      CLERK,
    )
    .await
    .unwrap_err();
  assert_eq!(err.class(), ErrorClass::Internal);
  assert_eq!(counts(&s).await, (2, 0, 2));
}

#[tokio::test]
async fn explicit_number_at_sequence_limit_does_not_break_generation() {
  let s = store().await;
  let top = format!("MAR-{}-{}", year(), u32::MAX);

  s.record_marriage(
    NewMarriage { record_number: Some(top.clone()), ..marriage(None, None) },
    CLERK,
  )
  .await
  .unwrap();

  let first = s.record_marriage(marriage(None, None), CLERK).await.unwrap();
  let second = s.record_marriage(marriage(None, None), CLERK).await.unwrap();
  assert_eq!(first.record_number, format!("MAR-{}-00001", year()));
  assert_eq!(second.record_number, format!("MAR-{}-00002", year()));
  assert_eq!(counts(&s).await, (3, 0, 3));
}

#[tokio::test]
async fn delete_marriage_removes_its_sacrament() {
  let s = store().await;
  let h = add(&s, "John", "Ouma").await;
  let record = s.record_marriage(marriage(Some(h.member_id), None), CLERK).await.unwrap();

  s.delete_marriage(record.record_id).await.unwrap();
  assert_eq!(counts(&s).await, (0, 0, 0));
  assert!(s.marriage_for_member(h.member_id).await.unwrap().is_none());

  let err = s.delete_marriage(record.record_id).await.unwrap_err();
  assert!(matches!(err, Error::MarriageRecordNotFound(_)));
  assert_eq!(err.class(), ErrorClass::NotFound);
}

// ─── Marriage backfill ───────────────────────────────────────────────────────

#[tokio::test]
async fn backfill_requires_married_member() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;

  let err = s.ensure_marriage_record(m.member_id, CLERK).await.unwrap_err();
  assert!(matches!(err, Error::NotMarried(_)));
  assert_eq!(err.class(), ErrorClass::Conflict);
  assert_eq!(counts(&s).await, (0, 0, 0));

  let err = s.ensure_marriage_record(77, CLERK).await.unwrap_err();
  assert!(matches!(err, Error::MemberNotFound(77)));
}

#[tokio::test]
async fn backfill_builds_wife_side_placeholder_once() {
  let s = store().await;
  let w = s
    .add_member(NewMember {
      gender: Some(Gender::Female),
      tribe: Some("Kikuyu".into()),
      ..NewMember::new("Grace", "Wanjiru")
    })
    .await
    .unwrap();
  mark_married(&s, w.member_id).await;

  let first = s.ensure_marriage_record(w.member_id, CLERK).await.unwrap();
  assert_eq!(first.record_number, format!("MAR-{}-00001", year()));
  assert_eq!(first.details.wife_id, Some(w.member_id));
  assert_eq!(first.details.husband_id, None);
  assert_eq!(first.details.wife_name.as_deref(), Some("Grace Wanjiru"));
  assert_eq!(first.details.husband_name.as_deref(), Some(TO_BE_PROVIDED));
  assert_eq!(first.details.marriage_church, NOT_SPECIFIED);
  assert_eq!(first.details.marriage_date, Utc::now().date_naive());
  assert_eq!(first.details.particulars.wife_tribe.as_deref(), Some("Kikuyu"));
  assert_eq!(first.sacrament_id, None);

  let again = s.ensure_marriage_record(w.member_id, CLERK).await.unwrap();
  assert_eq!(again, first);
  assert_eq!(s.count_rows("marriage_records").await.unwrap(), 1);
}

#[tokio::test]
async fn backfill_links_an_unlinked_marriage_sacrament() {
  let s = store().await;
  let h = add(&s, "John", "Ouma").await;
  mark_married(&s, h.member_id).await;

  let fact = s
    .record_sacrament(
      NewSacrament {
        location: Some("Holy Family".into()),
        celebrant: Some("Fr. Kamau".into()),
        ..NewSacrament::new(Some(h.member_id), SacramentType::Marriage, date("2019-04-27"))
      },
      CLERK,
    )
    .await
    .unwrap();

  let record = s.ensure_marriage_record(h.member_id, CLERK).await.unwrap();
  assert_eq!(record.details.husband_id, Some(h.member_id));
  assert_eq!(record.details.marriage_date, date("2019-04-27"));
  assert_eq!(record.details.marriage_church, "Holy Family");
  assert_eq!(record.details.presence_of, "Fr. Kamau");
  assert_eq!(record.sacrament_id, Some(fact.sacrament_id));

  let linked = s.get_sacrament(fact.sacrament_id).await.unwrap().unwrap();
  assert_eq!(linked.detailed_record, Some(DetailedRecord::MarriageRecord(record.record_id)));
}

#[tokio::test]
async fn backfill_returns_a_registered_marriage() {
  let s = store().await;
  let h = add(&s, "John", "Ouma").await;
  let registered = s.record_marriage(marriage(Some(h.member_id), None), CLERK).await.unwrap();

  let ensured = s.ensure_marriage_record(h.member_id, CLERK).await.unwrap();
  assert_eq!(ensured, registered);
  assert_eq!(s.count_rows("marriage_records").await.unwrap(), 1);
}

// ─── Standalone sacraments ───────────────────────────────────────────────────

#[tokio::test]
async fn record_sacrament_requires_member() {
  let s = store().await;
  let err = s
    .record_sacrament(
      NewSacrament::new(Some(5), SacramentType::FirstCommunion, date("2030-05-01")),
      CLERK,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MemberNotFound(5)));

  let err = s
    .record_sacrament(
      NewSacrament::new(None, SacramentType::FirstCommunion, date("2030-05-01")),
      CLERK,
    )
    .await
    .unwrap_err();
  assert_eq!(err.class(), ErrorClass::Invalid);
  assert_eq!(s.count_rows("sacraments").await.unwrap(), 0);
}

#[tokio::test]
async fn confirmation_fills_empty_summary_date() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;

  s.record_sacrament(
    NewSacrament::new(Some(m.member_id), SacramentType::Confirmation, date("2036-06-12")),
    CLERK,
  )
  .await
  .unwrap();
  s.record_sacrament(
    NewSacrament::new(Some(m.member_id), SacramentType::Confirmation, date("2040-01-01")),
    CLERK,
  )
  .await
  .unwrap();

  let member = s.get_member(m.member_id).await.unwrap().unwrap();
  assert_eq!(member.confirmation_date, Some(date("2036-06-12")));
  assert_eq!(member.baptism_date, None);
}

#[tokio::test]
async fn sacraments_are_listed_by_date() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;
  for (kind, on) in [
    (SacramentType::Confirmation, "2036-06-12"),
    (SacramentType::Baptism, "2024-03-10"),
    (SacramentType::FirstCommunion, "2032-05-01"),
  ] {
    s.record_sacrament(NewSacrament::new(Some(m.member_id), kind, date(on)), CLERK)
      .await
      .unwrap();
  }

  let kinds: Vec<_> = s
    .list_sacraments(m.member_id)
    .await
    .unwrap()
    .into_iter()
    .map(|f| f.sacrament_type)
    .collect();
  assert_eq!(kinds, [
    SacramentType::Baptism,
    SacramentType::FirstCommunion,
    SacramentType::Confirmation,
  ]);
}

#[tokio::test]
async fn summary_is_derived_from_sacrament_rows() {
  let s = store().await;
  let m = add(&s, "John", "Ouma").await;
  s.record_baptism(baptism(m.member_id), CLERK).await.unwrap();
  s.record_sacrament(
    NewSacrament::new(Some(m.member_id), SacramentType::FirstCommunion, date("2032-05-01")),
    CLERK,
  )
  .await
  .unwrap();
  s.execute_batch("UPDATE members SET baptism_date = NULL").await.unwrap();

  let summary = s.sacrament_summary(m.member_id).await.unwrap().unwrap();
  assert_eq!(summary.baptism_date, Some(date("2024-03-10")));
  assert_eq!(summary.eucharist_date, Some(date("2032-05-01")));
  assert_eq!(summary.confirmation_date, None);
  assert_eq!(summary.received, [SacramentType::Baptism, SacramentType::FirstCommunion]);

  assert!(s.sacrament_summary(999).await.unwrap().is_none());
}
