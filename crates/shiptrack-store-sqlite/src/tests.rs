//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, TimeZone, Utc};
use shiptrack_core::{
  PositionFix, Vessel,
  store::{StoreConnector, VesselStore},
};

use crate::{SqliteConnector, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn t0() -> DateTime<Utc> { Utc.timestamp_opt(1479212440, 0).unwrap() }

fn fix_at(minutes: i64) -> PositionFix {
  let at = t0() + Duration::minutes(minutes);
  PositionFix {
    latitude:   63.0 + minutes as f64 / 100.0,
    longitude:  21.5,
    first_seen: at,
    last_seen:  at,
  }
}

fn wasa() -> Vessel {
  Vessel {
    imo: 8000226,
    name: "WASA EXPRESS".into(),
    comment: "VAASA-UMEA-VAASA".into(),
    heading: 218,
    course: 284.0,
    speed: 2.5,
    class: 'i',
    kind: 'a',
    source_call: "OJQB".into(),
    destination_call: "ais".into(),
    vessel_class: 106,
    ..Vessel::new(230636000)
  }
}

// ─── Vessels ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_lists_nothing() {
  let s = store().await;
  assert!(s.list_vessel_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn track_vessel_is_idempotent() {
  let s = store().await;

  assert!(s.track_vessel(230636000).await.unwrap());
  assert!(!s.track_vessel(230636000).await.unwrap());
  assert_eq!(s.list_vessel_ids().await.unwrap(), vec![230636000]);

  let v = s.get_vessel(230636000).await.unwrap().unwrap();
  assert_eq!(v, Vessel::new(230636000));
}

#[tokio::test]
async fn list_is_in_registration_order() {
  let s = store().await;
  s.track_vessel(300).await.unwrap();
  s.track_vessel(100).await.unwrap();
  s.track_vessel(200).await.unwrap();

  assert_eq!(s.list_vessel_ids().await.unwrap(), vec![300, 100, 200]);
}

#[tokio::test]
async fn upsert_ignores_untracked_vessels() {
  let s = store().await;
  s.track_vessel(211433000).await.unwrap();

  assert!(!s.upsert_vessel(&wasa()).await.unwrap());
  assert!(!s.upsert_vessel(&Vessel { mmsi: 0, ..wasa() }).await.unwrap());

  assert_eq!(s.list_vessel_ids().await.unwrap(), vec![211433000]);
  assert!(s.get_vessel(230636000).await.unwrap().is_none());
  assert!(s.get_vessel(0).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_overwrites_every_attribute() {
  let s = store().await;
  s.track_vessel(230636000).await.unwrap();
  assert!(s.upsert_vessel(&wasa()).await.unwrap());

  let renamed = Vessel {
    imo: 9999999,
    name: "WASA EXPRESS II".into(),
    comment: String::new(),
    class: 'x',
    ..wasa()
  };
  assert!(s.upsert_vessel(&renamed).await.unwrap());

  let v = s.get_vessel(230636000).await.unwrap().unwrap();
  assert_eq!(v, renamed);
  assert_eq!(s.list_vessel_ids().await.unwrap(), vec![230636000]);
}

#[tokio::test]
async fn float_attributes_keep_full_precision() {
  let s = store().await;
  s.track_vessel(211433000).await.unwrap();

  let colombo = Vessel {
    imo: 295244,
    course: 202.3,
    speed: 13.1492,
    length: 336.0,
    width: 45.6,
    draught: 14.2,
    ..Vessel::new(211433000)
  };
  assert!(s.upsert_vessel(&colombo).await.unwrap());

  let v = s.get_vessel(211433000).await.unwrap().unwrap();
  assert_eq!(v.course, 202.3);
  assert_eq!(v.speed, 13.1492);
  assert_eq!(v.width, 45.6);
  assert_eq!(v.draught, 14.2);
  assert_eq!(v, colombo);
}

#[tokio::test]
async fn get_vessel_missing_returns_none() {
  let s = store().await;
  assert!(s.get_vessel(1).await.unwrap().is_none());
}

// ─── Positions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn positions_are_oldest_first() {
  let s = store().await;
  for m in 0..3 {
    s.append_position(8000226, fix_at(m)).await.unwrap();
  }

  let samples = s.positions(8000226).await.unwrap();
  assert_eq!(samples.len(), 3);
  assert!(samples.windows(2).all(|w| w[0].log_id < w[1].log_id));
  assert_eq!(samples[0].fix, fix_at(0));
  assert_eq!(samples[2].fix, fix_at(2));
  assert!(samples.iter().all(|p| p.imo == 8000226));
}

#[tokio::test]
async fn positions_are_grouped_by_imo() {
  let s = store().await;
  s.append_position(1, fix_at(0)).await.unwrap();
  s.append_position(2, fix_at(1)).await.unwrap();

  assert_eq!(s.positions(1).await.unwrap().len(), 1);
  assert_eq!(s.positions(2).await.unwrap().len(), 1);
  assert!(s.positions(3).await.unwrap().is_empty());
}

// ─── Retention ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn retention_on_empty_history_is_noop() {
  let s = store().await;
  assert_eq!(s.enforce_retention(8000226, 5).await.unwrap(), 0);
}

#[tokio::test]
async fn retention_under_cap_keeps_everything() {
  let s = store().await;
  for m in 0..3 {
    s.append_position(8000226, fix_at(m)).await.unwrap();
  }

  assert_eq!(s.enforce_retention(8000226, 5).await.unwrap(), 0);
  assert_eq!(s.positions(8000226).await.unwrap().len(), 3);
}

#[tokio::test]
async fn retention_keeps_the_most_recent() {
  let s = store().await;
  for m in 0..8 {
    s.append_position(8000226, fix_at(m)).await.unwrap();
  }

  assert_eq!(s.enforce_retention(8000226, 5).await.unwrap(), 3);

  let kept: Vec<_> = s
    .positions(8000226)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.fix)
    .collect();
  let expected: Vec<_> = (3..8).map(fix_at).collect();
  assert_eq!(kept, expected);
}

#[tokio::test]
async fn retention_bounds_history_across_appends() {
  let s = store().await;
  for m in 0..30 {
    s.append_position(8000226, fix_at(m)).await.unwrap();
    s.enforce_retention(8000226, 20).await.unwrap();
    let len = s.positions(8000226).await.unwrap().len();
    assert_eq!(len, usize::try_from(m + 1).unwrap().min(20));
  }
}

#[tokio::test]
async fn retention_only_touches_its_imo() {
  let s = store().await;
  for m in 0..4 {
    s.append_position(1, fix_at(m)).await.unwrap();
    s.append_position(2, fix_at(m)).await.unwrap();
  }

  assert_eq!(s.enforce_retention(1, 1).await.unwrap(), 3);
  assert_eq!(s.positions(1).await.unwrap().len(), 1);
  assert_eq!(s.positions(2).await.unwrap().len(), 4);
}

#[tokio::test]
async fn retention_cap_zero_clears_history() {
  let s = store().await;
  s.append_position(8000226, fix_at(0)).await.unwrap();
  s.append_position(8000226, fix_at(1)).await.unwrap();

  assert_eq!(s.enforce_retention(8000226, 0).await.unwrap(), 2);
  assert!(s.positions(8000226).await.unwrap().is_empty());
}

// ─── Connector ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn connector_reopens_the_same_file() {
  let dir = tempfile::tempdir().unwrap();
  let connector = SqliteConnector::new(dir.path().join("ships.db"));

  {
    let first = connector.connect().await.unwrap();
    first.track_vessel(230636000).await.unwrap();
    first.append_position(8000226, fix_at(0)).await.unwrap();
  }

  let second = connector.connect().await.unwrap();
  assert_eq!(second.list_vessel_ids().await.unwrap(), vec![230636000]);
  assert_eq!(second.positions(8000226).await.unwrap().len(), 1);
}
