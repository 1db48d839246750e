//! [`SqliteStore`], the SQLite implementation of [`VesselStore`].

use std::path::{Path, PathBuf};

use rusqlite::OptionalExtension as _;
use shiptrack_core::{
  PositionFix, PositionSample, Vessel,
  store::{StoreConnector, VesselStore},
};
use tracing::debug;

use crate::{
  Error, Result,
  encode::{RawSample, RawVessel, encode_char, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vessel store backed by a single SQLite file.
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

  /// Open an in-memory store.
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

  /// Current state of the vessel with `mmsi`, if it is tracked.
  pub async fn get_vessel(&self, mmsi: i64) -> Result<Option<Vessel>> {
    let raw: Option<RawVessel> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM ships WHERE mmsi = ?1", RawVessel::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![mmsi], RawVessel::from_row)
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawVessel::into_vessel))
  }
}

// ─── VesselStore impl ────────────────────────────────────────────────────────

impl VesselStore for SqliteStore {
  type Error = Error;

  // ── Vessels ───────────────────────────────────────────────────────────────

  async fn list_vessel_ids(&self) -> Result<Vec<i64>> {
    let ids: Vec<i64> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT mmsi FROM ships ORDER BY ship_id")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
      })
      .await?;
    Ok(ids)
  }

  async fn track_vessel(&self, mmsi: i64) -> Result<bool> {
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO ships (mmsi) VALUES (?1)",
          rusqlite::params![mmsi],
        )?)
      })
      .await?;
    Ok(inserted > 0)
  }

  async fn upsert_vessel(&self, vessel: &Vessel) -> Result<bool> {
    let v          = vessel.clone();
    let class_str  = encode_char(v.class);
    let kind_str   = encode_char(v.kind);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE ships SET
             imo              = ?2,
             name             = ?3,
             comment          = ?4,
             heading          = ?5,
             course           = ?6,
             speed            = ?7,
             length           = ?8,
             width            = ?9,
             draught          = ?10,
             ref_front        = ?11,
             ref_left         = ?12,
             path             = ?13,
             class            = ?14,
             kind             = ?15,
             source_call      = ?16,
             destination_call = ?17,
             vessel_class     = ?18,
             nav_status       = ?19
           WHERE mmsi = ?1",
          rusqlite::params![
            v.mmsi,
            v.imo,
            v.name,
            v.comment,
            v.heading,
            v.course,
            v.speed,
            v.length,
            v.width,
            v.draught,
            v.ref_front,
            v.ref_left,
            v.path,
            class_str,
            kind_str,
            v.source_call,
            v.destination_call,
            v.vessel_class,
            v.nav_status,
          ],
        )?)
      })
      .await?;
    Ok(updated > 0)
  }

  // ── Positions ─────────────────────────────────────────────────────────────

  async fn append_position(&self, imo: i64, fix: PositionFix) -> Result<()> {
    let first_seen_str = encode_dt(fix.first_seen);
    let last_seen_str  = encode_dt(fix.last_seen);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO gps (imo, north, east, first_seen, last_seen)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![imo, fix.latitude, fix.longitude, first_seen_str, last_seen_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn enforce_retention(&self, imo: i64, cap: usize) -> Result<usize> {
    let cap = i64::try_from(cap).unwrap_or(i64::MAX);

    let evicted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // A failed count aborts before anything is deleted.
        let mut count: i64 = tx.query_row(
          "SELECT COUNT(*) FROM gps WHERE imo = ?1",
          rusqlite::params![imo],
          |row| row.get(0),
        )?;

        let mut evicted = 0;
        {
          let mut oldest = tx.prepare(
            "SELECT log_id FROM gps WHERE imo = ?1 ORDER BY log_id ASC LIMIT 1",
          )?;
          let mut delete = tx.prepare("DELETE FROM gps WHERE log_id = ?1")?;

          while count > cap {
            let Some(log_id) = oldest
              .query_row(rusqlite::params![imo], |row| row.get::<_, i64>(0))
              .optional()?
            else {
              break;
            };
            delete.execute(rusqlite::params![log_id])?;
            count -= 1;
            evicted += 1;
          }
        }

        tx.commit()?;
        Ok(evicted)
      })
      .await?;

    if evicted > 0 {
      debug!(imo, evicted, "trimmed position history");
    }
    Ok(evicted)
  }

  async fn positions(&self, imo: i64) -> Result<Vec<PositionSample>> {
    let raws: Vec<RawSample> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT log_id, imo, north, east, first_seen, last_seen
           FROM gps
           WHERE imo = ?1
           ORDER BY log_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![imo], |row| {
            Ok(RawSample {
              log_id:     row.get(0)?,
              imo:        row.get(1)?,
              north:      row.get(2)?,
              east:       row.get(3)?,
              first_seen: row.get(4)?,
              last_seen:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSample::into_sample).collect()
  }
}

// ─── Connector ───────────────────────────────────────────────────────────────

/// Opens a new [`SqliteStore`] on the same file for every cycle.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
  path: PathBuf,
}

impl SqliteConnector {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl StoreConnector for SqliteConnector {
  type Store = SqliteStore;
  type Error = Error;

  async fn connect(&self) -> Result<SqliteStore> { SqliteStore::open(&self.path).await }
}
