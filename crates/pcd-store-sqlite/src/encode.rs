//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs
//! are hyphenated lowercase strings and categories use their snake_case name.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, Utc};
use pcd_core::{
  activity::{ActivityEntry, ActivityKind},
  document::{DocumentCategory, DocumentRecord},
  event::Event,
  person::Person,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_category(c: DocumentCategory) -> &'static str { c.as_str() }

pub fn decode_category(s: &str) -> Result<DocumentCategory> {
  Ok(DocumentCategory::parse(s)?)
}

pub fn encode_activity_kind(k: ActivityKind) -> &'static str { k.as_str() }

pub fn decode_activity_kind(s: &str) -> Result<ActivityKind> {
  ActivityKind::from_str(s).map_err(|_| Error::UnknownActivityKind(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PERSON_COLUMNS: &str = "person_id, full_name, national_id, phone, note, created_at";

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_id:   String,
  pub full_name:   String,
  pub national_id: String,
  pub phone:       Option<String>,
  pub note:        String,
  pub created_at:  String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:   row.get(0)?,
      full_name:   row.get(1)?,
      national_id: row.get(2)?,
      phone:       row.get(3)?,
      note:        row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:   decode_uuid(&self.person_id)?,
      full_name:   self.full_name,
      national_id: self.national_id,
      phone:       self.phone,
      note:        self.note,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const EVENT_COLUMNS: &str = "event_id, name, event_date, description, created_at";

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub name:        String,
  pub event_date:  Option<String>,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      name:        row.get(1)?,
      event_date:  row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:    decode_uuid(&self.event_id)?,
      name:        self.name,
      date:        self.event_date.as_deref().map(decode_date).transpose()?,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const DOCUMENT_COLUMNS: &str =
  "document_id, person_id, category, filename, location, content_hash, size_bytes, created_at";

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub document_id:  String,
  pub person_id:    String,
  pub category:     String,
  pub filename:     String,
  pub location:     String,
  pub content_hash: String,
  pub size_bytes:   i64,
  pub created_at:   String,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id:  row.get(0)?,
      person_id:    row.get(1)?,
      category:     row.get(2)?,
      filename:     row.get(3)?,
      location:     row.get(4)?,
      content_hash: row.get(5)?,
      size_bytes:   row.get(6)?,
      created_at:   row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<DocumentRecord> {
    Ok(DocumentRecord {
      document_id:  decode_uuid(&self.document_id)?,
      person_id:    decode_uuid(&self.person_id)?,
      category:     decode_category(&self.category)?,
      filename:     self.filename,
      location:     self.location,
      content_hash: self.content_hash,
      size_bytes:   u64::try_from(self.size_bytes).unwrap_or_default(),
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const ACTIVITY_COLUMNS: &str =
  "entry_id, recorded_at, kind, person_id, event_id, category, detail";

/// Raw strings read directly from an `activity` row.
pub struct RawActivity {
  pub entry_id:    String,
  pub recorded_at: String,
  pub kind:        String,
  pub person_id:   Option<String>,
  pub event_id:    Option<String>,
  pub category:    Option<String>,
  pub detail:      String,
}

impl RawActivity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:    row.get(0)?,
      recorded_at: row.get(1)?,
      kind:        row.get(2)?,
      person_id:   row.get(3)?,
      event_id:    row.get(4)?,
      category:    row.get(5)?,
      detail:      row.get(6)?,
    })
  }

  pub fn into_entry(self) -> Result<ActivityEntry> {
    Ok(ActivityEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      recorded_at: decode_dt(&self.recorded_at)?,
      kind:        decode_activity_kind(&self.kind)?,
      person_id:   self.person_id.as_deref().map(decode_uuid).transpose()?,
      event_id:    self.event_id.as_deref().map(decode_uuid).transpose()?,
      category:    self.category.as_deref().map(decode_category).transpose()?,
      detail:      self.detail,
    })
  }
}

/// Insert one history entry. Runs on the caller's connection or transaction
/// so the entry commits together with the mutation it describes.
pub fn insert_activity(conn: &rusqlite::Connection, entry: &ActivityEntry) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO activity (entry_id, recorded_at, kind, person_id, event_id, category, detail)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      encode_uuid(entry.entry_id),
      encode_dt(entry.recorded_at),
      encode_activity_kind(entry.kind),
      entry.person_id.map(encode_uuid),
      entry.event_id.map(encode_uuid),
      entry.category.map(encode_category),
      entry.detail,
    ],
  )?;
  Ok(())
}
