//! [`SqliteStore`], the SQLite implementation of [`DocumentStore`].

use std::{
  collections::{BTreeSet, HashMap},
  path::Path,
};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use pcd_core::{
  activity::{ActivityEntry, ActivityKind, ActivityQuery},
  document::{DocumentCategory, DocumentRecord, NewDocument, Replacement},
  event::{Event, EventPatch, NewEvent, PersonEventAssociation},
  person::{NewPerson, Person, PersonPatch},
  store::{DocumentStore, PersonQuery, Snapshot},
};

use crate::{
  Error, Result,
  encode::{
    ACTIVITY_COLUMNS, DOCUMENT_COLUMNS, EVENT_COLUMNS, PERSON_COLUMNS, RawActivity,
    RawDocument, RawEvent, RawPerson, decode_category, decode_uuid, encode_category,
    encode_date, encode_dt, encode_uuid, insert_activity,
  },
  schema::SCHEMA,
};

const DEFAULT_ACTIVITY_LIMIT: usize = 100;

/// Ids bound per `IN (...)` query, well under SQLite's variable limit.
const ID_CHUNK: usize = 500;

/// Escape `\`, `%` and `_` so user text matches literally under
/// `LIKE ... ESCAPE '\'`.
fn escape_like(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// Outcome of a write closure that may be refused by a precondition. The
/// closure returns early (rolling back its transaction) on anything but
/// `Done`.
enum Write<T> {
  Done(T),
  DuplicateNationalId,
  MissingPerson,
  MissingEvent(Uuid),
}

impl<T> Write<T> {
  fn into_result(self, person_id: Uuid, national_id: &str) -> Result<T> {
    match self {
      Write::Done(v) => Ok(v),
      Write::DuplicateNationalId => Err(Error::DuplicateNationalId(national_id.to_owned())),
      Write::MissingPerson => Err(Error::PersonNotFound(person_id)),
      Write::MissingEvent(id) => Err(Error::EventNotFound(id)),
    }
  }
}

fn row_exists(
  conn: &rusqlite::Connection,
  sql: &str,
  param: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(sql, rusqlite::params![param], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store. Used by tests.
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
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let input = input.normalized()?;
    let person = Person {
      person_id:   Uuid::new_v4(),
      full_name:   input.full_name,
      national_id: input.national_id,
      phone:       input.phone,
      note:        input.note,
      created_at:  Utc::now(),
    };
    let entry = ActivityEntry::new(ActivityKind::PersonRegistered, person.full_name.clone())
      .person(person.person_id);
    let event_ids = input.event_ids;

    let row = person.clone();
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if row_exists(&tx, "SELECT 1 FROM people WHERE national_id = ?1", &row.national_id)? {
          return Ok(Write::DuplicateNationalId);
        }
        for event_id in &event_ids {
          if !row_exists(&tx, "SELECT 1 FROM events WHERE event_id = ?1", &encode_uuid(*event_id))? {
            return Ok(Write::MissingEvent(*event_id));
          }
        }

        let person_id = encode_uuid(row.person_id);
        tx.execute(
          "INSERT INTO people (person_id, full_name, national_id, phone, note, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            person_id,
            row.full_name,
            row.national_id,
            row.phone,
            row.note,
            encode_dt(row.created_at),
          ],
        )?;
        for event_id in &event_ids {
          tx.execute(
            "INSERT OR IGNORE INTO person_events (person_id, event_id) VALUES (?1, ?2)",
            rusqlite::params![person_id, encode_uuid(*event_id)],
          )?;
        }
        insert_activity(&tx, &entry)?;
        tx.commit()?;
        Ok(Write::Done(()))
      })
      .await?;

    outcome.into_result(person.person_id, &person.national_id)?;
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1"),
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    let event_str    = query.event_id.map(encode_uuid);
    let text_pattern = query
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(|t| format!("%{}%", escape_like(&t.to_lowercase())));

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM people p
           WHERE (?1 IS NULL OR EXISTS (
                    SELECT 1 FROM person_events pe
                    WHERE pe.person_id = p.person_id AND pe.event_id = ?1))
             AND (?2 IS NULL
                  OR lower(p.full_name) LIKE ?2 ESCAPE '\\'
                  OR lower(p.national_id) LIKE ?2 ESCAPE '\\')
           ORDER BY p.full_name COLLATE NOCASE, p.created_at"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![event_str.as_deref(), text_pattern.as_deref()],
            RawPerson::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn update_person(&self, id: Uuid, patch: PersonPatch) -> Result<Option<Person>> {
    let patch = patch.normalized()?;
    let Some(current) = self.get_person(id).await? else {
      return Ok(None);
    };
    let updated = patch.apply(&current);
    let entry = ActivityEntry::new(ActivityKind::PersonUpdated, updated.full_name.clone())
      .person(id);

    let row = updated.clone();
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_id = encode_uuid(row.person_id);
        let taken = tx
          .query_row(
            "SELECT 1 FROM people WHERE national_id = ?1 AND person_id != ?2",
            rusqlite::params![row.national_id, person_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(Write::DuplicateNationalId);
        }

        let changed = tx.execute(
          "UPDATE people SET full_name = ?2, national_id = ?3, phone = ?4, note = ?5
           WHERE person_id = ?1",
          rusqlite::params![person_id, row.full_name, row.national_id, row.phone, row.note],
        )?;
        if changed == 0 {
          return Ok(Write::MissingPerson);
        }
        insert_activity(&tx, &entry)?;
        tx.commit()?;
        Ok(Write::Done(()))
      })
      .await?;

    match outcome {
      // Deleted between the read and the write.
      Write::MissingPerson => Ok(None),
      other => {
        other.into_result(id, &updated.national_id)?;
        Ok(Some(updated))
      }
    }
  }

  async fn delete_person(&self, id: Uuid) -> Result<Option<Vec<DocumentRecord>>> {
    let id_str = encode_uuid(id);

    let removed: Option<Vec<RawDocument>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let name: Option<String> = tx
          .query_row(
            "SELECT full_name FROM people WHERE person_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;
        let Some(name) = name else {
          return Ok(None);
        };

        let docs = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE person_id = ?1"
          ))?;
          stmt
            .query_map(rusqlite::params![id_str], RawDocument::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        // documents and person_events rows go with it via ON DELETE CASCADE.
        tx.execute("DELETE FROM people WHERE person_id = ?1", rusqlite::params![id_str])?;
        insert_activity(&tx, &ActivityEntry::new(ActivityKind::PersonDeleted, name).person(id))?;
        tx.commit()?;
        Ok(Some(docs))
      })
      .await?;

    removed
      .map(|docs| docs.into_iter().map(RawDocument::into_record).collect())
      .transpose()
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn add_event(&self, input: NewEvent) -> Result<Event> {
    let input = input.normalized()?;
    let event = Event {
      event_id:    Uuid::new_v4(),
      name:        input.name,
      date:        input.date,
      description: input.description,
      created_at:  Utc::now(),
    };
    let entry =
      ActivityEntry::new(ActivityKind::EventCreated, event.name.clone()).event(event.event_id);

    let row = event.clone();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO events (event_id, name, event_date, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            encode_uuid(row.event_id),
            row.name,
            row.date.map(encode_date),
            row.description,
            encode_dt(row.created_at),
          ],
        )?;
        insert_activity(&tx, &entry)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1"),
              rusqlite::params![id_str],
              RawEvent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn list_events(&self) -> Result<Vec<Event>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events
           ORDER BY event_date IS NULL, event_date, name COLLATE NOCASE"
        ))?;
        let rows = stmt
          .query_map([], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>> {
    let patch = patch.normalized()?;
    let Some(current) = self.get_event(id).await? else {
      return Ok(None);
    };
    let updated = patch.apply(&current);
    let entry = ActivityEntry::new(ActivityKind::EventUpdated, updated.name.clone()).event(id);

    let row = updated.clone();
    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE events SET name = ?2, event_date = ?3, description = ?4 WHERE event_id = ?1",
          rusqlite::params![
            encode_uuid(row.event_id),
            row.name,
            row.date.map(encode_date),
            row.description,
          ],
        )?;
        if changed > 0 {
          insert_activity(&tx, &entry)?;
          tx.commit()?;
        }
        Ok(changed > 0)
      })
      .await?;

    Ok(changed.then_some(updated))
  }

  async fn delete_event(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let name: Option<String> = tx
          .query_row(
            "SELECT name FROM events WHERE event_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;
        let Some(name) = name else {
          return Ok(false);
        };
        tx.execute("DELETE FROM events WHERE event_id = ?1", rusqlite::params![id_str])?;
        insert_activity(&tx, &ActivityEntry::new(ActivityKind::EventDeleted, name).event(id))?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(deleted)
  }

  // ── Associations ──────────────────────────────────────────────────────────

  async fn link(&self, person_id: Uuid, event_id: Uuid) -> Result<bool> {
    let person_str = encode_uuid(person_id);
    let event_str  = encode_uuid(event_id);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !row_exists(&tx, "SELECT 1 FROM people WHERE person_id = ?1", &person_str)? {
          return Ok(Write::MissingPerson);
        }
        let event_name: Option<String> = tx
          .query_row(
            "SELECT name FROM events WHERE event_id = ?1",
            rusqlite::params![event_str],
            |r| r.get(0),
          )
          .optional()?;
        let Some(event_name) = event_name else {
          return Ok(Write::MissingEvent(event_id));
        };

        let inserted = tx.execute(
          "INSERT OR IGNORE INTO person_events (person_id, event_id) VALUES (?1, ?2)",
          rusqlite::params![person_str, event_str],
        )?;
        if inserted > 0 {
          insert_activity(
            &tx,
            &ActivityEntry::new(ActivityKind::PersonLinked, event_name)
              .person(person_id)
              .event(event_id),
          )?;
        }
        tx.commit()?;
        Ok(Write::Done(inserted > 0))
      })
      .await?;

    outcome.into_result(person_id, "")
  }

  async fn unlink(&self, person_id: Uuid, event_id: Uuid) -> Result<bool> {
    let person_str = encode_uuid(person_id);
    let event_str  = encode_uuid(event_id);

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM person_events WHERE person_id = ?1 AND event_id = ?2",
          rusqlite::params![person_str, event_str],
        )?;
        if removed > 0 {
          insert_activity(
            &tx,
            &ActivityEntry::new(ActivityKind::PersonUnlinked, String::new())
              .person(person_id)
              .event(event_id),
          )?;
          tx.commit()?;
        }
        Ok(removed > 0)
      })
      .await?;

    Ok(removed)
  }

  async fn events_for_person(&self, person_id: Uuid) -> Result<Vec<Event>> {
    let person_str = encode_uuid(person_id);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT e.event_id, e.name, e.event_date, e.description, e.created_at
           FROM events e
           JOIN person_events pe ON pe.event_id = e.event_id
           WHERE pe.person_id = ?1
           ORDER BY e.event_date IS NULL, e.event_date, e.name COLLATE NOCASE",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_str], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn replace_document(&self, input: NewDocument) -> Result<Replacement> {
    let record = DocumentRecord {
      document_id:  Uuid::new_v4(),
      person_id:    input.person_id,
      category:     input.category,
      filename:     input.filename,
      location:     input.location,
      content_hash: input.content_hash,
      size_bytes:   input.size_bytes,
      created_at:   Utc::now(),
    };

    let row = record.clone();
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let person_str   = encode_uuid(row.person_id);
        let category_str = encode_category(row.category);
        if !row_exists(&tx, "SELECT 1 FROM people WHERE person_id = ?1", &person_str)? {
          return Ok(Write::MissingPerson);
        }

        let previous: Option<RawDocument> = tx
          .query_row(
            &format!(
              "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE person_id = ?1 AND category = ?2"
            ),
            rusqlite::params![person_str, category_str],
            RawDocument::from_row,
          )
          .optional()?;

        tx.execute(
          "DELETE FROM documents WHERE person_id = ?1 AND category = ?2",
          rusqlite::params![person_str, category_str],
        )?;
        tx.execute(
          "INSERT INTO documents (
             document_id, person_id, category, filename, location,
             content_hash, size_bytes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            encode_uuid(row.document_id),
            person_str,
            category_str,
            row.filename,
            row.location,
            row.content_hash,
            i64::try_from(row.size_bytes).unwrap_or(i64::MAX),
            encode_dt(row.created_at),
          ],
        )?;

        let kind = if previous.is_some() {
          ActivityKind::DocumentReplaced
        } else {
          ActivityKind::DocumentStored
        };
        insert_activity(
          &tx,
          &ActivityEntry::new(kind, row.filename.clone())
            .person(row.person_id)
            .category(row.category),
        )?;
        tx.commit()?;
        Ok(Write::Done(previous))
      })
      .await?;

    let previous = outcome.into_result(record.person_id, "")?;
    Ok(Replacement {
      record,
      superseded: previous.map(RawDocument::into_record).transpose()?,
    })
  }

  async fn list_documents(&self, person_id: Uuid) -> Result<Vec<DocumentRecord>> {
    let person_str = encode_uuid(person_id);

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE person_id = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![person_str], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut records: Vec<DocumentRecord> = raws
      .into_iter()
      .map(RawDocument::into_record)
      .collect::<Result<_>>()?;
    records.sort_by_key(|r| r.category);
    Ok(records)
  }

  async fn document_categories(&self, person_id: Uuid) -> Result<BTreeSet<DocumentCategory>> {
    let person_str = encode_uuid(person_id);

    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT DISTINCT category FROM documents WHERE person_id = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![person_str], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| decode_category(s)).collect()
  }

  async fn categories_for_people(
    &self,
    person_ids: &[Uuid],
  ) -> Result<HashMap<Uuid, BTreeSet<DocumentCategory>>> {
    let chunks: Vec<Vec<String>> = person_ids
      .chunks(ID_CHUNK)
      .map(|chunk| chunk.iter().copied().map(encode_uuid).collect())
      .collect();

    let raws: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut rows = Vec::new();
        for ids in &chunks {
          let placeholders = vec!["?"; ids.len()].join(", ");
          let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT person_id, category FROM documents
             WHERE person_id IN ({placeholders})"
          ))?;
          let found = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<Vec<(String, String)>>>()?;
          rows.extend(found);
        }
        Ok(rows)
      })
      .await?;

    let mut by_person: HashMap<Uuid, BTreeSet<DocumentCategory>> = HashMap::new();
    for (person, category) in raws {
      by_person
        .entry(decode_uuid(&person)?)
        .or_default()
        .insert(decode_category(&category)?);
    }
    Ok(by_person)
  }

  // ── History & export ──────────────────────────────────────────────────────

  async fn list_activity(&self, query: &ActivityQuery) -> Result<Vec<ActivityEntry>> {
    let person_str = query.person_id.map(encode_uuid);
    let limit_val  = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT) as i64;

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACTIVITY_COLUMNS} FROM activity
           WHERE ?1 IS NULL OR person_id = ?1
           ORDER BY recorded_at DESC, rowid DESC
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![person_str.as_deref(), limit_val], RawActivity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_entry).collect()
  }

  async fn snapshot(&self) -> Result<Snapshot> {
    let exported_at = Utc::now();

    let (people, events, links, documents) = self
      .conn
      .call(|conn| {
        let people = conn
          .prepare(&format!("SELECT {PERSON_COLUMNS} FROM people ORDER BY created_at"))?
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let events = conn
          .prepare(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at"))?
          .query_map([], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let links = conn
          .prepare("SELECT person_id, event_id FROM person_events ORDER BY person_id, event_id")?
          .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let documents = conn
          .prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY person_id, created_at"
          ))?
          .query_map([], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((people, events, links, documents))
      })
      .await?;

    Ok(Snapshot {
      exported_at,
      people: people.into_iter().map(RawPerson::into_person).collect::<Result<_>>()?,
      events: events.into_iter().map(RawEvent::into_event).collect::<Result<_>>()?,
      associations: links
        .into_iter()
        .map(|(p, e)| {
          Ok(PersonEventAssociation {
            person_id: decode_uuid(&p)?,
            event_id:  decode_uuid(&e)?,
          })
        })
        .collect::<Result<_>>()?,
      documents: documents
        .into_iter()
        .map(RawDocument::into_record)
        .collect::<Result<_>>()?,
    })
  }
}
