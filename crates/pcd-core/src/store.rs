//! The `DocumentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `pcd-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.

use std::{
  collections::{BTreeSet, HashMap},
  future::Future,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  activity::{ActivityEntry, ActivityQuery},
  document::{DocumentCategory, DocumentRecord, NewDocument, Replacement},
  error::Classify,
  event::{Event, EventPatch, NewEvent, PersonEventAssociation},
  person::{NewPerson, Person, PersonPatch},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`DocumentStore::list_people`].
#[derive(Debug, Clone, Default)]
pub struct PersonQuery {
  /// Only people linked to this event.
  pub event_id: Option<Uuid>,
  /// Case-insensitive match on name or national id.
  pub text:     Option<String>,
}

/// Full export of the store's contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
  pub exported_at:  DateTime<Utc>,
  pub people:       Vec<Person>,
  pub events:       Vec<Event>,
  pub associations: Vec<PersonEventAssociation>,
  pub documents:    Vec<DocumentRecord>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational store backing the service.
///
/// Every mutating method also appends an [`ActivityEntry`] describing it.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Register a person and link them to `input.event_ids`.
  ///
  /// Fails if the national id is taken or an event id does not exist; in
  /// either case nothing is written.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// People ordered by name.
  fn list_people<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Returns `None` if the person does not exist.
  fn update_person(
    &self,
    id: Uuid,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person together with their document records and event links.
  /// Returns the removed document records, or `None` if the person did not
  /// exist.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Vec<DocumentRecord>>, Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  fn add_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Events ordered by date (undated last), then name.
  fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  fn update_event(
    &self,
    id: Uuid,
    patch: EventPatch,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Returns `false` if the event did not exist.
  fn delete_event(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Associations ──────────────────────────────────────────────────────

  /// Link a person to an event. Returns `false` if already linked.
  fn link(
    &self,
    person_id: Uuid,
    event_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if the pair was not linked.
  fn unlink(
    &self,
    person_id: Uuid,
    event_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn events_for_person(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Upsert-by-category: remove any record for `(person_id, category)` and
  /// insert `input` in one unit of work. Fails if the person does not exist.
  fn replace_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Replacement, Self::Error>> + Send + '_;

  /// Current records for a person, in canonical category order.
  fn list_documents(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DocumentRecord>, Self::Error>> + Send + '_;

  /// The distinct categories a person currently has records for.
  fn document_categories(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<BTreeSet<DocumentCategory>, Self::Error>> + Send + '_;

  /// [`Self::document_categories`] for many people at once. People without
  /// records are absent from the map.
  fn categories_for_people<'a>(
    &'a self,
    person_ids: &'a [Uuid],
  ) -> impl Future<Output = Result<HashMap<Uuid, BTreeSet<DocumentCategory>>, Self::Error>> + Send + 'a;

  // ── History & export ──────────────────────────────────────────────────

  /// Newest first.
  fn list_activity<'a>(
    &'a self,
    query: &'a ActivityQuery,
  ) -> impl Future<Output = Result<Vec<ActivityEntry>, Self::Error>> + Send + 'a;

  fn snapshot(&self) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;
}
