//! The administrator's history log.
//!
//! Entries are append-only and written by the store in the same unit of work
//! as the mutation they describe. They carry plain ids rather than foreign
//! keys, so the history of a deleted person survives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::document::DocumentCategory;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
  PersonRegistered,
  PersonUpdated,
  PersonDeleted,
  EventCreated,
  EventUpdated,
  EventDeleted,
  PersonLinked,
  PersonUnlinked,
  DocumentStored,
  DocumentReplaced,
}

impl ActivityKind {
  pub fn as_str(self) -> &'static str { self.into() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
  pub entry_id:    Uuid,
  pub recorded_at: DateTime<Utc>,
  pub kind:        ActivityKind,
  pub person_id:   Option<Uuid>,
  pub event_id:    Option<Uuid>,
  pub category:    Option<DocumentCategory>,
  /// Human-readable summary, e.g. the person's name or the stored filename.
  pub detail:      String,
}

impl ActivityEntry {
  pub fn new(kind: ActivityKind, detail: impl Into<String>) -> Self {
    Self {
      entry_id: Uuid::new_v4(),
      recorded_at: Utc::now(),
      kind,
      person_id: None,
      event_id: None,
      category: None,
      detail: detail.into(),
    }
  }

  pub fn person(mut self, id: Uuid) -> Self {
    self.person_id = Some(id);
    self
  }

  pub fn event(mut self, id: Uuid) -> Self {
    self.event_id = Some(id);
    self
  }

  pub fn category(mut self, category: DocumentCategory) -> Self {
    self.category = Some(category);
    self
  }
}

/// Parameters for [`crate::store::DocumentStore::list_activity`].
#[derive(Debug, Clone, Default)]
pub struct ActivityQuery {
  pub person_id: Option<Uuid>,
  pub limit:     Option<usize>,
}
