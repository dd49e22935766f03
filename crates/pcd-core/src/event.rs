//! Events people are registered for, and the person ↔ event link.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  person::{optional, required},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:    Uuid,
  pub name:        String,
  pub date:        Option<NaiveDate>,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::DocumentStore::add_event`].
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
  pub name:        String,
  pub date:        Option<NaiveDate>,
  pub description: Option<String>,
}

impl NewEvent {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Default::default() }
  }

  pub fn normalized(self) -> Result<Self> {
    Ok(Self {
      name:        required(self.name, "name")?,
      date:        self.date,
      description: optional(self.description),
    })
  }
}

/// Partial update for [`crate::store::DocumentStore::update_event`].
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
  pub name:        Option<String>,
  pub date:        Option<Option<NaiveDate>>,
  pub description: Option<Option<String>>,
}

impl EventPatch {
  pub fn normalized(self) -> Result<Self> {
    Ok(Self {
      name:        self.name.map(|n| required(n, "name")).transpose()?,
      date:        self.date,
      description: self.description.map(optional),
    })
  }

  pub fn apply(&self, event: &Event) -> Event {
    Event {
      event_id:    event.event_id,
      name:        self.name.clone().unwrap_or_else(|| event.name.clone()),
      date:        self.date.unwrap_or(event.date),
      description: self
        .description
        .clone()
        .unwrap_or_else(|| event.description.clone()),
      created_at:  event.created_at,
    }
  }
}

/// Many-to-many link between a person and an event; unique per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEventAssociation {
  pub person_id: Uuid,
  pub event_id:  Uuid,
}
