//! People: the registrants whose documents are being collected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A registered person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:   Uuid,
  pub full_name:   String,
  /// National identification number; unique across the store.
  pub national_id: String,
  pub phone:       Option<String>,
  pub note:        String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::DocumentStore::add_person`].
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
  pub full_name:   String,
  pub national_id: String,
  pub phone:       Option<String>,
  pub note:        String,
  /// Events to link the person to on creation.
  pub event_ids:   Vec<Uuid>,
}

impl NewPerson {
  pub fn new(full_name: impl Into<String>, national_id: impl Into<String>) -> Self {
    Self {
      full_name: full_name.into(),
      national_id: national_id.into(),
      ..Default::default()
    }
  }

  /// Trim every text field and reject blank names or national ids.
  pub fn normalized(mut self) -> Result<Self> {
    self.full_name = required(self.full_name, "full_name")?;
    self.national_id = required(self.national_id, "national_id")?;
    self.phone = optional(self.phone);
    self.note = self.note.trim().to_owned();
    Ok(self)
  }
}

/// Partial update for [`crate::store::DocumentStore::update_person`]. `None`
/// leaves the field unchanged; `phone: Some(None)` clears the phone.
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
  pub full_name:   Option<String>,
  pub national_id: Option<String>,
  pub phone:       Option<Option<String>>,
  pub note:        Option<String>,
}

impl PersonPatch {
  pub fn normalized(self) -> Result<Self> {
    Ok(Self {
      full_name:   self
        .full_name
        .map(|n| required(n, "full_name"))
        .transpose()?,
      national_id: self
        .national_id
        .map(|n| required(n, "national_id"))
        .transpose()?,
      phone:       self.phone.map(optional),
      note:        self.note.map(|n| n.trim().to_owned()),
    })
  }

  /// Apply the patch to a copy of `person`.
  pub fn apply(&self, person: &Person) -> Person {
    Person {
      person_id:   person.person_id,
      full_name:   self.full_name.clone().unwrap_or_else(|| person.full_name.clone()),
      national_id: self
        .national_id
        .clone()
        .unwrap_or_else(|| person.national_id.clone()),
      phone:       self.phone.clone().unwrap_or_else(|| person.phone.clone()),
      note:        self.note.clone().unwrap_or_else(|| person.note.clone()),
      created_at:  person.created_at,
    }
  }
}

pub(crate) fn required(value: String, field: &'static str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::BlankField(field));
  }
  Ok(trimmed.to_owned())
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
