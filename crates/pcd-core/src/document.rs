//! Document categories, the required/optional taxonomy, and stored records.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};
use uuid::Uuid;

use crate::Error;

// ─── Category ────────────────────────────────────────────────────────────────

/// A document type. Declaration order is the canonical display order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentCategory {
  /// Signed request form.
  Requerimento,
  Foto,
  /// Official photo ID.
  DocOficial,
  /// Medical report.
  Laudo,
  /// Low-income registry (CadÚnico) extract.
  CadUnico,
  /// Proof of residence.
  Comprovante,
  /// Benefit (BPC) card.
  CartaoBpc,
  /// Any upload that does not route to a known category.
  Documento,
}

impl DocumentCategory {
  /// The string stored in the `category` column and used on the wire.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self, Error> {
    Self::from_str(s).map_err(|_| Error::UnknownCategory(s.to_owned()))
  }

  pub fn all() -> impl Iterator<Item = Self> { Self::iter() }
}

// ─── Taxonomy ────────────────────────────────────────────────────────────────

/// How a category counts toward completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
  Required,
  Optional,
  /// Neither required nor optional; informational only.
  Untracked,
}

/// The checklist a person's documents are measured against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
  required: Vec<DocumentCategory>,
  optional: Vec<DocumentCategory>,
}

impl Taxonomy {
  /// Build a taxonomy. Duplicates are dropped, keeping first occurrence; a
  /// category listed as required is never also optional.
  pub fn new(
    required: impl IntoIterator<Item = DocumentCategory>,
    optional: impl IntoIterator<Item = DocumentCategory>,
  ) -> Self {
    let mut req: Vec<DocumentCategory> = Vec::new();
    for c in required {
      if !req.contains(&c) {
        req.push(c);
      }
    }
    let mut opt: Vec<DocumentCategory> = Vec::new();
    for c in optional {
      if !req.contains(&c) && !opt.contains(&c) {
        opt.push(c);
      }
    }
    Self { required: req, optional: opt }
  }

  /// The fixed checklist used by the service.
  pub fn standard() -> Self {
    use DocumentCategory::*;
    Self::new(
      [Requerimento, Foto, DocOficial, Laudo, CadUnico, Comprovante],
      [CartaoBpc],
    )
  }

  /// Required categories in canonical order.
  pub fn required(&self) -> &[DocumentCategory] { &self.required }

  pub fn optional(&self) -> &[DocumentCategory] { &self.optional }

  pub fn requirement(&self, category: DocumentCategory) -> Requirement {
    if self.required.contains(&category) {
      Requirement::Required
    } else if self.optional.contains(&category) {
      Requirement::Optional
    } else {
      Requirement::Untracked
    }
  }
}

impl Default for Taxonomy {
  fn default() -> Self { Self::standard() }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// The current stored document for one (person, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
  pub document_id:  Uuid,
  pub person_id:    Uuid,
  pub category:     DocumentCategory,
  pub filename:     String,
  /// Storage reference, relative to the blob store root.
  pub location:     String,
  /// SHA-256 hex digest of the stored bytes.
  pub content_hash: String,
  pub size_bytes:   u64,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::DocumentStore::replace_document`].
#[derive(Debug, Clone)]
pub struct NewDocument {
  pub person_id:    Uuid,
  pub category:     DocumentCategory,
  pub filename:     String,
  pub location:     String,
  pub content_hash: String,
  pub size_bytes:   u64,
}

/// Result of an upsert-by-category write.
#[derive(Debug, Clone, Serialize)]
pub struct Replacement {
  pub record:     DocumentRecord,
  /// The record that previously held this (person, category) slot, if any.
  pub superseded: Option<DocumentRecord>,
}
