//! Document completeness evaluation.
//!
//! A person is complete when every category the [`Taxonomy`] marks as
//! required has a current record. Optional and untracked categories are
//! reported in `present` but never change the verdict.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  document::{DocumentCategory, Taxonomy},
  error::{Classify, ErrorClass},
  store::DocumentStore,
};

/// The completeness summary attached to a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsStatus {
  pub complete: bool,
  /// Required categories without a record, in the taxonomy's order.
  pub missing:  Vec<DocumentCategory>,
  /// Every category with a record, in canonical order.
  #[serde(rename = "presentes")]
  pub present:  Vec<DocumentCategory>,
}

#[derive(Debug, Error)]
pub enum EvaluationError<E: std::error::Error + 'static> {
  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] E),
}

impl<E: std::error::Error + Classify + 'static> Classify for EvaluationError<E> {
  fn class(&self) -> ErrorClass {
    match self {
      Self::PersonNotFound(_) => ErrorClass::NotFound,
      Self::Store(e) => e.class(),
    }
  }
}

/// Evaluates completeness against the taxonomy it was built with.
#[derive(Debug, Clone, Default)]
pub struct CompletenessEvaluator {
  taxonomy: Taxonomy,
}

impl CompletenessEvaluator {
  pub fn new(taxonomy: Taxonomy) -> Self { Self { taxonomy } }

  pub fn taxonomy(&self) -> &Taxonomy { &self.taxonomy }

  /// Pure evaluation over an already-loaded set of categories. Duplicates in
  /// `present` are irrelevant.
  pub fn evaluate_categories(
    &self,
    present: impl IntoIterator<Item = DocumentCategory>,
  ) -> DocsStatus {
    let present: BTreeSet<DocumentCategory> = present.into_iter().collect();
    let missing: Vec<DocumentCategory> = self
      .taxonomy
      .required()
      .iter()
      .copied()
      .filter(|c| !present.contains(c))
      .collect();

    DocsStatus {
      complete: missing.is_empty(),
      missing,
      present: present.into_iter().collect(),
    }
  }

  /// Load a person's categories from `store` and evaluate them.
  pub async fn evaluate<S: DocumentStore>(
    &self,
    store: &S,
    person_id: Uuid,
  ) -> Result<DocsStatus, EvaluationError<S::Error>> {
    if store
      .get_person(person_id)
      .await
      .map_err(EvaluationError::Store)?
      .is_none()
    {
      return Err(EvaluationError::PersonNotFound(person_id));
    }

    let categories = store
      .document_categories(person_id)
      .await
      .map_err(EvaluationError::Store)?;

    Ok(self.evaluate_categories(categories))
  }
}
