//! Upload routing: inbound form-field name → document category, and the
//! folder/filename a stored upload receives.
//!
//! Field names are matched by substring containment against an ordered token
//! table; the first matching rule wins. This is loose on purpose: browser
//! forms have used several spellings (`doc-cadunico`, `cad_unico`, ...) for
//! the same category. A field containing tokens for two categories resolves
//! to whichever rule is declared first.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result, document::DocumentCategory, person::Person};

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

const NAMELESS_FOLDER: &str = "sem_nome";

// ─── Field routing ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingRule {
  pub token:    String,
  pub category: DocumentCategory,
}

/// Ordered token table plus the fallback category for unmatched fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRouting {
  rules:    Vec<RoutingRule>,
  fallback: DocumentCategory,
}

impl FieldRouting {
  pub fn new<T: Into<String>>(
    rules: impl IntoIterator<Item = (T, DocumentCategory)>,
    fallback: DocumentCategory,
  ) -> Self {
    Self {
      rules: rules
        .into_iter()
        .map(|(token, category)| RoutingRule {
          token: token.into().to_lowercase(),
          category,
        })
        .collect(),
      fallback,
    }
  }

  /// The table matching the document-upload form.
  pub fn standard() -> Self {
    use DocumentCategory::*;
    Self::new(
      [
        ("requerimento", Requerimento),
        ("foto", Foto),
        ("oficial", DocOficial),
        ("laudo", Laudo),
        ("cad", CadUnico),
        ("bpc", CartaoBpc),
        ("comprovante", Comprovante),
      ],
      Documento,
    )
  }

  pub fn rules(&self) -> &[RoutingRule] { &self.rules }

  pub fn fallback(&self) -> DocumentCategory { self.fallback }

  /// Resolve a form-field name to a category.
  pub fn resolve(&self, field_name: &str) -> DocumentCategory {
    let field = field_name.to_lowercase();
    self
      .rules
      .iter()
      .find(|rule| field.contains(rule.token.as_str()))
      .map(|rule| rule.category)
      .unwrap_or(self.fallback)
  }
}

impl Default for FieldRouting {
  fn default() -> Self { Self::standard() }
}

// ─── Upload planning ─────────────────────────────────────────────────────────

/// Where and under what name one uploaded file will be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadPlan {
  pub field:     String,
  pub category:  DocumentCategory,
  /// Folder relative to the blob store root, e.g. `documentos/Maria_Silva_1a2b3c4d`.
  pub folder:    String,
  /// e.g. `laudo-1718000000000.pdf`
  pub filename:  String,
  pub extension: String,
}

impl UploadPlan {
  /// `folder/filename`, the storage location reference.
  pub fn location(&self) -> String { format!("{}/{}", self.folder, self.filename) }
}

/// Plan storage for one uploaded file.
///
/// The extension comes from `original_name` when it has one, otherwise from
/// `content_type`; it must be one of [`ALLOWED_EXTENSIONS`].
pub fn plan_upload(
  routing: &FieldRouting,
  person: &Person,
  field: &str,
  original_name: Option<&str>,
  content_type: Option<&str>,
  now: DateTime<Utc>,
) -> Result<UploadPlan> {
  let category = routing.resolve(field);

  let extension = original_name
    .and_then(extension_of)
    .or_else(|| content_type.and_then(extension_for_mime))
    .ok_or_else(|| Error::UnsupportedFormat {
      field: field.to_owned(),
      found: original_name.or(content_type).unwrap_or_default().to_owned(),
    })?;

  if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
    return Err(Error::UnsupportedFormat {
      field: field.to_owned(),
      found: extension,
    });
  }

  Ok(UploadPlan {
    field: field.to_owned(),
    category,
    folder: person_folder(person),
    filename: format!("{category}-{}.{extension}", now.timestamp_millis()),
    extension,
  })
}

/// `documentos/<slug>_<first 8 hex digits of the id>`.
pub fn person_folder(person: &Person) -> String {
  let id = person.person_id.simple().to_string();
  format!("documentos/{}_{}", name_slug(&person.full_name), &id[..8])
}

/// Whitespace runs become `_`; anything but alphanumerics, `-` and `_` is
/// dropped.
pub fn name_slug(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  for word in name.split_whitespace() {
    let cleaned: String = word
      .chars()
      .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
      .collect();
    if cleaned.is_empty() {
      continue;
    }
    if !slug.is_empty() {
      slug.push('_');
    }
    slug.push_str(&cleaned);
  }
  if slug.is_empty() {
    NAMELESS_FOLDER.to_owned()
  } else {
    slug
  }
}

fn extension_of(name: &str) -> Option<String> {
  let (stem, ext) = name.rsplit_once('.')?;
  if stem.is_empty() || ext.is_empty() {
    return None;
  }
  Some(ext.to_ascii_lowercase())
}

fn extension_for_mime(mime: &str) -> Option<String> {
  let essence = mime.split(';').next().unwrap_or_default().trim();
  let ext = match essence.to_ascii_lowercase().as_str() {
    "image/jpeg" | "image/jpg" => "jpg",
    "image/png" => "png",
    "application/pdf" => "pdf",
    _ => return None,
  };
  Some(ext.to_owned())
}

/// Media type to serve a stored file with, from its filename extension.
pub fn content_type_for(filename: &str) -> &'static str {
  match extension_of(filename).as_deref() {
    Some("jpg" | "jpeg") => "image/jpeg",
    Some("png") => "image/png",
    Some("pdf") => "application/pdf",
    _ => "application/octet-stream",
  }
}
