//! Router-level tests against an in-memory store and a temp-dir blob store.

use std::sync::Arc;

use axum::{
  body::{Body, Bytes},
  http::{HeaderMap, Request, StatusCode, header},
};
use pcd_storage_fs::DiskStorage;
use pcd_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;

use crate::{ApiState, api_router};

const BOUNDARY: &str = "pcd-test-boundary";

struct Harness {
  _dir:  TempDir,
  state: ApiState<SqliteStore, DiskStorage>,
}

async fn harness() -> Harness {
  let dir   = tempfile::tempdir().unwrap();
  let store = SqliteStore::open_in_memory().await.unwrap();
  let blobs = DiskStorage::new(dir.path().join("uploads"));
  Harness {
    state: ApiState::standard(Arc::new(store), Arc::new(blobs)),
    _dir:  dir,
  }
}

impl Harness {
  async fn raw(
    &self,
    method: &str,
    uri: &str,
    content_type: Option<String>,
    body: Vec<u8>,
  ) -> (StatusCode, HeaderMap, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
      builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let req  = builder.body(Body::from(body)).unwrap();
    let resp = api_router(self.state.clone()).oneshot(req).await.unwrap();
    let status  = resp.status();
    let headers = resp.headers().clone();
    let bytes   = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes)
  }

  async fn send(
    &self,
    method: &str,
    uri: &str,
    content_type: Option<String>,
    body: Vec<u8>,
  ) -> (StatusCode, Value) {
    let (status, _, bytes) = self.raw(method, uri, content_type, body).await;
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn get(&self, uri: &str) -> (StatusCode, Value) {
    self.send("GET", uri, None, Vec::new()).await
  }

  async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    self
      .send(method, uri, Some("application/json".into()), body.to_string().into_bytes())
      .await
  }

  async fn upload(&self, person_id: &str, parts: &[Part<'_>]) -> (StatusCode, Value) {
    self
      .send(
        "POST",
        &format!("/pessoas/{person_id}/docs"),
        Some(format!("multipart/form-data; boundary={BOUNDARY}")),
        multipart_body(parts),
      )
      .await
  }

  async fn register(&self, name: &str, national_id: &str) -> String {
    let (status, body) = self
      .json("POST", "/pessoas", json!({ "nome": name, "cpf": national_id }))
      .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["person_id"].as_str().unwrap().to_owned()
  }

  fn blob_exists(&self, location: &str) -> bool {
    self.state.blobs.root().join(location).exists()
  }
}

/// One multipart part: field name, optional file name, content type, contents.
type Part<'a> = (&'a str, Option<&'a str>, &'a str, &'a str);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, filename, content_type, data) in parts {
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match filename {
      Some(f) => body.extend_from_slice(
        format!(
          "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
           Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
      ),
      None => body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
      ),
    }
    body.extend_from_slice(data.as_bytes());
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

fn strings(v: &Value) -> Vec<&str> {
  v.as_array().unwrap().iter().map(|s| s.as_str().unwrap()).collect()
}

const ALL_REQUIRED: [&str; 6] =
  ["requerimento", "foto", "doc_oficial", "laudo", "cad_unico", "comprovante"];

// ── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_returns_person_with_empty_status() {
  let h = harness().await;
  let (status, body) = h
    .json(
      "POST",
      "/pessoas",
      json!({ "nome": "  Maria Silva ", "cpf": "111", "telefone": "9999" }),
    )
    .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["full_name"], "Maria Silva");
  assert_eq!(body["phone"], "9999");
  assert_eq!(body["docsStatus"]["complete"], false);
  assert_eq!(strings(&body["docsStatus"]["missing"]), ALL_REQUIRED);
  assert_eq!(body["docsStatus"]["presentes"], json!([]));
}

#[tokio::test]
async fn register_validation_and_conflicts() {
  let h = harness().await;

  let (status, body) = h.json("POST", "/pessoas", json!({ "cpf": "1" })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("full_name"));

  h.register("Ana", "1").await;
  let (status, body) = h.json("POST", "/pessoas", json!({ "nome": "Bia", "cpf": "1" })).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
  let h = harness().await;

  let (status, body) = h.get("/pessoas/not-a-uuid").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = h.json("POST", "/pessoas", json!({ "nome": 5, "cpf": "1" })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = h.send("POST", "/pessoas", None, b"{}".to_vec()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = h.get("/historico?limit=abc").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = h.send("PUT", "/eventos/x/pessoas/y", None, Vec::new()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_person_is_404() {
  let h  = harness().await;
  let id = uuid::Uuid::new_v4();

  assert_eq!(h.get(&format!("/pessoas/{id}")).await.0, StatusCode::NOT_FOUND);
  assert_eq!(h.get(&format!("/pessoas/{id}/status")).await.0, StatusCode::NOT_FOUND);
  assert_eq!(h.get(&format!("/pessoas/{id}/docs")).await.0, StatusCode::NOT_FOUND);
  let (status, _) = h
    .upload(&id.to_string(), &[("doc-foto", Some("a.jpg"), "image/jpeg", "x")])
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_person_clears_phone_with_null() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;
  h.json("PUT", &format!("/pessoas/{id}"), json!({ "telefone": "123" })).await;

  let (status, body) = h
    .json("PUT", &format!("/pessoas/{id}"), json!({ "phone": null, "note": "retorno" }))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["phone"], Value::Null);
  assert_eq!(body["note"], "retorno");
  assert_eq!(body["full_name"], "Ana");
  assert!(body["docsStatus"].is_object());
}

#[tokio::test]
async fn list_people_filters_by_text() {
  let h = harness().await;
  h.register("Ana Souza", "1").await;
  h.register("Bruno Lima", "2").await;

  let (_, all) = h.get("/pessoas").await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (status, found) = h.get("/pessoas?q=souza").await;
  assert_eq!(status, StatusCode::OK);
  let found = found.as_array().unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0]["full_name"], "Ana Souza");
  assert!(found[0]["docsStatus"]["missing"].is_array());
}

#[tokio::test]
async fn list_people_reports_each_persons_status() {
  let h   = harness().await;
  let ana = h.register("Ana", "1").await;
  h.register("Bia", "2").await;
  h.upload(&ana, &[("doc-laudo", Some("l.pdf"), "application/pdf", "l")]).await;

  let (status, list) = h.get("/pessoas").await;
  assert_eq!(status, StatusCode::OK);
  let list = list.as_array().unwrap();
  assert_eq!(list[0]["full_name"], "Ana");
  assert_eq!(strings(&list[0]["docsStatus"]["presentes"]), ["laudo"]);
  assert_eq!(list[1]["full_name"], "Bia");
  assert_eq!(list[1]["docsStatus"]["presentes"], json!([]));
  assert_eq!(strings(&list[1]["docsStatus"]["missing"]), ALL_REQUIRED);
}

// ── Uploads ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_routes_fields_and_updates_status() {
  let h  = harness().await;
  let id = h.register("Maria Silva", "1").await;

  let (status, body) = h
    .upload(&id, &[
      ("doc-foto", Some("rosto.JPG"), "image/jpeg", "jpeg-bytes"),
      ("doc-laudo", Some("laudo.pdf"), "application/pdf", "%PDF-1.4"),
      ("observacao", None, "text/plain", "ignored"),
      ("doc-bpc", Some(""), "application/octet-stream", ""),
    ])
    .await;

  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(strings(&body["docsStatus"]["presentes"]), ["foto", "laudo"]);
  assert_eq!(
    strings(&body["docsStatus"]["missing"]),
    ["requerimento", "doc_oficial", "cad_unico", "comprovante"]
  );

  let documents = body["documents"].as_array().unwrap();
  assert_eq!(documents.len(), 2);
  let short_id: String = id.chars().filter(|c| *c != '-').take(8).collect();
  for doc in documents {
    let location = doc["location"].as_str().unwrap();
    assert!(
      location.starts_with(&format!("documentos/Maria_Silva_{short_id}/")),
      "{location}"
    );
    assert!(h.blob_exists(location), "{location} missing on disk");
  }
  assert!(documents[0]["filename"].as_str().unwrap().starts_with("foto-"));
  assert!(documents[0]["filename"].as_str().unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn reupload_replaces_record_and_file() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;

  let (_, first) = h.upload(&id, &[("doc-foto", Some("a.png"), "image/png", "one")]).await;
  let first_location = first["documents"][0]["location"].as_str().unwrap().to_owned();

  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  let (status, second) = h.upload(&id, &[("foto", Some("b.png"), "image/png", "two!")]).await;
  assert_eq!(status, StatusCode::CREATED);
  let second_location = second["documents"][0]["location"].as_str().unwrap().to_owned();
  assert_ne!(first_location, second_location);

  let (_, docs) = h.get(&format!("/pessoas/{id}/docs")).await;
  let docs = docs.as_array().unwrap();
  assert_eq!(docs.len(), 1);
  assert_eq!(docs[0]["category"], "foto");
  assert_eq!(docs[0]["size_bytes"], 4);
  assert!(!h.blob_exists(&first_location));
  assert!(h.blob_exists(&second_location));
}

#[tokio::test]
async fn uploaded_file_can_be_downloaded() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;
  let (_, body) = h.upload(&id, &[("doc-foto", Some("rosto.jpg"), "image/jpeg", "jpeg-bytes")]).await;
  let filename = body["documents"][0]["filename"].as_str().unwrap().to_owned();

  let (status, headers, bytes) = h
    .raw("GET", &format!("/pessoas/{id}/docs/foto"), None, Vec::new())
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
  assert_eq!(
    headers[header::CONTENT_DISPOSITION].to_str().unwrap(),
    format!("inline; filename=\"{filename}\"")
  );
  assert_eq!(&bytes[..], b"jpeg-bytes");

  let (status, _) = h.get(&format!("/pessoas/{id}/docs/laudo")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = h.get(&format!("/pessoas/{id}/docs/passaporte")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let other = uuid::Uuid::new_v4();
  let (status, _) = h.get(&format!("/pessoas/{other}/docs/foto")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_format_rejects_whole_upload() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;

  let (status, body) = h
    .upload(&id, &[
      ("doc-foto", Some("a.jpg"), "image/jpeg", "ok"),
      ("doc-laudo", Some("laudo.exe"), "application/octet-stream", "MZ"),
    ])
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("exe"));

  let (_, docs) = h.get(&format!("/pessoas/{id}/docs")).await;
  assert_eq!(docs, json!([]));
}

#[tokio::test]
async fn upload_without_files_is_rejected() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;
  let (status, _) = h.upload(&id, &[("nota", None, "text/plain", "hi")]).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unrouted_field_is_generic_and_never_required() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;

  let (_, body) = h.upload(&id, &[("anexo", Some("x.pdf"), "application/pdf", "%PDF")]).await;
  assert_eq!(body["documents"][0]["category"], "documento");
  assert_eq!(strings(&body["docsStatus"]["presentes"]), ["documento"]);
  assert_eq!(strings(&body["docsStatus"]["missing"]), ALL_REQUIRED);
}

#[tokio::test]
async fn all_required_documents_make_person_complete() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;

  let (_, body) = h
    .upload(&id, &[
      ("doc-requerimento", Some("r.pdf"), "application/pdf", "r"),
      ("doc-foto", Some("f.jpg"), "image/jpeg", "f"),
      ("doc-docoficial", Some("o.pdf"), "application/pdf", "o"),
      ("doc-laudo", Some("l.pdf"), "application/pdf", "l"),
      ("doc-cadunico", Some("c.pdf"), "application/pdf", "c"),
    ])
    .await;
  assert_eq!(body["docsStatus"]["complete"], false);
  assert_eq!(strings(&body["docsStatus"]["missing"]), ["comprovante"]);

  // No extension in the file name: it comes from the content type.
  h.upload(&id, &[("doc-comprovante", Some("comprovante"), "application/pdf", "p")]).await;
  let (status, body) = h.get(&format!("/pessoas/{id}/status")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "complete": true, "missing": [], "presentes": ALL_REQUIRED }));
}

#[tokio::test]
async fn deleting_person_removes_files_and_keeps_history() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;
  let (_, body) = h.upload(&id, &[("doc-foto", Some("a.jpg"), "image/jpeg", "x")]).await;
  let location = body["documents"][0]["location"].as_str().unwrap().to_owned();

  let (status, _) = h.send("DELETE", &format!("/pessoas/{id}"), None, Vec::new()).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(!h.blob_exists(&location));
  assert_eq!(h.get(&format!("/pessoas/{id}")).await.0, StatusCode::NOT_FOUND);

  let (_, history) = h.get(&format!("/historico?pessoa={id}")).await;
  let kinds: Vec<&str> = history
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["kind"].as_str().unwrap())
    .collect();
  assert_eq!(kinds, ["person_deleted", "document_stored", "person_registered"]);
}

// ── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn events_link_people_and_filter_listing() {
  let h = harness().await;
  let (status, event) = h
    .json("POST", "/eventos", json!({ "nome": "Mutirão", "data": "2024-05-10" }))
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(event["date"], "2024-05-10");
  let event_id = event["event_id"].as_str().unwrap().to_owned();

  let ana = h.register("Ana", "1").await;
  h.register("Bruno", "2").await;

  let link_uri = format!("/eventos/{event_id}/pessoas/{ana}");
  assert_eq!(h.send("PUT", &link_uri, None, Vec::new()).await.0, StatusCode::CREATED);
  assert_eq!(h.send("PUT", &link_uri, None, Vec::new()).await.0, StatusCode::NO_CONTENT);

  let (_, filtered) = h.get(&format!("/pessoas?evento={event_id}")).await;
  let filtered = filtered.as_array().unwrap();
  assert_eq!(filtered.len(), 1);
  assert_eq!(filtered[0]["person_id"], ana.as_str());

  let (_, detail) = h.get(&format!("/pessoas/{ana}")).await;
  assert_eq!(detail["events"][0]["name"], "Mutirão");

  assert_eq!(h.send("DELETE", &link_uri, None, Vec::new()).await.0, StatusCode::NO_CONTENT);
  assert_eq!(h.send("DELETE", &link_uri, None, Vec::new()).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn linking_unknown_event_is_404() {
  let h   = harness().await;
  let ana = h.register("Ana", "1").await;
  let uri = format!("/eventos/{}/pessoas/{ana}", uuid::Uuid::new_v4());
  assert_eq!(h.send("PUT", &uri, None, Vec::new()).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_update_and_delete() {
  let h = harness().await;
  let (_, event) = h
    .json("POST", "/eventos", json!({ "name": "Feira", "description": "praça" }))
    .await;
  let id = event["event_id"].as_str().unwrap().to_owned();

  let (status, updated) = h
    .json("PUT", &format!("/eventos/{id}"), json!({ "description": null }))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["description"], Value::Null);
  assert_eq!(updated["name"], "Feira");

  let (status, _) = h.json("POST", "/eventos", json!({ "name": " " })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let uri = format!("/eventos/{id}");
  assert_eq!(h.send("DELETE", &uri, None, Vec::new()).await.0, StatusCode::NO_CONTENT);
  assert_eq!(h.get(&uri).await.0, StatusCode::NOT_FOUND);
}

// ── Reference data & export ─────────────────────────────────────────────────

#[tokio::test]
async fn categories_list_taxonomy_and_routing() {
  let h = harness().await;
  let (status, body) = h.get("/categorias").await;
  assert_eq!(status, StatusCode::OK);

  let categories = body["categories"].as_array().unwrap();
  assert_eq!(categories.len(), 8);
  assert_eq!(categories[0], json!({ "category": "requerimento", "requirement": "required" }));
  assert_eq!(categories[6], json!({ "category": "cartao_bpc", "requirement": "optional" }));
  assert_eq!(categories[7], json!({ "category": "documento", "requirement": "untracked" }));
  assert_eq!(body["routing"][0], json!({ "token": "requerimento", "category": "requerimento" }));
  assert_eq!(body["fallback"], "documento");
}

#[tokio::test]
async fn backup_exports_everything() {
  let h  = harness().await;
  let id = h.register("Ana", "1").await;
  h.upload(&id, &[("doc-foto", Some("a.jpg"), "image/jpeg", "x")]).await;

  let req = Request::builder().uri("/backup").body(Body::empty()).unwrap();
  let resp = api_router(h.state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
  assert!(disposition.starts_with("attachment; filename=\"backup-"));

  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let snapshot: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(snapshot["people"].as_array().unwrap().len(), 1);
  assert_eq!(snapshot["documents"][0]["category"], "foto");
  assert!(snapshot["exported_at"].is_string());
}
