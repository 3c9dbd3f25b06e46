//! End-to-end tests of the upload pipeline through the public API.
//!
//! The extractor replays a captured Document AI entity list and the store keeps
//! rows in memory, so the whole request path runs without network or MySQL.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use formreader::extraction::{
    normalize_entities, DocumentExtractor, ExtractedEntity, ExtractionError, NormalizedRecord,
};
use formreader::repository::{ColumnValue, FormRow, FormStore, StoreError, COLUMNS};
use formreader::server::{create_router, AppState};

/// Entities as returned for a fully filled-in inspection form.
fn captured_entities() -> Vec<ExtractedEntity> {
    vec![
        ExtractedEntity::new("Data", "12/08/2024"),
        ExtractedEntity::new("Item", "EIXO\n4471-B"),
        ExtractedEntity::new("QntPecas", " 35 "),
        ExtractedEntity::new("Maquina", "Retífica 02"),
        ExtractedEntity::new("Setor", "Usinagem"),
        ExtractedEntity::new("NomeCracha", "J. Souza"),
        ExtractedEntity::new("Rebarba", "checked"),
        ExtractedEntity::new("Batida", "unchecked"),
        ExtractedEntity::new("DiametroExt", "checked"),
        ExtractedEntity::new("DiametroExtDimensao", "Ø 25,4\nmm"),
        ExtractedEntity::new("Observacoes", "Separar lote\npara retrabalho"),
        ExtractedEntity::new("Rebarba", "unchecked"),
    ]
}

struct ReplayExtractor;

#[async_trait]
impl DocumentExtractor for ReplayExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<NormalizedRecord, ExtractionError> {
        Ok(normalize_entities(&captured_entities()))
    }
}

#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<FormRow>>,
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn save(&self, row: &FormRow) -> Result<(), StoreError> {
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

fn upload(content: &[u8]) -> Request<Body> {
    let boundary = "pipeline-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"imagem\"; filename=\"captura.jpg\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_filled_form_round_trip() {
    let store = Arc::new(MemoryStore::default());
    let app = create_router(AppState {
        extractor: Arc::new(ReplayExtractor),
        store: store.clone(),
    });

    let response = app.oneshot(upload(&[0xFF; 2048])).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let dados = &json["dados_lidos"];
    assert_eq!(json["status"], "sucesso");
    assert_eq!(dados["Item"], "EIXO 4471-B");
    assert_eq!(dados["QntPecas"], "35");
    assert_eq!(dados["Rebarba"], false);
    assert_eq!(dados["DiametroExtDimensao"], "Ø 25,4 mm");
    assert_eq!(dados["Data"], "12/08/2024");

    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.values().len(), COLUMNS.len());
    assert_eq!(
        row.get("Data"),
        Some(&ColumnValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 8, 12)))
    );
    assert_eq!(row.get("Rebarba"), Some(&ColumnValue::Flag(false)));
    assert_eq!(row.get("DiametroExt"), Some(&ColumnValue::Flag(true)));
    assert_eq!(row.get("Comprimento"), Some(&ColumnValue::Flag(false)));
    assert_eq!(row.get("ComprimentoDimensao"), Some(&ColumnValue::Text(None)));
    assert_eq!(
        row.get("Observacoes"),
        Some(&ColumnValue::Text(Some(
            "Separar lote para retrabalho".to_string()
        )))
    );
}
