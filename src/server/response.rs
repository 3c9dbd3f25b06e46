//! JSON envelope shared by the upload endpoint.
//!
//! Success: `{"status":"sucesso","dados_lidos":{...}}`.
//! Failure: `{"status":"erro","mensagem":"..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::extraction::{ExtractionError, NormalizedRecord};

const STATUS_OK: &str = "sucesso";
const STATUS_ERROR: &str = "erro";

/// Body of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub dados_lidos: NormalizedRecord,
}

impl UploadResponse {
    pub fn new(dados_lidos: NormalizedRecord) -> Self {
        Self {
            status: STATUS_OK,
            dados_lidos,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    mensagem: String,
}

/// Error returned from an API handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            status: STATUS_ERROR,
            mensagem: self.message,
        });
        (self.status, body).into_response()
    }
}

// The raw error text goes back to the client to ease debugging.
impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        ApiError::internal(err.to_string())
    }
}
