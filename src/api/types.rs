//! Request bodies and response envelopes of the insurance API.

use serde::{Deserialize, Serialize};

use crate::models::UploadedDocument;

/// `{ "data": ... }` wrapper used by most read endpoints.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// `{ "document": ... }` wrapper returned by the upload endpoint.
#[derive(Debug, Deserialize)]
pub struct DocumentEnvelope {
    pub document: UploadedDocument,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BulkDownloadRequest<'a> {
    pub document_ids: &'a [u64],
}

/// Query of `GET /patients`.
#[derive(Debug, Serialize)]
pub struct PatientQuery<'a> {
    pub query: &'a str,
}
