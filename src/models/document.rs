use serde::{Deserialize, Serialize};

use super::enums::{DocumentDirection, DocumentType};

/// Document exchanged between the insurer and a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceDocument {
    pub id: u64,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub direction: DocumentDirection,
    pub file_name: String,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<u64>,
    pub created_at: String,
}

impl InsuranceDocument {
    /// Case-insensitive match on file name or description.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.file_name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Created document as acknowledged by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: u64,
    pub file_name: String,
}

/// Signed download link returned by bulk download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDownload {
    pub id: u64,
    pub file_name: String,
    pub url: String,
}

/// File to upload for a patient, encoded as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub doc_type: DocumentType,
    pub claim_id: Option<u64>,
    pub description: Option<String>,
}

impl DocumentUpload {
    /// Build an upload from in-memory bytes; the MIME type is guessed from the file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, doc_type: DocumentType) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
            doc_type,
            claim_id: None,
            description: None,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(
        path: &std::path::Path,
        doc_type: DocumentType,
    ) -> Result<Self, std::io::Error> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Ok(Self::new(file_name, bytes, doc_type))
    }

    pub fn claim_id(mut self, claim_id: Option<u64>) -> Self {
        self.claim_id = claim_id;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}
