use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{BulkDownloadRequest, DataEnvelope, DocumentEnvelope, LoginRequest, PatientQuery};
use crate::config::AppConfig;
use crate::models::{
    AuthResponse, Claim, ClaimDetail, ClaimFilter, ClaimUpdate, DocumentDownload, DocumentUpload,
    InsuranceAnalytics, InsuranceDocument, Paginated, Patient, UploadedDocument, UserProfile,
};
use crate::session::Session;

/// HTTP client for the insurance API.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client for `base_url` (the insurance namespace root).
    pub fn new(base_url: &str, session: Arc<Session>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn from_config(config: &AppConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        Self::new(&config.endpoint(), session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // ── Auth ────────────────────────────────────────────────

    /// Exchange credentials for a token. Does not touch the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::BadRequest("Email and password are required".into()));
        }
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { email, password });
        let response = self.send("login", request).await?;
        decode(response).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = self.request(Method::POST, "/auth/logout");
        self.send("logout", request).await?;
        Ok(())
    }

    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let request = self.request(Method::GET, "/profile");
        let response = self.send("get_profile", request).await?;
        decode(response).await
    }

    // ── Patients ────────────────────────────────────────────

    pub async fn search_patients(&self, query: &str) -> Result<Vec<Patient>, ApiError> {
        let request = self
            .request(Method::GET, "/patients")
            .query(&PatientQuery { query });
        let response = self.send("search_patients", request).await?;
        decode_data(response).await
    }

    pub async fn get_patient_documents(
        &self,
        patient_id: u64,
    ) -> Result<Vec<InsuranceDocument>, ApiError> {
        let request = self.request(Method::GET, &format!("/patients/{patient_id}/documents"));
        let response = self.send("get_patient_documents", request).await?;
        decode_data(response).await
    }

    /// Upload a document for a patient as multipart form data.
    pub async fn upload_patient_document(
        &self,
        patient_id: u64,
        upload: DocumentUpload,
    ) -> Result<UploadedDocument, ApiError> {
        let DocumentUpload {
            file_name,
            mime_type,
            bytes,
            doc_type,
            claim_id,
            description,
        } = upload;

        let file = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime_type)
            .map_err(|e| ApiError::BadRequest(format!("Invalid MIME type {mime_type}: {e}")))?;
        let mut form = Form::new()
            .part("file", file)
            .text("type", doc_type.as_str());
        if let Some(claim_id) = claim_id {
            form = form.text("claim_id", claim_id.to_string());
        }
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            form = form.text("description", description);
        }

        let request = self
            .request(Method::POST, &format!("/patients/{patient_id}/documents"))
            .multipart(form);
        let response = self.send("upload_patient_document", request).await?;
        let envelope: DocumentEnvelope = decode(response).await?;
        Ok(envelope.document)
    }

    // ── Claims ──────────────────────────────────────────────

    pub async fn get_claims(&self, filter: &ClaimFilter) -> Result<Paginated<Claim>, ApiError> {
        let request = self.request(Method::GET, "/claims").query(filter);
        let response = self.send("get_claims", request).await?;
        decode(response).await
    }

    pub async fn get_claim(&self, claim_id: u64) -> Result<ClaimDetail, ApiError> {
        let request = self.request(Method::GET, &format!("/claims/{claim_id}"));
        let response = self.send("get_claim", request).await?;
        decode_data(response).await
    }

    /// Submit a review decision. Any 2xx counts as accepted; the body is ignored.
    pub async fn update_claim(&self, claim_id: u64, update: &ClaimUpdate) -> Result<(), ApiError> {
        let request = self
            .request(Method::PUT, &format!("/claims/{claim_id}"))
            .json(update);
        self.send("update_claim", request).await?;
        Ok(())
    }

    pub async fn get_claim_documents(
        &self,
        claim_id: u64,
    ) -> Result<Vec<InsuranceDocument>, ApiError> {
        let request = self.request(Method::GET, &format!("/claims/{claim_id}/documents"));
        let response = self.send("get_claim_documents", request).await?;
        decode_data(response).await
    }

    // ── Documents ───────────────────────────────────────────

    pub async fn bulk_download_documents(
        &self,
        document_ids: &[u64],
    ) -> Result<Vec<DocumentDownload>, ApiError> {
        let request = self
            .request(Method::POST, "/documents/bulk-download")
            .json(&BulkDownloadRequest { document_ids });
        let response = self.send("bulk_download_documents", request).await?;
        decode_data(response).await
    }

    // ── Analytics ───────────────────────────────────────────

    pub async fn get_analytics(&self) -> Result<InsuranceAnalytics, ApiError> {
        let request = self.request(Method::GET, "/analytics");
        let response = self.send("get_analytics", request).await?;
        decode_data(response).await
    }

    // ── Internal ────────────────────────────────────────────

    /// Start a request, attaching the current token if there is one.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.session.get_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and apply the response policy.
    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        tracing::debug!(operation, "API request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, &self.base_url))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(operation, "Unauthorized response, clearing session");
            if let Err(e) = self.session.clear() {
                tracing::error!(operation, error = %e, "Failed to persist cleared session");
            }
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(operation, status = status.as_u16(), "API error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::ResponseParsing(e.to_string()))
}

async fn decode_data<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let envelope: DataEnvelope<T> = decode(response).await?;
    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::models::{ClaimStatus, DocumentType};
    use crate::session::SessionState;
    use crate::test_support::{
        analytics_json, claim_json, sample_user, unreachable_url, user_json, StubServer,
    };

    fn signed_in() -> Arc<Session> {
        let session = Arc::new(Session::in_memory());
        session.establish("secret-token", &sample_user()).unwrap();
        session
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client =
            ApiClient::new("http://localhost:8000/api/", Arc::new(Session::in_memory())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn from_config_targets_insurance_namespace() {
        let client =
            ApiClient::from_config(&AppConfig::default(), Arc::new(Session::in_memory())).unwrap();
        assert_eq!(
            client.base_url(),
            "https://api.bodyf1rst.net/api/fmw/insurance"
        );
    }

    #[tokio::test]
    async fn requests_carry_bearer_and_json_headers() {
        let server = StubServer::start().await;
        server.route("GET", "/profile", 200, user_json());
        let client = server.client(signed_in());

        let user = client.get_profile().await.unwrap();
        assert_eq!(user, sample_user());

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.header("authorization"), Some("Bearer secret-token"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn requests_without_token_carry_no_authorization() {
        let server = StubServer::start().await;
        server.route("GET", "/analytics", 200, json!({"data": analytics_json()}));
        let client = server.client(Arc::new(Session::in_memory()));

        client.get_analytics().await.unwrap();

        assert!(server.requests()[0].header("authorization").is_none());
    }

    #[tokio::test]
    async fn bearer_follows_session_changes() {
        let server = StubServer::start().await;
        server.route("GET", "/profile", 200, user_json());
        let session = Arc::new(Session::in_memory());
        let client = server.client(session.clone());

        client.get_profile().await.unwrap();
        session.set_token("later").unwrap();
        client.get_profile().await.unwrap();

        let requests = server.requests();
        assert!(requests[0].header("authorization").is_none());
        assert_eq!(requests[1].header("authorization"), Some("Bearer later"));
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_rejects() {
        let server = StubServer::start().await;
        server.route(
            "GET",
            "/claims/7",
            401,
            json!({"message": "Unauthenticated."}),
        );
        let session = signed_in();
        let client = server.client(session.clone());

        let err = client.get_claim(7).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(session.state(), SessionState::Absent);
        assert!(session.get_token().is_none());
        assert!(session.get_user().is_none());
    }

    #[tokio::test]
    async fn other_errors_leave_session_intact() {
        let server = StubServer::start().await;
        server.route("GET", "/analytics", 500, json!({"message": "boom"}));
        let session = signed_in();
        let client = server.client(session.clone());

        let err = client.get_analytics().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.server_message().as_deref(), Some("boom"));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[tokio::test]
    async fn login_posts_credentials_and_returns_auth() {
        let server = StubServer::start().await;
        server.route(
            "POST",
            "/auth/login",
            200,
            json!({"token": "fresh", "user": user_json()}),
        );
        let session = Arc::new(Session::in_memory());
        let client = server.client(session.clone());

        let auth = client.login("a@b.com", "x").await.unwrap();

        assert_eq!(auth.token, "fresh");
        assert_eq!(auth.user, sample_user());
        assert_eq!(
            server.requests()[0].json(),
            json!({"email": "a@b.com", "password": "x"})
        );
        // Storing the session is the caller's job.
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_with_empty_fields_sends_nothing() {
        let server = StubServer::start().await;
        let client = server.client(Arc::new(Session::in_memory()));

        assert!(matches!(client.login("", "x").await, Err(ApiError::BadRequest(_))));
        assert!(matches!(
            client.login("a@b.com", "").await,
            Err(ApiError::BadRequest(_))
        ));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn login_against_unreachable_api_rejects() {
        let session = Arc::new(Session::in_memory());
        let client = ApiClient::new(&unreachable_url(), session.clone()).unwrap();

        let err = client.login("a@b.com", "x").await.unwrap_err();

        assert!(matches!(err, ApiError::Connection(_)));
        assert!(!session.is_authenticated());
        assert!(session.get_user().is_none());
    }

    #[tokio::test]
    async fn get_claims_encodes_filter_and_returns_page_verbatim() {
        let server = StubServer::start().await;
        let page = json!({
            "data": [claim_json(4, "approved")],
            "meta": {"current_page": 2, "last_page": 3, "per_page": 10, "total": 21}
        });
        server.route("GET", "/claims", 200, page);
        let client = server.client(signed_in());

        let filter = ClaimFilter::default()
            .status(Some(ClaimStatus::Approved))
            .page(2, 10);
        let result = client.get_claims(&filter).await.unwrap();

        let req = &server.requests()[0];
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/claims");
        assert_eq!(
            req.query.as_deref(),
            Some("status=approved&page=2&per_page=10")
        );
        assert_eq!(result.meta.current_page, 2);
        assert_eq!(result.meta.last_page, 3);
        assert_eq!(result.meta.total, 21);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].status, ClaimStatus::Approved);
    }

    #[tokio::test]
    async fn get_claims_without_filter_has_no_query() {
        let server = StubServer::start().await;
        server.route(
            "GET",
            "/claims",
            200,
            json!({
                "data": [],
                "meta": {"current_page": 1, "last_page": 1, "per_page": 15, "total": 0}
            }),
        );
        let client = server.client(signed_in());

        client.get_claims(&ClaimFilter::default()).await.unwrap();

        let query = server.requests()[0].query.clone();
        assert!(query.map_or(true, |q| q.is_empty()));
    }

    #[tokio::test]
    async fn get_claims_sends_every_filter_field_in_order() {
        let server = StubServer::start().await;
        server.route(
            "GET",
            "/claims",
            200,
            json!({
                "data": [],
                "meta": {"current_page": 2, "last_page": 2, "per_page": 10, "total": 11}
            }),
        );
        let client = server.client(signed_in());

        let filter = ClaimFilter::default()
            .status(Some(ClaimStatus::InReview))
            .patient(7)
            .between(
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            )
            .page(2, 10);
        client.get_claims(&filter).await.unwrap();

        assert_eq!(
            server.requests()[0].query.as_deref(),
            Some("status=in_review&patient_id=7&from_date=2025-01-02&to_date=2025-03-04&page=2&per_page=10")
        );
    }

    #[tokio::test]
    async fn bulk_download_posts_ids_and_returns_entries() {
        let server = StubServer::start().await;
        let entries = json!([
            {"id": 1, "file_name": "a.pdf", "url": "https://files/1"},
            {"id": 2, "file_name": "b.pdf", "url": "https://files/2"},
            {"id": 3, "file_name": "c.pdf", "url": "https://files/3"}
        ]);
        server.route(
            "POST",
            "/documents/bulk-download",
            200,
            json!({"data": entries}),
        );
        let client = server.client(signed_in());

        let downloads = client.bulk_download_documents(&[1, 2, 3]).await.unwrap();

        assert_eq!(
            server.requests()[0].json(),
            json!({"document_ids": [1, 2, 3]})
        );
        assert_eq!(downloads.len(), 3);
        assert_eq!(
            downloads[2],
            DocumentDownload {
                id: 3,
                file_name: "c.pdf".into(),
                url: "https://files/3".into()
            }
        );
    }

    #[tokio::test]
    async fn update_claim_puts_decision() {
        let server = StubServer::start().await;
        server.route("PUT", "/claims/5", 200, json!({}));
        let client = server.client(signed_in());

        let update = ClaimUpdate::new(ClaimStatus::Denied).denial_reason("Out of network");
        client.update_claim(5, &update).await.unwrap();

        let req = &server.requests()[0];
        assert_eq!(req.method, "PUT");
        assert_eq!(
            req.json(),
            json!({"status": "denied", "denial_reason": "Out of network"})
        );
    }

    #[tokio::test]
    async fn search_patients_sends_query_and_unwraps_data() {
        let server = StubServer::start().await;
        server.route(
            "GET",
            "/patients",
            200,
            json!({"data": [{"id": 1, "name": "John Smith", "email": "j@e", "claims_count": 12}]}),
        );
        let client = server.client(signed_in());

        let patients = client.search_patients("john smith").await.unwrap();

        assert_eq!(
            server.requests()[0].query.as_deref(),
            Some("query=john+smith")
        );
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].claims_count, 12);
    }

    #[tokio::test]
    async fn claim_and_patient_documents_use_id_paths() {
        let server = StubServer::start().await;
        let docs = json!({"data": [{
            "id": 1, "type": "eob", "direction": "to_patient", "file_name": "EOB.pdf",
            "file_size": 1024, "claim_id": 3, "created_at": "2025-12-26"
        }]});
        server.route("GET", "/patients/4/documents", 200, docs.clone());
        server.route("GET", "/claims/3/documents", 200, docs);
        let client = server.client(signed_in());

        let by_patient = client.get_patient_documents(4).await.unwrap();
        let by_claim = client.get_claim_documents(3).await.unwrap();

        assert_eq!(by_patient, by_claim);
        assert_eq!(by_claim[0].claim_id, Some(3));
        assert_eq!(by_claim[0].doc_type, DocumentType::Eob);
    }

    #[tokio::test]
    async fn upload_sends_multipart_form() {
        let server = StubServer::start().await;
        server.route(
            "POST",
            "/patients/2/documents",
            201,
            json!({"document": {"id": 77, "file_name": "PreAuth.pdf"}}),
        );
        let client = server.client(signed_in());

        let upload = DocumentUpload::new("PreAuth.pdf", b"%PDF-1.7".to_vec(), DocumentType::PreAuth)
            .claim_id(Some(12))
            .description(Some("Initial request".into()));
        let created = client.upload_patient_document(2, upload).await.unwrap();

        assert_eq!(created.id, 77);
        let req = &server.requests()[0];
        assert!(req
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("multipart/form-data; boundary=")));
        assert_eq!(req.header("authorization"), Some("Bearer secret-token"));
        let body = req.body_text();
        assert!(body.contains("name=\"file\"; filename=\"PreAuth.pdf\""));
        assert!(body.contains("Content-Type: application/pdf"));
        assert!(body.contains("name=\"type\"\r\n\r\npre_auth"));
        assert!(body.contains("name=\"claim_id\"\r\n\r\n12"));
        assert!(body.contains("name=\"description\"\r\n\r\nInitial request"));
    }

    #[tokio::test]
    async fn upload_omits_optional_parts() {
        let server = StubServer::start().await;
        server.route(
            "POST",
            "/patients/2/documents",
            200,
            json!({"document": {"id": 78, "file_name": "note.txt"}}),
        );
        let client = server.client(signed_in());

        let upload = DocumentUpload::new("note.txt", b"hello".to_vec(), DocumentType::Other);
        client.upload_patient_document(2, upload).await.unwrap();

        let body = server.requests()[0].body_text();
        assert!(!body.contains("claim_id"));
        assert!(!body.contains("description"));
    }

    #[tokio::test]
    async fn malformed_body_is_parsing_error() {
        let server = StubServer::start().await;
        server.route("GET", "/analytics", 200, json!({"unexpected": true}));
        let client = server.client(signed_in());

        let err = client.get_analytics().await.unwrap_err();
        assert!(matches!(err, ApiError::ResponseParsing(_)));
    }

    #[tokio::test]
    async fn logout_posts_and_ignores_body() {
        let server = StubServer::start().await;
        server.route("POST", "/auth/logout", 204, serde_json::Value::Null);
        let client = server.client(signed_in());

        client.logout().await.unwrap();
        assert_eq!(server.requests()[0].path, "/auth/logout");
    }
}
