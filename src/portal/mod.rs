//! Portal shell: route gate, sign-in and sign-out, and page loads.
//!
//! Page operations return their API result after passing it through
//! [`Portal::settle`], which turns `Unauthorized` into one navigation to
//! the login screen. The client has already cleared the session by then.

pub mod analytics;
pub mod claims;
pub mod dashboard;
pub mod documents;
pub mod navigation;
pub mod patients;

use std::path::Path;
use std::sync::Arc;

pub use analytics::AnalyticsReport;
pub use claims::{ClaimReview, ClaimsBrowser, CLAIMS_PER_PAGE};
pub use dashboard::Dashboard;
pub use documents::DocumentBrowser;
pub use navigation::{Navigator, Route};
pub use patients::PatientSearch;

use crate::api::{ApiClient, ApiError};
use crate::config::AppConfig;
use crate::demo::{demo_user, DEMO_TOKEN};
use crate::fallback::{FallbackClient, Sourced};
use crate::models::{
    ClaimUpdate, DocumentDownload, DocumentType, DocumentUpload, InsuranceDocument,
    UploadedDocument, UserProfile,
};
use crate::session::{Session, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Credentials refused; the message is shown inline on the login form.
    #[error("{0}")]
    Rejected(String),
    #[error("Cannot store session: {0}")]
    Session(#[from] SessionError),
}

/// Signed-in user and whether the sign-in was live or demo.
pub type LoginOutcome = Sourced<UserProfile>;

pub struct Portal {
    session: Arc<Session>,
    client: FallbackClient,
    navigator: Box<dyn Navigator>,
}

impl Portal {
    pub fn new(
        config: &AppConfig,
        session: Arc<Session>,
        navigator: impl Navigator + 'static,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::from_config(config, session)?;
        Ok(Self::with_client(FallbackClient::new(api, config.demo_fallback), navigator))
    }

    pub fn with_client(client: FallbackClient, navigator: impl Navigator + 'static) -> Self {
        Self {
            session: client.api().session().clone(),
            client,
            navigator: Box::new(navigator),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.session.get_user()
    }

    /// Fetch the live profile and refresh the stored copy.
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let result = self.client.api().get_profile().await;
        let user = self.settle(result)?;
        if let Err(e) = self.session.set_user(&user) {
            tracing::warn!(error = %e, "Failed to store refreshed profile");
        }
        Ok(user)
    }

    /// Route gate. Returns the route actually shown.
    pub fn enter(&self, route: Route) -> Route {
        let authenticated = self.session.is_authenticated();
        let shown = match route {
            r if r.is_protected() && !authenticated => Route::Login,
            Route::Login if authenticated => Route::Dashboard,
            r => r,
        };
        if shown != route {
            tracing::debug!(requested = %route, shown = %shown, "Route gate redirect");
            self.navigator.navigate(shown);
        }
        shown
    }

    /// Sign in, store the session and go to the dashboard.
    ///
    /// When the API refuses or cannot be reached and demo fallback is on,
    /// any well-formed email with a non-empty password signs in as the demo
    /// user.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        let outcome = match self.client.api().login(email, password).await {
            Ok(auth) => {
                self.session.establish(&auth.token, &auth.user)?;
                Sourced::live(auth.user)
            }
            Err(e) if self.client.enabled() && email.contains('@') && !password.is_empty() => {
                tracing::info!(error = %e, "Login failed, signing in with demo account");
                let user = demo_user(email);
                self.session.establish(DEMO_TOKEN, &user)?;
                Sourced::demo(user)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Login rejected");
                return Err(LoginError::Rejected(rejection_message(&e)));
            }
        };
        self.navigator.navigate(Route::Dashboard);
        Ok(outcome)
    }

    /// Sign out. The server is told on a best-effort basis; the local
    /// session is always cleared.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if self.session.is_authenticated() {
            if let Err(e) = self.client.api().logout().await {
                tracing::debug!(error = %e, "Server logout failed, clearing locally");
            }
        }
        self.session.clear()?;
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Pass a page result through, sending the user to login on `Unauthorized`.
    pub fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::Unauthorized) = &result {
            self.navigator.navigate(Route::Login);
        }
        result
    }

    // ── Pages ───────────────────────────────────────────────

    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let loaded = self.client.dashboard().await;
        self.settle(loaded).map(Dashboard::from)
    }

    /// Load the page `browser` currently points at.
    pub async fn load_claims(&self, browser: &mut ClaimsBrowser) -> Result<(), ApiError> {
        let loaded = self.client.claims(&browser.filter()).await;
        browser.apply(self.settle(loaded)?);
        Ok(())
    }

    pub async fn claim(&self, claim_id: u64) -> Result<ClaimReview, ApiError> {
        let loaded = self.client.claim(claim_id).await;
        self.settle(loaded).map(ClaimReview::from)
    }

    pub async fn claim_documents(
        &self,
        claim_id: u64,
    ) -> Result<Sourced<Vec<InsuranceDocument>>, ApiError> {
        let loaded = self.client.claim_documents(claim_id).await;
        self.settle(loaded)
    }

    /// Record a review decision. Never substituted with demo data.
    pub async fn submit_review(&self, claim_id: u64, update: &ClaimUpdate) -> Result<(), ApiError> {
        let result = self.client.api().update_claim(claim_id, update).await;
        if result.is_ok() {
            tracing::info!(claim_id, status = %update.status, "Claim decision submitted");
        }
        self.settle(result)
    }

    /// Run a patient search. Returns false without a request for blank queries.
    pub async fn search_patients(
        &self,
        search: &mut PatientSearch,
        query: &str,
    ) -> Result<bool, ApiError> {
        if !PatientSearch::accepts(query) {
            return Ok(false);
        }
        let loaded = self.client.search_patients(query).await;
        search.apply(query, self.settle(loaded)?);
        Ok(true)
    }

    pub async fn documents(&self, patient_id: u64) -> Result<DocumentBrowser, ApiError> {
        let loaded = self.client.patient_documents(patient_id).await;
        let loaded = self.settle(loaded)?;
        Ok(DocumentBrowser::new(patient_id, loaded))
    }

    /// Request download links for the selection. An empty selection sends nothing.
    pub async fn download_selected(
        &self,
        browser: &DocumentBrowser,
    ) -> Result<Vec<DocumentDownload>, ApiError> {
        let ids = browser.selected_ids();
        self.download(&ids).await
    }

    pub async fn download(&self, document_ids: &[u64]) -> Result<Vec<DocumentDownload>, ApiError> {
        if document_ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = self.client.api().bulk_download_documents(document_ids).await;
        self.settle(result)
    }

    pub async fn upload(
        &self,
        patient_id: u64,
        upload: DocumentUpload,
    ) -> Result<UploadedDocument, ApiError> {
        let result = self
            .client
            .api()
            .upload_patient_document(patient_id, upload)
            .await;
        if let Ok(doc) = &result {
            tracing::info!(patient_id, document_id = doc.id, "Document uploaded");
        }
        self.settle(result)
    }

    /// Read `path` and upload it for a patient. An unreadable file fails
    /// with [`ApiError::Io`] before any request is sent.
    pub async fn upload_path(
        &self,
        patient_id: u64,
        path: &Path,
        doc_type: DocumentType,
        claim_id: Option<u64>,
        description: Option<String>,
    ) -> Result<UploadedDocument, ApiError> {
        let upload = match DocumentUpload::from_path(path, doc_type).await {
            Ok(upload) => upload.claim_id(claim_id).description(description),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read upload file");
                return Err(e.into());
            }
        };
        self.upload(patient_id, upload).await
    }

    pub async fn analytics(&self) -> Result<AnalyticsReport, ApiError> {
        let loaded = self.client.analytics().await;
        self.settle(loaded).map(AnalyticsReport::from)
    }

    /// Whether the stored session is the demo sign-in.
    pub fn is_demo_session(&self) -> bool {
        self.session.get_token().as_deref() == Some(DEMO_TOKEN)
    }
}

/// Inline message for a refused sign-in.
fn rejection_message(err: &ApiError) -> String {
    match err {
        ApiError::BadRequest(message) => message.clone(),
        ApiError::Unauthorized => "Invalid credentials".to_string(),
        ApiError::Status { .. } => err
            .server_message()
            .unwrap_or_else(|| "Invalid credentials".to_string()),
        other => other.to_string(),
    }
}
