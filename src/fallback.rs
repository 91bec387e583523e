//! Demo-data fallback around the API client.
//!
//! Every read goes through [`FallbackClient::with_fallback`], which keeps a
//! live result, substitutes the call's demo value on any failure other than
//! `Unauthorized`, and tags the outcome with its [`Source`]. Writes have no
//! substitute and are issued on [`FallbackClient::api`] directly.

use crate::api::{ApiClient, ApiError};
use crate::demo::{DemoData, DASHBOARD_CLAIMS};
use crate::models::{
    Claim, ClaimDetail, ClaimFilter, InsuranceAnalytics, InsuranceDocument, Paginated, Patient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Live,
    Demo,
}

impl Source {
    /// Banner shown above pages rendered from demo data.
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            Source::Live => None,
            Source::Demo => Some("Showing demo data: the API is unavailable."),
        }
    }
}

/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Self {
            value,
            source: Source::Live,
        }
    }

    pub fn demo(value: T) -> Self {
        Self {
            value,
            source: Source::Demo,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.source == Source::Demo
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
        }
    }
}

/// Live analytics and the most recent claims, loaded together.
pub type DashboardData = (InsuranceAnalytics, Vec<Claim>);

pub struct FallbackClient {
    api: ApiClient,
    demo: DemoData,
    enabled: bool,
}

impl FallbackClient {
    pub fn new(api: ApiClient, enabled: bool) -> Self {
        Self {
            api,
            demo: DemoData::new(),
            enabled,
        }
    }

    /// The wrapped client, for calls without a demo substitute.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn demo(&self) -> &DemoData {
        &self.demo
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Keep a live result or replace its failure by `substitute`.
    ///
    /// `Unauthorized` always propagates, as does any failure when the
    /// fallback is disabled or `substitute` has nothing to offer.
    pub fn with_fallback<T>(
        &self,
        operation: &'static str,
        result: Result<T, ApiError>,
        substitute: impl FnOnce(&DemoData) -> Option<T>,
    ) -> Result<Sourced<T>, ApiError> {
        match result {
            Ok(value) => Ok(Sourced::live(value)),
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(e) if !self.enabled => Err(e),
            Err(e) => match substitute(&self.demo) {
                Some(value) => {
                    tracing::info!(operation, error = %e, "Using demo data");
                    Ok(Sourced::demo(value))
                }
                None => Err(e),
            },
        }
    }

    pub async fn dashboard(&self) -> Result<Sourced<DashboardData>, ApiError> {
        let recent = ClaimFilter::default().per_page(DASHBOARD_CLAIMS as u32);
        let (analytics, claims) =
            tokio::join!(self.api.get_analytics(), self.api.get_claims(&recent));
        // Both halves are replaced when either one fails.
        let joined = match (analytics, claims) {
            (Ok(analytics), Ok(page)) => Ok((analytics, page.data)),
            (Err(ApiError::Unauthorized), _) | (_, Err(ApiError::Unauthorized)) => {
                Err(ApiError::Unauthorized)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        self.with_fallback("dashboard", joined, |demo| {
            Some((demo.analytics.clone(), demo.recent_claims()))
        })
    }

    pub async fn claims(
        &self,
        filter: &ClaimFilter,
    ) -> Result<Sourced<Paginated<Claim>>, ApiError> {
        let result = self.api.get_claims(filter).await;
        self.with_fallback("get_claims", result, |demo| {
            Some(Paginated::single_page(demo.claims_with_status(filter.status)))
        })
    }

    pub async fn claim(&self, claim_id: u64) -> Result<Sourced<ClaimDetail>, ApiError> {
        let result = self.api.get_claim(claim_id).await;
        self.with_fallback("get_claim", result, |demo| demo.claim_detail(claim_id))
    }

    pub async fn claim_documents(
        &self,
        claim_id: u64,
    ) -> Result<Sourced<Vec<InsuranceDocument>>, ApiError> {
        let result = self.api.get_claim_documents(claim_id).await;
        self.with_fallback("get_claim_documents", result, |demo| {
            Some(demo.claim_documents(claim_id))
        })
    }

    pub async fn search_patients(&self, query: &str) -> Result<Sourced<Vec<Patient>>, ApiError> {
        let result = self.api.search_patients(query).await;
        self.with_fallback("search_patients", result, |demo| {
            Some(demo.search_patients(query))
        })
    }

    pub async fn patient_documents(
        &self,
        patient_id: u64,
    ) -> Result<Sourced<Vec<InsuranceDocument>>, ApiError> {
        let result = self.api.get_patient_documents(patient_id).await;
        self.with_fallback("get_patient_documents", result, |demo| {
            Some(demo.documents_for(patient_id))
        })
    }

    pub async fn analytics(&self) -> Result<Sourced<InsuranceAnalytics>, ApiError> {
        let result = self.api.get_analytics().await;
        self.with_fallback("get_analytics", result, |demo| Some(demo.analytics.clone()))
    }
}
