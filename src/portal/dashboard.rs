use crate::fallback::{DashboardData, Source, Sourced};
use crate::models::{Claim, InsuranceAnalytics};

/// Landing page: headline figures plus the most recent claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub analytics: InsuranceAnalytics,
    pub recent_claims: Vec<Claim>,
    pub source: Source,
}

impl Dashboard {
    pub fn approval_rate(&self) -> i64 {
        self.analytics.approval_rate()
    }

    pub fn denial_rate(&self) -> i64 {
        self.analytics.denial_rate()
    }

    pub fn month_change(&self) -> i64 {
        self.analytics.month_change()
    }

    pub fn month_change_percent(&self) -> i64 {
        self.analytics.month_change_percent()
    }

    pub fn pending_review(&self) -> u64 {
        self.analytics.claims_summary.pending
    }
}

impl From<Sourced<DashboardData>> for Dashboard {
    fn from(loaded: Sourced<DashboardData>) -> Self {
        let (analytics, recent_claims) = loaded.value;
        Self {
            analytics,
            recent_claims,
            source: loaded.source,
        }
    }
}
