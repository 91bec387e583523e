use crate::fallback::{Source, Sourced};
use crate::models::{InsuranceAnalytics, StatusShare};

/// Analytics page over one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub analytics: InsuranceAnalytics,
    pub source: Source,
}

impl AnalyticsReport {
    pub fn approval_rate(&self) -> i64 {
        self.analytics.approval_rate()
    }

    pub fn denial_rate(&self) -> i64 {
        self.analytics.denial_rate()
    }

    pub fn payment_rate(&self) -> i64 {
        self.analytics.payment_rate()
    }

    pub fn month_change(&self) -> i64 {
        self.analytics.month_change()
    }

    pub fn month_change_percent(&self) -> i64 {
        self.analytics.month_change_percent()
    }

    pub fn status_breakdown(&self) -> Vec<StatusShare> {
        self.analytics.status_breakdown()
    }

    /// Approved and paid amounts as percentages of the billed amount.
    pub fn financial_shares(&self) -> (f64, f64) {
        (
            self.analytics.approved_share_of_billed(),
            self.analytics.paid_share_of_billed(),
        )
    }
}

impl From<Sourced<InsuranceAnalytics>> for AnalyticsReport {
    fn from(loaded: Sourced<InsuranceAnalytics>) -> Self {
        Self {
            analytics: loaded.value,
            source: loaded.source,
        }
    }
}
