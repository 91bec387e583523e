use serde::{Deserialize, Serialize};

use super::enums::ClaimStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsSummary {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub denied: u64,
    pub paid: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_billed: f64,
    pub total_approved: f64,
    pub total_paid: f64,
    pub this_month_billed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub avg_processing_days: f64,
    pub claims_this_month: u64,
    pub claims_last_month: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub total_active: u64,
}

/// Pre-aggregated snapshot from `GET /analytics`. The client never
/// aggregates raw claims itself; every derived figure below is a ratio of
/// numbers already in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceAnalytics {
    pub claims_summary: ClaimsSummary,
    pub financial: FinancialSummary,
    pub processing: ProcessingSummary,
    pub patients: PatientSummary,
}

/// One bar of the status breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusShare {
    pub status: ClaimStatus,
    pub count: u64,
    pub percent: i64,
}

/// Round half towards positive infinity, so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `numerator / denominator` as a whole percentage; 0 when the denominator is 0.
pub fn percent(numerator: f64, denominator: f64) -> i64 {
    if denominator == 0.0 {
        return 0;
    }
    round_half_up(numerator / denominator * 100.0)
}

impl InsuranceAnalytics {
    pub fn approval_rate(&self) -> i64 {
        let s = &self.claims_summary;
        percent(s.approved as f64, s.total as f64)
    }

    pub fn denial_rate(&self) -> i64 {
        let s = &self.claims_summary;
        percent(s.denied as f64, s.total as f64)
    }

    /// Paid amount as a share of the approved amount.
    pub fn payment_rate(&self) -> i64 {
        percent(self.financial.total_paid, self.financial.total_approved)
    }

    /// Claims received this month minus last month.
    pub fn month_change(&self) -> i64 {
        self.processing.claims_this_month as i64 - self.processing.claims_last_month as i64
    }

    pub fn month_change_percent(&self) -> i64 {
        percent(
            self.month_change() as f64,
            self.processing.claims_last_month as f64,
        )
    }

    /// Approved amount as a share of the billed amount.
    pub fn approved_share_of_billed(&self) -> f64 {
        share(self.financial.total_approved, self.financial.total_billed)
    }

    /// Paid amount as a share of the billed amount.
    pub fn paid_share_of_billed(&self) -> f64 {
        share(self.financial.total_paid, self.financial.total_billed)
    }

    pub fn status_breakdown(&self) -> Vec<StatusShare> {
        let s = &self.claims_summary;
        [
            (ClaimStatus::Pending, s.pending),
            (ClaimStatus::Approved, s.approved),
            (ClaimStatus::Denied, s.denied),
            (ClaimStatus::Paid, s.paid),
        ]
        .into_iter()
        .map(|(status, count)| StatusShare {
            status,
            count,
            percent: percent(count as f64, s.total as f64),
        })
        .collect()
    }
}

fn share(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}
