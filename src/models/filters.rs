use chrono::NaiveDate;
use serde::Serialize;

use super::enums::ClaimStatus;

/// Query parameters of `GET /claims`. Absent fields are left out of the
/// query string; field order here is the order on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClaimStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ClaimFilter {
    pub fn status(mut self, status: Option<ClaimStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn patient(mut self, patient_id: u64) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from_date = Some(from);
        self.to_date = Some(to);
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }
}
