use serde::{Deserialize, Serialize};

use super::enums::ClaimStatus;

/// Claim row as listed by `GET /claims`.
///
/// Status transitions are tracked server-side; the client renders whatever
/// status it receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: u64,
    pub claim_number: String,
    pub patient_name: String,
    pub patient_id: u64,
    pub therapist_name: String,
    pub service_date: String,
    pub service_type: String,
    pub billed_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<f64>,
    pub status: ClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPatient {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTherapist {
    pub id: u64,
    pub name: String,
}

/// Document attached to a claim, as embedded in the claim detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDocument {
    pub id: u64,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub file_name: String,
    pub created_at: String,
}

/// Full claim returned by `GET /claims/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDetail {
    #[serde(flatten)]
    pub claim: Claim,
    pub patient: ClaimPatient,
    pub therapist: ClaimTherapist,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub documents: Vec<ClaimDocument>,
}

/// Body of `PUT /claims/{id}`. The server returns no confirmation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimUpdate {
    pub status: ClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ClaimUpdate {
    pub fn new(status: ClaimStatus) -> Self {
        Self {
            status,
            approved_amount: None,
            denial_reason: None,
            notes: None,
        }
    }

    pub fn approved_amount(mut self, amount: f64) -> Self {
        self.approved_amount = Some(amount);
        self
    }

    pub fn denial_reason(mut self, reason: impl Into<String>) -> Self {
        self.denial_reason = Some(reason.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_flattens_claim_fields() {
        let value = json!({
            "id": 4,
            "claim_number": "CLM-20251223-JKL012",
            "patient_name": "Maria Garcia",
            "patient_id": 4,
            "therapist_name": "Dr. Lisa Wang",
            "service_date": "2025-12-17",
            "service_type": "Individual Therapy",
            "billed_amount": 175,
            "approved_amount": 150,
            "status": "approved",
            "patient": {"id": 4, "name": "Maria Garcia", "email": "maria.g@email.com"},
            "therapist": {"id": 9, "name": "Dr. Lisa Wang"},
            "diagnosis_codes": ["F41.1"],
            "documents": [
                {"id": 2, "type": "eob", "file_name": "eob.pdf", "created_at": "2025-12-20"}
            ]
        });
        let detail: ClaimDetail = serde_json::from_value(value).unwrap();
        assert_eq!(detail.claim.status, ClaimStatus::Approved);
        assert_eq!(detail.claim.approved_amount, Some(150.0));
        assert_eq!(detail.therapist.id, 9);
        assert_eq!(detail.documents[0].doc_type, "eob");
        assert!(detail.paid_at.is_none());
    }

    #[test]
    fn update_omits_absent_fields() {
        let update = ClaimUpdate::new(ClaimStatus::Denied).denial_reason("Not covered");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({"status": "denied", "denial_reason": "Not covered"})
        );
    }

    #[test]
    fn update_with_amount_and_notes() {
        let update = ClaimUpdate::new(ClaimStatus::PartiallyApproved)
            .approved_amount(120.5)
            .notes("Session capped");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["status"], "partially_approved");
        assert_eq!(value["approved_amount"], 120.5);
        assert_eq!(value["notes"], "Session capped");
    }
}
