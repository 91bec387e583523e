//! Hardcoded demo datasets shown when the API cannot be reached.

use crate::models::{
    Claim, ClaimDetail, ClaimDocument, ClaimPatient, ClaimStatus, ClaimTherapist, ClaimsSummary,
    DocumentDirection, DocumentType, FinancialSummary, InsuranceAnalytics, InsuranceCompany,
    InsuranceDocument, Patient, PatientSummary, ProcessingSummary, UserProfile, UserRole,
};

/// Token stored for a demo session.
pub const DEMO_TOKEN: &str = "demo-token";

/// Number of demo claims shown on the dashboard.
pub const DASHBOARD_CLAIMS: usize = 5;

pub struct DemoData {
    pub analytics: InsuranceAnalytics,
    pub claims: Vec<Claim>,
    pub patients: Vec<Patient>,
    documents: Vec<(u64, InsuranceDocument)>,
}

impl Default for DemoData {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoData {
    pub fn new() -> Self {
        Self {
            analytics: analytics(),
            claims: claims(),
            patients: patients(),
            documents: documents(),
        }
    }

    /// Demo claims with `status`, or all of them.
    pub fn claims_with_status(&self, status: Option<ClaimStatus>) -> Vec<Claim> {
        self.claims
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect()
    }

    pub fn recent_claims(&self) -> Vec<Claim> {
        self.claims.iter().take(DASHBOARD_CLAIMS).cloned().collect()
    }

    /// Patients matching `query`; every demo patient when none match.
    pub fn search_patients(&self, query: &str) -> Vec<Patient> {
        let matched: Vec<Patient> = self
            .patients
            .iter()
            .filter(|p| p.matches(query))
            .cloned()
            .collect();
        if matched.is_empty() {
            self.patients.clone()
        } else {
            matched
        }
    }

    pub fn all_documents(&self) -> Vec<InsuranceDocument> {
        self.documents.iter().map(|(_, d)| d.clone()).collect()
    }

    /// Documents of `patient_id`; every demo document when the patient has none.
    pub fn documents_for(&self, patient_id: u64) -> Vec<InsuranceDocument> {
        let owned: Vec<InsuranceDocument> = self
            .documents
            .iter()
            .filter(|(owner, _)| *owner == patient_id)
            .map(|(_, d)| d.clone())
            .collect();
        if owned.is_empty() {
            self.all_documents()
        } else {
            owned
        }
    }

    /// Documents linked to a demo claim through its patient.
    pub fn claim_documents(&self, claim_id: u64) -> Vec<InsuranceDocument> {
        self.claims
            .iter()
            .find(|c| c.id == claim_id)
            .map(|c| {
                self.documents
                    .iter()
                    .filter(|(owner, _)| *owner == c.patient_id)
                    .map(|(_, d)| d.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Detail view of a demo claim, or `None` for unknown ids.
    pub fn claim_detail(&self, claim_id: u64) -> Option<ClaimDetail> {
        let claim = self.claims.iter().find(|c| c.id == claim_id)?.clone();
        let email = self
            .patients
            .iter()
            .find(|p| p.id == claim.patient_id)
            .map(|p| p.email.clone())
            .unwrap_or_else(|| demo_email(&claim.patient_name));
        let documents = self
            .claim_documents(claim_id)
            .into_iter()
            .map(|d| ClaimDocument {
                id: d.id,
                doc_type: d.doc_type.as_str().to_string(),
                file_name: d.file_name,
                created_at: d.created_at,
            })
            .collect();
        let denial_reason = (claim.status == ClaimStatus::Denied)
            .then(|| "Service not covered under current plan".to_string());

        Some(ClaimDetail {
            patient: ClaimPatient {
                id: claim.patient_id,
                name: claim.patient_name.clone(),
                email,
            },
            therapist: ClaimTherapist {
                id: therapist_id(&claim.therapist_name),
                name: claim.therapist_name.clone(),
            },
            diagnosis_codes: Some(vec!["F41.1".into()]),
            procedure_codes: Some(vec![procedure_code(&claim.service_type).into()]),
            paid_at: (claim.status == ClaimStatus::Paid).then(|| "2025-12-22".to_string()),
            denial_reason,
            notes: None,
            documents,
            claim,
        })
    }
}

/// Profile stored for a demo sign-in; the email is the one typed at login.
pub fn demo_user(email: &str) -> UserProfile {
    UserProfile {
        id: 1,
        name: "Demo Claims Processor".into(),
        email: email.to_string(),
        role: UserRole::ClaimsProcessor,
        insurance_company: InsuranceCompany {
            id: 1,
            name: "Blue Cross Blue Shield".into(),
            code: "BCBS".into(),
        },
    }
}

// ── Internal ────────────────────────────────────────────

fn demo_email(name: &str) -> String {
    format!("{}@email.com", name.to_lowercase().replace(' ', "."))
}

fn therapist_id(name: &str) -> u64 {
    match name {
        "Dr. Emily Chen" => 1,
        "Dr. Michael Brown" => 2,
        "Dr. Lisa Wang" => 3,
        _ => 0,
    }
}

fn procedure_code(service_type: &str) -> &'static str {
    match service_type {
        "Group Therapy" => "90853",
        "Assessment" => "90791",
        _ => "90837",
    }
}

fn analytics() -> InsuranceAnalytics {
    InsuranceAnalytics {
        claims_summary: ClaimsSummary {
            total: 1248,
            pending: 47,
            approved: 892,
            denied: 123,
            paid: 186,
        },
        financial: FinancialSummary {
            total_billed: 2_456_780.0,
            total_approved: 1_987_654.0,
            total_paid: 1_654_321.0,
            this_month_billed: 187_500.0,
        },
        processing: ProcessingSummary {
            avg_processing_days: 4.2,
            claims_this_month: 156,
            claims_last_month: 142,
        },
        patients: PatientSummary { total_active: 423 },
    }
}

#[allow(clippy::too_many_arguments)]
fn claim(
    id: u64,
    claim_number: &str,
    patient_name: &str,
    therapist_name: &str,
    service_date: &str,
    service_type: &str,
    billed_amount: f64,
    approved_amount: Option<f64>,
    status: ClaimStatus,
) -> Claim {
    Claim {
        id,
        claim_number: claim_number.into(),
        patient_name: patient_name.into(),
        patient_id: id,
        therapist_name: therapist_name.into(),
        service_date: service_date.into(),
        service_type: service_type.into(),
        billed_amount,
        approved_amount,
        status,
        submitted_at: None,
        processed_at: None,
    }
}

#[rustfmt::skip]
fn claims() -> Vec<Claim> {
    use ClaimStatus::*;
    vec![
        claim(1, "CLM-20251226-ABC123", "John Smith", "Dr. Emily Chen", "2025-12-20", "Individual Therapy", 175.0, None, Submitted),
        claim(2, "CLM-20251225-DEF456", "Sarah Johnson", "Dr. Michael Brown", "2025-12-19", "Group Therapy", 85.0, None, InReview),
        claim(3, "CLM-20251224-GHI789", "Robert Williams", "Dr. Emily Chen", "2025-12-18", "Assessment", 250.0, None, Pending),
        claim(4, "CLM-20251223-JKL012", "Maria Garcia", "Dr. Lisa Wang", "2025-12-17", "Individual Therapy", 175.0, Some(150.0), Approved),
        claim(5, "CLM-20251222-MNO345", "James Davis", "Dr. Michael Brown", "2025-12-16", "Individual Therapy", 175.0, None, Denied),
        claim(6, "CLM-20251221-PQR678", "Jennifer Wilson", "Dr. Emily Chen", "2025-12-15", "Group Therapy", 85.0, Some(85.0), Paid),
        claim(7, "CLM-20251220-STU901", "Michael Taylor", "Dr. Lisa Wang", "2025-12-14", "Individual Therapy", 175.0, None, Submitted),
        claim(8, "CLM-20251219-VWX234", "Linda Anderson", "Dr. Michael Brown", "2025-12-13", "Assessment", 250.0, Some(200.0), PartiallyApproved),
    ]
}

fn patient(
    id: u64,
    name: &str,
    email: &str,
    member_id: &str,
    group_number: &str,
    therapist_name: &str,
    claims_count: u32,
) -> Patient {
    Patient {
        id,
        name: name.into(),
        email: email.into(),
        member_id: Some(member_id.into()),
        group_number: Some(group_number.into()),
        therapist_name: Some(therapist_name.into()),
        claims_count,
    }
}

#[rustfmt::skip]
fn patients() -> Vec<Patient> {
    vec![
        patient(1, "John Smith", "john.smith@email.com", "BCBS-12345678", "GRP-001", "Dr. Emily Chen", 12),
        patient(2, "Sarah Johnson", "sarah.j@email.com", "BCBS-23456789", "GRP-001", "Dr. Michael Brown", 8),
        patient(3, "Robert Williams", "rwilliams@email.com", "BCBS-34567890", "GRP-002", "Dr. Emily Chen", 5),
        patient(4, "Maria Garcia", "maria.g@email.com", "BCBS-45678901", "GRP-003", "Dr. Lisa Wang", 15),
        patient(5, "James Davis", "jdavis@email.com", "BCBS-56789012", "GRP-001", "Dr. Michael Brown", 3),
    ]
}

fn document(
    id: u64,
    patient_name: &str,
    file_name: &str,
    doc_type: DocumentType,
    direction: DocumentDirection,
    file_size: u64,
    created_at: &str,
) -> InsuranceDocument {
    InsuranceDocument {
        id,
        doc_type,
        direction,
        file_name: file_name.into(),
        file_size,
        description: Some(format!("{} for {patient_name}", doc_type.label())),
        claim_id: None,
        created_at: created_at.into(),
    }
}

#[rustfmt::skip]
fn documents() -> Vec<(u64, InsuranceDocument)> {
    use DocumentDirection::*;
    use DocumentType::*;
    vec![
        (1, document(1, "John Smith", "EOB_Smith_Dec2025.pdf", Eob, ToPatient, 184_320, "2025-12-26")),
        (2, document(2, "Sarah Johnson", "PreAuth_Johnson.pdf", PreAuth, FromPatient, 96_256, "2025-12-25")),
        (3, document(3, "Robert Williams", "Coverage_Williams.pdf", CoverageLetter, ToPatient, 131_072, "2025-12-24")),
        (4, document(4, "Maria Garcia", "EOB_Garcia_Nov2025.pdf", Eob, ToPatient, 178_944, "2025-12-23")),
        (5, document(5, "James Davis", "Superbill_Davis_1219.pdf", Superbill, FromPatient, 65_536, "2025-12-22")),
    ]
}
