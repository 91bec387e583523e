use serde::{Deserialize, Serialize};

/// A wire string that names no variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: {value:?}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + label + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => ($s:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Human-readable label for display.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UserRole {
    Admin => ("admin", "Admin"),
    ClaimsProcessor => ("claims_processor", "Claims Processor"),
    Viewer => ("viewer", "Viewer"),
});

str_enum!(ClaimStatus {
    Draft => ("draft", "Draft"),
    Pending => ("pending", "Pending"),
    Submitted => ("submitted", "Submitted"),
    InReview => ("in_review", "In Review"),
    Approved => ("approved", "Approved"),
    Denied => ("denied", "Denied"),
    PartiallyApproved => ("partially_approved", "Partial"),
    Paid => ("paid", "Paid"),
});

str_enum!(DocumentType {
    Eob => ("eob", "EOB"),
    PreAuth => ("pre_auth", "Pre-Authorization"),
    CoverageLetter => ("coverage_letter", "Coverage Letter"),
    ClaimForm => ("claim_form", "Claim Form"),
    Superbill => ("superbill", "Superbill"),
    Other => ("other", "Other"),
});

str_enum!(DocumentDirection {
    ToPatient => ("to_patient", "To patient"),
    FromPatient => ("from_patient", "From patient"),
});

impl ClaimStatus {
    /// Statuses a reviewer can filter the claims list by (drafts are never listed).
    pub const FILTERABLE: &'static [ClaimStatus] = &[
        ClaimStatus::Pending,
        ClaimStatus::Submitted,
        ClaimStatus::InReview,
        ClaimStatus::Approved,
        ClaimStatus::Denied,
        ClaimStatus::PartiallyApproved,
        ClaimStatus::Paid,
    ];
}
