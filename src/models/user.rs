use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// Insurance company that owns a portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceCompany {
    pub id: u64,
    pub name: String,
    pub code: String,
}

/// Signed-in portal user. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub insurance_company: InsuranceCompany,
}

impl UserProfile {
    /// First character of the name, shown as the avatar.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}
