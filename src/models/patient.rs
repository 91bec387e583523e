use serde::{Deserialize, Serialize};

/// Member as returned by patient search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapist_name: Option<String>,
    pub claims_count: u32,
}

impl Patient {
    /// Case-insensitive match on name or member id.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .member_id
                .as_deref()
                .is_some_and(|id| id.to_lowercase().contains(&needle))
    }
}
