use crate::demo::DemoData;
use crate::fallback::{Source, Sourced};
use crate::models::Patient;

/// Patient search page. Opens on the demo roster until a search runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSearch {
    pub query: String,
    pub patients: Vec<Patient>,
    pub searched: bool,
    pub source: Source,
}

impl Default for PatientSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientSearch {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            patients: DemoData::new().patients,
            searched: false,
            source: Source::Demo,
        }
    }

    /// Blank queries never reach the API.
    pub fn accepts(query: &str) -> bool {
        !query.trim().is_empty()
    }

    pub fn apply(&mut self, query: &str, loaded: Sourced<Vec<Patient>>) {
        self.query = query.to_string();
        self.patients = loaded.value;
        self.source = loaded.source;
        self.searched = true;
    }
}
