use std::collections::BTreeSet;

use crate::fallback::{Source, Sourced};
use crate::models::{DocumentType, InsuranceDocument};

/// Document list of one patient with local filtering and selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBrowser {
    pub patient_id: u64,
    pub documents: Vec<InsuranceDocument>,
    pub source: Source,
    pub search: String,
    pub type_filter: Option<DocumentType>,
    selected: BTreeSet<u64>,
}

impl DocumentBrowser {
    pub fn new(patient_id: u64, loaded: Sourced<Vec<InsuranceDocument>>) -> Self {
        Self {
            patient_id,
            documents: loaded.value,
            source: loaded.source,
            search: String::new(),
            type_filter: None,
            selected: BTreeSet::new(),
        }
    }

    /// Documents passing the text and type filters.
    pub fn filtered(&self) -> Vec<&InsuranceDocument> {
        self.documents
            .iter()
            .filter(|d| d.matches(&self.search))
            .filter(|d| self.type_filter.map_or(true, |t| d.doc_type == t))
            .collect()
    }

    pub fn toggle(&mut self, document_id: u64) {
        if !self.selected.remove(&document_id) {
            self.selected.insert(document_id);
        }
    }

    /// Select every visible document, or clear the selection when all of
    /// them are already selected.
    pub fn toggle_all(&mut self) {
        let visible: BTreeSet<u64> = self.filtered().iter().map(|d| d.id).collect();
        if !visible.is_empty() && visible.is_subset(&self.selected) {
            self.selected.clear();
        } else {
            self.selected = visible;
        }
    }

    pub fn is_selected(&self, document_id: u64) -> bool {
        self.selected.contains(&document_id)
    }

    pub fn selected_ids(&self) -> Vec<u64> {
        self.selected.iter().copied().collect()
    }
}
