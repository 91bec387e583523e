use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// One page of a listing, returned verbatim from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap a full in-memory list as a single page.
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        let per_page = data.len().max(1) as u32;
        Self {
            data,
            meta: PageMeta {
                current_page: 1,
                last_page: 1,
                per_page,
                total,
            },
        }
    }
}
