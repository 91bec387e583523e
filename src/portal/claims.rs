use crate::fallback::{Source, Sourced};
use crate::models::{Claim, ClaimDetail, ClaimFilter, ClaimStatus, Paginated};

/// Claims per page of the claims list.
pub const CLAIMS_PER_PAGE: u32 = 10;

/// State of the claims list: status filter and pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsBrowser {
    status: Option<ClaimStatus>,
    current_page: u32,
    total_pages: u32,
    pub claims: Vec<Claim>,
    pub source: Option<Source>,
}

impl Default for ClaimsBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsBrowser {
    pub fn new() -> Self {
        Self {
            status: None,
            current_page: 1,
            total_pages: 1,
            claims: Vec::new(),
            source: None,
        }
    }

    pub fn status(&self) -> Option<ClaimStatus> {
        self.status
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Change the status filter. Always returns to the first page.
    pub fn set_status(&mut self, status: Option<ClaimStatus>) {
        self.status = status;
        self.current_page = 1;
    }

    /// Request `page` on the next load, before the page count is known.
    pub fn with_page(mut self, page: u32) -> Self {
        self.current_page = page.max(1);
        self
    }

    /// Jump to `page`, clamped to the known page range.
    pub fn go_to(&mut self, page: u32) {
        self.current_page = page.clamp(1, self.total_pages);
    }

    /// Advance one page. Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        let before = self.current_page;
        self.go_to(before.saturating_add(1));
        self.current_page != before
    }

    /// Go back one page. Returns false when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        let before = self.current_page;
        self.go_to(before.saturating_sub(1));
        self.current_page != before
    }

    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// Query for the current filter and page.
    pub fn filter(&self) -> ClaimFilter {
        ClaimFilter::default()
            .status(self.status)
            .page(self.current_page, CLAIMS_PER_PAGE)
    }

    /// Take in a loaded page.
    pub fn apply(&mut self, loaded: Sourced<Paginated<Claim>>) {
        let meta = loaded.value.meta;
        self.total_pages = meta.last_page.max(1);
        self.current_page = meta.current_page.clamp(1, self.total_pages);
        self.claims = loaded.value.data;
        self.source = Some(loaded.source);
    }
}

/// A claim opened for review.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimReview {
    pub detail: ClaimDetail,
    pub source: Source,
}

impl ClaimReview {
    /// Whether a decision can still be recorded.
    pub fn is_open(&self) -> bool {
        matches!(
            self.detail.claim.status,
            ClaimStatus::Pending | ClaimStatus::Submitted | ClaimStatus::InReview
        )
    }
}

impl From<Sourced<ClaimDetail>> for ClaimReview {
    fn from(loaded: Sourced<ClaimDetail>) -> Self {
        Self {
            detail: loaded.value,
            source: loaded.source,
        }
    }
}
