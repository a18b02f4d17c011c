//! What the page controller shows, independent of how it is drawn.

use shared::domain::ContentItem;

use crate::error::FetchError;

pub const EMPTY_MESSAGE: &str = "no data to display";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// The results area holds exactly one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentArea {
    Cleared,
    Cards(Vec<ContentItem>),
    Empty,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub label: String,
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub load_status: LoadStatus,
    pub content: ContentArea,
    pub spinner_visible: bool,
    pub pagination_visible: bool,
    pub controls: PaginationControls,
}

/// Receives a snapshot whenever the displayed state changes.
pub trait PageView: Send + Sync {
    fn render(&self, snapshot: &PageSnapshot);
}

pub fn error_message(error: &FetchError) -> String {
    format!("failed to load data ({error})")
}
