use shared::protocol::PAGE_SIZE;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    normalize::{normalize_envelope, NormalizedPage},
    transport::ArticleSource,
    view::{error_message, ContentArea, LoadStatus, PageSnapshot, PageView, PaginationControls},
};

/// Pagination state owned by one [`PageController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub load_status: LoadStatus,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_count: 0,
            load_status: LoadStatus::Idle,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn controls(&self) -> PaginationControls {
        let total_pages = self.total_pages();
        PaginationControls {
            label: format!("page {} of {}", self.current_page, total_pages),
            previous_disabled: self.current_page == 1,
            next_disabled: u64::from(self.current_page) == total_pages,
        }
    }
}

/// Result of a navigation trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// A fetch ran to completion and left the controller in this status.
    Settled(LoadStatus),
    /// The trigger was inert: a fetch was already in flight, or there is no
    /// previous page.
    Ignored,
}

struct ControllerState {
    page: PageState,
    content: ContentArea,
    spinner_visible: bool,
    pagination_visible: bool,
    controls: PaginationControls,
}

impl ControllerState {
    fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            current_page: self.page.current_page,
            page_size: self.page.page_size,
            total_count: self.page.total_count,
            total_pages: self.page.total_pages(),
            load_status: self.page.load_status,
            content: self.content.clone(),
            spinner_visible: self.spinner_visible,
            pagination_visible: self.pagination_visible,
            controls: self.controls.clone(),
        }
    }
}

/// Drives the fetch → normalize → render cycle.
///
/// Only one fetch runs at a time. Triggers that arrive while a fetch is
/// loading return [`Navigation::Ignored`] without touching state. The lock
/// is never held across the network call.
///
/// "Next" is not bounded by the last known page count; a page past the end
/// comes back empty.
pub struct PageController<S, V> {
    source: S,
    view: V,
    inner: Mutex<ControllerState>,
}

impl<S: ArticleSource, V: PageView> PageController<S, V> {
    pub fn new(source: S, view: V) -> Self {
        Self::with_page_size(source, view, PAGE_SIZE)
    }

    pub fn with_page_size(source: S, view: V, page_size: u32) -> Self {
        let page = PageState::new(page_size);
        let controls = page.controls();
        Self {
            source,
            view,
            inner: Mutex::new(ControllerState {
                page,
                content: ContentArea::Cleared,
                spinner_visible: false,
                pagination_visible: true,
                controls,
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub async fn snapshot(&self) -> PageSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn page_state(&self) -> PageState {
        self.inner.lock().await.page.clone()
    }

    /// Loads the first page.
    pub async fn initialize(&self) -> Navigation {
        self.navigate(|_| Some(1)).await
    }

    pub async fn go_to_next_page(&self) -> Navigation {
        self.navigate(|page| Some(page.current_page.saturating_add(1)))
            .await
    }

    pub async fn go_to_previous_page(&self) -> Navigation {
        self.navigate(|page| (page.current_page > 1).then(|| page.current_page - 1))
            .await
    }

    /// Fetches the current page again, e.g. after an error.
    pub async fn reload(&self) -> Navigation {
        self.navigate(|page| Some(page.current_page)).await
    }

    async fn navigate(&self, target: impl FnOnce(&PageState) -> Option<u32>) -> Navigation {
        let Some((page_no, page_size)) = self.begin_fetch(target).await else {
            return Navigation::Ignored;
        };
        let outcome = self.load(page_no, page_size).await;
        Navigation::Settled(self.finish_fetch(outcome).await)
    }

    async fn begin_fetch(
        &self,
        target: impl FnOnce(&PageState) -> Option<u32>,
    ) -> Option<(u32, u32)> {
        let (page_no, page_size, snapshot) = {
            let mut inner = self.inner.lock().await;
            if inner.page.load_status == LoadStatus::Loading {
                debug!(
                    current_page = inner.page.current_page,
                    "fetch already in flight; ignoring navigation"
                );
                return None;
            }
            let page_no = target(&inner.page)?;

            inner.page.current_page = page_no;
            inner.page.load_status = LoadStatus::Loading;
            inner.content = ContentArea::Cleared;
            inner.spinner_visible = true;
            inner.pagination_visible = false;
            (page_no, inner.page.page_size, inner.snapshot())
        };
        self.view.render(&snapshot);
        Some((page_no, page_size))
    }

    async fn load(&self, page_no: u32, page_size: u32) -> Result<NormalizedPage, FetchError> {
        let envelope = self.source.fetch_page(page_no, page_size).await?;
        normalize_envelope(envelope)
    }

    async fn finish_fetch(&self, outcome: Result<NormalizedPage, FetchError>) -> LoadStatus {
        let (status, snapshot) = {
            let mut inner = self.inner.lock().await;
            match outcome {
                Ok(NormalizedPage { items, total_count }) => {
                    if items.is_empty() {
                        inner.page.total_count = 0;
                        inner.content = ContentArea::Empty;
                    } else {
                        inner.page.total_count = total_count;
                        inner.content = ContentArea::Cards(items);
                    }
                    inner.controls = inner.page.controls();
                    inner.page.load_status = LoadStatus::Loaded;
                    info!(
                        page = inner.page.current_page,
                        total_count = inner.page.total_count,
                        "page loaded"
                    );
                }
                Err(error) => {
                    warn!(page = inner.page.current_page, %error, "failed to load page");
                    inner.content = ContentArea::Error(error_message(&error));
                    inner.page.load_status = LoadStatus::Errored;
                }
            }
            inner.spinner_visible = false;
            inner.pagination_visible = true;
            (inner.page.load_status, inner.snapshot())
        };
        self.view.render(&snapshot);
        status
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
