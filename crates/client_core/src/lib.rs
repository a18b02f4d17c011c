//! Client side of the article browser: turns proxy responses into pages of
//! [`ContentItem`](shared::domain::ContentItem)s and keeps pagination state.

pub mod controller;
pub mod error;
pub mod normalize;
pub mod transport;
pub mod view;

pub use controller::{Navigation, PageController, PageState};
pub use error::FetchError;
pub use normalize::{normalize_envelope, NormalizedPage};
pub use transport::{ArticleSource, HttpArticleSource};
pub use view::{ContentArea, LoadStatus, PageSnapshot, PageView, PaginationControls};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
