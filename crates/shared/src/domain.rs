use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "untitled";
pub const DEFAULT_AUTHOR: &str = "unknown";
pub const DEFAULT_CATEGORY: &str = "uncategorized";
pub const DEFAULT_PUBLISHED_DATE: &str = "unknown";

/// Image reference the upstream uses to mean "no image provided".
pub const NO_IMAGE_SENTINEL: &str = "http://www.kmdb.or.kr/images/none.gif";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x180.png?text=No+Image";

/// One rendered record. Defaults are already applied; `image_url` and
/// `source_url` stay optional because the card renders differently without them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub author: String,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub category: String,
    pub published_date: String,
}

impl ContentItem {
    /// Image to show on the card, falling back to the placeholder.
    pub fn image_src(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}

impl Default for ContentItem {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            author: DEFAULT_AUTHOR.into(),
            image_url: None,
            source_url: None,
            category: DEFAULT_CATEGORY.into(),
            published_date: DEFAULT_PUBLISHED_DATE.into(),
        }
    }
}
