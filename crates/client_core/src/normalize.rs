use shared::{
    domain::{
        ContentItem, DEFAULT_AUTHOR, DEFAULT_CATEGORY, DEFAULT_PUBLISHED_DATE, DEFAULT_TITLE,
        NO_IMAGE_SENTINEL,
    },
    protocol::{EnvelopeResponse, RawRecord, UpstreamEnvelope},
};

use crate::error::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    pub items: Vec<ContentItem>,
    pub total_count: u64,
}

pub fn parse_envelope(bytes: &[u8]) -> Result<UpstreamEnvelope, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::MalformedPayload(e.to_string()))
}

/// Checks the result code, then maps every record to a [`ContentItem`] in
/// upstream order.
pub fn normalize_envelope(envelope: UpstreamEnvelope) -> Result<NormalizedPage, FetchError> {
    let EnvelopeResponse { header, body } = envelope.response;
    if let Some(code) = header.failure_code().map(str::to_string) {
        return Err(FetchError::UpstreamLogic {
            code,
            message: header.result_msg.unwrap_or_default(),
        });
    }

    let total_count = body.total_count;
    let items = body.into_records().into_iter().map(content_item).collect();
    Ok(NormalizedPage { items, total_count })
}

pub fn content_item(raw: RawRecord) -> ContentItem {
    ContentItem {
        title: or_default(raw.title, DEFAULT_TITLE),
        author: or_default(raw.author, DEFAULT_AUTHOR),
        image_url: present(raw.image_object).filter(|url| url.trim() != NO_IMAGE_SENTINEL),
        source_url: present(raw.url),
        category: or_default(raw.gubun, DEFAULT_CATEGORY),
        published_date: or_default(raw.issued_date, DEFAULT_PUBLISHED_DATE),
    }
}

// Blank text counts as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    present(value).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
