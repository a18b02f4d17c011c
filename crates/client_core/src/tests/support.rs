use std::sync::{Arc, Mutex};

use serde_json::json;
use shared::protocol::UpstreamEnvelope;

use crate::view::{PageSnapshot, PageView};

#[derive(Default, Clone)]
pub(crate) struct RecordingView {
    renders: Arc<Mutex<Vec<PageSnapshot>>>,
}

impl RecordingView {
    pub(crate) fn renders(&self) -> Vec<PageSnapshot> {
        self.renders.lock().expect("renders").clone()
    }
}

impl PageView for RecordingView {
    fn render(&self, snapshot: &PageSnapshot) {
        self.renders.lock().expect("renders").push(snapshot.clone());
    }
}

/// A successful envelope with `count` records titled `p{page_no}-{n}`.
pub(crate) fn page_envelope(page_no: u32, total_count: u64, count: usize) -> UpstreamEnvelope {
    let items: Vec<_> = (0..count)
        .map(|n| json!({ "TITLE": format!("p{page_no}-{n}"), "AUTHOR": "Lee" }))
        .collect();
    serde_json::from_value(json!({
        "response": {
            "header": { "resultCode": "0000", "resultMsg": "NORMAL SERVICE" },
            "body": { "totalCount": total_count, "items": { "item": items } }
        }
    }))
    .expect("envelope")
}
