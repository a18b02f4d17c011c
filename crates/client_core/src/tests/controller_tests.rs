use super::*;
use crate::test_support::{page_envelope, RecordingView};
use async_trait::async_trait;
use serde_json::json;
use shared::protocol::UpstreamEnvelope;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex as StdMutex,
};
use tokio::sync::{mpsc, Notify};

type Responder = Box<dyn Fn(u32) -> Result<UpstreamEnvelope, FetchError> + Send + Sync>;

struct ScriptedSource {
    respond: Responder,
    requests: Arc<StdMutex<Vec<(u32, u32)>>>,
}

impl ScriptedSource {
    fn new(
        respond: impl Fn(u32) -> Result<UpstreamEnvelope, FetchError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// 25 records in total, served 10 per page.
    fn twenty_five_records() -> Self {
        Self::new(|page_no| {
            let start = (page_no.saturating_sub(1) * 10) as usize;
            let count = 25usize.saturating_sub(start).min(10);
            Ok(page_envelope(page_no, 25, count))
        })
    }

    fn requests(&self) -> Arc<StdMutex<Vec<(u32, u32)>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl ArticleSource for ScriptedSource {
    async fn fetch_page(
        &self,
        page_no: u32,
        num_of_rows: u32,
    ) -> Result<UpstreamEnvelope, FetchError> {
        self.requests
            .lock()
            .expect("requests")
            .push((page_no, num_of_rows));
        (self.respond)(page_no)
    }
}

struct GatedSource {
    started: mpsc::UnboundedSender<u32>,
    release: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ArticleSource for GatedSource {
    async fn fetch_page(
        &self,
        page_no: u32,
        _num_of_rows: u32,
    ) -> Result<UpstreamEnvelope, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.started.send(page_no);
        self.release.notified().await;
        Ok(page_envelope(page_no, 25, 10))
    }
}

fn card_titles(snapshot: &PageSnapshot) -> Vec<String> {
    match &snapshot.content {
        ContentArea::Cards(items) => items.iter().map(|item| item.title.clone()).collect(),
        other => panic!("expected cards, got {other:?}"),
    }
}

#[tokio::test]
async fn initialize_loads_first_page_and_enables_next() {
    let source = ScriptedSource::twenty_five_records();
    let requests = source.requests();
    let controller = PageController::new(source, RecordingView::default());

    let outcome = controller.initialize().await;
    assert_eq!(outcome, Navigation::Settled(LoadStatus::Loaded));
    assert_eq!(*requests.lock().expect("requests"), vec![(1, 10)]);

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.controls.label, "page 1 of 3");
    assert!(snapshot.controls.previous_disabled);
    assert!(!snapshot.controls.next_disabled);
    assert_eq!(snapshot.total_count, 25);
    assert_eq!(card_titles(&snapshot).len(), 10);
    assert!(!snapshot.spinner_visible);
    assert!(snapshot.pagination_visible);
}

#[tokio::test]
async fn loading_clears_content_and_hides_pagination() {
    let controller =
        PageController::new(ScriptedSource::twenty_five_records(), RecordingView::default());
    controller.initialize().await;

    let renders = controller.view().renders();
    assert_eq!(renders.len(), 2);

    let loading = &renders[0];
    assert_eq!(loading.load_status, LoadStatus::Loading);
    assert_eq!(loading.content, ContentArea::Cleared);
    assert!(loading.spinner_visible);
    assert!(!loading.pagination_visible);

    let loaded = &renders[1];
    assert_eq!(loaded.load_status, LoadStatus::Loaded);
    assert!(!loaded.spinner_visible);
    assert!(loaded.pagination_visible);
}

#[tokio::test]
async fn last_page_disables_next_and_enables_previous() {
    let controller =
        PageController::new(ScriptedSource::twenty_five_records(), RecordingView::default());
    controller.initialize().await;
    controller.go_to_next_page().await;
    let outcome = controller.go_to_next_page().await;
    assert_eq!(outcome, Navigation::Settled(LoadStatus::Loaded));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.current_page, 3);
    assert_eq!(snapshot.controls.label, "page 3 of 3");
    assert!(snapshot.controls.next_disabled);
    assert!(!snapshot.controls.previous_disabled);
    assert_eq!(card_titles(&snapshot), ["p3-0", "p3-1", "p3-2", "p3-3", "p3-4"]);
}

#[tokio::test]
async fn next_past_last_page_renders_empty_state_instead_of_error() {
    let source = ScriptedSource::twenty_five_records();
    let requests = source.requests();
    let controller = PageController::new(source, RecordingView::default());
    controller.initialize().await;
    for _ in 0..3 {
        controller.go_to_next_page().await;
    }

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.current_page, 4);
    assert_eq!(snapshot.load_status, LoadStatus::Loaded);
    assert_eq!(snapshot.content, ContentArea::Empty);
    assert_eq!(snapshot.total_count, 0);
    assert_eq!(snapshot.controls.label, "page 4 of 0");
    assert_eq!(requests.lock().expect("requests").last(), Some(&(4, 10)));
}

#[tokio::test]
async fn empty_items_override_reported_total() {
    let source = ScriptedSource::new(|_| {
        serde_json::from_value(json!({
            "response": {
                "header": { "resultCode": "0000" },
                "body": { "totalCount": 42, "items": "" }
            }
        }))
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))
    });
    let controller = PageController::new(source, RecordingView::default());

    assert_eq!(
        controller.initialize().await,
        Navigation::Settled(LoadStatus::Loaded)
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.content, ContentArea::Empty);
    assert_eq!(snapshot.total_count, 0);
    assert_eq!(snapshot.total_pages, 0);
    assert_eq!(snapshot.controls.label, "page 1 of 0");
}

#[tokio::test]
async fn upstream_result_code_renders_error_and_ends_errored() {
    let source = ScriptedSource::new(|_| {
        serde_json::from_value(json!({
            "response": {
                "header": { "resultCode": "9999", "resultMsg": "invalid key" },
                "body": { "totalCount": 0 }
            }
        }))
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))
    });
    let controller = PageController::new(source, RecordingView::default());

    assert_eq!(
        controller.initialize().await,
        Navigation::Settled(LoadStatus::Errored)
    );
    let snapshot = controller.snapshot().await;
    match &snapshot.content {
        ContentArea::Error(message) => {
            assert!(message.contains("invalid key"), "{message}");
            assert!(message.contains("9999"), "{message}");
        }
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(snapshot.load_status, LoadStatus::Errored);
    assert!(!snapshot.spinner_visible);
    assert!(snapshot.pagination_visible);
}

#[tokio::test]
async fn failure_keeps_last_controls_and_allows_retry() {
    let fail_next = Arc::new(AtomicUsize::new(0));
    let fail_flag = Arc::clone(&fail_next);
    let source = ScriptedSource::new(move |page_no| {
        if page_no == 2 && fail_flag.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(FetchError::UpstreamStatus {
                status: 500,
                body: "upstream API request failed".into(),
            });
        }
        Ok(page_envelope(page_no, 25, 10))
    });
    let controller = PageController::new(source, RecordingView::default());
    controller.initialize().await;

    assert_eq!(
        controller.go_to_next_page().await,
        Navigation::Settled(LoadStatus::Errored)
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.current_page, 2);
    assert_eq!(snapshot.controls.label, "page 1 of 3");
    assert_eq!(
        snapshot.content,
        ContentArea::Error(
            "failed to load data (backend server error: upstream API request failed (status: 500))"
                .into()
        )
    );

    assert_eq!(
        controller.reload().await,
        Navigation::Settled(LoadStatus::Loaded)
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.controls.label, "page 2 of 3");
    assert_eq!(card_titles(&snapshot)[0], "p2-0");
}

#[tokio::test]
async fn previous_is_inert_on_first_page() {
    let source = ScriptedSource::twenty_five_records();
    let requests = source.requests();
    let controller = PageController::new(source, RecordingView::default());

    assert_eq!(controller.go_to_previous_page().await, Navigation::Ignored);
    assert!(requests.lock().expect("requests").is_empty());
    assert!(controller.view().renders().is_empty());
    assert_eq!(controller.page_state().await.load_status, LoadStatus::Idle);
}

#[tokio::test]
async fn previous_decrements_and_refetches() {
    let source = ScriptedSource::twenty_five_records();
    let requests = source.requests();
    let controller = PageController::new(source, RecordingView::default());
    controller.initialize().await;
    controller.go_to_next_page().await;

    assert_eq!(
        controller.go_to_previous_page().await,
        Navigation::Settled(LoadStatus::Loaded)
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.current_page, 1);
    assert!(snapshot.controls.previous_disabled);
    assert_eq!(
        *requests.lock().expect("requests"),
        vec![(1, 10), (2, 10), (1, 10)]
    );
}

#[tokio::test]
async fn triggers_while_loading_are_ignored() {
    let (started_tx, mut started_rx) = mpsc::unbounded_channel();
    let release = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let controller = Arc::new(PageController::new(
        GatedSource {
            started: started_tx,
            release: Arc::clone(&release),
            calls: Arc::clone(&calls),
        },
        RecordingView::default(),
    ));

    let first = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.initialize().await }
    });
    assert_eq!(started_rx.recv().await, Some(1));
    assert_eq!(controller.initialize().await, Navigation::Ignored);
    assert_eq!(controller.go_to_next_page().await, Navigation::Ignored);
    assert_eq!(controller.page_state().await.current_page, 1);
    release.notify_one();
    assert_eq!(
        first.await.expect("join"),
        Navigation::Settled(LoadStatus::Loaded)
    );

    let next = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.go_to_next_page().await }
    });
    assert_eq!(started_rx.recv().await, Some(2));
    assert_eq!(controller.go_to_next_page().await, Navigation::Ignored);
    assert_eq!(controller.page_state().await.load_status, LoadStatus::Loading);
    release.notify_one();
    assert_eq!(
        next.await.expect("join"),
        Navigation::Settled(LoadStatus::Loaded)
    );

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.current_page, 2);
    assert_eq!(card_titles(&snapshot)[0], "p2-0");

    let statuses: Vec<_> = controller
        .view()
        .renders()
        .iter()
        .map(|render| render.load_status)
        .collect();
    assert_eq!(
        statuses,
        [
            LoadStatus::Loading,
            LoadStatus::Loaded,
            LoadStatus::Loading,
            LoadStatus::Loaded
        ]
    );
}

#[test]
fn total_pages_rounds_up() {
    let mut state = PageState::new(10);
    assert_eq!(state.total_pages(), 0);
    state.total_count = 25;
    assert_eq!(state.total_pages(), 3);
    state.total_count = 30;
    assert_eq!(state.total_pages(), 3);
    state.total_count = 31;
    assert_eq!(state.total_pages(), 4);
}
