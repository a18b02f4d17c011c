use crate::upstream::UpstreamClient;

pub(crate) struct AppState {
    pub(crate) upstream: UpstreamClient,
}
