use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::protocol::articles_route;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{error, info};

mod app_state;
mod config;
mod error;
mod upstream;

use app_state::AppState;
use config::load_settings;
use error::ProxyError;
use upstream::UpstreamClient;

#[derive(Debug, Deserialize)]
struct ArticlesQuery {
    #[serde(rename = "pageNo")]
    page_no: Option<String>,
    #[serde(rename = "numOfRows")]
    num_of_rows: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let service_key = settings.service_key()?;
    let upstream = UpstreamClient::new(settings.upstream_url()?, service_key);
    info!(endpoint = %upstream.endpoint(), "upstream article API configured");

    let state = AppState { upstream };
    let app = build_router(Arc::new(state), settings.static_dir.as_deref());

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "article proxy listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, static_dir: Option<&str>) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .route(articles_route(), get(http_list_articles));
    if let Some(dir) = static_dir {
        info!(dir, "serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }
    router.layer(CorsLayer::permissive()).with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_articles(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ArticlesQuery>,
) -> Result<impl IntoResponse, ProxyError> {
    let (Some(page_no), Some(num_of_rows)) = (required(q.page_no), required(q.num_of_rows)) else {
        return Err(ProxyError::MissingParameter);
    };

    let body = state
        .upstream
        .fetch_page(&page_no, &num_of_rows)
        .await
        .map_err(|error| {
            error!(%error, %page_no, %num_of_rows, "upstream article request failed");
            ProxyError::from(error)
        })?;

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    ))
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
