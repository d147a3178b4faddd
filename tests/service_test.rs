//! End-to-end requests through `VibeService` with in-memory collaborators.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use common::{DARK_MOODY, SOFT_DREAMY, StaticCovers, candidates};
use vibeboard::service::{DEFAULT_LIMIT, MAX_LIMIT};
use vibeboard::{
    BoardRequest, CandidateItem, Catalog, NO_COVER_LABEL, NarrativeBackend, NarrativeBridge,
    Result, VibeError, VibePipeline, VibeService,
};

/// Catalog returning a fixed candidate list, recording the requested limit.
struct FixedCatalog {
    items: Vec<CandidateItem>,
    last_limit: AtomicUsize,
}

impl FixedCatalog {
    fn new(ids: &[&str]) -> Self {
        Self {
            items: candidates(ids),
            last_limit: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Catalog for FixedCatalog {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<CandidateItem>> {
        self.last_limit.store(limit, Ordering::SeqCst);
        Ok(self.items.iter().take(limit).cloned().collect())
    }
}

struct BrokenCatalog;

#[async_trait]
impl Catalog for BrokenCatalog {
    fn name(&self) -> &str {
        "broken"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<CandidateItem>> {
        Err(VibeError::CatalogLookupFailed("connection refused".into()))
    }
}

struct CannedBackend(std::result::Result<&'static str, fn() -> VibeError>);

#[async_trait]
impl NarrativeBackend for CannedBackend {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        match &self.0 {
            Ok(text) => Ok(text.to_string()),
            Err(make) => Err(make()),
        }
    }
}

fn covers() -> Arc<StaticCovers> {
    Arc::new(
        StaticCovers::new()
            .cover("a", DARK_MOODY)
            .cover("b", DARK_MOODY)
            .cover("d", SOFT_DREAMY),
    )
}

fn service(catalog: Arc<dyn Catalog>, narrative: NarrativeBridge) -> VibeService {
    VibeService::new(catalog, VibePipeline::new(covers()), narrative)
}

#[tokio::test]
async fn board_without_narrative() {
    let svc = service(
        Arc::new(FixedCatalog::new(&["a", "b", "c", "d"])),
        NarrativeBridge::unconfigured(),
    );

    let response = svc.run(&BoardRequest::new("  moody  ")).await.unwrap();

    assert_eq!(response.board.query, "moody");
    assert_eq!(response.board.item_count(), 4);
    assert_eq!(response.board.groups[0].label, "dark & moody");
    assert!(response.board.group(NO_COVER_LABEL).is_some());
    assert!(response.narrative.is_none());
    assert!(response.narrative_error.is_none());
}

#[tokio::test]
async fn empty_query_is_invalid_input() {
    let svc = service(Arc::new(FixedCatalog::new(&["a"])), NarrativeBridge::unconfigured());

    let err = svc.run(&BoardRequest::new("   ")).await.unwrap_err();
    assert!(matches!(err, VibeError::InvalidInput(_)));
}

#[tokio::test]
async fn catalog_failure_aborts_request() {
    let svc = service(Arc::new(BrokenCatalog), NarrativeBridge::unconfigured());

    let err = svc.run(&BoardRequest::new("radiohead")).await.unwrap_err();
    assert!(matches!(err, VibeError::CatalogLookupFailed(_)));
}

#[tokio::test]
async fn limit_defaults_and_clamps() {
    let catalog = Arc::new(FixedCatalog::new(&["a", "b", "c", "d"]));
    let svc = service(catalog.clone(), NarrativeBridge::unconfigured());

    svc.run(&BoardRequest::new("q")).await.unwrap();
    assert_eq!(catalog.last_limit.load(Ordering::SeqCst), DEFAULT_LIMIT);

    svc.run(&BoardRequest::new("q").limit(0)).await.unwrap();
    assert_eq!(catalog.last_limit.load(Ordering::SeqCst), 1);

    svc.run(&BoardRequest::new("q").limit(500)).await.unwrap();
    assert_eq!(catalog.last_limit.load(Ordering::SeqCst), MAX_LIMIT);

    let response = svc.run(&BoardRequest::new("q").limit(2)).await.unwrap();
    assert_eq!(response.board.item_count(), 2);
}

#[tokio::test]
async fn narrative_is_attached_when_requested() {
    let svc = service(
        Arc::new(FixedCatalog::new(&["a", "d"])),
        NarrativeBridge::with_backend(Arc::new(CannedBackend(Ok("Dusky and pale.")))),
    );

    let response = svc
        .run(&BoardRequest::new("q").narrate("poetic"))
        .await
        .unwrap();

    assert_eq!(response.narrative.as_deref(), Some("Dusky and pale."));
    assert!(response.narrative_error.is_none());
}

#[tokio::test]
async fn narrative_failure_keeps_the_board() {
    let svc = service(
        Arc::new(FixedCatalog::new(&["a", "b"])),
        NarrativeBridge::with_backend(Arc::new(CannedBackend(Err(|| {
            VibeError::BackendUnavailable("connection refused".into())
        })))),
    );

    let response = svc
        .run(&BoardRequest::new("q").narrate("plain"))
        .await
        .unwrap();

    assert_eq!(response.board.item_count(), 2);
    assert!(response.narrative.is_none());
    let failure = response.narrative_error.unwrap();
    assert_eq!(failure.kind, "backend_unavailable");
    assert!(failure.message.contains("connection refused"));
}

#[tokio::test]
async fn unconfigured_narrative_is_reported() {
    let svc = service(
        Arc::new(FixedCatalog::new(&["a"])),
        NarrativeBridge::unconfigured(),
    );

    let response = svc
        .run(&BoardRequest::new("q").narrate("neutral"))
        .await
        .unwrap();

    assert_eq!(
        response.narrative_error.as_ref().map(|f| f.kind.as_str()),
        Some("backend_not_configured")
    );

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["query"], "q");
    assert!(json["groups"].is_array());
    assert_eq!(json["narrative_error"]["kind"], "backend_not_configured");
    assert!(json.get("narrative").is_none());
}

#[tokio::test]
async fn debug_flag_reaches_items() {
    let svc = service(Arc::new(FixedCatalog::new(&["a"])), NarrativeBridge::unconfigured());

    let response = svc
        .run(&BoardRequest::new("q").debug(true))
        .await
        .unwrap();

    assert!(response.board.groups[0].items[0].debug.is_some());
}

#[test]
fn request_deserializes_with_defaults() {
    let request: BoardRequest = serde_json::from_str(r#"{"query": "jazz"}"#).unwrap();
    assert_eq!(request.query, "jazz");
    assert_eq!(request.effective_limit(), DEFAULT_LIMIT);
    assert!(!request.debug);
    assert!(request.narrative_style.is_none());
}
