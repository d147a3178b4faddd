//! Tests for metrics emission.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

mod common;

use std::sync::Arc;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{DARK_MOODY, StaticCovers, candidates, png_bytes};
use vibeboard::telemetry;
use vibeboard::{
    CoverArtFetcher, CoverSearch, CoverSearchRequest, CoverSource, MusicBrainzCatalog,
    MusicBrainzClient, NarrativeBridge, NarrativeStyle, OpenAiBackend, VibeBoard, VibePipeline,
};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for a metric name carrying a specific label value.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
fn record<F: std::future::Future>(recorder: &DebuggingRecorder, fut: F) -> F::Output {
    metrics::with_local_recorder(recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(fut))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cover_cascade_records_attempts_and_hits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/release-group/hit/front-250"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(DARK_MOODY)))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let fetcher = CoverArtFetcher::with_base_url(server.uri()).unwrap();

    record(&recorder, async {
        fetcher.fetch_cover("hit").await;
        fetcher.fetch_cover("miss").await;
    });

    let snapshot = snapshotter.snapshot().into_vec();

    // hit: 404 + success; miss: five 404s
    assert_eq!(counter_total(&snapshot, telemetry::COVER_ATTEMPTS_TOTAL), 7);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::COVER_ATTEMPTS_TOTAL, "outcome", "success"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::COVERS_TOTAL, "status", "hit"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::COVERS_TOTAL, "status", "miss"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn board_build_records_duration() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let pipeline = VibePipeline::new(Arc::new(StaticCovers::new().cover("a", DARK_MOODY)));

    let board = record(
        &recorder,
        pipeline.build_board("q", &candidates(&["a", "b"]), 8),
    );
    assert_eq!(board.item_count(), 2);

    let snapshot = snapshotter.snapshot().into_vec();
    assert!(
        has_histogram(&snapshot, telemetry::BOARD_BUILD_DURATION_SECONDS),
        "expected a board build histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn catalog_requests_are_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"artists": []})))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let client = MusicBrainzClient::with_base_url(server.uri()).unwrap();

    let result = record(&recorder, client.search_artists("nobody", 3));
    assert!(result.unwrap().is_empty());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CATALOG_REQUESTS_TOTAL, "endpoint", "artist"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CATALOG_REQUESTS_TOTAL, "status", "ok"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn narrative_requests_record_status_and_duration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let backend = OpenAiBackend::with_base_url("sk", "gpt-4o-mini", server.uri()).unwrap();
    let bridge = NarrativeBridge::with_backend(Arc::new(backend));
    let board = VibeBoard {
        query: "q".into(),
        groups: vec![],
    };

    let result = record(&recorder, bridge.narrate(&board, &NarrativeStyle::Neutral));
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::NARRATIVE_REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::NARRATIVE_REQUESTS_TOTAL, "backend", "openai"),
        1
    );
    assert!(has_histogram(&snapshot, telemetry::NARRATIVE_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cover_search_counts_lookups_by_source() {
    let musicbrainz = MockServer::start().await;
    let archive = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": [{"id": "a1", "name": "Someone"}]
        })))
        .mount(&musicbrainz)
        .await;
    Mock::given(method("GET"))
        .and(path("/release-group"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "release-groups": [{"id": "rg-1", "title": "One"}, {"id": "rg-2", "title": "Two"}]
        })))
        .mount(&musicbrainz)
        .await;
    Mock::given(method("GET"))
        .and(path("/release-group/rg-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [{"front": true, "image": "https://img.test/one.jpg"}]
        })))
        .mount(&archive)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let search = CoverSearch::new(
        MusicBrainzCatalog::new(MusicBrainzClient::with_base_url(musicbrainz.uri()).unwrap()),
        CoverArtFetcher::with_base_url(archive.uri()).unwrap(),
    );

    let response = record(&recorder, search.search(&CoverSearchRequest::new("someone")));
    assert_eq!(response.unwrap().results.len(), 1);

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::COVER_LOOKUPS_TOTAL), 2);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::COVER_LOOKUPS_TOTAL, "status", "hit"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::COVER_LOOKUPS_TOTAL, "status", "miss"),
        1
    );
}

#[tokio::test]
async fn no_recorder_is_a_noop() {
    // Without a recorder installed, metric calls must not panic
    let pipeline = VibePipeline::new(Arc::new(StaticCovers::new()));
    let board = pipeline.build_board("q", &candidates(&["x"]), 8).await;
    assert_eq!(board.item_count(), 1);
}
