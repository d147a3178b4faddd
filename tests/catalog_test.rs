//! MusicBrainz catalog lookup against a wiremock server.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vibeboard::{Catalog, MusicBrainzCatalog, MusicBrainzClient, QueryRoute, VibeError, route};

async fn catalog(server: &MockServer) -> MusicBrainzCatalog {
    MusicBrainzCatalog::new(MusicBrainzClient::with_base_url(server.uri()).unwrap())
}

fn release_groups(entries: &[(&str, &str)]) -> serde_json::Value {
    json!({
        "release-groups": entries
            .iter()
            .map(|(id, title)| json!({"id": id, "title": title, "primary-type": "Album"}))
            .collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn forced_artist_prefers_exact_name_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .and(query_param("query", "portishead"))
        .and(query_param("fmt", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": [
                {"id": "tribute", "name": "Portishead Tribute Band"},
                {"id": "ph", "name": "Portishead"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/release-group"))
        .and(query_param("artist", "ph"))
        .and(query_param("type", "album|ep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_groups(&[
            ("rg-dummy", "Dummy"),
            ("rg-portishead", "Portishead"),
            ("rg-third", "Third"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let found = catalog(&server)
        .await
        .search("albums by Portishead", 8)
        .await
        .unwrap();

    assert_eq!(found.len(), 3);
    assert_eq!(found[0].id, "rg-dummy");
    assert_eq!(found[0].title, "Dummy");
    assert_eq!(found[0].url, "https://musicbrainz.org/release-group/rg-dummy");
}

#[tokio::test]
async fn results_are_capped_at_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": [{"id": "a1", "name": "Someone"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/release-group"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_groups(&[
            ("1", "One"),
            ("2", "Two"),
            ("3", "Three"),
        ])))
        .mount(&server)
        .await;

    let found = catalog(&server).await.search("someone", 2).await.unwrap();

    let ids: Vec<_> = found.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn genre_query_falls_back_to_tag_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .and(query_param("query", "tag:jazz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": [{"id": "jazz-artist", "name": "Trio"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .and(query_param("query", "late night jazz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"artists": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/release-group"))
        .and(query_param("artist", "jazz-artist"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(release_groups(&[("rg-j", "Blue Hour")])),
        )
        .mount(&server)
        .await;

    let found = catalog(&server)
        .await
        .search("late night jazz", 8)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Blue Hour");
}

#[tokio::test]
async fn no_artist_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"artists": []})))
        .mount(&server)
        .await;

    let found = catalog(&server)
        .await
        .search("zzqx nonexistent", 8)
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn server_error_is_catalog_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = catalog(&server)
        .await
        .search("radiohead", 8)
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::CatalogLookupFailed(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn unreachable_catalog_is_catalog_failure() {
    // Nothing listens on port 9 (discard) in test environments.
    let client = MusicBrainzClient::with_base_url("http://127.0.0.1:9").unwrap();
    let err = MusicBrainzCatalog::new(client)
        .search("radiohead", 8)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "catalog_lookup_failed");
}

#[tokio::test]
async fn releases_for_group_lists_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/release"))
        .and(query_param("release-group", "rg-1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "releases": [{"id": "r1"}, {"id": ""}, {"id": "r2"}]
        })))
        .mount(&server)
        .await;

    let client = MusicBrainzClient::with_base_url(server.uri()).unwrap();
    let ids = client.releases_for_group("rg-1", 10).await.unwrap();

    assert_eq!(ids, vec!["r1", "r2"]);
}

// ============================================================================
// Query routing
// ============================================================================

#[test]
fn routing_cases() {
    assert_eq!(
        route("covers by Boards of Canada"),
        QueryRoute::ForcedArtist("boards of canada".into())
    );
    assert_eq!(route("black metal band covers"), QueryRoute::ForcedTag("metal".into()));
    assert_eq!(route("some punk"), QueryRoute::Tag("punk".into()));
    assert_eq!(route("hip hop classics"), QueryRoute::Tag("hip hop".into()));
    assert_eq!(route("Radiohead"), QueryRoute::Artist("Radiohead".into()));
}

#[test]
fn genre_matching_is_word_bounded() {
    // "popular" does not name pop, "rocket" does not name rock
    assert_eq!(route("popular rocket"), QueryRoute::Artist("popular rocket".into()));
    assert!(!route("Rocket From The Crypt").is_tag());
}

#[test]
fn route_value_and_kind() {
    let routed = route("jazz");
    assert!(routed.is_tag());
    assert_eq!(routed.value(), "jazz");
}

#[tokio::test]
async fn lucene_syntax_in_names_is_escaped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .and(query_param("query", r"sunn o\)\)\)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": [{"id": "sunn", "name": "Sunn O)))"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    // MusicBrainz rejects unbalanced Lucene syntax
    Mock::given(method("GET"))
        .and(path("/artist"))
        .respond_with(ResponseTemplate::new(400))
        .with_priority(10)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/release-group"))
        .and(query_param("artist", "sunn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_groups(&[(
            "rg-monoliths",
            "Monoliths & Dimensions",
        )])))
        .mount(&server)
        .await;

    let found = catalog(&server).await.search("sunn o)))", 5).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "rg-monoliths");
}

#[tokio::test]
async fn tag_queries_keep_field_syntax() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artist"))
        .and(query_param("query", "tag:doom metal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": [{"id": "d1", "name": "Doomed"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MusicBrainzClient::with_base_url(server.uri()).unwrap();
    let artists = client.search_artists_by_tag("doom metal", 5).await.unwrap();

    assert_eq!(artists.len(), 1);
    assert_eq!(artists[0].name, "Doomed");
}
