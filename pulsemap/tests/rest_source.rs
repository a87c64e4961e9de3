use std::time::Duration;

use assert_matches::assert_matches;
use pulsemap::error::PulseError;
use pulsemap::source::{
    DataSourceResolver, DataSourceStatus, FeedOrigin, OutbreakSource, RemoteSourceConfig,
    ResolverConfig, RestSource, StaticSource,
};
use pulsemap::Dashboard;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-anon-key";

fn source(server: &MockServer) -> RestSource {
    RestSource::new(RemoteSourceConfig::new(server.uri(), API_KEY)).unwrap()
}

fn outbreaks() -> Value {
    json!([
        {
            "id": "o-cholera",
            "disease_name": "Cholera",
            "status": "active",
            "severity": "critical",
            "first_reported": "2025-03-10T00:00:00Z",
            "last_updated": "2026-01-30T08:00:00Z",
            "summary": "Large outbreak"
        },
        {
            "id": "o-dengue",
            "disease_name": "Dengue",
            "status": "monitoring",
            "severity": "unheard-of",
            "first_reported": "2025-11-02T00:00:00Z",
            "last_updated": null,
            "summary": null
        }
    ])
}

fn locations() -> Value {
    json!([
        {
            "id": "l-somalia",
            "outbreak_id": "o-cholera",
            "latitude": 2.0469,
            "longitude": 45.3182,
            "country": "Somalia",
            "region": "Banadir",
            "case_count": 35000,
            "severity_score": 0.92,
            "reported_at": "2026-01-29T00:00:00Z"
        },
        {
            "id": "l-kenya",
            "outbreak_id": "o-cholera",
            "latitude": -1.2921,
            "longitude": 36.8219,
            "country": "Kenya",
            "region": null,
            "case_count": 1200,
            "severity_score": 0.6,
            "reported_at": null
        },
        {
            "id": "l-brazil",
            "outbreak_id": "o-dengue",
            "latitude": -14.235,
            "longitude": -51.9253,
            "country": "Brazil",
            "region": null,
            "case_count": 2100000,
            "severity_score": 0.75,
            "reported_at": null
        },
        {
            "id": "l-orphan",
            "outbreak_id": "o-deleted",
            "latitude": 10.0,
            "longitude": 10.0,
            "country": "Nowhere",
            "region": null,
            "case_count": 1,
            "severity_score": 0.1,
            "reported_at": null
        }
    ])
}

fn reports() -> Value {
    json!([
        {
            "id": "r-undated",
            "outbreak_id": "o-dengue",
            "source_type": "news",
            "source_name": "Reuters",
            "title": "Dengue cases rising",
            "url": null,
            "content": null,
            "published_at": null,
            "created_at": "2026-01-31T00:00:00Z"
        },
        {
            "id": "r-old",
            "outbreak_id": "o-cholera",
            "source_type": "who",
            "source_name": "WHO",
            "title": "Cholera situation report",
            "url": "https://example.org/who",
            "content": null,
            "published_at": "2026-01-20T09:00:00Z",
            "created_at": null
        },
        {
            "id": "r-new",
            "outbreak_id": "o-cholera",
            "source_type": "cdc",
            "source_name": "CDC",
            "title": "Travel notice",
            "url": null,
            "content": null,
            "published_at": "2026-01-31T12:00:00Z",
            "created_at": null
        }
    ])
}

async fn mount_table(server: &MockServer, table: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{table}")))
        .and(header("apikey", API_KEY))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_feed_joins(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/outbreaks"))
        .and(query_param("id", r#"in.("o-cholera","o-dengue")"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(outbreaks()))
        .with_priority(1)
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/outbreak_locations"))
        .and(query_param("outbreak_id", r#"in.("o-cholera","o-dengue")"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations()))
        .with_priority(1)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_error(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string("boom"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn feature_rows_are_loaded_with_credentials() {
    let server = MockServer::start().await;
    mount_table(&server, "outbreak_locations", locations()).await;
    mount_table(&server, "outbreaks", outbreaks()).await;

    let rows = source(&server).load_feature_rows().await.unwrap();
    assert_eq!(rows.locations.len(), 4);
    assert_eq!(rows.outbreaks.len(), 2);
    assert_eq!(rows.outbreaks[1].severity, None);
}

#[tokio::test]
async fn live_data_is_projected() {
    let server = MockServer::start().await;
    mount_table(&server, "outbreak_locations", locations()).await;
    mount_table(&server, "outbreaks", outbreaks()).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .and(query_param("order", "published_at.desc.nullslast"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reports()))
        .expect(1)
        .mount(&server)
        .await;
    mount_feed_joins(&server).await;

    let resolver = DataSourceResolver::with_bundled_fallback(source(&server)).unwrap();
    let data = resolver.resolve().await;

    assert_eq!(data.status, DataSourceStatus::Live);
    assert_eq!(data.features.len(), 3);
    assert!(data.features.find_by_outbreak("o-deleted").is_none());

    let somalia = data.features.get("l-somalia").unwrap();
    assert_eq!(somalia.properties.disease_name, "Cholera");
    assert_eq!(somalia.position().lon(), 45.3182);
    assert_eq!(somalia.position().lat(), 2.0469);

    assert_eq!(data.feed_origin, FeedOrigin::Live);
    let ids: Vec<&str> = data.feed.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["r-new", "r-old", "r-undated"]);
    assert_eq!(data.feed[0].location, "Somalia");
    assert_eq!(data.feed[2].location, "Brazil");
    assert_eq!(data.feed[2].severity, None);
}

#[tokio::test]
async fn server_error_degrades_to_static_data() {
    let server = MockServer::start().await;
    mount_error(&server, 500).await;

    let resolver = DataSourceResolver::with_bundled_fallback(source(&server)).unwrap();
    let data = resolver.resolve().await;
    let fallback = StaticSource::bundled().unwrap();

    assert_eq!(data.status, DataSourceStatus::Static);
    assert_eq!(&data.features, fallback.features());
    assert_eq!(data.feed_origin, FeedOrigin::Static);
    assert_eq!(data.feed, fallback.feed());
}

#[tokio::test]
async fn unauthorized_is_remote_unavailable() {
    let server = MockServer::start().await;
    mount_error(&server, 401).await;

    assert_matches!(
        source(&server).load_feed_rows().await,
        Err(PulseError::RemoteUnavailable(_))
    );
}

#[tokio::test]
async fn undecodable_body_is_remote_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    assert_matches!(
        source(&server).load_feature_rows().await,
        Err(PulseError::RemoteUnavailable(_))
    );
}

#[tokio::test]
async fn empty_features_with_live_feed() {
    let server = MockServer::start().await;
    mount_table(&server, "outbreak_locations", json!([])).await;
    mount_table(&server, "outbreaks", json!([])).await;
    mount_table(&server, "reports", reports()).await;
    mount_feed_joins(&server).await;

    let resolver = DataSourceResolver::with_bundled_fallback(source(&server)).unwrap();
    let data = resolver.resolve().await;

    assert_eq!(data.status, DataSourceStatus::Static);
    assert_eq!(&data.features, resolver.fallback().features());
    assert_eq!(data.feed_origin, FeedOrigin::Live);
    assert_eq!(data.feed.len(), 3);
}

#[tokio::test]
async fn empty_report_table_skips_joins() {
    let server = MockServer::start().await;
    mount_table(&server, "reports", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/outbreaks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(outbreaks()))
        .expect(0)
        .mount(&server)
        .await;

    let rows = source(&server).load_feed_rows().await.unwrap();
    assert!(rows.reports.is_empty());
    assert!(rows.outbreaks.is_empty());
}

#[tokio::test]
async fn feed_limit_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/reports"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = RemoteSourceConfig::new(server.uri(), API_KEY).with_feed_limit(5);
    let rows = RestSource::new(config)
        .unwrap()
        .load_feed_rows()
        .await
        .unwrap();
    assert!(rows.reports.is_empty());
}

#[tokio::test]
async fn slow_store_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let resolver = DataSourceResolver::new(
        source(&server),
        StaticSource::bundled().unwrap(),
        ResolverConfig::default().with_timeout(Duration::from_millis(200)),
    );
    let data = resolver.resolve().await;

    assert_eq!(data.status, DataSourceStatus::Static);
    assert_eq!(data.feed_origin, FeedOrigin::Static);
}

#[tokio::test]
async fn dashboard_loads_and_selects_from_feed() {
    let server = MockServer::start().await;
    mount_table(&server, "outbreak_locations", locations()).await;
    mount_table(&server, "outbreaks", outbreaks()).await;
    mount_table(&server, "reports", reports()).await;
    mount_feed_joins(&server).await;

    let resolver = DataSourceResolver::with_bundled_fallback(source(&server)).unwrap();
    let mut dashboard = Dashboard::default();
    dashboard.load(&resolver).await;

    assert_eq!(dashboard.status().label(), "Live Data");
    let outbreak_id = dashboard.visible_feed()[0].outbreak_id.clone();
    let request = dashboard.select_feed_item(&outbreak_id).unwrap();

    let detail = dashboard.detail().unwrap();
    assert_eq!(detail.location, "Banadir, Somalia");
    assert_eq!(detail.cases, "35.0K");
    assert_eq!(request.target.center.lat(), 2.0469);
}
