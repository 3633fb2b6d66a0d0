//! Integration tests for `DiscoveryClient` using wiremock HTTP mocks.

use std::time::Duration;

use creator_scout::api::{ApiError, DiscoveryClient};
use creator_scout::params::{build_search_params, FilterSelections};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> DiscoveryClient {
    DiscoveryClient::new(base_url, Duration::from_secs(5))
        .expect("client construction should not fail")
}

fn search_body() -> serde_json::Value {
    serde_json::json!({
        "creators": [
            {
                "id": 11,
                "external_id": "ext-1",
                "name": "Alex Rivers",
                "platform": "tiktok",
                "handle": "alexrivers",
                "follower_count": 120_000,
                "engagement_rate": 4.2,
                "niche_tags": ["fitness", "wellness"],
                "estimated_age_range": "40-49",
                "gender": "female",
                "demographic_confidence": "high",
                "engagement_score": 81.0,
                "quality_score": 74.5,
                "relevance_score": 90.0,
                "overall_score": 82.3,
                "tier": "established"
            }
        ],
        "total": 1,
        "db_total": 57,
        "page": 0
    })
}

#[tokio::test]
async fn search_sends_only_defined_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/creators/search"))
        .and(query_param("platform", "tiktok"))
        .and(query_param("min_followers", "1000"))
        .and(query_param("page_size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&server)
        .await;

    let selections = FilterSelections {
        platform: "tiktok".into(),
        niche: String::new(),
        min_followers: Some(1000),
        ..Default::default()
    };
    let params = build_search_params(&selections, false);

    let client = test_client(&server.uri());
    let result = client.search(&params).await.expect("search should succeed");
    assert_eq!(result.total, 1);
    assert_eq!(result.db_total, 57);
    assert_eq!(result.creators[0].id, Some(11));

    // Unset selections must not appear in the query string at all.
    let requests = server.received_requests().await.expect("recording enabled");
    let query = requests[0].url.query().unwrap_or("");
    assert!(query.contains("platform=tiktok"), "query was: {query}");
    assert!(query.contains("min_followers=1000"), "query was: {query}");
    assert!(!query.contains("niche"), "query was: {query}");
    assert!(!query.contains("deep_search"), "query was: {query}");
    assert!(!query.contains("null"), "query was: {query}");
}

#[tokio::test]
async fn deep_search_requests_large_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/creators/search"))
        .and(query_param("page_size", "200"))
        .and(query_param("deep_search", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let params = build_search_params(&FilterSelections::default(), true);
    let client = test_client(&server.uri());
    client
        .search(&params)
        .await
        .expect("deep search should succeed");
}

#[tokio::test]
async fn non_2xx_maps_to_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/creators/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search(&build_search_params(&FilterSelections::default(), false))
        .await
        .expect_err("500 should be an error");

    match err {
        ApiError::Status { code, text } => {
            assert_eq!(code.as_u16(), 500);
            assert_eq!(text, "Internal Server Error");
        }
        other => panic!("expected Status error, got: {other}"),
    }
}

#[tokio::test]
async fn error_body_detail_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/campaigns/3/creators"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"detail": "Creator already in campaign"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .add_creator(3, 11, None)
        .await
        .expect_err("400 should be an error");
    assert!(
        err.message().contains("Creator already in campaign"),
        "message was: {}",
        err.message()
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/creators/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_creator(42)
        .await
        .expect_err("bad body should fail");
    assert!(matches!(err, ApiError::Deserialize { .. }));
}

#[tokio::test]
async fn add_creator_posts_id_and_notes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/campaigns/5/creators"))
        .and(body_json(serde_json::json!({
            "creator_id": 11,
            "notes": "warm lead"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "added"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .add_creator(5, 11, Some("warm lead"))
        .await
        .expect("add should succeed");
}

#[tokio::test]
async fn campaign_endpoints_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 1,
                "name": "Spring Launch",
                "filters_json": {"platform": "tiktok"},
                "created_at": "2026-02-01T10:00:00Z",
                "creator_count": 4
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/campaigns/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "name": "Spring Launch",
            "filters_json": {},
            "created_at": "2026-02-01T10:00:00Z",
            "creators": [
                {
                    "id": 11,
                    "name": "Alex Rivers",
                    "platform": "tiktok",
                    "handle": "alexrivers",
                    "follower_count": 120_000,
                    "engagement_rate": 4.2,
                    "overall_score": 82.3,
                    "notes": "warm lead",
                    "added_at": "2026-02-02T09:30:00Z"
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/campaigns"))
        .and(body_json(serde_json::json!({
            "name": "Summer Push",
            "filters_json": {"niche": "fitness"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 2,
            "name": "Summer Push",
            "filters_json": {"niche": "fitness"},
            "created_at": "2026-03-01T08:00:00Z"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/campaigns/1/creators/11"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "removed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());

    let campaigns = client.list_campaigns().await.expect("list should succeed");
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].creator_count, Some(4));

    let campaign = client.get_campaign(1).await.expect("show should succeed");
    let members = campaign.creators.expect("expanded member list");
    assert_eq!(members[0].notes, "warm lead");

    let created = client
        .create_campaign("Summer Push", serde_json::json!({"niche": "fitness"}))
        .await
        .expect("create should succeed");
    assert_eq!(created.id, 2);

    client
        .remove_creator(1, 11)
        .await
        .expect("remove should succeed");
}

#[tokio::test]
async fn reset_seen_posts_and_parses_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/creators/reset-seen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "message": "Seen history cleared"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client.reset_seen().await.expect("reset should succeed");
    assert_eq!(response.status, "ok");
    assert_eq!(response.message.as_deref(), Some("Seen history cleared"));
}

#[tokio::test]
async fn database_fetch_consumes_db_total() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/creators/database"))
        .and(query_param("page_size", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "creators": [],
            "total": 0,
            "db_total": 4321,
            "page": 0
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let params = creator_scout::model::SearchParams {
        page: Some(0),
        page_size: Some(1),
        ..Default::default()
    };
    let result = client.database(&params).await.expect("fetch should succeed");
    assert_eq!(result.db_total, 4321);
}
