//! Catalog Gateway Tests
//!
//! Series, season, episode and media gateways against a mocked catalog API.
//! Covers paths, request bodies, ordering, error bodies and cancellation.

use mockito::{Matcher, Server};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use showdesk::api::{
    classify, user_message, ApiError, EpisodeGateway, FailureKind, Gateway, HttpClient,
    ImageUploader, MediaGateway, SeasonGateway, SeriesGateway,
};
use showdesk::models::{NewEpisode, NewSeason, NewSeries};

// =============================================================================
// Series
// =============================================================================

#[tokio::test]
async fn test_list_series() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": "a1", "title": "The Expanse", "description": "Space", "posterUrl": "http://cdn/e.png"},
                {"id": "b2", "title": "Dark"}
            ]"#,
        )
        .create_async()
        .await;

    let gateway = SeriesGateway::new(HttpClient::new(server.url()));
    let series = gateway.list(&(), &CancellationToken::new()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].title, "The Expanse");
    assert_eq!(series[0].poster_url.as_deref(), Some("http://cdn/e.png"));
    assert_eq!(series[1].description, None);
}

#[tokio::test]
async fn test_create_series_sends_camel_case() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/series")
        .match_body(Matcher::Json(json!({
            "title": "Foo",
            "description": null,
            "posterUrl": "http://cdn/p.png"
        })))
        .with_status(201)
        .with_body(r#"{"id": "new-1", "title": "Foo", "posterUrl": "http://cdn/p.png"}"#)
        .create_async()
        .await;

    let gateway = SeriesGateway::new(HttpClient::new(server.url()));
    let draft = NewSeries {
        title: "Foo".into(),
        description: None,
        poster_url: Some("http://cdn/p.png".into()),
    };
    let created = gateway.create(&(), draft).await.unwrap();

    mock.assert_async().await;
    assert_eq!(created.id, "new-1");
}

// =============================================================================
// Seasons
// =============================================================================

#[tokio::test]
async fn test_list_seasons_sorted_by_number() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series/s1/seasons")
        .with_status(200)
        .with_body(
            r#"[
                {"id": "c", "seriesId": "s1", "number": 3},
                {"id": "a", "seriesId": "s1", "number": 1},
                {"id": "b", "seriesId": "s1", "number": 2}
            ]"#,
        )
        .create_async()
        .await;

    let gateway = SeasonGateway::new(HttpClient::new(server.url()));
    let seasons = gateway
        .list(&"s1".to_string(), &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    let numbers: Vec<u32> = seasons.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_create_season() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/series/s1/seasons")
        .match_body(Matcher::Json(json!({"number": 2})))
        .with_status(201)
        .with_body(r#"{"id": "x", "seriesId": "s1", "number": 2}"#)
        .create_async()
        .await;

    let gateway = SeasonGateway::new(HttpClient::new(server.url()));
    let season = gateway
        .create(&"s1".to_string(), NewSeason { number: 2 })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(season.series_id, "s1");
    assert_eq!(season.number, 2);
}

#[tokio::test]
async fn test_duplicate_season_is_rejected_with_problem_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/series/s1/seasons")
        .with_status(409)
        .with_header("content-type", "application/problem+json")
        .with_body(r#"{"title": "Conflict", "detail": "Season 1 already exists"}"#)
        .create_async()
        .await;

    let gateway = SeasonGateway::new(HttpClient::new(server.url()));
    let err = gateway
        .create(&"s1".to_string(), NewSeason { number: 1 })
        .await
        .unwrap_err();

    assert_eq!(classify(&err), FailureKind::Validation);
    assert_eq!(user_message(&err), "Conflict: Season 1 already exists");
    let api = err.downcast_ref::<ApiError>().unwrap();
    assert_eq!(api.status(), Some(409));
}

// =============================================================================
// Episodes
// =============================================================================

#[tokio::test]
async fn test_create_episode_without_video() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/seasons/se1/episodes")
        .match_body(Matcher::Json(json!({
            "number": 1,
            "title": "Pilot",
            "durationSeconds": 1400,
            "videoUrl": null
        })))
        .with_status(201)
        .with_body(
            r#"{"id": "e1", "seasonId": "se1", "number": 1, "title": "Pilot", "durationSeconds": 1400, "videoUrl": null}"#,
        )
        .create_async()
        .await;

    let gateway = EpisodeGateway::new(HttpClient::new(server.url()));
    let draft = NewEpisode {
        number: 1,
        title: "Pilot".into(),
        duration_seconds: 1400,
        video_url: None,
    };
    let episode = gateway.create(&"se1".to_string(), draft).await.unwrap();

    mock.assert_async().await;
    assert_eq!(episode.title, "Pilot");
    assert_eq!(episode.video_url, None);
}

#[tokio::test]
async fn test_validation_errors_pick_first_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/seasons/se1/episodes")
        .with_status(400)
        .with_body(
            r#"{"title": "One or more validation errors occurred.",
                "errors": {"Title": ["Title is required", "Title is too short"], "Number": ["Must be positive"]}}"#,
        )
        .create_async()
        .await;

    let gateway = EpisodeGateway::new(HttpClient::new(server.url()));
    let draft = NewEpisode {
        number: 1,
        title: " ".into(),
        duration_seconds: 1,
        video_url: None,
    };
    let err = gateway.create(&"se1".to_string(), draft).await.unwrap_err();

    assert_eq!(user_message(&err), "Title is required");
}

#[tokio::test]
async fn test_parent_id_is_path_encoded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/seasons/a%2Fb/episodes")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let gateway = EpisodeGateway::new(HttpClient::new(server.url()));
    let episodes = gateway
        .list(&"a/b".to_string(), &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(episodes.is_empty());
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn test_empty_error_body_reports_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/series")
        .with_status(500)
        .create_async()
        .await;

    let gateway = SeriesGateway::new(HttpClient::new(server.url()));
    let err = gateway.list(&(), &CancellationToken::new()).await.unwrap_err();

    assert_eq!(user_message(&err), "HTTP error 500");
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/series")
        .with_status(502)
        .with_header("content-type", "text/plain")
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let gateway = SeriesGateway::new(HttpClient::new(server.url()));
    let err = gateway.list(&(), &CancellationToken::new()).await.unwrap_err();

    assert_eq!(user_message(&err), "upstream unavailable");
}

#[tokio::test]
async fn test_malformed_success_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/series")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let gateway = SeriesGateway::new(HttpClient::new(server.url()));
    let err = gateway.list(&(), &CancellationToken::new()).await.unwrap_err();

    assert_eq!(classify(&err), FailureKind::Transport);
    assert!(user_message(&err).starts_with("Invalid response"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    // nothing listens on port 9 locally
    let gateway = SeriesGateway::new(HttpClient::new("http://127.0.0.1:9"));
    let err = gateway.list(&(), &CancellationToken::new()).await.unwrap_err();

    assert_eq!(classify(&err), FailureKind::Transport);
    assert!(!user_message(&err).is_empty());
}

#[tokio::test]
async fn test_cancelled_token_skips_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/series/s1/seasons")
        .with_status(200)
        .with_body("[]")
        .expect(0)
        .create_async()
        .await;

    let gateway = SeasonGateway::new(HttpClient::new(server.url()));
    let token = CancellationToken::new();
    token.cancel();
    let err = gateway.list(&"s1".to_string(), &token).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(classify(&err), FailureKind::Cancelled);
}

// =============================================================================
// Media
// =============================================================================

#[tokio::test]
async fn test_upload_poster_multipart() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/media/images")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="poster.png""#.into()),
            Matcher::Regex("(?i)content-type: image/png".into()),
        ]))
        .with_status(201)
        .with_body(r#"{"url": "http://cdn/images/poster.png"}"#)
        .create_async()
        .await;

    let gateway = MediaGateway::new(HttpClient::new(server.url()));
    let url = gateway
        .upload_image("poster.png", b"PNG fake bytes".to_vec())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(url, "http://cdn/images/poster.png");
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type_locally() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/media/images")
        .expect(0)
        .create_async()
        .await;

    let gateway = MediaGateway::new(HttpClient::new(server.url()));
    let err = gateway
        .upload_image("poster.gif", b"GIF89a".to_vec())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.to_string().contains("unsupported image type"));
}
