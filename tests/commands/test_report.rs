//! Tests for the report command

use feedly::commands::report;
use feedly::report::ReportFormat;
use httpmock::prelude::*;
use serde_json::json;

use super::context;

fn mock_app_data(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/applications/5");
        then.status(200).json_body(json!({
            "id": 5, "package_name": "com.deezer.android", "name": "Deezer",
            "created_at": "2024-01-01T00:00:00", "last_scraped": "2024-05-01T10:00:00",
            "nb_reviews": 2
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/applications/5/analytics");
        then.status(200).json_body(json!({
            "average_rating": 3.0,
            "rating_distribution": {"1": 1, "2": 0, "3": 0, "4": 0, "5": 1},
            "sentiments": {"positive": 1, "negative": 1, "neutral": 0}
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/applications/5/comments")
            .query_param("limit", "50");
        then.status(200).json_body(json!([
            {"date": "2024-05-01T10:00:00", "rating": 5, "user": "Ana", "content": "Love it", "sentiment": 0.7},
            {"date": "2024-05-01T09:00:00", "rating": 1, "user": "Bo", "content": "Ads everywhere", "sentiment": -0.6}
        ]));
    })
}

#[tokio::test]
async fn test_report_csv_to_file() {
    let server = MockServer::start_async().await;
    let comments = mock_app_data(&server);
    let (ctx, dir) = context(&server, true);
    let path = dir.path().join("deezer.csv");

    report::run(&ctx, 5, ReportFormat::Csv, Some(&path), Some(50))
        .await
        .unwrap();

    comments.assert();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("date,rating,user,sentiment,sentiment_label,content"));
    assert!(written.contains("Love it"));
    assert!(written.contains("negative"));
}

#[tokio::test]
async fn test_report_output_defaults_extension_from_format() {
    let server = MockServer::start_async().await;
    mock_app_data(&server);
    let (ctx, dir) = context(&server, true);

    let rendered = report::run(&ctx, 5, ReportFormat::Json, Some(&dir.path().join("deezer")), Some(50))
        .await
        .unwrap();

    let written = std::fs::read_to_string(dir.path().join("deezer.json")).unwrap();
    assert_eq!(written, rendered);
}

#[tokio::test]
async fn test_report_markdown_summary() {
    let server = MockServer::start_async().await;
    mock_app_data(&server);
    let (ctx, _dir) = context(&server, true);

    let rendered = report::run(&ctx, 5, ReportFormat::Markdown, None, Some(50))
        .await
        .unwrap();

    assert!(rendered.contains("# Reviews: Deezer (com.deezer.android)"));
    assert!(rendered.contains("- Average rating: 3.0 / 5"));
    assert!(rendered.contains("| Ads everywhere |"));
}

#[tokio::test]
async fn test_report_requires_session() {
    let server = MockServer::start_async().await;
    let (ctx, _dir) = context(&server, false);

    let result = report::run(&ctx, 5, ReportFormat::Json, None, None).await;
    assert!(matches!(result, Err(feedly::Error::NotAuthenticated)));
}
