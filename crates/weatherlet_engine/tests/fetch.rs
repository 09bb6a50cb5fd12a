use std::time::Duration;

use weatherlet_engine::{fetch_text, FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client builds")
}

#[tokio::test]
async fn fetcher_returns_body_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("Station Report\nTemp: 72F\n", "text/plain; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings::default());
    let url = format!("{}/report", server.uri());

    let output = fetcher.fetch(&url).await.expect("fetch ok");
    assert_eq!(output.metadata.original_url, url);
    assert_eq!(output.metadata.final_url, output.metadata.original_url);
    assert_eq!(output.metadata.status, 200);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(output.bytes, b"Station Report\nTemp: 72F\n");
}

#[tokio::test]
async fn fetch_text_decodes_declared_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(&b"Temp: 21\xb0C"[..], "text/html; charset=ISO-8859-1"),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings::default());
    let url = format!("{}/latin1", server.uri());

    let fetched = fetch_text(&fetcher, &url).await.expect("fetch ok");
    assert_eq!(fetched.text, "Temp: 21\u{00B0}C");
}

#[tokio::test]
async fn fetch_text_survives_malformed_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mixed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                &b"Temp: 72\xb0F\nHumidity: 40%\n"[..],
                "text/html; charset=utf-8",
            ),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings::default());
    let url = format!("{}/mixed", server.uri());

    let fetched = fetch_text(&fetcher, &url).await.expect("lossy body still fetches");
    assert_eq!(fetched.text, "Temp: 72\u{FFFD}F\nHumidity: 40%\n");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings::default());
    let url = format!("{}/missing", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.http_status(), Some(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = fetcher(settings);
    let url = format!("{}/slow", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert_eq!(err.http_status(), None);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = fetcher(settings);
    let url = format!("{}/large", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_unexpected_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"\x89PNG"[..], "image/png"))
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings::default());
    let url = format!("{}/image", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "image/png".to_string()
        }
    );
}

#[tokio::test]
async fn fetcher_reports_invalid_url() {
    let fetcher = fetcher(FetchSettings::default());
    let err = fetcher.fetch("not a url").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
