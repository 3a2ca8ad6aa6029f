// engine/src/services/candle_service/mod.rs
// Holds the CandleEngine shared by all handlers and wires the routes.
// Each endpoint lives in its own submodule.
use axum::{
    http::StatusCode,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::candles::CandleAggregator;
use crate::config::EngineSettings;
use crate::data::CsvTradeSource;
use crate::error::EngineError;

pub mod get_candle;
pub mod helpers;
pub mod login;
pub mod submit_flag;

// Immutable per-process configuration only; request data never lands here.
#[derive(Clone)]
pub struct CandleEngine {
    aggregator: Arc<CandleAggregator>,
    flag_reply: Arc<str>,
}

impl CandleEngine {
    pub fn new(aggregator: CandleAggregator, flag_reply: impl Into<String>) -> Self {
        CandleEngine {
            aggregator: Arc::new(aggregator),
            flag_reply: Arc::from(flag_reply.into()),
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Result<Self, EngineError> {
        let zone = settings.window_zone()?;
        let source = Arc::new(CsvTradeSource::new(&settings.data_file));
        Ok(CandleEngine::new(
            CandleAggregator::new(source, zone),
            settings.flag_reply.clone(),
        ))
    }

    pub fn aggregator(&self) -> Arc<CandleAggregator> {
        Arc::clone(&self.aggregator)
    }

    pub fn flag_reply(&self) -> &str {
        &self.flag_reply
    }
}

pub fn build_router(engine: CandleEngine, request_timeout: Duration) -> Router {
    Router::new()
        .route("/candle", get(get_candle::handle_get_candle))
        .route("/login", put(login::handle_login))
        .route("/flag", put(submit_flag::handle_submit_flag))
        .with_state(engine)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candles::WindowZone;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use chrono::FixedOffset;
    use serde_json::{json, Value};
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    const DATASET: &str = "\
time,code,price
2021-12-22 10:00:00 +0900 JST,FTHD,9999
2021-12-22 10:02:11 +0900 JST,FTHD,3122
2021-12-22 10:12:03 +0900 JST,FTHD,3177
2021-12-22 10:31:26 +0900 JST,FTHD,2865
bad row,FTHD,0
2021-12-22 10:59:59 +0900 JST,FTHD,2924
2021-12-22 11:00:00 +0900 JST,FTHD,1";

    fn create_dummy_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    fn create_test_router(data_file: &str) -> Router {
        let zone = WindowZone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap());
        let aggregator = CandleAggregator::new(Arc::new(CsvTradeSource::new(data_file)), zone);
        build_router(
            CandleEngine::new(aggregator, "flag{this_is_fake_flag}"),
            Duration::from_secs(5),
        )
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn put_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_candle_success() {
        let tmp_file = create_dummy_csv(DATASET);
        let router = create_test_router(tmp_file.path().to_str().unwrap());
        let (status, body) =
            get_json(router, "/candle?code=FTHD&year=2021&month=12&day=22&hour=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ope": 3122, "close": 2924, "high": 3177, "low": 2865 }));
    }

    #[tokio::test]
    async fn test_candle_invalid_fields() {
        let tmp_file = create_dummy_csv(DATASET);
        let path = tmp_file.path().to_str().unwrap().to_string();
        let cases = [
            ("/candle?code=FTHD&year=abc&month=12&day=22&hour=10", "invalid request: year"),
            ("/candle?code=FTHD&year=2021&month=70000&day=22&hour=10", "invalid request: month"),
            ("/candle?code=FTHD&year=2021&month=12&day=-1&hour=10", "invalid request: day"),
            ("/candle?code=FTHD&year=2021&month=12&day=22", "invalid request: hour"),
            ("/candle?code=FTHD&year=x&month=y&day=z&hour=w", "invalid request: year"),
            ("/candle", "invalid request: year"),
        ];
        for (uri, expected) in cases {
            let (status, body) = get_json(create_test_router(&path), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body, json!({ "message": expected }), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_candle_invalid_input_checked_before_dataset() {
        // The data file does not exist; bad input must still be reported as such
        let router = create_test_router("no/such/order_books.csv");
        let (status, body) =
            get_json(router, "/candle?code=FTHD&year=2021&month=12&day=22&hour=65536").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "invalid request: hour" }));
    }

    #[tokio::test]
    async fn test_candle_calculation_errors() {
        let tmp_file = create_dummy_csv(DATASET);
        let path = tmp_file.path().to_str().unwrap().to_string();
        let cases = [
            (path.as_str(), "/candle?code=NOPE&year=2021&month=12&day=22&hour=10"),
            (path.as_str(), "/candle?code=fthd&year=2021&month=12&day=22&hour=10"),
            (path.as_str(), "/candle?year=2021&month=12&day=22&hour=10"),
            (path.as_str(), "/candle?code=FTHD&year=2021&month=12&day=22&hour=12"),
            ("no/such/order_books.csv", "/candle?code=FTHD&year=2021&month=12&day=22&hour=10"),
        ];
        for (data_file, uri) in cases {
            let (status, body) = get_json(create_test_router(data_file), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body, json!({ "message": "calculation error" }), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_login_returns_sha1_token() {
        let router = create_test_router("unused.csv");
        let request = put_json("/login", r#"{"username":"alice","password":"secret"}"#);
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "token": "be2ce0751d4a56709c4b7a4ba81acc6bf754465e" }));
    }

    #[tokio::test]
    async fn test_login_rejects_unbindable_body() {
        let router = create_test_router("unused.csv");
        let (status, body) = send(router.clone(), put_json("/login", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "message": "invalid request" }));

        let no_content_type = Request::builder()
            .method(Method::PUT)
            .uri("/login")
            .body(Body::from(r#"{"username":"alice","password":"secret"}"#))
            .unwrap();
        let (status, _) = send(router, no_content_type).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    fn put_with(uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(Method::PUT).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_login_empty_body_hashes_empty_credentials() {
        let router = create_test_router("unused.csv");
        for content_type in [None, Some("application/json")] {
            let (status, body) = send(router.clone(), put_with("/login", content_type, "")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                serde_json::from_slice::<Value>(&body).unwrap(),
                json!({ "token": "da39a3ee5e6b4b0d3255bfef95601890afd80709" })
            );
        }
    }

    #[tokio::test]
    async fn test_login_accepts_form_body() {
        let router = create_test_router("unused.csv");
        let request = put_with(
            "/login",
            Some("application/x-www-form-urlencoded"),
            "username=alice&password=secret",
        );
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!({ "token": "be2ce0751d4a56709c4b7a4ba81acc6bf754465e" })
        );
    }

    #[tokio::test]
    async fn test_flag_accepts_empty_and_form_bodies() {
        let router = create_test_router("unused.csv");
        let requests = [
            put_with("/flag", None, ""),
            put_with("/flag", Some("application/x-www-form-urlencoded"), "flag=flag%7Babc%7D"),
        ];
        for request in requests {
            let (status, body) = send(router.clone(), request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(String::from_utf8(body).unwrap(), "flag{this_is_fake_flag}");
        }
    }

    #[tokio::test]
    async fn test_flag_rejects_unsupported_content_type() {
        let router = create_test_router("unused.csv");
        let (status, body) = send(router, put_with("/flag", Some("text/plain"), "flag{abc}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "message": "invalid request" }));
    }

    #[tokio::test]
    async fn test_flag_echo_reply() {
        let router = create_test_router("unused.csv");
        let (status, body) = send(router, put_json("/flag", r#"{"flag":"flag{abc}"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "flag{this_is_fake_flag}");
    }

    #[tokio::test]
    async fn test_flag_rejects_unbindable_body() {
        let router = create_test_router("unused.csv");
        let (status, body) = send(router, put_json("/flag", "[")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "message": "invalid request" }));
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let router = create_test_router("unused.csv");
        let request = Request::builder().uri("/login").body(Body::empty()).unwrap();
        let (status, _) = send(router, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_from_settings_rejects_bad_timezone() {
        let settings = EngineSettings { timezone: "Nowhere/Special".to_string(), ..Default::default() };
        assert!(matches!(CandleEngine::from_settings(&settings), Err(EngineError::ConfigError(_))));
    }
}
