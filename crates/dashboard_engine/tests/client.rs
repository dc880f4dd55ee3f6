use dashboard_core::{
    CreateJobRequest, ExportFormat, JobType, LogLevel, ParsingState, ReportFilter, ReportStatus,
    Settings, StartParsingRequest,
};
use dashboard_engine::{ApiClient, ApiError, ClientSettings};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    engine_logging::initialize_for_tests();
    let settings = ClientSettings::default().with_base_url(format!("{}/api/v1", server.uri()));
    ApiClient::new(settings).expect("client")
}

#[tokio::test]
async fn status_accepts_the_older_running_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/parsing/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": 4,
            "is_running": true,
            "total_domains": 10,
            "processed_domains": 3,
            "started_at": "2024-05-01T10:00:00"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).parsing().status().await.expect("status");
    assert_eq!(status.session_id, Some(4));
    assert_eq!(status.status, ParsingState::Running);
    assert_eq!(status.processed_domains, 3);
    assert!(status.started_at.is_some());
}

#[tokio::test]
async fn start_posts_the_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/parsing/start"))
        .and(body_json(json!({"batch_size": 20, "force_refresh": false})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"session_id": 9, "message": "started"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = StartParsingRequest {
        batch_size: Some(20),
        force_refresh: false,
    };
    let ack = client_for(&server)
        .parsing()
        .start(&request)
        .await
        .expect("ack");
    assert_eq!(ack.message.as_deref(), Some("started"));
}

#[tokio::test]
async fn error_status_surfaces_the_detail_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/parsing/stop"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "No active parsing session"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).parsing().stop().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 400,
            detail: "No active parsing session".to_string()
        }
    );
}

#[tokio::test]
async fn success_false_in_a_200_body_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/config/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "proxy unreachable"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .config()
        .test(&Settings::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected("proxy unreachable".to_string()));
}

#[tokio::test]
async fn settings_tolerate_nulls_and_old_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api_url": "http://lists.local/domains",
            "gemini_key": null,
            "proxy_host": "proxy.local"
        })))
        .mount(&server)
        .await;

    let settings = client_for(&server).config().get().await.expect("settings");
    assert_eq!(settings.domains_api_url, "http://lists.local/domains");
    assert_eq!(settings.gemini_api_key, "");
    assert_eq!(settings.proxy_http_port, 59100);
}

#[tokio::test]
async fn upload_wraps_domains_in_an_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/config/domains/upload"))
        .and(body_json(json!({"domains": ["a.com", "b.com"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "message": "ok",
            "domains": ["a.com", "b.com"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .config()
        .upload_domains(&["a.com".to_string(), "b.com".to_string()])
        .await
        .expect("upload");
    assert_eq!(outcome.count, 2);
}

#[tokio::test]
async fn create_job_and_stop_with_wait() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scheduler/jobs/cron"))
        .and(body_json(json!({
            "job_id": "morning",
            "cron_expression": "0 9 * * *",
            "job_type": "full_scraping",
            "domains": ["a.com", "b.com"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scheduler/stop"))
        .and(query_param("wait", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "stopped"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = CreateJobRequest {
        job_id: "morning".to_string(),
        cron_expression: "0 9 * * *".to_string(),
        job_type: JobType::FullScraping,
        domains: vec!["a.com".to_string(), "b.com".to_string()],
        batch_size: None,
    };
    client.scheduler().create_job(&request).await.expect("create");
    client.scheduler().stop(true).await.expect("stop");
}

#[tokio::test]
async fn job_actions_keep_spaces_in_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scheduler/jobs/nightly%20run/pause"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "paused"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scheduler/jobs/nightly%20run/resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "resumed"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/scheduler/jobs/nightly%20run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let paused = client.scheduler().pause_job("nightly run").await.expect("pause");
    assert_eq!(paused.message.as_deref(), Some("paused"));
    let resumed = client.scheduler().resume_job("nightly run").await.expect("resume");
    assert_eq!(resumed.message.as_deref(), Some("resumed"));
    client.scheduler().delete_job("nightly run").await.expect("delete");
}

#[tokio::test]
async fn report_filter_becomes_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reports"))
        .and(query_param("domain", "shop"))
        .and(query_param("status", "failed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"domain": "shop.example", "deals_found": 4, "success": false}
        ])))
        .mount(&server)
        .await;

    let filter = ReportFilter {
        domain: "shop".to_string(),
        status: ReportStatus::Failed,
        ..ReportFilter::default()
    };
    let page = client_for(&server)
        .reports()
        .list(&filter)
        .await
        .expect("reports");
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].deals_count, 4);
}

#[tokio::test]
async fn export_stops_past_the_byte_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reports/export"))
        .and(query_param("format", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![b'x'; 64], "text/csv"))
        .mount(&server)
        .await;

    engine_logging::initialize_for_tests();
    let mut settings = ClientSettings::default().with_base_url(format!("{}/api/v1", server.uri()));
    settings.max_export_bytes = 16;
    let client = ApiClient::new(settings).expect("client");
    let err = client
        .reports()
        .export(ExportFormat::Csv, &ReportFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::TooLarge { max_bytes: 16 });

    let client = client_for(&server);
    let bytes = client
        .reports()
        .export(ExportFormat::Csv, &ReportFilter::default())
        .await
        .expect("export");
    assert_eq!(bytes.len(), 64);
}

#[tokio::test]
async fn logs_and_stats_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/logs"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "logs": [
                {"id": 2, "level": "warning", "message": "slow", "timestamp": "not a date"},
                {"id": 1, "level": "TRACE", "message": "?"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/logs/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "by_level": {"INFO": 2, "ERROR": 1}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.logs().list(100).await.expect("logs");
    assert_eq!(page.logs[0].level, LogLevel::Warning);
    assert_eq!(page.logs[0].timestamp, None);
    assert_eq!(page.logs[1].level, LogLevel::Other);

    let stats = client.logs().stats().await.expect("stats");
    assert_eq!(stats.count(LogLevel::Info), 2);
    assert_eq!(stats.count(LogLevel::Warning), 0);
}

#[tokio::test]
async fn external_domains_are_parsed_client_side() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feeds/domains.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "data": ["x.com", " "]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feeds/broken.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let list = client
        .fetch_external_domains(&format!("{}/feeds/domains.json", server.uri()))
        .await
        .expect("domains");
    assert_eq!(list.domains, vec!["x.com".to_string()]);

    let err = client
        .fetch_external_domains(&format!("{}/feeds/broken.json", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::DomainFile(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    engine_logging::initialize_for_tests();
    let settings = ClientSettings::default().with_base_url("http://127.0.0.1:9/api/v1");
    let client = ApiClient::new(settings).expect("client");
    let err = client.health().check().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_) | ApiError::Timeout(_)));
}
