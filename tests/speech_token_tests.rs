use difytalk::api::{ApiRequest, route};
use difytalk::core::config::AppConfig;
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        azure_speech_key: Some("speech-key".to_string()),
        azure_speech_region: Some("japaneast".to_string()),
        azure_speech_token_endpoint: Some(server.url("/sts/v1.0/issueToken")),
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn test_missing_speech_key_is_500() {
    let config = AppConfig {
        azure_speech_region: Some("japaneast".to_string()),
        ..AppConfig::default()
    };

    let response = route(&config, &ApiRequest::new("GET", "/api/speech-token")).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.json_body(),
        json!({"error": "AZURE_SPEECH_KEY/REGION missing"})
    );
}

#[tokio::test]
async fn test_missing_region_is_500_without_a_call() {
    let server = MockServer::start_async().await;
    let issue = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).body("tok");
        })
        .await;
    let config = AppConfig {
        azure_speech_region: None,
        ..config_for(&server)
    };

    let response = route(&config, &ApiRequest::new("POST", "/api/speech-token")).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(issue.hits_async().await, 0);
}

#[tokio::test]
async fn test_token_is_issued_for_any_method() {
    let server = MockServer::start_async().await;
    let issue = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/sts/v1.0/issueToken")
                .header("ocp-apim-subscription-key", "speech-key");
            then.status(200).body("eyJ0eXAi.token");
        })
        .await;
    let config = config_for(&server);

    for method in ["GET", "POST"] {
        let response = route(&config, &ApiRequest::new(method, "/api/speech-token")).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.json_body(),
            json!({"token": "eyJ0eXAi.token", "region": "japaneast", "expiresInSec": 540})
        );
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    }

    issue.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_rejected_key_is_500() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/sts/v1.0/issueToken");
            then.status(401).body("Access denied due to invalid subscription key.");
        })
        .await;

    let response = route(
        &config_for(&server),
        &ApiRequest::new("POST", "/api/speech-token"),
    )
    .await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.json_body()["error"], json!("token fail"));
}

#[tokio::test]
async fn test_preflight_is_204() {
    let response = route(
        &AppConfig::default(),
        &ApiRequest::new("OPTIONS", "/api/speech-token"),
    )
    .await;

    assert_eq!(response.status_code, 204);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
}
