use imagegen_form::{
    app::App,
    client::{GenerationService, HttpGenerationClient, MockGenerationClient},
    form::{Completion, GenerationStatus, PromptForm},
    models::{GenerationResponse, HistoryEntry},
    view,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_client(server: &MockServer) -> HttpGenerationClient {
    HttpGenerationClient::new(Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_red_fox_scenario_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate/"))
        .and(body_json(serde_json::json!({ "prompt": "a red fox" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "url": "http://host/fox.png" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut app = App::with_services(Box::new(http_client(&server)));
    assert_eq!(app.view().image_src, None);

    let rendered = app.generate("a red fox").await;

    assert_eq!(rendered.image_src.as_deref(), Some("http://host/fox.png"));
    assert!(rendered
        .to_html()
        .contains("<img src=\"http://host/fox.png\" alt=\"AI Result\"/>"));
}

#[tokio::test]
async fn test_generated_image_fallback_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "generated_image": "Y" }])),
        )
        .mount(&server)
        .await;

    let mut app = App::with_services(Box::new(http_client(&server)));
    let rendered = app.generate("anything").await;

    assert_eq!(rendered.image_src.as_deref(), Some("Y"));
}

#[tokio::test]
async fn test_empty_and_unrecognized_bodies_render_no_image() {
    for body in [serde_json::json!({}), serde_json::json!([])] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let mut app = App::with_services(Box::new(http_client(&server)));
        let rendered = app.generate("a red fox").await;

        assert_eq!(rendered.image_src, None, "body {} rendered an image", body);
        assert_eq!(rendered.error, None);
        assert!(!rendered.to_html().contains("<img"));
    }
}

#[tokio::test]
async fn test_empty_prompt_is_still_submitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate/"))
        .and(body_json(serde_json::json!({ "prompt": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = PromptForm::new();
    let client = http_client(&server);
    let completion = form.on_generate_triggered(&client).await;

    assert_eq!(completion, Completion::Applied);
}

#[tokio::test]
async fn test_server_error_renders_failure_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "error": "model unavailable"
        })))
        .mount(&server)
        .await;

    let mut app = App::with_services(Box::new(http_client(&server)));
    let rendered = app.generate("a red fox").await;

    assert_eq!(rendered.image_src, None);
    let error = rendered.error.expect("failure should be rendered");
    assert!(error.contains("500"));
    assert!(matches!(
        app.form().status(),
        GenerationStatus::Failed { .. }
    ));
}

/// Two overlapping requests: whichever order the responses arrive in, the
/// newer request's image must stay on screen and the older one is dropped.
#[tokio::test]
async fn test_overlapping_requests_latest_issued_wins() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate/"))
        .and(body_json(serde_json::json!({ "prompt": "slow" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "url": "slow.png" }))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate/"))
        .and(body_json(serde_json::json!({ "prompt": "fast" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "url": "fast.png" })),
        )
        .mount(&server)
        .await;

    let client = Arc::new(http_client(&server));
    let mut form = PromptForm::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    for prompt in ["slow", "fast"] {
        form.on_prompt_change(prompt);
        let ticket = form.begin_generation();
        let client = Arc::clone(&client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = client.generate(ticket.prompt()).await;
            let _ = tx.send((ticket, outcome));
        });
    }
    drop(tx);

    let mut completions = Vec::new();
    while let Some((ticket, outcome)) = rx.recv().await {
        completions.push((
            ticket.request_id(),
            ticket.prompt().to_string(),
            form.complete_generation(&ticket, outcome),
        ));
    }
    completions.sort_by_key(|(request_id, _, _)| *request_id);

    assert_eq!(
        completions,
        vec![
            (1, "slow".to_string(), Completion::Stale),
            (2, "fast".to_string(), Completion::Applied),
        ]
    );
    assert_eq!(form.status(), &GenerationStatus::Idle);
    assert_eq!(view::render(&form).image_src.as_deref(), Some("fast.png"));
}

#[tokio::test]
async fn test_history_and_health_through_app() {
    let entry: HistoryEntry = serde_json::from_value(serde_json::json!({
        "id": "0b6a9c1e-4d2f-4e8a-9c3b-1f2e3d4c5b6a",
        "prompt": "a lighthouse at dusk",
        "style": "realistic",
        "image": "/media/generated/generated_1700000000.png",
        "image_url": "http://127.0.0.1:8000/media/generated/generated_1700000000.png",
        "timestamp": "2024-01-15T08:30:00+00:00",
        "generation_time": 12.5,
        "model_used": "local-stable-diffusion"
    }))
    .unwrap();

    let app = App::with_services(Box::new(
        MockGenerationClient::new().with_history_entry(entry),
    ));

    let history = app.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].image_location(),
        Some("http://127.0.0.1:8000/media/generated/generated_1700000000.png")
    );

    let health = app.health().await.unwrap();
    assert!(health.is_healthy());
}

#[tokio::test]
async fn test_write_html_after_generation() {
    let service = MockGenerationClient::new()
        .with_response(GenerationResponse::Url("http://host/fox.png".to_string()));
    let mut app = App::with_services(Box::new(service));
    app.generate("a red fox").await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("form.html");
    app.write_html(&out).unwrap();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("value=\"a red fox\""));
    assert!(html.contains("src=\"http://host/fox.png\""));
}
