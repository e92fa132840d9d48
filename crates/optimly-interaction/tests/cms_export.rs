use optimly_core::config::WebhookConfig;
use optimly_core::prompt_lab::{LabOutcome, PromptLabData};
use optimly_core::simulation::{LlmModel, Sentiment, SimulationResult};
use optimly_core::variant::{ContentVariant, ContentVariantDraft};
use optimly_interaction::{CmsWebhookClient, WinnerDownload, clipboard_text};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn finished_lab() -> LabOutcome {
    let mut data = PromptLabData {
        brand_name: "Stride".into(),
        query: "comfortable walking shoes".into(),
        ..Default::default()
    };
    data.set_content("Our shoes are comfortable.").unwrap();
    data.variants
        .insert(
            ContentVariant::from_draft(ContentVariantDraft {
                id: Some("v1".into()),
                name: Some("Podiatrist angle".into()),
                content: Some("Recommended by podiatrists.".into()),
                ..Default::default()
            })
            .unwrap(),
        )
        .unwrap();

    data.baseline_results = vec![SimulationResult::new(
        "control",
        LlmModel::ChatGpt,
        false,
        "Several brands exist.",
        0.5,
        Sentiment::Negative,
        true,
    )];
    let winner = SimulationResult::new(
        "v1",
        LlmModel::ChatGpt,
        true,
        "Stride is recommended by podiatrists.",
        0.9,
        Sentiment::Positive,
        false,
    );
    let winner_id = winner.id.clone();
    data.variant_results = vec![winner];
    data.select_winner(LlmModel::ChatGpt, &winner_id).unwrap();

    LabOutcome::build(&data).unwrap()
}

fn client() -> CmsWebhookClient {
    CmsWebhookClient::new(&WebhookConfig::default()).unwrap()
}

#[tokio::test]
async fn test_ship_posts_winner_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/cms"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client();
    let payload = client.payload_for(&finished_lab());
    client
        .ship(&format!("{}/hooks/cms", server.uri()), &payload)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["source"], "optimly-prompt-lab");
    assert!(body["timestamp"].is_string());

    let entry = &body["winning_variants"][0];
    assert_eq!(entry["model"], "chatgpt");
    assert_eq!(entry["variantName"], "Podiatrist angle");
    assert_eq!(entry["content"], "Recommended by podiatrists.");
    assert_eq!(entry["confidenceScore"], 0.9);

    assert_eq!(body["summary"]["total_models"], 1);
    assert_eq!(body["summary"]["winners_selected"], 1);
    assert_eq!(body["summary"]["avg_confidence"], 0.9);
}

#[tokio::test]
async fn test_server_error_still_counts_as_shipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client();
    let payload = client.payload_for(&finished_lab());
    assert!(client.ship(&server.uri(), &payload).await.is_ok());
}

#[tokio::test]
async fn test_transport_failures_are_webhook_errors() {
    let client = client();
    let payload = client.payload_for(&finished_lab());

    let err = client.ship("not a url", &payload).await.unwrap_err();
    assert!(err.is_webhook());

    let err = client
        .ship("http://127.0.0.1:1/unreachable", &payload)
        .await
        .unwrap_err();
    assert!(err.is_webhook());
}

#[test]
fn test_download_and_clipboard() {
    let outcome = finished_lab();
    let comparison = &outcome.comparisons[0];

    let download = WinnerDownload::build(comparison);
    assert_eq!(download.file_name, "optimly-chatgpt-podiatrist-angle.txt");
    assert!(download.contents.starts_with("Model: ChatGPT\nVariant: Podiatrist angle\n"));
    assert!(download.contents.contains("Confidence: 90%"));
    assert!(download.contents.contains("Change vs control: +40 pts"));
    assert!(download.contents.ends_with("Recommended by podiatrists.\n"));

    let dir = tempfile::tempdir().unwrap();
    let saved = download.save_to(dir.path()).unwrap();
    assert_eq!(std::fs::read_to_string(saved).unwrap(), download.contents);

    let control = ContentVariant::control("  keep my spacing  ").unwrap();
    assert_eq!(clipboard_text(&control), "  keep my spacing  ");
}
