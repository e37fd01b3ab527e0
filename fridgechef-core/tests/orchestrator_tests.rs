//! End-to-end runs of the session orchestrator against a fake inference
//! endpoint and a fake camera.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fridgechef_core::ai::prompts::{IDENTIFY_PROMPT_NAME, RECIPES_PROMPT_NAME};
use fridgechef_core::ai::{
    AiClient, AiError, ChatRequest, ChatResponse, FakeAiClient, FakeReply, Usage,
};
use fridgechef_core::capture::{CaptureError, CaptureProvider, FacingMode, FakeCamera};
use fridgechef_core::{
    AppState, CapturedImage, Orchestrator, SessionError, SessionView, FINDING_RECIPES_STATUS,
    IDENTIFYING_STATUS, NO_INGREDIENTS_MESSAGE, NO_RECIPES_MESSAGE,
};

const THREE_RECIPES: &str = r#"{"recipes": [
    {"title": "Spinach Omelette", "description": "Quick and filling", "cookingTime": 10,
     "ingredients": ["2 eggs", "handful of spinach"], "instructions": ["Whisk", "Cook", "Fold"]},
    {"title": "Eggs Florentine", "description": "Brunch classic", "cookingTime": 25,
     "ingredients": ["eggs", "spinach", "toast"], "instructions": ["Poach eggs", "Wilt spinach", "Assemble"]},
    {"title": "Green Shakshuka", "description": "Eggs baked in greens", "cookingTime": 30,
     "ingredients": ["eggs", "spinach", "garlic"], "instructions": ["Saute greens", "Crack eggs in", "Cover and cook"]}
]}"#;

fn photo() -> CapturedImage {
    CapturedImage {
        data: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
        mime_type: "image/jpeg".to_string(),
        width: 640,
        height: 480,
    }
}

fn capturing(client: &Arc<FakeAiClient>) -> Orchestrator {
    let mut orch = Orchestrator::new(client.clone());
    orch.start().unwrap();
    orch
}

#[tokio::test]
async fn test_successful_run_shows_results() {
    let client = Arc::new(
        FakeAiClient::new()
            .with_content(IDENTIFY_PROMPT_NAME, r#"{"ingredients": ["egg", "spinach"]}"#)
            .with_content(RECIPES_PROMPT_NAME, THREE_RECIPES),
    );
    let mut orch = capturing(&client);

    let state = orch.process_image(photo()).await.unwrap();

    assert_eq!(state, AppState::Results);
    let session = orch.session();
    assert_eq!(session.ingredients().to_vec(), vec!["egg", "spinach"]);
    assert_eq!(session.recipes().len(), 3);
    assert!(session.error().is_none());

    // Recipes were requested for exactly the identified ingredients.
    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].0, IDENTIFY_PROMPT_NAME);
    assert_eq!(requests[1].0, RECIPES_PROMPT_NAME);
    assert!(requests[1].1.messages[0].content.contains("egg, spinach"));
}

#[tokio::test]
async fn test_ingredients_are_kept_exactly_as_returned() {
    let client = Arc::new(
        FakeAiClient::new()
            .with_content(
                IDENTIFY_PROMPT_NAME,
                r#"{"ingredients": ["Whole Milk", " eggs", "Whole Milk", "kimchi"]}"#,
            )
            .with_content(RECIPES_PROMPT_NAME, THREE_RECIPES),
    );
    let mut orch = capturing(&client);

    orch.process_image(photo()).await.unwrap();

    assert_eq!(
        orch.session().ingredients().to_vec(),
        vec!["Whole Milk", " eggs", "Whole Milk", "kimchi"]
    );
}

#[tokio::test]
async fn test_no_ingredients_skips_recipe_generation() {
    for reply in [r#"{"ingredients": []}"#, "{}", r#"{"ingredients": null}"#] {
        let client = Arc::new(
            FakeAiClient::new()
                .with_content(IDENTIFY_PROMPT_NAME, reply)
                .with_content(RECIPES_PROMPT_NAME, THREE_RECIPES),
        );
        let mut orch = capturing(&client);

        let state = orch.process_image(photo()).await.unwrap();

        assert_eq!(state, AppState::Error, "{}", reply);
        assert_eq!(orch.session().error(), Some(NO_INGREDIENTS_MESSAGE));
        assert!(NO_INGREDIENTS_MESSAGE.contains("clearer picture"));
        assert_eq!(client.call_count(RECIPES_PROMPT_NAME), 0);
    }
}

#[tokio::test]
async fn test_no_recipes_is_an_error() {
    let client = Arc::new(
        FakeAiClient::new()
            .with_content(IDENTIFY_PROMPT_NAME, r#"{"ingredients": ["tofu"]}"#)
            .with_content(RECIPES_PROMPT_NAME, r#"{"recipes": []}"#),
    );
    let mut orch = capturing(&client);

    let state = orch.process_image(photo()).await.unwrap();

    assert_eq!(state, AppState::Error);
    assert_eq!(orch.session().error(), Some(NO_RECIPES_MESSAGE));
    assert!(NO_RECIPES_MESSAGE.contains("couldn't generate recipes"));
    // No partial results are left behind.
    assert!(orch.session().ingredients().is_empty());
    assert!(orch.session().recipes().is_empty());
}

#[tokio::test]
async fn test_transport_failure_message_is_wrapped() {
    let client = Arc::new(FakeAiClient::new().with_request_error(IDENTIFY_PROMPT_NAME, "timeout"));
    let mut orch = capturing(&client);

    let state = orch.process_image(photo()).await.unwrap();

    assert_eq!(state, AppState::Error);
    let message = orch.session().error().unwrap();
    assert!(message.contains("timeout"), "{}", message);
    assert!(message.starts_with("Failed to identify ingredients."));
    assert_eq!(client.call_count(RECIPES_PROMPT_NAME), 0);
}

#[tokio::test]
async fn test_generation_failures_become_error_state() {
    let cases = [
        FakeReply::ApiError {
            status: 502,
            message: "upstream unavailable".to_string(),
        },
        FakeReply::Content("Sorry, I can't help with that.".to_string()),
        FakeReply::Content(r#"{"recipes": [{"title": "Half a recipe"}]}"#.to_string()),
    ];

    for reply in cases {
        let client = Arc::new(
            FakeAiClient::new()
                .with_content(IDENTIFY_PROMPT_NAME, r#"{"ingredients": ["rice"]}"#)
                .with_reply(RECIPES_PROMPT_NAME, reply.clone()),
        );
        let mut orch = capturing(&client);

        let state = orch.process_image(photo()).await.unwrap();

        assert_eq!(state, AppState::Error, "{:?}", reply);
        assert!(orch
            .session()
            .error()
            .unwrap()
            .starts_with("Failed to generate recipes."));
    }
}

#[tokio::test]
async fn test_malformed_identification_is_a_failure_not_empty() {
    let client = Arc::new(
        FakeAiClient::new().with_content(IDENTIFY_PROMPT_NAME, r#"{"ingredients": "milk"}"#),
    );
    let mut orch = capturing(&client);

    orch.process_image(photo()).await.unwrap();

    let message = orch.session().error().unwrap();
    assert_ne!(message, NO_INGREDIENTS_MESSAGE);
    assert!(message.contains("Failed to parse response"), "{}", message);
}

#[tokio::test]
async fn test_reset_clears_everything() {
    // From Results
    let client = Arc::new(
        FakeAiClient::new()
            .with_content(IDENTIFY_PROMPT_NAME, r#"{"ingredients": ["egg"]}"#)
            .with_content(RECIPES_PROMPT_NAME, THREE_RECIPES),
    );
    let mut orch = capturing(&client);
    orch.process_image(photo()).await.unwrap();
    assert_eq!(orch.state(), AppState::Results);
    let old_id = orch.session().id();

    orch.reset();

    let session = orch.session();
    assert_eq!(session.state(), AppState::Welcome);
    assert!(session.ingredients().is_empty());
    assert!(session.recipes().is_empty());
    assert!(session.error().is_none());
    assert_ne!(session.id(), old_id);

    // From Error
    let client = Arc::new(FakeAiClient::new().with_request_error(IDENTIFY_PROMPT_NAME, "offline"));
    let mut orch = capturing(&client);
    orch.process_image(photo()).await.unwrap();
    assert_eq!(orch.state(), AppState::Error);

    orch.reset();

    assert_eq!(orch.session().view(), SessionView::Welcome);
    assert!(orch.session().error().is_none());
}

#[tokio::test]
async fn test_retry_goes_straight_back_to_capturing() {
    let client = Arc::new(FakeAiClient::new().with_content(IDENTIFY_PROMPT_NAME, "{}"));
    let mut orch = capturing(&client);
    orch.process_image(photo()).await.unwrap();

    orch.retry().unwrap();

    assert_eq!(orch.state(), AppState::Capturing);
    assert!(orch.session().error().is_none());

    // A second attempt runs the pipeline again.
    orch.process_image(photo()).await.unwrap();
    assert_eq!(client.call_count(IDENTIFY_PROMPT_NAME), 2);
}

#[tokio::test]
async fn test_capture_and_process_releases_camera() {
    let client = Arc::new(
        FakeAiClient::new()
            .with_content(IDENTIFY_PROMPT_NAME, r#"{"ingredients": ["egg", "spinach"]}"#)
            .with_content(RECIPES_PROMPT_NAME, THREE_RECIPES),
    );
    let mut orch = capturing(&client);

    let camera = FakeCamera::new(320, 240);
    let handle = camera.handle();
    let mut provider = CaptureProvider::new(camera);
    provider.activate().unwrap();

    let state = orch.capture_and_process(&mut provider).await.unwrap();

    assert_eq!(state, AppState::Results);
    assert_eq!(handle.live_streams(), 0);
    assert!(!provider.is_active());

    let (_, request) = &client.requests()[0];
    assert_eq!(request.messages[0].images[0].mime_type, "image/jpeg");
}

#[tokio::test]
async fn test_camera_permission_denied_stays_on_capture_screen() {
    let client = Arc::new(FakeAiClient::new());
    let mut orch = capturing(&client);

    let camera = FakeCamera::new(320, 240).failing(CaptureError::PermissionDenied);
    let handle = camera.handle();
    let mut provider = CaptureProvider::new(camera);

    assert_eq!(provider.activate(), Err(CaptureError::PermissionDenied));
    assert_eq!(provider.error(), Some(&CaptureError::PermissionDenied));
    assert!(provider
        .error()
        .unwrap()
        .to_string()
        .contains("permissions"));
    assert!(!provider.can_capture());
    assert_eq!(
        handle.open_requests(),
        vec![FacingMode::Environment, FacingMode::Any]
    );

    let err = orch.capture_and_process(&mut provider).await.unwrap_err();

    assert_eq!(err, SessionError::Capture(CaptureError::Disabled));
    assert_eq!(orch.state(), AppState::Capturing);
    assert!(client.requests().is_empty());
}

/// An endpoint that never answers.
struct HangingClient;

#[async_trait]
impl AiClient for HangingClient {
    async fn complete(&self, _prompt_name: &str, _request: ChatRequest) -> Result<ChatResponse, AiError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_abandoned_run_can_be_reset() {
    let mut orch = Orchestrator::new(Arc::new(HangingClient));
    orch.start().unwrap();

    let outcome = tokio::time::timeout(Duration::from_millis(50), orch.process_image(photo())).await;
    assert!(outcome.is_err(), "pipeline should still be waiting on the endpoint");

    assert_eq!(
        orch.session().view(),
        SessionView::Loading {
            status: IDENTIFYING_STATUS
        }
    );

    orch.reset();
    assert_eq!(orch.state(), AppState::Welcome);
    orch.start().unwrap();
    assert_eq!(orch.state(), AppState::Capturing);
}

/// Identifies tofu, then never answers the recipe request.
struct StallsOnRecipes;

#[async_trait]
impl AiClient for StallsOnRecipes {
    async fn complete(&self, prompt_name: &str, _request: ChatRequest) -> Result<ChatResponse, AiError> {
        if prompt_name == IDENTIFY_PROMPT_NAME {
            return Ok(ChatResponse {
                content: r#"{"ingredients": ["tofu"]}"#.to_string(),
                usage: Usage::default(),
            });
        }
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_status_is_observable_during_a_live_run() {
    let mut orch = Orchestrator::new(Arc::new(StallsOnRecipes));
    orch.start().unwrap();
    let mut progress = orch.subscribe();

    let seen = {
        let run = orch.process_image(photo());
        let finding = progress.wait_for(|p| p.status.as_deref() == Some(FINDING_RECIPES_STATUS));

        tokio::select! {
            _ = run => panic!("pipeline should still be waiting on recipes"),
            seen = tokio::time::timeout(Duration::from_secs(5), finding) => {
                seen.expect("status never reached recipes").unwrap().clone()
            }
        }
    };

    assert_eq!(seen.state, AppState::Loading);
    assert_eq!(seen.session_id, orch.session().id());
}

#[tokio::test]
async fn test_final_state_is_published() {
    let client = Arc::new(
        FakeAiClient::new()
            .with_content(IDENTIFY_PROMPT_NAME, r#"{"ingredients": ["egg"]}"#)
            .with_content(RECIPES_PROMPT_NAME, THREE_RECIPES),
    );
    let mut orch = capturing(&client);
    let progress = orch.subscribe();

    orch.process_image(photo()).await.unwrap();

    let last = progress.borrow().clone();
    assert_eq!(last.state, AppState::Results);
    assert_eq!(last.status, None);
}
