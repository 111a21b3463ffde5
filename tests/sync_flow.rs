//! End-to-end flows through the facade against the scripted stub session.

use std::time::Duration;

use pagesync::{
    Locator, PageSync, PageSyncError, ReadinessScope, ReplyQuality, Strategy, SyncConfig,
    VerificationSpec, VerificationTier,
};
use pagesync_core_types::{StubElement, StubSession};
use serde_json::{json, Value};

fn fast_config() -> SyncConfig {
    SyncConfig {
        default_timeout: Duration::from_millis(2_000),
        poll_interval: Duration::from_millis(100),
        stability_window: Duration::from_millis(500),
        dom_quiet_cap: Duration::from_millis(1_000),
        framework_idle_timeout: Duration::from_millis(500),
        response_timeout: Duration::from_millis(2_000),
        ..SyncConfig::default()
    }
}

/// A page where every readiness signal settles on the first probe.
fn settle(session: &StubSession) {
    session.script_result("document.readyState", Value::from("complete"));
    session.script_result("jQuery", Value::Bool(true));
    session.script_result("angular", Value::Bool(true));
    session.script_result("__pagesyncProbe)", Value::Bool(true));
    session.script_result("lastMutation", Value::from(60_000));
}

fn sync_over(session: StubSession) -> PageSync {
    PageSync::new(Box::new(session), fast_config())
}

#[tokio::test(start_paused = true)]
async fn menu_navigation_confirms_by_url_before_touching_selectors() {
    let session = StubSession::new();
    settle(&session);
    session.set_url("https://app.example.com/tasks");
    let sync = sync_over(session);

    let spec = VerificationSpec::new()
        .url_path_segment("/tasks")
        .primary(Locator::css("h1.PageHeader_title__old"), "Actions")
        .alternative(Locator::css("[data-page='tasks']"));
    let result = sync
        .navigate_and_verify("https://app.example.com/tasks", &spec)
        .await
        .unwrap();

    assert!(result.confirmed);
    assert_eq!(result.tier, VerificationTier::Url);
}

#[tokio::test(start_paused = true)]
async fn redeployed_markup_still_confirms_through_a_fallback_selector() {
    let session = StubSession::new();
    settle(&session);
    session.set_url("https://app.example.com/#/");
    let fallback = Locator::css("[data-page='analytics']");
    session.insert_elements(fallback.clone(), vec![StubElement::hidden("analytics")]);
    let sync = sync_over(session);

    let spec = VerificationSpec::new()
        .primary(Locator::css("h1.Analytics_title__renamed"), "Analytics")
        .alternative(Locator::css(".Analytics_container__renamed"))
        .alternative(fallback);
    let result = sync.verify(&spec).await.unwrap();

    assert!(result.confirmed);
    assert_eq!(result.tier, VerificationTier::AlternativeElement);
    assert_eq!(result.alternative_index, Some(1));
}

#[tokio::test(start_paused = true)]
async fn chat_round_trip_sends_waits_for_growth_and_judges_the_reply() {
    let session = StubSession::new();
    settle(&session);
    let input = Locator::css("textarea.AIChat_input__hvQzT");
    let send = Locator::css("button.AIChat_submit__ciifR");
    let replies = Locator::css(".AIChat_list__1KKWq li");
    session.insert_elements(input.clone(), vec![StubElement::visible("")]);
    // Native clicks bounce off the send button; the script path lands.
    session.insert_elements(
        send.clone(),
        vec![StubElement::visible("Send").with_native_click_failure()],
    );
    session.insert_elements(replies.clone(), vec![StubElement::visible("question")]);
    session.stage_elements(
        replies.clone(),
        vec![
            StubElement::visible("question"),
            StubElement::visible("The token burn rate doubled last week."),
        ],
        3,
    );
    let sync = sync_over(session);

    let typed = sync.type_text(&input, "How is token usage trending?").await;
    assert!(typed.succeeded);

    let clicked = sync.click(send).await;
    assert!(clicked.succeeded);
    assert_eq!(clicked.strategy, Some(Strategy::ScriptInjected));

    sync.await_growth(&replies, 1).await.unwrap();

    assert_eq!(
        sync.classify_reply("The token burn rate doubled last week."),
        ReplyQuality::Meaningful
    );
}

#[tokio::test(start_paused = true)]
async fn menu_link_under_a_persistent_overlay_is_clicked_through_script() {
    let session = StubSession::new();
    settle(&session);
    let link = Locator::css(".MainMenu_link__ICVs0");
    // The overlay never clears, so the link stays visible but untouchable.
    session.insert_elements(link.clone(), vec![StubElement::obscured("Analytics")]);
    let sync = sync_over(session);

    let outcome = sync.click(link).await;
    assert!(outcome.succeeded);
    assert_eq!(outcome.strategy, Some(Strategy::ScriptInjected));
}

#[tokio::test(start_paused = true)]
async fn failed_agent_replies_are_flagged_not_accepted() {
    let sync = sync_over(StubSession::new());

    assert_eq!(
        sync.classify_reply("\u{af}_(\u{30c4})_/\u{af} something went wrong"),
        ReplyQuality::FailureMarker
    );
    assert_eq!(
        sync.classify_reply("AGENT_FAILED"),
        ReplyQuality::FailureMarker
    );
    assert_eq!(sync.classify_reply("   "), ReplyQuality::Empty);
    assert_eq!(sync.classify_reply("ok"), ReplyQuality::TooShort);
}

#[tokio::test(start_paused = true)]
async fn a_page_stuck_loading_fails_navigation_with_a_readiness_error() {
    let session = StubSession::new();
    session.script_result("document.readyState", Value::from("loading"));
    let sync = sync_over(session);

    let spec = VerificationSpec::new().url_path_segment("/tokens");
    let err = sync
        .navigate_and_verify("https://app.example.com/tokens", &spec)
        .await
        .unwrap_err();
    assert!(matches!(err, PageSyncError::NotReady(_)));
}

#[tokio::test(start_paused = true)]
async fn denied_fetches_recorded_by_the_probe_surface_as_diagnostics() {
    let session = StubSession::new();
    settle(&session);
    session.script_result(
        "denied",
        json!([{ "url": "https://api.example.com/agents", "status": 403, "at": 1_700_000_000_000u64 }]),
    );
    let sync = sync_over(session);

    sync.await_ready(&ReadinessScope::Document).await.unwrap();
    let denied = sync.denied_responses().await;
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].status, 403);
    assert_eq!(denied[0].url, "https://api.example.com/agents");
}

#[tokio::test(start_paused = true)]
async fn loading_indicator_drain_gates_the_response_read() {
    let session = StubSession::new();
    let indicator = Locator::css(".AIChat_service__piLWs");
    session.insert_elements(
        indicator.clone(),
        vec![StubElement::visible("agent is thinking...")],
    );
    session.stage_elements(indicator.clone(), vec![], 2);
    let sync = sync_over(session);

    sync.await_quiescent(&indicator).await.unwrap();
}
