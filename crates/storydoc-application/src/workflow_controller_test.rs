use super::*;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Mutex;
use storydoc_core::{GatewayError, GenerationResponse};

// Mock upload gateway: records every call and fails the configured files,
// either with a rejected status or as if the service were down
#[derive(Default)]
struct MockUploadGateway {
    calls: Mutex<Vec<(UploadChannel, String)>>,
    failing: Mutex<HashSet<String>>,
    unreachable: Mutex<HashSet<String>>,
}

impl MockUploadGateway {
    fn failing(names: &[&str]) -> Self {
        let gateway = Self::default();
        gateway
            .failing
            .lock()
            .unwrap()
            .extend(names.iter().map(|name| name.to_string()));
        gateway
    }

    fn unreachable_for(names: &[&str]) -> Self {
        let gateway = Self::default();
        gateway
            .unreachable
            .lock()
            .unwrap()
            .extend(names.iter().map(|name| name.to_string()));
        gateway
    }

    fn calls(&self) -> Vec<(UploadChannel, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn heal(&self) {
        self.failing.lock().unwrap().clear();
        self.unreachable.lock().unwrap().clear();
    }
}

#[async_trait]
impl UploadGateway for MockUploadGateway {
    async fn upload(&self, channel: UploadChannel, file: &FileRef) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((channel, file.name().to_string()));
        if self.unreachable.lock().unwrap().contains(file.name()) {
            Err(GatewayError::unreachable("connection refused"))
        } else if self.failing.lock().unwrap().contains(file.name()) {
            Err(GatewayError::status(500, "upload rejected"))
        } else {
            Ok(())
        }
    }
}

// Mock generation gateway: replays a fixed answer and records user names
struct MockGenerationGateway {
    answer: Mutex<Result<GenerationResponse, GatewayError>>,
    calls: Mutex<Vec<String>>,
}

impl MockGenerationGateway {
    fn answering(answer: Result<GenerationResponse, GatewayError>) -> Self {
        Self {
            answer: Mutex::new(answer),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn set_answer(&self, answer: Result<GenerationResponse, GatewayError>) {
        *self.answer.lock().unwrap() = answer;
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationGateway for MockGenerationGateway {
    async fn generate(&self, user_name: &str) -> Result<GenerationResponse, GatewayError> {
        self.calls.lock().unwrap().push(user_name.to_string());
        self.answer.lock().unwrap().clone()
    }
}

// Observer that keeps every event
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<WorkflowEvent>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl WorkflowObserver for RecordingObserver {
    fn notify(&self, event: &WorkflowEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

struct Fixture {
    controller: WorkflowController,
    uploads: Arc<MockUploadGateway>,
    generator: Arc<MockGenerationGateway>,
    observer: Arc<RecordingObserver>,
}

fn fixture_with(
    uploads: MockUploadGateway,
    answer: Result<GenerationResponse, GatewayError>,
) -> Fixture {
    let uploads = Arc::new(uploads);
    let generator = Arc::new(MockGenerationGateway::answering(answer));
    let observer = Arc::new(RecordingObserver::default());
    let controller = WorkflowController::new(
        Session::with_id("test-session"),
        uploads.clone(),
        generator.clone(),
    )
    .with_observer(observer.clone());
    Fixture {
        controller,
        uploads,
        generator,
        observer,
    }
}

fn fixture() -> Fixture {
    fixture_with(
        MockUploadGateway::default(),
        Ok(GenerationResponse::ok("Hello doc")),
    )
}

fn story(name: &str) -> FileRef {
    FileRef::new(name, "text/markdown", format!("story {name}").into_bytes())
}

fn stories(names: &[&str]) -> Vec<FileRef> {
    names.iter().map(|name| story(name)).collect()
}

fn schema() -> FileRef {
    FileRef::new("db.sql", "application/sql", b"CREATE TABLE users (id int);".to_vec())
}

fn timestamp_pattern() -> Regex {
    Regex::new(r"^generated_output_\d{8}_\d{6}\.txt$").unwrap()
}

#[tokio::test]
async fn test_reselecting_unchanged_stories_is_noop() {
    let mut f = fixture();
    let report = f
        .controller
        .on_user_stories_selected(stories(&["a.md", "b.md"]))
        .await
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(f.uploads.call_count(), 2);

    for _ in 0..3 {
        let again = f
            .controller
            .on_user_stories_selected(stories(&["a.md", "b.md"]))
            .await;
        assert!(again.is_none());
    }
    assert_eq!(f.uploads.call_count(), 2);
    assert!(f.controller.session().user_stories_uploaded);
}

#[tokio::test]
async fn test_reselecting_unchanged_schema_is_noop() {
    let mut f = fixture();
    assert!(f.controller.on_schema_selected(schema()).await.is_some());
    assert!(f.controller.on_schema_selected(schema()).await.is_none());
    assert_eq!(f.uploads.call_count(), 1);
}

#[tokio::test]
async fn test_empty_selection_is_noop() {
    let mut f = fixture();
    assert!(f.controller.on_user_stories_selected(Vec::new()).await.is_none());
    assert_eq!(f.uploads.call_count(), 0);
    assert!(f.observer.events().is_empty());
}

#[tokio::test]
async fn test_failure_at_file_k_stops_after_k_calls() {
    let names = ["s1.md", "s2.md", "s3.md", "s4.md"];
    for (k, failing) in names.iter().enumerate() {
        let mut f = fixture_with(
            MockUploadGateway::failing(&[*failing]),
            Ok(GenerationResponse::ok("unused")),
        );
        let report = f
            .controller
            .on_user_stories_selected(stories(&names))
            .await
            .unwrap();

        assert_eq!(f.uploads.call_count(), k + 1, "failing file #{}", k + 1);
        assert_eq!(report.attempted(), k + 1);
        assert_eq!(report.skipped(), names.len() - (k + 1));
        assert_eq!(report.failure().unwrap().filename, *failing);
        assert!(!f.controller.session().user_stories_uploaded);
    }
}

#[tokio::test]
async fn test_full_batch_uploads_in_selection_order() {
    let mut f = fixture();
    let report = f
        .controller
        .on_user_stories_selected(stories(&["c.md", "a.txt", "b.json"]))
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(
        f.uploads.calls(),
        vec![
            (UploadChannel::UserStories, "c.md".to_string()),
            (UploadChannel::UserStories, "a.txt".to_string()),
            (UploadChannel::UserStories, "b.json".to_string()),
        ]
    );
    assert!(f.controller.session().user_stories_uploaded);
    assert_eq!(
        f.controller.view().user_stories,
        storydoc_core::UploadStatus::Processed
    );
}

#[tokio::test]
async fn test_flag_set_only_after_last_file_succeeds() {
    let mut f = fixture();
    f.controller
        .on_user_stories_selected(stories(&["a.md", "b.md"]))
        .await;

    let events = f.observer.events();
    let completed_at = events
        .iter()
        .position(|e| matches!(e, WorkflowEvent::BatchCompleted { .. }))
        .unwrap();
    let last_progress = events
        .iter()
        .rposition(|e| matches!(e, WorkflowEvent::Progress { .. }))
        .unwrap();
    assert!(completed_at > last_progress);
    assert!(matches!(
        events[last_progress],
        WorkflowEvent::Progress {
            completed: 2,
            total: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn test_batch_events() {
    let mut f = fixture_with(
        MockUploadGateway::failing(&["b.md"]),
        Ok(GenerationResponse::ok("unused")),
    );
    f.controller
        .on_user_stories_selected(stories(&["a.md", "b.md", "c.md"]))
        .await;

    let channel = UploadChannel::UserStories;
    assert_eq!(
        f.observer.events(),
        vec![
            WorkflowEvent::UploadStarted { channel, total: 3 },
            WorkflowEvent::FileUploaded {
                channel,
                filename: "a.md".to_string()
            },
            WorkflowEvent::Progress {
                channel,
                completed: 1,
                total: 3
            },
            WorkflowEvent::FileUploadFailed {
                channel,
                filename: "b.md".to_string(),
                detail: "service returned status 500: upload rejected".to_string()
            },
            WorkflowEvent::BatchAborted {
                channel,
                filename: "b.md".to_string(),
                skipped: 1
            },
        ]
    );
}

#[tokio::test]
async fn test_new_selection_resets_flag_before_uploading() {
    let mut f = fixture();
    f.controller.on_user_stories_selected(stories(&["a.md"])).await;
    assert!(f.controller.session().user_stories_uploaded);

    f.uploads.failing.lock().unwrap().insert("b.md".to_string());
    f.controller.on_user_stories_selected(stories(&["b.md"])).await;
    assert!(!f.controller.session().user_stories_uploaded);
    assert_eq!(f.controller.session().user_stories_selection, stories(&["b.md"]));
}

#[tokio::test]
async fn test_failed_selection_is_still_cached_and_resubmit_retries() {
    let mut f = fixture_with(
        MockUploadGateway::failing(&["a.md"]),
        Ok(GenerationResponse::ok("unused")),
    );
    f.controller.on_user_stories_selected(stories(&["a.md"])).await;
    assert!(!f.controller.session().user_stories_uploaded);

    // Same files again: still treated as unchanged
    assert!(f
        .controller
        .on_user_stories_selected(stories(&["a.md"]))
        .await
        .is_none());
    assert_eq!(f.uploads.call_count(), 1);

    f.uploads.heal();
    let report = f.controller.resubmit_user_stories().await.unwrap();
    assert!(report.is_complete());
    assert_eq!(f.uploads.call_count(), 2);
    assert!(f.controller.session().user_stories_uploaded);
}

#[tokio::test]
async fn test_resubmit_without_selection() {
    let mut f = fixture();
    assert!(f.controller.resubmit_user_stories().await.is_none());
    assert!(f.controller.resubmit_schema().await.is_none());
    assert_eq!(f.uploads.call_count(), 0);
}

#[tokio::test]
async fn test_schema_failure_keeps_flag_false_without_retry() {
    let mut f = fixture_with(
        MockUploadGateway::failing(&["db.sql"]),
        Ok(GenerationResponse::ok("unused")),
    );
    let report = f.controller.on_schema_selected(schema()).await.unwrap();
    assert!(!report.is_complete());
    assert_eq!(
        f.uploads.calls(),
        vec![(UploadChannel::DatabaseSchema, "db.sql".to_string())]
    );
    assert!(!f.controller.session().schema_uploaded);

    f.uploads.heal();
    f.controller.resubmit_schema().await.unwrap();
    assert!(f.controller.session().schema_uploaded);
}

#[tokio::test]
async fn test_generate_trigger_requires_both_flags() {
    for (stories_ok, schema_ok) in [(false, false), (true, false), (false, true), (true, true)] {
        let mut f = fixture();
        if stories_ok {
            f.controller.on_user_stories_selected(stories(&["a.md"])).await;
        }
        if schema_ok {
            f.controller.on_schema_selected(schema()).await;
        }
        assert_eq!(f.controller.view().generate_enabled, stories_ok && schema_ok);
        assert_eq!(
            f.controller.generate_trigger().is_some(),
            stories_ok && schema_ok
        );
    }
}

#[tokio::test]
async fn test_generate_with_disposition_filename() {
    let mut f = fixture_with(
        MockUploadGateway::default(),
        Ok(GenerationResponse::ok("Generated text")
            .with_disposition(r#"attachment; filename="out.txt""#)),
    );
    f.controller.set_user_name("Ada");
    f.controller.on_user_stories_selected(stories(&["a.md"])).await;
    f.controller.on_schema_selected(schema()).await;

    let document = f.controller.generate_trigger().unwrap().fire().await.unwrap();
    assert_eq!(document.filename, "out.txt");
    assert_eq!(document.content, "Generated text");
    assert_eq!(f.generator.calls(), vec!["Ada".to_string()]);
    assert_eq!(f.controller.session().generated.as_ref(), Some(&document));
}

#[tokio::test]
async fn test_generate_without_disposition_synthesizes_filename() {
    let mut f = fixture();
    f.controller.on_user_stories_selected(stories(&["a.md"])).await;
    f.controller.on_schema_selected(schema()).await;

    let document = f.controller.generate_trigger().unwrap().fire().await.unwrap();
    assert!(timestamp_pattern().is_match(&document.filename), "{}", document.filename);
}

#[tokio::test]
async fn test_generate_malformed_disposition_falls_back() {
    let mut f = fixture_with(
        MockUploadGateway::default(),
        Ok(GenerationResponse::ok("text").with_disposition("attachment")),
    );
    f.controller.on_user_stories_selected(stories(&["a.md"])).await;
    f.controller.on_schema_selected(schema()).await;

    let document = f.controller.generate_trigger().unwrap().fire().await.unwrap();
    assert!(timestamp_pattern().is_match(&document.filename));
}

async fn generate_error(answer: Result<GenerationResponse, GatewayError>) -> (Fixture, GenerationError) {
    let mut f = fixture_with(MockUploadGateway::default(), answer);
    f.controller.on_user_stories_selected(stories(&["a.md"])).await;
    f.controller.on_schema_selected(schema()).await;
    let err = f.controller.generate_trigger().unwrap().fire().await.unwrap_err();
    (f, err)
}

#[tokio::test]
async fn test_generate_server_error_differs_from_connectivity_failure() {
    let server_error = GenerationResponse {
        status: 500,
        body: "internal error".to_string(),
        content_disposition: None,
    };
    let (f, rejected) = generate_error(Ok(server_error)).await;
    assert!(f.controller.session().generated.is_none());
    assert!(matches!(rejected, GenerationError::Rejected { status: 500, .. }));

    let (f, unreachable) =
        generate_error(Err(GatewayError::unreachable("connection refused"))).await;
    assert!(f.controller.session().generated.is_none());
    assert!(matches!(unreachable, GenerationError::Unreachable { .. }));

    assert_ne!(rejected.to_string(), unreachable.to_string());
    assert!(unreachable.to_string().contains("Could not connect"));
}

#[tokio::test]
async fn test_generate_malformed_response_is_generation_failure() {
    let (f, err) = generate_error(Err(GatewayError::Malformed("bad body".into()))).await;
    assert!(matches!(err, GenerationError::Unexpected { .. }));
    assert!(f.controller.session().generated.is_none());
    assert!(f.observer.events().iter().any(|e| matches!(e, WorkflowEvent::GenerationFailed { .. })));
}

#[tokio::test]
async fn test_failed_generation_clears_previous_document_and_stays_available() {
    let mut f = fixture();
    f.controller.on_user_stories_selected(stories(&["a.md"])).await;
    f.controller.on_schema_selected(schema()).await;
    f.controller.generate_trigger().unwrap().fire().await.unwrap();
    assert!(f.controller.session().generated.is_some());

    f.generator
        .set_answer(Err(GatewayError::unreachable("connection refused")));
    assert!(f.controller.generate_trigger().unwrap().fire().await.is_err());
    assert!(f.controller.session().generated.is_none());
    assert!(f.controller.generate_trigger().is_some());
    assert_eq!(f.controller.activity(), Activity::Idle);
    assert_eq!(f.generator.calls().len(), 2);
}

#[tokio::test]
async fn test_scenario_two_stories_schema_generate() {
    let mut f = fixture();

    let report = f
        .controller
        .on_user_stories_selected(stories(&["login.md", "signup.md"]))
        .await
        .unwrap();
    assert!(report.is_complete());
    assert!(f.controller.session().user_stories_uploaded);

    f.controller.on_schema_selected(schema()).await.unwrap();
    assert!(f.controller.session().schema_uploaded);

    let document = f.controller.generate_trigger().unwrap().fire().await.unwrap();
    assert_eq!(document.content, "Hello doc");
    assert_eq!(f.controller.session().generated_content(), Some("Hello doc"));
    assert!(timestamp_pattern().is_match(&document.filename));
    assert_eq!(f.generator.calls().len(), 1);
}

#[tokio::test]
async fn test_scenario_second_of_three_fails_keeps_generate_disabled() {
    let mut f = fixture_with(
        MockUploadGateway::failing(&["s2.md"]),
        Ok(GenerationResponse::ok("unused")),
    );
    f.controller.on_schema_selected(schema()).await.unwrap();
    assert!(f.controller.session().schema_uploaded);

    f.controller
        .on_user_stories_selected(stories(&["s1.md", "s2.md", "s3.md"]))
        .await
        .unwrap();

    let story_calls = f
        .uploads
        .calls()
        .into_iter()
        .filter(|(channel, _)| *channel == UploadChannel::UserStories)
        .count();
    assert_eq!(story_calls, 2);
    assert!(!f.controller.session().user_stories_uploaded);
    assert!(f.controller.generate_trigger().is_none());
    assert!(!f.controller.view().generate_enabled);
    assert!(f.generator.calls().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_aborts_story_batch() {
    let mut f = fixture_with(
        MockUploadGateway::unreachable_for(&["b.md"]),
        Ok(GenerationResponse::ok("unused")),
    );
    let report = f
        .controller
        .on_user_stories_selected(stories(&["a.md", "b.md", "c.md"]))
        .await
        .unwrap();

    assert_eq!(f.uploads.call_count(), 2);
    assert_eq!(report.skipped(), 1);
    assert!(!f.controller.session().user_stories_uploaded);

    let detail = f
        .observer
        .events()
        .into_iter()
        .find_map(|event| match event {
            WorkflowEvent::FileUploadFailed {
                filename, detail, ..
            } if filename == "b.md" => Some(detail),
            _ => None,
        })
        .unwrap();
    assert!(detail.contains("could not reach service"), "got {detail}");
    assert!(
        report
            .failure()
            .unwrap()
            .error_detail
            .as_deref()
            .unwrap()
            .contains("could not reach service")
    );
}

#[tokio::test]
async fn test_unreachable_service_leaves_schema_pending() {
    let mut f = fixture_with(
        MockUploadGateway::unreachable_for(&["db.sql"]),
        Ok(GenerationResponse::ok("unused")),
    );
    f.controller
        .on_user_stories_selected(stories(&["a.md"]))
        .await;
    let report = f.controller.on_schema_selected(schema()).await.unwrap();

    assert!(!report.is_complete());
    assert!(!f.controller.session().schema_uploaded);
    assert!(f.controller.generate_trigger().is_none());

    f.uploads.heal();
    f.controller.resubmit_schema().await.unwrap();
    assert!(f.controller.generate_trigger().is_some());
}
