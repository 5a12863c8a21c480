//! ワークフローのシナリオテスト
//!
//! 応答を事前に積んだフェイク生成器で、アップロードから編集までを通しで検証

use headshot_ai::error::{HeadshotError, Result};
use headshot_ai::gemini::ImageGenerator;
use headshot_ai::workflow::{
    Effect, Event, FailedOperation, ImageView, Phase, Workflow, WorkflowSession,
    EDIT_FAILED_MESSAGE, GENERATE_FAILED_MESSAGE,
};
use headshot_ai_common::{find_style, Image, MimeType};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Generate { source: Image, modifier: String },
    Edit { source: Image, instruction: String },
}

/// 呼び出しを記録し、積まれた結果を順に返す
#[derive(Default)]
struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<Image>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGenerator {
    fn with(responses: Vec<Result<Image>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, call: Call) -> Result<Image> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HeadshotError::NoImageProduced))
    }
}

impl ImageGenerator for ScriptedGenerator {
    async fn generate(&self, source: &Image, style_modifier: &str) -> Result<Image> {
        self.next(Call::Generate {
            source: source.clone(),
            modifier: style_modifier.to_string(),
        })
    }

    async fn edit(&self, source: &Image, instruction: &str) -> Result<Image> {
        self.next(Call::Edit {
            source: source.clone(),
            instruction: instruction.to_string(),
        })
    }
}

/// 応答を返さない生成器
struct StalledGenerator;

impl ImageGenerator for StalledGenerator {
    async fn generate(&self, _source: &Image, _style_modifier: &str) -> Result<Image> {
        std::future::pending().await
    }

    async fn edit(&self, _source: &Image, _instruction: &str) -> Result<Image> {
        std::future::pending().await
    }
}

fn img(tag: &[u8]) -> Image {
    Image::new(tag.to_vec(), MimeType::Jpeg)
}

#[tokio::test]
async fn test_full_happy_path() {
    let u = img(b"U");
    let g1 = img(b"G1");
    let g2 = img(b"G2");
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![Ok(g1.clone()), Ok(g2.clone())]));

    workflow.upload_image(b"U".to_vec(), MimeType::Jpeg).unwrap();
    assert_eq!(workflow.session().phase(), Phase::AwaitingStyle);

    let result = workflow.select_style("corporate").await.unwrap().clone();
    assert_eq!(result, g1);
    let session = workflow.session();
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.current_image(), Some(&g1));
    assert_eq!(session.original_image(), Some(&u));
    assert_eq!(session.selected_style().map(|s| s.id), Some("corporate"));

    workflow.request_edit("make smile more natural").await.unwrap();
    let session = workflow.session();
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.current_image(), Some(&g2));
    assert_eq!(session.original_image(), Some(&u));
    assert!(session.pending_prompt().is_none());
    assert!(session.last_error().is_none());

    // 生成は元画像、編集は直前の結果に対して呼ばれる
    let corporate = find_style("corporate").unwrap();
    assert_eq!(
        workflow.generator().calls(),
        vec![
            Call::Generate { source: u, modifier: corporate.prompt_modifier.to_string() },
            Call::Edit { source: g1, instruction: "make smile more natural".into() },
        ]
    );
}

#[tokio::test]
async fn test_generate_failure_returns_to_style_selection() {
    let u = img(b"U");
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![Err(
        HeadshotError::TransportFailure("connection reset".into()),
    )]));
    workflow.upload(u.clone()).unwrap();

    let err = workflow.select_style("tech").await.unwrap_err();
    assert!(matches!(err, HeadshotError::TransportFailure(_)));

    let session = workflow.session();
    assert_eq!(session.phase(), Phase::AwaitingStyle);
    assert_eq!(session.original_image(), Some(&u));
    assert_eq!(session.current_image(), Some(&u));

    let notice = session.last_error().expect("last_error should be set");
    assert_eq!(notice.operation, FailedOperation::Generate);
    assert_eq!(notice.user_message(), GENERATE_FAILED_MESSAGE);
    assert!(notice.detail.contains("connection reset"));
}

#[tokio::test]
async fn test_retry_after_generate_failure_clears_error() {
    let g1 = img(b"G1");
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![
        Err(HeadshotError::NoImageProduced),
        Ok(g1.clone()),
    ]));
    workflow.upload(img(b"U")).unwrap();

    assert!(workflow.select_style("tech").await.is_err());
    workflow.select_style("studio").await.unwrap();

    let session = workflow.session();
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.current_image(), Some(&g1));
    assert!(session.last_error().is_none());
    assert_eq!(session.selected_style().map(|s| s.id), Some("studio"));
}

#[tokio::test]
async fn test_edit_failure_preserves_prior_result() {
    let g1 = img(b"G1");
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![
        Ok(g1.clone()),
        Err(HeadshotError::NoImageProduced),
    ]));
    workflow.upload(img(b"U")).unwrap();
    workflow.select_style("outdoor").await.unwrap();

    let err = workflow.request_edit("  Enhance sharpness ").await.unwrap_err();
    assert!(matches!(err, HeadshotError::NoImageProduced));

    let session = workflow.session();
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.current_image(), Some(&g1));
    assert_eq!(session.pending_prompt(), Some("Enhance sharpness"));
    assert_eq!(
        session.last_error().map(|n| n.user_message()),
        Some(EDIT_FAILED_MESSAGE)
    );
}

#[tokio::test]
async fn test_edits_compound_on_latest_result() {
    let g1 = img(b"G1");
    let g2 = img(b"G2");
    let g3 = img(b"G3");
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![
        Ok(g1.clone()),
        Ok(g2.clone()),
        Ok(g3.clone()),
    ]));
    workflow.upload(img(b"U")).unwrap();
    workflow.select_style("startup").await.unwrap();
    workflow.request_edit("Fix lighting balance").await.unwrap();
    workflow.request_edit("Add a warm cinematic filter").await.unwrap();

    let sources: Vec<Image> = workflow
        .generator()
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Edit { source, .. } => Some(source),
            _ => None,
        })
        .collect();
    assert_eq!(sources, vec![g1, g2]);
    assert_eq!(workflow.session().current_image(), Some(&g3));
}

#[tokio::test]
async fn test_blank_edit_is_rejected_without_call() {
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![Ok(img(b"G1"))]));
    workflow.upload(img(b"U")).unwrap();
    workflow.select_style("corporate").await.unwrap();

    let err = workflow.request_edit("   ").await.unwrap_err();
    assert!(matches!(err, HeadshotError::EmptyInstruction));
    assert_eq!(workflow.generator().calls().len(), 1);
    assert_eq!(workflow.session().phase(), Phase::Ready);
}

#[tokio::test]
async fn test_unknown_style_makes_no_call() {
    let mut workflow = Workflow::new(ScriptedGenerator::default());
    workflow.upload(img(b"U")).unwrap();

    let err = workflow.select_style("vaporwave").await.unwrap_err();
    assert!(matches!(err, HeadshotError::UnknownStyle(_)));
    assert_eq!(workflow.session().phase(), Phase::AwaitingStyle);
    assert!(workflow.generator().calls().is_empty());
}

#[tokio::test]
async fn test_reset_from_ready_clears_everything() {
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![Ok(img(b"G1"))]));
    workflow.upload(img(b"U")).unwrap();
    workflow.select_style("corporate").await.unwrap();

    workflow.reset_session().unwrap();
    let session = workflow.session();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.original_image().is_none());
    assert!(session.current_image().is_none());
    assert!(session.selected_style().is_none());
    assert!(session.last_error().is_none());

    // リセット後は再アップロードできる
    workflow.upload(img(b"U2")).unwrap();
    assert_eq!(workflow.session().phase(), Phase::AwaitingStyle);
}

#[tokio::test]
async fn test_upload_outside_idle_is_rejected() {
    let mut workflow = Workflow::new(ScriptedGenerator::default());
    workflow.upload(img(b"U")).unwrap();

    let err = workflow.upload(img(b"U2")).unwrap_err();
    assert!(matches!(
        err,
        HeadshotError::InvalidTransition { phase: Phase::AwaitingStyle, .. }
    ));
    assert_eq!(workflow.session().original_image(), Some(&img(b"U")));
}

/// リデューサを直接使い、編集中の二重リクエストを確認
#[test]
fn test_no_concurrent_edits_against_reducer() {
    let style = find_style("corporate").unwrap();
    let mut session = WorkflowSession::new();
    session.apply(Event::ImageUploaded(img(b"U"))).unwrap();
    session.apply(Event::StyleChosen(style)).unwrap();
    session.apply(Event::GenerateSucceeded(img(b"G1"))).unwrap();

    let first = session.apply(Event::EditRequested("one".into())).unwrap();
    assert!(matches!(first, Effect::Edit { .. }));

    let second = session.apply(Event::EditRequested("two".into()));
    assert!(matches!(second, Err(HeadshotError::EditInFlight)));
    assert_eq!(session.phase(), Phase::Editing);
    assert_eq!(session.pending_prompt(), Some("one"));
    assert!(session.invariants_hold());
}

/// 任意のイベント列で不変条件が保たれる
#[test]
fn test_invariants_hold_over_event_sequences() {
    let style = find_style("tech").unwrap();
    let events = || {
        vec![
            Event::ImageUploaded(img(b"U")),
            Event::StyleChosen(style),
            Event::GenerateSucceeded(img(b"G")),
            Event::GenerateFailed("x".into()),
            Event::EditRequested("e".into()),
            Event::EditSucceeded(img(b"E")),
            Event::EditFailed("y".into()),
            Event::Reset,
        ]
    };

    // 長さ4までの全列を試す
    let n = events().len();
    let mut stack: Vec<Vec<usize>> = vec![vec![]];
    while let Some(seq) = stack.pop() {
        let mut session = WorkflowSession::new();
        for &i in &seq {
            let _ = session.apply(events().swap_remove(i));
            assert!(session.invariants_hold(), "violated after {:?}", seq);
            if matches!(session.phase(), Phase::Ready | Phase::Editing) {
                assert!(session.current_image().is_some());
            }
        }
        if seq.len() < 4 {
            for i in 0..n {
                let mut next = seq.clone();
                next.push(i);
                stack.push(next);
            }
        }
    }
}

#[tokio::test]
async fn test_compare_view_shows_original() {
    let mut workflow = Workflow::new(ScriptedGenerator::with(vec![Ok(img(b"G1"))]));
    workflow.upload(img(b"U")).unwrap();
    workflow.select_style("studio").await.unwrap();

    let session = workflow.session();
    assert_eq!(session.displayed(ImageView::Original), Some(&img(b"U")));
    assert_eq!(session.displayed(ImageView::Current), Some(&img(b"G1")));
}

#[tokio::test]
async fn test_dropped_request_leaves_session_busy_until_reset() {
    let mut workflow = Workflow::new(StalledGenerator);
    workflow.upload(img(b"U")).unwrap();

    let timed_out =
        tokio::time::timeout(std::time::Duration::from_millis(20), workflow.select_style("tech"))
            .await;
    assert!(timed_out.is_err());
    assert_eq!(workflow.session().phase(), Phase::Generating);
    assert!(workflow.session().phase().is_busy());

    // 生成中のままでは他の操作は受け付けない
    assert!(workflow.upload(img(b"U2")).is_err());

    workflow.reset_session().unwrap();
    assert_eq!(workflow.session().phase(), Phase::Idle);
    workflow.upload(img(b"U2")).unwrap();
}

#[tokio::test]
async fn test_transport_failure_detail_has_no_api_key() {
    use headshot_ai::config::Config;
    use headshot_ai::gemini::GeminiClient;

    let config = Config {
        api_base: "http://127.0.0.1:9/v1beta".into(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let client = GeminiClient::new("SECRET-KEY-123", &config).unwrap();
    let mut workflow = Workflow::new(client);
    workflow.upload(img(b"U")).unwrap();

    assert!(workflow.select_style("corporate").await.is_err());
    let notice = workflow.session().last_error().expect("last_error should be set");
    assert!(!notice.detail.contains("SECRET-KEY-123"));
    assert_eq!(notice.user_message(), GENERATE_FAILED_MESSAGE);
}
