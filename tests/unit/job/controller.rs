use super::*;
use crate::config::Typography;
use crate::foundation::core::Canvas;
use crate::render::raster::{EncodedImage, LinearGradient, Rasterizer, TextRun};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::Instant;

struct Stub {
    fail: bool,
}

impl Rasterizer for Stub {
    fn begin(&mut self, _canvas: Canvas) -> AnimegenResult<()> {
        Ok(())
    }

    fn paint_gradient(&mut self, _gradient: &LinearGradient) -> AnimegenResult<()> {
        Ok(())
    }

    fn draw_text(&mut self, _run: &TextRun) -> AnimegenResult<()> {
        if self.fail {
            return Err(AnimegenError::render_unavailable("no usable font"));
        }
        Ok(())
    }

    fn encode(&mut self) -> AnimegenResult<EncodedImage> {
        Ok(EncodedImage {
            mime_type: "image/png",
            width: 1280,
            height: 720,
            bytes: vec![1, 2, 3],
        })
    }
}

fn controller(fail: bool) -> JobController {
    let cfg = GeneratorConfig::default();
    let renderer = PlaceholderRenderer::new(
        StyleCatalog::builtin(),
        cfg.canvas,
        Typography::default(),
        Box::new(Stub { fail }),
    );
    JobController::with_renderer(&cfg, renderer).unwrap()
}

async fn drain_until_settled(rx: &mut broadcast::Receiver<JobEvent>) -> Vec<JobEvent> {
    let mut out = Vec::new();
    loop {
        let ev = rx.recv().await.unwrap();
        let done = matches!(ev, JobEvent::Completed { .. } | JobEvent::Failed { .. });
        out.push(ev);
        if done {
            return out;
        }
    }
}

fn progress_values(events: &[JobEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            JobEvent::Progress { progress, .. } => Some(*progress),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn runs_to_completion_with_monotonic_progress() {
    let c = controller(false);
    let mut rx = c.subscribe();
    let t0 = Instant::now();

    let outcome = c.submit("Hero powering up", "cyberpunk", 5, 24).unwrap();
    assert_eq!(outcome, StartOutcome::Started { epoch: 1 });
    assert_eq!(c.state(), JobState::Running { progress: 0 });

    let events = drain_until_settled(&mut rx).await;
    assert_eq!(t0.elapsed(), Duration::from_secs(5));
    assert_eq!(events[0], JobEvent::Started { epoch: 1 });
    assert_eq!(progress_values(&events), (0..=100).collect::<Vec<u8>>());

    let Some(JobEvent::Completed { epoch, artifact }) = events.last() else {
        panic!("expected completion, got {:?}", events.last());
    };
    assert_eq!(*epoch, 1);
    assert_eq!(artifact.metrics().total_frames, 120);
    assert_eq!(artifact.style_id(), "cyberpunk");
    assert_eq!(artifact.overlay().timing_line, "5s @ 24fps");

    let state = c.state();
    assert_eq!(state.progress(), 100);
    assert_eq!(state.artifact(), Some(artifact));
}

#[tokio::test(start_paused = true)]
async fn blank_prompt_is_ignored() {
    let c = controller(false);
    let mut rx = c.subscribe();

    assert_eq!(
        c.submit("   \t", "shonen", 5, 24).unwrap(),
        StartOutcome::IgnoredBlankPrompt
    );
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(c.state().is_idle());
    assert_eq!(c.epoch(), 0);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn invalid_inputs_are_rejected_before_starting() {
    let c = controller(false);
    assert!(c.submit("x", "shonen", 2, 24).is_err());
    assert!(c.submit("x", "shonen", 5, 25).is_err());
    assert!(c.state().is_idle());
}

#[tokio::test(start_paused = true)]
async fn second_start_while_running_is_ignored() {
    let c = controller(false);
    c.start(GenerationRequest::with_defaults("first"));
    tokio::time::sleep(Duration::from_millis(500)).await;

    let outcome = c.start(GenerationRequest::with_defaults("second"));
    assert_eq!(outcome, StartOutcome::IgnoredBusy);
    assert_eq!(c.epoch(), 1);

    let JobState::Completed { artifact } = c.settled().await else {
        panic!("job did not complete");
    };
    assert_eq!(artifact.overlay().prompt, "first");
}

#[tokio::test(start_paused = true)]
async fn reset_before_completion_suppresses_everything() {
    let c = controller(false);
    let mut rx = c.subscribe();
    c.start(GenerationRequest::with_defaults("abort me"));
    tokio::time::sleep(Duration::from_millis(1_010)).await;

    assert!(c.reset());
    assert!(c.state().is_idle());
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(c.state().is_idle());

    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    let reset_at = events
        .iter()
        .position(|e| matches!(e, JobEvent::Reset { .. }))
        .expect("reset event");
    assert_eq!(reset_at, events.len() - 1);
    assert_eq!(*progress_values(&events).last().unwrap(), 20);
    assert!(!events.iter().any(|e| matches!(e, JobEvent::Completed { .. })));
}

#[tokio::test(start_paused = true)]
async fn stale_completion_does_not_finish_a_newer_job() {
    let c = controller(false);
    c.start(GenerationRequest::with_defaults("old"));
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(c.reset());

    let restarted = Instant::now();
    let StartOutcome::Started { epoch } = c.start(GenerationRequest::with_defaults("new")) else {
        panic!("restart refused");
    };
    assert_eq!(epoch, 3);

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(c.state().is_running());

    let JobState::Completed { artifact } = c.settled().await else {
        panic!("job did not complete");
    };
    assert_eq!(restarted.elapsed(), Duration::from_secs(5));
    assert_eq!(artifact.overlay().prompt, "new");
}

#[tokio::test(start_paused = true)]
async fn starting_from_completed_discards_previous_artifact() {
    let c = controller(false);
    c.start(GenerationRequest::with_defaults("one"));
    assert!(c.settled().await.artifact().is_some());

    let mut rx = c.subscribe();
    let outcome = c.start(GenerationRequest::with_defaults("two"));
    assert_eq!(outcome, StartOutcome::Started { epoch: 3 });
    assert_eq!(rx.try_recv().unwrap(), JobEvent::Reset { epoch: 2 });
    assert_eq!(rx.try_recv().unwrap(), JobEvent::Started { epoch: 3 });
    assert_eq!(c.state(), JobState::Running { progress: 0 });
}

#[tokio::test(start_paused = true)]
async fn render_failure_returns_to_idle() {
    let c = controller(true);
    let mut rx = c.subscribe();
    c.start(GenerationRequest::with_defaults("no fonts here"));

    let events = drain_until_settled(&mut rx).await;
    let Some(JobEvent::Failed { epoch, reason }) = events.last() else {
        panic!("expected failure, got {:?}", events.last());
    };
    assert_eq!(*epoch, 1);
    assert!(reason.contains("render unavailable"));
    assert!(c.state().is_idle());
    assert!(c.state().artifact().is_none());
}

#[tokio::test(start_paused = true)]
async fn reset_when_idle_is_a_noop() {
    let c = controller(false);
    let mut rx = c.subscribe();
    assert!(!c.reset());
    assert_eq!(c.epoch(), 0);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn watch_receiver_tracks_latest_state() {
    let c = controller(false);
    let rx = c.watch_state();
    c.start(GenerationRequest::with_defaults("watch"));
    tokio::time::sleep(Duration::from_millis(260)).await;
    assert_eq!(*rx.borrow(), JobState::Running { progress: 5 });
    assert_eq!(rx.borrow().status_line(), "Processing frames... 5%");
}

#[test]
fn status_lines() {
    assert_eq!(JobState::Idle.status_line(), "Ready");
    assert_eq!(
        JobState::Running { progress: 42 }.status_line(),
        "Processing frames... 42%"
    );
    assert_eq!(JobState::Idle.progress(), 0);
}

#[test]
fn construction_outside_a_runtime_fails() {
    let cfg = GeneratorConfig::default();
    let renderer = PlaceholderRenderer::new(
        StyleCatalog::builtin(),
        cfg.canvas,
        Typography::default(),
        Box::new(Stub { fail: false }),
    );
    assert!(JobController::with_renderer(&cfg, renderer).is_err());
}
