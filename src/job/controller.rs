//! Generation job lifecycle.
//!
//! One controller owns at most one job. State moves `Idle -> Running -> Completed` and back to
//! `Idle` on reset. Every start and reset bumps an epoch counter; timer callbacks carry the
//! epoch they were armed with and become no-ops once it is stale.

use crate::config::GeneratorConfig;
use crate::foundation::error::{AnimegenError, AnimegenResult};
use crate::job::progress::{PROGRESS_MAX, ProgressHandle, ProgressSimulator};
use crate::job::request::GenerationRequest;
use crate::render::artifact::Artifact;
use crate::render::placeholder::PlaceholderRenderer;
use crate::style::catalog::StyleCatalog;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

const EVENT_CAPACITY: usize = 256;

/// Observable job state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum JobState {
    /// No job, no artifact.
    #[default]
    Idle,
    /// A job is in flight.
    Running {
        /// Cosmetic progress, 0..=100.
        progress: u8,
    },
    /// The job finished and its artifact is available.
    Completed {
        /// Rendered output.
        artifact: Arc<Artifact>,
    },
}

impl JobState {
    /// `true` while a job is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// `true` when nothing is in flight and no artifact is held.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Progress as observed by a UI: 0 when idle, 100 once completed.
    pub fn progress(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running { progress } => *progress,
            Self::Completed { .. } => PROGRESS_MAX,
        }
    }

    /// Artifact of a completed job.
    pub fn artifact(&self) -> Option<&Arc<Artifact>> {
        match self {
            Self::Completed { artifact } => Some(artifact),
            _ => None,
        }
    }

    /// Short status text, e.g. `"Processing frames... 42%"`.
    pub fn status_line(&self) -> String {
        match self {
            Self::Idle => "Ready".to_string(),
            Self::Running { progress } => format!("Processing frames... {progress}%"),
            Self::Completed { .. } => "Video ready".to_string(),
        }
    }
}

/// Lifecycle notifications. Every event carries the epoch of the job it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobEvent {
    /// A job was accepted.
    Started {
        /// Job epoch.
        epoch: u64,
    },
    /// Progress changed. Values are strictly increasing within one epoch and 100 is
    /// reported exactly once per completed job.
    Progress {
        /// Job epoch.
        epoch: u64,
        /// New progress value.
        progress: u8,
    },
    /// The artifact is ready.
    Completed {
        /// Job epoch.
        epoch: u64,
        /// Rendered output.
        artifact: Arc<Artifact>,
    },
    /// Rendering failed; the controller went back to idle.
    Failed {
        /// Job epoch.
        epoch: u64,
        /// Human readable failure.
        reason: String,
    },
    /// The controller was reset.
    Reset {
        /// Epoch after the reset.
        epoch: u64,
    },
}

/// Result of asking the controller to start a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// The job is running under `epoch`.
    Started {
        /// Job epoch.
        epoch: u64,
    },
    /// The prompt was empty or whitespace; nothing happened.
    IgnoredBlankPrompt,
    /// A job is already running; nothing happened.
    IgnoredBusy,
}

struct CompletionTimer(CancellationToken);

impl Drop for CompletionTimer {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

#[derive(Default)]
struct Inner {
    epoch: u64,
    state: JobState,
    progress: Option<ProgressHandle>,
    completion: Option<CompletionTimer>,
}

impl Inner {
    fn disarm(&mut self) {
        if let Some(p) = self.progress.take() {
            p.stop();
        }
        self.completion = None;
    }
}

struct Shared {
    inner: Mutex<Inner>,
    renderer: Mutex<PlaceholderRenderer>,
    state_tx: watch::Sender<JobState>,
    events_tx: broadcast::Sender<JobEvent>,
    simulator: ProgressSimulator,
    latency: Duration,
    runtime: Handle,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn publish(&self, inner: &mut Inner, state: JobState) {
        inner.state = state.clone();
        self.state_tx.send_replace(state);
    }

    fn emit(&self, event: JobEvent) {
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }

    fn reset_locked(&self, inner: &mut Inner) {
        inner.disarm();
        inner.epoch += 1;
        self.publish(inner, JobState::Idle);
        self.emit(JobEvent::Reset { epoch: inner.epoch });
        tracing::info!(epoch = inner.epoch, "job reset");
    }

    fn on_progress(&self, epoch: u64, progress: u8) {
        let mut inner = lock(&self.inner);
        if inner.epoch != epoch {
            tracing::debug!(epoch, current = inner.epoch, "stale progress tick ignored");
            return;
        }
        let JobState::Running { progress: current } = inner.state else {
            return;
        };
        if progress <= current {
            return;
        }
        self.publish(&mut inner, JobState::Running { progress });
        self.emit(JobEvent::Progress { epoch, progress });
        tracing::debug!(epoch, progress, "progress");
    }

    /// Stop progress ahead of the render. `false` when the completion is stale.
    fn begin_completion(&self, epoch: u64) -> bool {
        let mut inner = lock(&self.inner);
        if inner.epoch != epoch || !inner.state.is_running() {
            tracing::debug!(epoch, current = inner.epoch, "stale completion ignored");
            return false;
        }
        if let Some(p) = inner.progress.take() {
            p.stop();
        }
        true
    }

    fn render_blocking(&self, request: &GenerationRequest) -> AnimegenResult<Artifact> {
        lock(&self.renderer).render(request)
    }

    fn finish_completion(
        &self,
        epoch: u64,
        request: &GenerationRequest,
        rendered: AnimegenResult<Artifact>,
    ) {
        let mut inner = lock(&self.inner);
        if inner.epoch != epoch {
            tracing::debug!(
                epoch,
                current = inner.epoch,
                "job reset during render, dropping output"
            );
            return;
        }
        inner.completion = None;

        match rendered {
            Ok(artifact) => {
                let artifact = Arc::new(artifact);
                if inner.state.progress() < PROGRESS_MAX {
                    self.emit(JobEvent::Progress {
                        epoch,
                        progress: PROGRESS_MAX,
                    });
                }
                self.publish(
                    &mut inner,
                    JobState::Completed {
                        artifact: artifact.clone(),
                    },
                );
                self.emit(JobEvent::Completed { epoch, artifact });
                tracing::info!(epoch, style = request.style_id(), "job completed");
            }
            Err(err) => {
                tracing::warn!(epoch, error = %err, "render failed");
                self.publish(&mut inner, JobState::Idle);
                self.emit(JobEvent::Failed {
                    epoch,
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Drives one generation job at a time: simulated progress, a fixed render latency, then the
/// placeholder render.
///
/// Timers run as tasks on the Tokio runtime that was current when the controller was built.
/// Dropping the controller cancels any armed timers.
pub struct JobController {
    shared: Arc<Shared>,
}

impl JobController {
    /// Controller with the built-in styles and the CPU rasterizer configured by `cfg`.
    pub fn new(cfg: &GeneratorConfig) -> AnimegenResult<Self> {
        let renderer = PlaceholderRenderer::from_config(cfg, StyleCatalog::builtin());
        Self::with_renderer(cfg, renderer)
    }

    /// Controller using an explicit renderer; timing still comes from `cfg`.
    pub fn with_renderer(
        cfg: &GeneratorConfig,
        renderer: PlaceholderRenderer,
    ) -> AnimegenResult<Self> {
        cfg.validate()?;
        let runtime = Handle::try_current().map_err(|e| {
            AnimegenError::Other(
                anyhow::Error::new(e).context("job controller needs a tokio runtime"),
            )
        })?;
        let (state_tx, _) = watch::channel(JobState::Idle);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                renderer: Mutex::new(renderer),
                state_tx,
                events_tx,
                simulator: ProgressSimulator::from_config(cfg),
                latency: cfg.render_latency(),
                runtime,
            }),
        })
    }

    /// Start a job for `request`.
    ///
    /// Blank prompts and starts while a job is running are ignored. Starting from
    /// `Completed` discards the previous artifact first.
    #[tracing::instrument(skip(self, request), fields(style = request.style_id()))]
    pub fn start(&self, request: GenerationRequest) -> StartOutcome {
        if request.is_blank() {
            tracing::debug!("blank prompt ignored");
            return StartOutcome::IgnoredBlankPrompt;
        }

        let shared = &self.shared;
        let mut inner = lock(&shared.inner);
        if inner.state.is_running() {
            tracing::debug!(epoch = inner.epoch, "job already running");
            return StartOutcome::IgnoredBusy;
        }
        if inner.state.artifact().is_some() {
            shared.reset_locked(&mut inner);
        }

        inner.disarm();
        inner.epoch += 1;
        let epoch = inner.epoch;
        shared.publish(&mut inner, JobState::Running { progress: 0 });
        shared.emit(JobEvent::Started { epoch });
        shared.emit(JobEvent::Progress { epoch, progress: 0 });

        let weak: Weak<Shared> = Arc::downgrade(shared);
        inner.progress = Some(shared.simulator.start(&shared.runtime, move |p| {
            if let Some(s) = weak.upgrade() {
                s.on_progress(epoch, p);
            }
        }));

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let weak = Arc::downgrade(shared);
        let latency = shared.latency;
        shared.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(latency) => {
                    let Some(s) = weak.upgrade() else { return };
                    if !s.begin_completion(epoch) {
                        return;
                    }
                    // Rasterizing is CPU bound; keep it off the runtime threads.
                    let worker = Arc::clone(&s);
                    let req = request.clone();
                    let rendered = s
                        .runtime
                        .spawn_blocking(move || worker.render_blocking(&req))
                        .await
                        .unwrap_or_else(|e| {
                            Err(AnimegenError::Other(
                                anyhow::Error::new(e).context("render task failed"),
                            ))
                        });
                    s.finish_completion(epoch, &request, rendered);
                }
            }
        });
        inner.completion = Some(CompletionTimer(cancel));

        tracing::info!(epoch, "job started");
        StartOutcome::Started { epoch }
    }

    /// Validate the raw inputs and start a job.
    pub fn submit(
        &self,
        prompt: impl Into<String>,
        style_id: impl Into<String>,
        duration_secs: u32,
        fps: u32,
    ) -> AnimegenResult<StartOutcome> {
        let request = GenerationRequest::new(prompt, style_id, duration_secs, fps)?;
        Ok(self.start(request))
    }

    /// Abort any running job or discard the completed artifact, returning to `Idle`.
    ///
    /// Returns `false` when the controller was already idle.
    pub fn reset(&self) -> bool {
        let mut inner = lock(&self.shared.inner);
        if inner.state.is_idle() {
            return false;
        }
        self.shared.reset_locked(&mut inner);
        true
    }

    /// Current state snapshot.
    pub fn state(&self) -> JobState {
        lock(&self.shared.inner).state.clone()
    }

    /// Epoch of the current (or most recent) job.
    pub fn epoch(&self) -> u64 {
        lock(&self.shared.inner).epoch
    }

    /// Receiver that always holds the latest state.
    pub fn watch_state(&self) -> watch::Receiver<JobState> {
        self.shared.state_tx.subscribe()
    }

    /// Receiver for lifecycle events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.shared.events_tx.subscribe()
    }

    /// Wait until no job is running and return the settled state.
    pub async fn settled(&self) -> JobState {
        let mut rx = self.watch_state();
        match rx.wait_for(|s| !s.is_running()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl std::fmt::Debug for JobController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.shared.inner);
        f.debug_struct("JobController")
            .field("epoch", &inner.epoch)
            .field("state", &inner.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/controller.rs"]
mod tests;
