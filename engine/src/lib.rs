//! Simulation state machine and orchestration for Venosim.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  select/detach  ┌────────────┐
//! │ venosim-tui  │ ──────────────> │    App     │
//! │  (input)     │                 │            │
//! └──────────────┘                 │ Simulation │──┐ accepted transition
//! ┌──────────────┐   stage/expl    │  loading   │  │
//! │ venosim-tui  │ <────────────── │  seq guard │  v
//! │  (render)    │                 └─────┬──────┘  tokio::spawn(fetch)
//! └──────────────┘                       ^              │
//!                                        │ mpsc         │
//!                                        └──────────────┘
//! ```
//!
//! [`Simulation`] is the pure core: one stage, one timed transition, time
//! injected via `tick`. [`App`] wraps it with the asynchronous side effect
//! every transition carries: a fresh explanation request whose result is
//! applied only if no newer request has been issued since
//! ([`venosim_types::RequestSeq`] guard).

mod config;
mod simulation;

pub use config::{API_KEY_ENV_VAR, ConfigError, VenosimConfig};
pub use simulation::{CLOT_TRAVEL, DETACH_DELAY, Simulation, TransitionError};

use std::time::Duration;

use tokio::sync::mpsc;

use venosim_providers::ExplanationClient;
pub use venosim_types::{Explanation, RequestSeq, Severity, Stage};

/// Result of one explanation fetch, tagged with the request it answers.
#[derive(Debug)]
struct ExplanationEvent {
    seq: RequestSeq,
    stage: Stage,
    explanation: Explanation,
}

const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Application shell: simulation plus explanation plumbing.
///
/// Must live on a tokio runtime; explanation fetches are spawned tasks that
/// report back over an mpsc channel drained by [`App::process_events`].
#[derive(Debug)]
pub struct App {
    simulation: Simulation,
    client: ExplanationClient,
    explanation: Option<Explanation>,
    loading: bool,
    latest_seq: RequestSeq,
    tx: mpsc::Sender<ExplanationEvent>,
    rx: mpsc::Receiver<ExplanationEvent>,
    /// Monotonic animation clock, advanced by `tick`.
    clock: Duration,
    /// Time since the last stage change (drives the clot fade-out).
    stage_elapsed: Duration,
    high_contrast: bool,
}

impl App {
    /// Build the app from a loaded (or defaulted) config and request the
    /// opening explanation for the healthy stage.
    #[must_use]
    pub fn new(config: &VenosimConfig) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut app = Self {
            simulation: Simulation::new(),
            client: config.explanation_client(),
            explanation: None,
            loading: false,
            latest_seq: RequestSeq::ZERO,
            tx,
            rx,
            clock: Duration::ZERO,
            stage_elapsed: Duration::ZERO,
            high_contrast: config.high_contrast,
        };
        app.request_explanation(Stage::Normal);
        app
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// User-invoked jump to a selectable stage. On success the stage changes
    /// and exactly one explanation request is issued.
    pub fn select_stage(&mut self, target: Stage) -> Result<(), TransitionError> {
        let stage = self.simulation.select(target)?;
        self.stage_elapsed = Duration::ZERO;
        self.request_explanation(stage);
        Ok(())
    }

    /// User-invoked detachment; arms the embolism timer.
    pub fn detach(&mut self) -> Result<(), TransitionError> {
        let stage = self.simulation.detach()?;
        self.stage_elapsed = Duration::ZERO;
        self.request_explanation(stage);
        Ok(())
    }

    /// Advance clocks and the simulation. When the embolism timer fires this
    /// also issues the explanation request for the new stage.
    pub fn tick(&mut self, delta: Duration) {
        self.clock = self.clock.saturating_add(delta);
        self.stage_elapsed = self.stage_elapsed.saturating_add(delta);
        if let Some(stage) = self.simulation.tick(delta) {
            self.stage_elapsed = Duration::ZERO;
            self.request_explanation(stage);
        }
    }

    /// Drain completed explanation fetches, applying only the one that
    /// answers the latest issued request. Anything older is a stale result
    /// for a stage the user has already left.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            if event.seq != self.latest_seq {
                tracing::debug!(
                    seq = %event.seq,
                    latest = %self.latest_seq,
                    stage = %event.stage,
                    "Dropping stale explanation"
                );
                continue;
            }
            self.explanation = Some(event.explanation);
            self.loading = false;
        }
    }

    fn request_explanation(&mut self, stage: Stage) {
        self.latest_seq = self.latest_seq.next();
        self.loading = true;

        let seq = self.latest_seq;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let explanation = client.fetch(stage).await;
            // Receiver gone means the app is shutting down.
            let _ = tx
                .send(ExplanationEvent {
                    seq,
                    stage,
                    explanation,
                })
                .await;
        });
    }

    // ------------------------------------------------------------------
    // Accessors for the renderer
    // ------------------------------------------------------------------

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.simulation.stage()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&Explanation> {
        self.explanation.as_ref()
    }

    /// True while the latest explanation request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether stage-selection controls are currently locked.
    #[must_use]
    pub fn controls_locked(&self) -> bool {
        self.simulation.detach_pending()
    }

    /// Seconds on the monotonic animation clock.
    #[must_use]
    pub fn clock_secs(&self) -> f32 {
        self.clock.as_secs_f32()
    }

    /// Seconds since the last stage change.
    #[must_use]
    pub fn stage_elapsed_secs(&self) -> f32 {
        self.stage_elapsed.as_secs_f32()
    }

    /// Clot position along its travel animation: 0.0 parked, 1.0 arrived.
    ///
    /// The travel takes [`CLOT_TRAVEL`] (6 s) while the detach window is
    /// [`DETACH_DELAY`] (6.5 s), so the clot arrives before the narrative
    /// advances.
    #[must_use]
    pub fn clot_travel_progress(&self) -> f32 {
        match self.simulation.stage() {
            Stage::Detaching => self
                .simulation
                .detach_elapsed()
                .map_or(0.0, |elapsed| {
                    (elapsed.as_secs_f32() / CLOT_TRAVEL.as_secs_f32()).clamp(0.0, 1.0)
                }),
            Stage::PostEmbolism => 1.0,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.client.is_online()
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.high_contrast
    }

    pub fn toggle_high_contrast(&mut self) {
        self.high_contrast = !self.high_contrast;
    }

    /// Latest issued request sequence. One bump per accepted transition.
    #[must_use]
    pub fn request_seq(&self) -> RequestSeq {
        self.latest_seq
    }

    #[cfg(test)]
    fn inject_explanation(&mut self, seq: RequestSeq, stage: Stage, explanation: Explanation) {
        self.tx
            .try_send(ExplanationEvent {
                seq,
                stage,
                explanation,
            })
            .expect("test channel full");
    }
}
