//! Disease progression state machine.
//!
//! Pure and synchronous: time only advances when the caller feeds elapsed
//! durations into [`Simulation::tick`], which keeps the 6.5 s auto-transition
//! deterministic under test and guarantees the timer dies with the value
//! instead of firing into a torn-down UI.

use std::time::Duration;

use venosim_types::Stage;

/// Delay between entering `Detaching` and the automatic transition to
/// `PostEmbolism`. Chosen to exceed [`CLOT_TRAVEL`] so the clot finishes its
/// on-screen path before the narrative advances.
pub const DETACH_DELAY: Duration = Duration::from_millis(6500);

/// Duration of the clot's travel animation along the vessel.
pub const CLOT_TRAVEL: Duration = Duration::from_secs(6);

/// Why a requested transition was refused. Rejections leave the current
/// stage untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Stage selection is locked while the detach timer is pending.
    #[error("stage selection is locked until the embolism completes")]
    DetachInProgress,
    /// `detach()` is only meaningful when a thrombus exists.
    #[error("detachment requires an existing thrombus (current stage: {current})")]
    DetachRequiresThrombus { current: Stage },
    /// The target stage is not reachable by direct user action.
    #[error("stage {0} cannot be selected directly")]
    NotUserSelectable(Stage),
}

/// The simulation core: current stage plus the one timed transition.
///
/// Invariant: a pending detach timer exists if and only if the current
/// stage is [`Stage::Detaching`]. Since `Detaching` is only reachable via
/// [`Simulation::detach`] while selection is otherwise locked, at most one
/// timer is ever outstanding.
#[derive(Debug, Clone)]
pub struct Simulation {
    stage: Stage,
    /// Time spent in `Detaching` so far. `Some` iff stage is `Detaching`.
    detach_elapsed: Option<Duration>,
}

impl Simulation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: Stage::Normal,
            detach_elapsed: None,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether the one-shot auto-transition is armed.
    #[must_use]
    pub fn detach_pending(&self) -> bool {
        self.detach_elapsed.is_some()
    }

    /// Time spent in `Detaching` so far. `None` outside `Detaching`.
    #[must_use]
    pub fn detach_elapsed(&self) -> Option<Duration> {
        self.detach_elapsed
    }

    /// Normalized progress of the detach window, 0.0 at entry and 1.0 when
    /// the auto-transition fires. `None` outside `Detaching`.
    #[must_use]
    pub fn detach_progress(&self) -> Option<f32> {
        self.detach_elapsed
            .map(|elapsed| (elapsed.as_secs_f32() / DETACH_DELAY.as_secs_f32()).clamp(0.0, 1.0))
    }

    /// User-invoked jump to a selectable stage.
    ///
    /// Permitted from any settled stage, including `PostEmbolism` (which
    /// restarts the cycle and resets clot visibility downstream). Rejected
    /// while the detach timer is pending.
    pub fn select(&mut self, target: Stage) -> Result<Stage, TransitionError> {
        if !target.user_selectable() {
            return Err(TransitionError::NotUserSelectable(target));
        }
        if self.detach_pending() {
            return Err(TransitionError::DetachInProgress);
        }
        tracing::debug!(from = %self.stage, to = %target, "Stage selected");
        self.stage = target;
        Ok(target)
    }

    /// User-invoked detachment. Only valid from `ThrombusFormed`; arms the
    /// 6.5 s one-shot timer.
    pub fn detach(&mut self) -> Result<Stage, TransitionError> {
        if self.detach_pending() {
            return Err(TransitionError::DetachInProgress);
        }
        if self.stage != Stage::ThrombusFormed {
            return Err(TransitionError::DetachRequiresThrombus {
                current: self.stage,
            });
        }
        tracing::debug!("Thrombus detaching; embolism timer armed");
        self.stage = Stage::Detaching;
        self.detach_elapsed = Some(Duration::ZERO);
        Ok(Stage::Detaching)
    }

    /// Advance simulated time. Returns the new stage when the armed timer
    /// fires, so the caller can refresh the explanation exactly once.
    pub fn tick(&mut self, delta: Duration) -> Option<Stage> {
        let elapsed = self.detach_elapsed.as_mut()?;
        *elapsed = elapsed.saturating_add(delta);
        if *elapsed < DETACH_DELAY {
            return None;
        }
        tracing::debug!("Embolism timer fired");
        self.stage = Stage::PostEmbolism;
        self.detach_elapsed = None;
        Some(Stage::PostEmbolism)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
