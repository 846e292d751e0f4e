//! Pull-to-refresh state machine.
//!
//! `Idle -> Tracking -> {Committed -> Refreshing -> Idle | Cancelled -> Idle}`
//!
//! The controller never awaits anything itself. On commit it invokes the
//! refresh callback exactly once and parks the returned future; the owner
//! picks it up with [`PullToRefreshController::take_refresh`], drives it, and
//! reports back through [`PullToRefreshController::finish_refresh`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::recognizer::{GestureRecognizer, SemanticEvent};
use crate::resistance::ResistanceModel;
use crate::sample::{TouchEvent, TouchPhase};
use crate::state::GestureState;

pub const DEFAULT_THRESHOLD_PX: f64 = 80.0;
pub const DEFAULT_RESISTANCE: f64 = 0.5;
pub const DEFAULT_CAP_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_TRIGGER_RATIO: f64 = 0.6;

pub type RefreshFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;
pub type RefreshCallback = Arc<dyn Fn() -> RefreshFuture + Send + Sync>;

/// Wraps an async closure into a [`RefreshCallback`].
pub fn refresh_callback<F, Fut>(f: F) -> RefreshCallback
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as RefreshFuture)
}

/// Answers whether the scroll container sits at its top edge.
pub trait ScrollPosition: Send + Sync {
    fn is_at_top(&self) -> bool;
}

impl<F> ScrollPosition for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_at_top(&self) -> bool {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Damped distance (px) that counts as a full pull.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Fraction of finger travel that reaches the indicator.
    #[serde(default = "default_resistance")]
    pub resistance: f64,
    /// Visual cap as a multiple of `threshold`.
    #[serde(default = "default_cap_multiplier")]
    pub cap_multiplier: f64,
    /// Progress at which a release commits the refresh.
    #[serde(default = "default_trigger_ratio")]
    pub trigger_ratio: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD_PX
}

fn default_resistance() -> f64 {
    DEFAULT_RESISTANCE
}

fn default_cap_multiplier() -> f64 {
    DEFAULT_CAP_MULTIPLIER
}

fn default_trigger_ratio() -> f64 {
    DEFAULT_TRIGGER_RATIO
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            resistance: default_resistance(),
            cap_multiplier: default_cap_multiplier(),
            trigger_ratio: default_trigger_ratio(),
        }
    }
}

impl PullConfig {
    pub fn resistance_model(&self) -> ResistanceModel {
        ResistanceModel::new(self.resistance, self.threshold * self.cap_multiplier)
    }
}

/// Observable pull state, suitable for driving the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PullState {
    pub pull_distance: f64,
    pub progress: f64,
    pub is_refreshing: bool,
    pub can_trigger: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullPhase {
    Idle,
    Tracking,
    /// Callback invoked, future not yet picked up by the owner.
    Committed,
    Refreshing,
}

pub struct PullToRefreshController {
    config: PullConfig,
    model: ResistanceModel,
    scroll: Arc<dyn ScrollPosition>,
    on_refresh: Option<RefreshCallback>,
    phase: PullPhase,
    gesture: Option<GestureState>,
    state: PullState,
    pending: Option<RefreshFuture>,
}

impl std::fmt::Debug for PullToRefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullToRefreshController")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("has_callback", &self.on_refresh.is_some())
            .finish()
    }
}

impl PullToRefreshController {
    pub fn new(config: PullConfig, scroll: Arc<dyn ScrollPosition>) -> Self {
        let model = config.resistance_model();
        Self {
            config,
            model,
            scroll,
            on_refresh: None,
            phase: PullPhase::Idle,
            gesture: None,
            state: PullState::default(),
            pending: None,
        }
    }

    pub fn set_on_refresh(&mut self, callback: RefreshCallback) {
        self.on_refresh = Some(callback);
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    pub fn phase(&self) -> PullPhase {
        self.phase
    }

    pub fn pull_state(&self) -> PullState {
        self.state
    }

    /// Damped distance to offset the refresh indicator by.
    pub fn indicator_offset(&self) -> f64 {
        self.state.pull_distance
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.is_refreshing
    }

    /// Starts a refresh without a gesture, e.g. from a button.
    ///
    /// A no-op while a refresh is already in flight.
    pub fn trigger(&mut self) -> Option<SemanticEvent> {
        if self.state.is_refreshing {
            tracing::debug!("Refresh already in flight, ignoring trigger");
            return None;
        }

        self.gesture = None;
        self.state.pull_distance = 0.;
        self.state.progress = 0.;
        self.state.can_trigger = false;
        self.commit()
    }

    /// Hands out the future produced by the refresh callback, once.
    pub fn take_refresh(&mut self) -> Option<RefreshFuture> {
        let future = self.pending.take()?;
        self.phase = PullPhase::Refreshing;
        tracing::info!("Refresh started");
        Some(future)
    }

    /// Resolves the in-flight refresh with the callback's outcome.
    pub fn finish_refresh(&mut self, result: anyhow::Result<()>) -> Option<SemanticEvent> {
        if !self.state.is_refreshing {
            tracing::warn!("Refresh resolved while none was in flight");
            return None;
        }

        let ok = match result {
            Ok(()) => {
                tracing::info!("Refresh completed");
                true
            }
            Err(e) => {
                tracing::warn!("Refresh failed: {:#}", e);
                false
            }
        };

        self.pending = None;
        self.phase = PullPhase::Idle;
        self.state = PullState::default();
        Some(SemanticEvent::RefreshResolved { ok })
    }

    fn commit(&mut self) -> Option<SemanticEvent> {
        let Some(callback) = self.on_refresh.clone() else {
            tracing::debug!("Pull committed with no refresh callback registered");
            self.snap_back();
            return Some(SemanticEvent::PullTriggered);
        };

        self.state.is_refreshing = true;
        self.phase = PullPhase::Committed;
        self.pending = Some(callback());
        tracing::debug!("Pull committed, refresh callback invoked");
        Some(SemanticEvent::PullTriggered)
    }

    fn snap_back(&mut self) {
        self.gesture = None;
        self.phase = PullPhase::Idle;
        self.state.pull_distance = 0.;
        self.state.progress = 0.;
        self.state.can_trigger = false;
    }

    fn on_start(&mut self, event: &TouchEvent) -> Option<SemanticEvent> {
        if self.state.is_refreshing {
            tracing::trace!("Refresh in flight, not tracking a new pull");
            return None;
        }
        if !self.scroll.is_at_top() {
            return None;
        }

        self.gesture = Some(GestureState::begin(event.sample));
        self.phase = PullPhase::Tracking;
        self.state.pull_distance = 0.;
        self.state.progress = 0.;
        self.state.can_trigger = false;
        None
    }

    fn on_move(&mut self, event: &TouchEvent) -> Option<SemanticEvent> {
        let gesture = self.gesture.take()?.advance(event.sample);
        self.gesture = Some(gesture);

        let (pull_distance, progress, can_trigger) = self.measure(&gesture);

        let was_ready = self.state.can_trigger;
        let previous = self.state.progress;
        self.state.pull_distance = pull_distance;
        self.state.progress = progress;
        self.state.can_trigger = can_trigger;

        if can_trigger && !was_ready {
            tracing::debug!("Pull ready at progress {:.2}", progress);
            return Some(SemanticEvent::PullReady { progress });
        }
        if progress != previous {
            return Some(SemanticEvent::PullProgressChanged { progress });
        }
        None
    }

    /// Damped distance, progress and readiness at the gesture's last sample.
    fn measure(&self, gesture: &GestureState) -> (f64, f64, bool) {
        let pull_distance = self.model.apply(gesture.delta_y());
        let progress = (pull_distance / self.config.threshold).min(1.);
        (pull_distance, progress, progress >= self.config.trigger_ratio)
    }

    fn on_end(&mut self, event: &TouchEvent) -> Option<SemanticEvent> {
        let gesture = self.gesture.take()?.advance(event.sample);

        // The release point may differ from the last move.
        let (pull_distance, progress, can_trigger) = self.measure(&gesture);
        self.state.pull_distance = pull_distance;
        self.state.progress = progress;
        self.state.can_trigger = can_trigger;

        if self.state.can_trigger && !self.state.is_refreshing {
            self.gesture = Some(gesture.commit());
            return self.commit();
        }

        self.cancel_tracking()
    }

    fn cancel_tracking(&mut self) -> Option<SemanticEvent> {
        self.gesture.take()?;
        self.snap_back();
        Some(SemanticEvent::PullCancelled)
    }
}

impl GestureRecognizer for PullToRefreshController {
    fn feed(&mut self, event: &TouchEvent) -> Option<SemanticEvent> {
        match event.phase {
            TouchPhase::Start => self.on_start(event),
            TouchPhase::Move if self.phase == PullPhase::Tracking => self.on_move(event),
            TouchPhase::End if self.phase == PullPhase::Tracking => self.on_end(event),
            TouchPhase::Cancel if self.phase == PullPhase::Tracking => {
                self.gesture = self.gesture.map(GestureState::cancel);
                self.cancel_tracking()
            }
            _ => None,
        }
    }

    fn reset(&mut self) {
        if self.phase == PullPhase::Tracking {
            self.snap_back();
        }
    }

    fn is_tracking(&self) -> bool {
        self.phase == PullPhase::Tracking
    }
}
