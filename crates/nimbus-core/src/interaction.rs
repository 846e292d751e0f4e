//! Wires the touch pipeline, the recognizers, the haptic engine and the
//! screen choreographer together.
//!
//! [`Interaction`] is owned by one task. Refresh work is the only thing that
//! crosses an await point, and it does so through [`run_refresh`], which never
//! holds the lock while the refresh future runs.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use nimbus_gestures::{
    GestureRecognizer, PullState, PullToRefreshController, RawPointerEvent, RefreshCallback,
    RefreshFuture, ScreenTransition, ScreenTransitionChoreographer, ScrollPosition,
    SemanticEvent, SwipeNavigationController, TouchSampler,
};
use nimbus_haptics::{DispatchOutcome, HapticEngine, HapticSink, UiAction};
use nimbus_weather::{WeatherHapticContext, WeatherSnapshot};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug)]
pub struct Interaction {
    sampler: TouchSampler,
    pull: PullToRefreshController,
    swipe: SwipeNavigationController,
    haptics: HapticEngine,
    screens: ScreenTransitionChoreographer,
    last_transition: Option<ScreenTransition>,
    prevent_default: bool,
}

impl Interaction {
    pub fn new(
        config: &Config,
        scroll: Arc<dyn ScrollPosition>,
        sink: Box<dyn HapticSink>,
    ) -> Result<Self, AppError> {
        let sampler = if config.sampler.touch_enabled {
            TouchSampler::new(config.sampler.deadzone_px)
        } else {
            tracing::info!("Touch input disabled, gestures are inert");
            TouchSampler::inert()
        };

        let screens = ScreenTransitionChoreographer::new(
            config.screens.order.clone(),
            Duration::from_millis(config.screens.transition_ms),
        )?;

        Ok(Self {
            sampler,
            pull: PullToRefreshController::new(config.pull.clone(), scroll),
            swipe: SwipeNavigationController::new(config.swipe.clone()),
            haptics: HapticEngine::new(config.haptics.clone(), sink),
            screens,
            last_transition: None,
            prevent_default: false,
        })
    }

    pub fn set_on_refresh(&mut self, callback: RefreshCallback) {
        self.pull.set_on_refresh(callback);
    }

    /// Registers a handler for swipes towards the left edge.
    pub fn on_swipe_left(&mut self, callback: impl FnMut() + Send + 'static) {
        self.swipe.on_left(callback);
    }

    pub fn on_swipe_right(&mut self, callback: impl FnMut() + Send + 'static) {
        self.swipe.on_right(callback);
    }

    /// Feeds one raw pointer event through the whole pipeline.
    ///
    /// The event timestamp is also the clock for haptic cooldowns.
    pub fn handle(&mut self, raw: RawPointerEvent) -> Vec<SemanticEvent> {
        let Some(event) = self.sampler.feed(raw) else {
            self.prevent_default = false;
            return Vec::new();
        };

        let mut events = Vec::new();
        let recognizers: [&mut dyn GestureRecognizer; 2] = [&mut self.pull, &mut self.swipe];
        for recognizer in recognizers {
            if let Some(semantic) = recognizer.feed(&event) {
                events.push(semantic);
            }
        }
        self.prevent_default = event.suppress_default && self.pull.is_tracking();

        if events.contains(&SemanticEvent::PullTriggered) && self.pull.is_refreshing() {
            events.push(SemanticEvent::RefreshStarted);
        }

        for semantic in &events {
            self.react(semantic, raw.timestamp);
        }
        events
    }

    /// Starts a refresh without a gesture.
    pub fn trigger_refresh(&mut self, now: Duration) -> Vec<SemanticEvent> {
        let mut events: Vec<_> = self.pull.trigger().into_iter().collect();
        if !events.is_empty() && self.pull.is_refreshing() {
            events.push(SemanticEvent::RefreshStarted);
        }
        for semantic in &events {
            self.react(semantic, now);
        }
        events
    }

    /// Hands out the pending refresh future, if a pull was committed.
    pub fn take_refresh(&mut self) -> Option<RefreshFuture> {
        self.pull.take_refresh()
    }

    pub fn complete_refresh(
        &mut self,
        result: anyhow::Result<()>,
        now: Duration,
    ) -> Option<SemanticEvent> {
        let event = self.pull.finish_refresh(result)?;
        self.react(&event, now);
        Some(event)
    }

    /// Plays whatever changed since the previous reading.
    ///
    /// Readings that fail validation are dropped and leave the baseline alone.
    pub fn weather_update(
        &mut self,
        snapshot: &WeatherSnapshot,
        local_time: NaiveTime,
        now: Duration,
    ) -> DispatchOutcome {
        if let Err(e) = snapshot.validate() {
            tracing::warn!("Dropping weather reading: {}", e);
            return DispatchOutcome::Empty;
        }

        let context = WeatherHapticContext::from_snapshot(snapshot, local_time);
        self.haptics.weather_update(context, now)
    }

    pub fn ui_action(&mut self, action: UiAction, now: Duration) -> DispatchOutcome {
        self.haptics.ui_action(action, now)
    }

    /// Navigates directly to `screen`, e.g. from a tab bar.
    pub fn show_screen(&mut self, screen: &str) -> Result<Option<&ScreenTransition>, AppError> {
        if let Some(transition) = self.screens.show(screen)? {
            self.last_transition = Some(transition);
            return Ok(self.last_transition.as_ref());
        }
        Ok(None)
    }

    /// Whether the host should suppress native scrolling for the last event.
    pub fn prevent_default(&self) -> bool {
        self.prevent_default
    }

    pub fn pull_state(&self) -> PullState {
        self.pull.pull_state()
    }

    pub fn indicator_offset(&self) -> f64 {
        self.pull.indicator_offset()
    }

    pub fn drag_offset(&self) -> f64 {
        self.swipe.drag_offset()
    }

    pub fn current_screen(&self) -> &str {
        self.screens.current()
    }

    pub fn last_transition(&self) -> Option<&ScreenTransition> {
        self.last_transition.as_ref()
    }

    pub fn haptics(&self) -> &HapticEngine {
        &self.haptics
    }

    pub fn haptics_mut(&mut self) -> &mut HapticEngine {
        &mut self.haptics
    }

    fn react(&mut self, event: &SemanticEvent, now: Duration) {
        log_event(event);

        match event {
            SemanticEvent::PullReady { .. } => {
                self.haptics.ui_action(UiAction::Ready, now);
            }
            // A failed refresh is only logged.
            SemanticEvent::RefreshResolved { ok: true } => {
                self.haptics.ui_action(UiAction::Success, now);
            }
            SemanticEvent::SwipeDetected(result) => {
                self.haptics.ui_action(UiAction::Swipe, now);
                if let Some(direction) = result.direction {
                    if let Some(transition) = self.screens.on_swipe(direction) {
                        self.last_transition = Some(transition);
                    }
                }
            }
            _ => {}
        }
    }
}

fn log_event(event: &SemanticEvent) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::debug!(target: "nimbus::telemetry", "{}", json),
        Err(e) => tracing::warn!("Failed to serialize interaction event: {}", e),
    }
}

/// Drives one pending refresh to completion.
///
/// The lock is only taken to pick up the future and to report the result;
/// touch events keep flowing while the refresh runs.
pub async fn run_refresh(
    interaction: &Mutex<Interaction>,
    now: impl Fn() -> Duration,
) -> Option<SemanticEvent> {
    let refresh = interaction.lock().take_refresh()?;
    let result = refresh.await;
    interaction.lock().complete_refresh(result, now())
}
