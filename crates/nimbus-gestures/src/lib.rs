//! Gesture recognition for Nimbus
//!
//! Raw pointer events go through the [`TouchSampler`] and are fanned out to
//! independent recognizers: pull-to-refresh and swipe navigation. Each
//! recognizer turns the stream into discrete [`SemanticEvent`]s.

pub mod error;
pub mod pull;
pub mod recognizer;
pub mod resistance;
pub mod sample;
pub mod state;
pub mod swipe;
pub mod transition;

pub use error::GestureError;
pub use pull::{
    refresh_callback, PullConfig, PullPhase, PullState, PullToRefreshController, RefreshCallback,
    RefreshFuture, ScrollPosition,
};
pub use recognizer::{GestureRecognizer, SemanticEvent};
pub use resistance::{resist, ResistanceModel};
pub use sample::{PointerKind, RawPointerEvent, TouchEvent, TouchPhase, TouchSample, TouchSampler};
pub use state::{GesturePhase, GestureState};
pub use swipe::{
    classify, SwipeConfig, SwipeDirection, SwipeNavigationController, SwipeRejection, SwipeResult,
};
pub use transition::{NavDirection, ScreenFrame, ScreenTransition, ScreenTransitionChoreographer};
