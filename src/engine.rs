//! Gesture Engine
//!
//! Per-frame orchestration over the stateless classifier and the stateful
//! control machine.
//!
//! # Frame Flow
//!
//! ```text
//! Frame ─► running / exit latch ─► FrameGate ─► per hand (observation order):
//!            │                        │            complete? ─► PoseSnapshot ─► label
//!            ▼                        ▼                        └► StateMachine (Left/Right)
//!         ignored                  skipped      then namaste over complete hands
//!                                               ─► Decisions ─► Commands ─► FrameReport
//! ```
//!
//! One engine owns one [`ControlState`]; frames are processed strictly one
//! at a time.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{Config, ControlConfig, ProfileSet, ThresholdProfile};
use crate::control::{ControlState, StateMachine};
use crate::dispatch::Command;
use crate::error::{recovery_action, Result};
use crate::gesture::{GestureLabel, PoseSnapshot};
use crate::ingest::FrameGate;
use crate::landmark::{Frame, Handedness};
use crate::utils::{metric_names, MetricsCollector, Timer};

/// Classification result for one hand in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandGesture {
    pub handedness: Handedness,
    pub label: Option<GestureLabel>,
}

impl HandGesture {
    /// Status line, e.g. `"Pinch - Right hand"`
    pub fn describe(&self) -> Option<String> {
        self.label.map(|label| label.describe(self.handedness))
    }
}

/// What the engine did with one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// 1-based index of the frame among all frames handed to the engine
    pub frame_index: u64,
    /// False when the frame was gated, ignored while stopped, or after exit
    pub processed: bool,
    pub gestures: Vec<HandGesture>,
    pub commands: Vec<Command>,
    pub exit_requested: bool,
}

impl FrameReport {
    fn unprocessed(frame_index: u64, exit_requested: bool) -> Self {
        Self {
            frame_index,
            processed: false,
            gestures: Vec::new(),
            commands: Vec::new(),
            exit_requested,
        }
    }
}

pub struct GestureEngine {
    profiles: ProfileSet,
    active_profile: String,
    profile: ThresholdProfile,
    steps: ControlConfig,
    max_hands: usize,
    machine: StateMachine,
    state: ControlState,
    gate: FrameGate,
    frames_seen: u64,
    running: bool,
    exit_requested: bool,
    metrics: Arc<MetricsCollector>,
}

impl GestureEngine {
    /// Build an engine with the configured active profile.
    ///
    /// Every registered profile is validated, so a later `set_profile`
    /// can only switch to a usable one.
    pub fn new(config: &Config) -> Result<Self> {
        config.profiles.validate()?;
        let profile = config.profiles.resolve(&config.active_profile)?.clone();
        info!(
            profile = %config.active_profile,
            screen = %format!("{}x{}", config.screen.width, config.screen.height),
            every_nth = config.ingest.process_every_nth,
            "Gesture engine created"
        );

        Ok(Self {
            profiles: config.profiles.clone(),
            active_profile: config.active_profile.to_lowercase(),
            profile,
            steps: config.control,
            max_hands: config.ingest.max_hands,
            machine: StateMachine::new(config.screen),
            state: ControlState::new(),
            gate: FrameGate::new(config.ingest.process_every_nth),
            frames_seen: 0,
            running: true,
            exit_requested: false,
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("Gesture control started");
        }
        self.running = true;
    }

    /// Stop processing and reset control state
    pub fn stop(&mut self) {
        if self.running {
            info!("Gesture control stopped");
        }
        self.running = false;
        self.state.reset();
        self.gate.reset();
    }

    /// Flip between running and stopped; returns the new running flag
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
        self.running
    }

    pub fn active_profile_name(&self) -> &str {
        &self.active_profile
    }

    pub fn active_profile(&self) -> &ThresholdProfile {
        &self.profile
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// Switch profile by name (case-insensitive); applies from the next frame
    pub fn set_profile(&mut self, name: &str) -> Result<()> {
        let profile = self.profiles.resolve(name)?.clone();
        self.profile = profile;
        self.active_profile = name.to_lowercase();
        info!(profile = %self.active_profile, "Profile changed");
        Ok(())
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Clear the exit latch, reset state and resume processing
    pub fn restart(&mut self) {
        info!("Gesture engine restarted");
        self.exit_requested = false;
        self.running = true;
        self.state.reset();
        self.gate.reset();
    }

    /// Process one frame observed at `now` (monotonic, since session start)
    pub fn process_frame(&mut self, frame: &Frame, now: Duration) -> FrameReport {
        self.frames_seen += 1;
        let frame_index = self.frames_seen;
        self.metrics
            .increment_counter(metric_names::FRAMES_RECEIVED, 1);

        if !self.running || self.exit_requested {
            self.metrics.increment_counter(metric_names::FRAMES_IGNORED, 1);
            return FrameReport::unprocessed(frame_index, self.exit_requested);
        }

        if !self.gate.admit() {
            self.metrics.increment_counter(metric_names::FRAMES_SKIPPED, 1);
            return FrameReport::unprocessed(frame_index, false);
        }

        let timer = Timer::new();
        let hands = if frame.hands.len() > self.max_hands {
            let dropped = frame.hands.len() - self.max_hands;
            warn!(
                frame_index,
                dropped,
                max_hands = self.max_hands,
                "Too many hands in frame, dropping extras"
            );
            self.metrics
                .increment_counter(metric_names::HANDS_SKIPPED, dropped as u64);
            &frame.hands[..self.max_hands]
        } else {
            &frame.hands[..]
        };

        let mut decisions = Vec::new();
        let mut gestures = Vec::with_capacity(hands.len());
        let mut complete = Vec::with_capacity(hands.len());

        for hand in hands {
            if let Err(e) = hand.landmarks.ensure_complete() {
                warn!(
                    frame_index,
                    handedness = %hand.handedness,
                    action = ?recovery_action(&e),
                    "Skipping hand: {}",
                    e
                );
                self.metrics.increment_counter(metric_names::HANDS_SKIPPED, 1);
                continue;
            }
            complete.push(hand);

            let pose = PoseSnapshot::evaluate(&hand.landmarks, &self.profile);
            let gesture = HandGesture {
                handedness: hand.handedness,
                label: pose.label(),
            };
            if let Some(status) = gesture.describe() {
                debug!(frame_index, "{}", status);
            }
            gestures.push(gesture);

            match hand.handedness {
                Handedness::Right => self.machine.update_right(
                    &mut self.state,
                    &hand.landmarks,
                    &pose,
                    &self.profile,
                    &mut decisions,
                ),
                Handedness::Left => {
                    self.machine
                        .update_left(&mut self.state, &pose, &self.profile, now, &mut decisions)
                }
            }
        }

        if let Some(exit) = self.machine.check_namaste(&complete, &self.profile) {
            info!(frame_index, "Exit requested by namaste gesture");
            decisions.push(exit);
            self.exit_requested = true;
        }

        let commands: Vec<Command> = decisions
            .into_iter()
            .map(|decision| Command::from_decision(decision, &self.steps))
            .collect();
        for command in &commands {
            self.metrics.record_command(command.kind());
        }

        self.metrics
            .increment_counter(metric_names::FRAMES_PROCESSED, 1);
        self.metrics
            .record_histogram(metric_names::FRAME_TIME_US, timer.elapsed_us());
        debug!(
            frame_index,
            hands = hands.len(),
            commands = commands.len(),
            "Frame processed"
        );

        FrameReport {
            frame_index,
            processed: true,
            gestures,
            commands,
            exit_requested: self.exit_requested,
        }
    }
}
