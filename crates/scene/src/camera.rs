//! Orbit camera state.
//!
//! [`OrbitController`] owns the `Orientation` + interaction state pair. All
//! mutation happens in the synchronous pointer/scroll handlers and the
//! per-frame [`update`](OrbitController::update) step; the render layer reads
//! [`orientation`](OrbitController::orientation) once per frame and applies
//! it to whatever graphics API is in use, never the reverse.

use foundation::math::{angular_distance, clamp_pitch, clamp_zoom, normalize_yaw, signed_yaw_delta};
use foundation::time::Time;
use runtime::event_bus::{EngineEvent, EventBus};
use runtime::frame::Frame;
use runtime::notifier::ChangeGate;

use crate::config::EngineConfig;
use crate::projection::ScreenPoint;

/// Where the viewer is looking and how wide the view is. Degrees.
///
/// Yaw is normalized to `[0, 360)`; pitch and zoom are clamped to the
/// engine's canonical bounds on construction (out-of-range input is a
/// gesture to absorb, not an error).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orientation {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub zoom_deg: f64,
}

impl Orientation {
    pub fn new(yaw_deg: f64, pitch_deg: f64, zoom_deg: f64) -> Self {
        Self {
            yaw_deg: normalize_yaw(yaw_deg),
            pitch_deg: clamp_pitch(pitch_deg),
            zoom_deg: clamp_zoom(zoom_deg),
        }
    }
}

/// Which code path is allowed to mutate the orientation right now.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging,
    ProgrammaticTransition,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Mode {
    Idle,
    Dragging,
    Transition { target: Orientation },
}

/// Snap the eased zoom onto its target once the gap stops being visible.
const ZOOM_SNAP_EPS_DEG: f64 = 0.01;

#[derive(Debug)]
pub struct OrbitController {
    config: EngineConfig,
    orientation: Orientation,
    zoom_target_deg: f64,
    mode: Mode,
    pressed_at: Option<ScreenPoint>,
    settle_deadline: Option<Time>,
    gate: ChangeGate,
}

impl OrbitController {
    pub fn new(config: EngineConfig) -> Self {
        let orientation = Orientation::new(0.0, 0.0, config.default_zoom_deg);
        let gate = ChangeGate::new(
            config.notify_min_angle_delta_deg,
            config.notify_min_zoom_delta_deg,
        );
        Self {
            config,
            orientation,
            zoom_target_deg: orientation.zoom_deg,
            mode: Mode::Idle,
            pressed_at: None,
            settle_deadline: None,
            gate,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn interaction_state(&self) -> InteractionState {
        match self.mode {
            Mode::Idle => InteractionState::Idle,
            Mode::Dragging => InteractionState::Dragging,
            Mode::Transition { .. } => InteractionState::ProgrammaticTransition,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The zoom the view is currently easing toward.
    pub fn zoom_target_deg(&self) -> f64 {
        self.zoom_target_deg
    }

    /// Degrees of rotation per pixel of drag at the given zoom.
    ///
    /// Zoomed-in views rotate slower per pixel so apparent angular speed on
    /// screen stays roughly constant. Deterministic in `zoom_deg`.
    pub fn drag_rotate_speed(&self, zoom_deg: f64) -> f64 {
        let span = self.config.zoom_max_deg - self.config.zoom_min_deg;
        let normalized = ((zoom_deg - self.config.zoom_min_deg) / span).clamp(0.0, 1.0);
        self.config.drag_rotate_base_deg_per_px * (0.5 + 0.5 * normalized)
    }

    /// Pointer button pressed. Dragging does not begin until the pointer
    /// moves; a motionless click leaves the state machine untouched.
    pub fn pointer_down(&mut self, at: ScreenPoint) {
        self.pressed_at = Some(at);
    }

    /// Pointer moved. With the button down this orbits the camera directly;
    /// entering the drag cancels any in-flight transition and any pending
    /// settle notification (user input always wins).
    pub fn pointer_move(&mut self, at: ScreenPoint) {
        let Some(last) = self.pressed_at else {
            return;
        };

        let dx_px = at.x_px - last.x_px;
        let dy_px = at.y_px - last.y_px;
        if dx_px == 0.0 && dy_px == 0.0 {
            return;
        }

        if !matches!(self.mode, Mode::Dragging) {
            if matches!(self.mode, Mode::Transition { .. }) {
                // Cancelling a transition cancels its zoom leg too.
                self.zoom_target_deg = self.orientation.zoom_deg;
            }
            self.mode = Mode::Dragging;
            self.settle_deadline = None;
        }

        // Grab-the-world: dragging right swings the view toward lower yaw.
        let speed = self.drag_rotate_speed(self.orientation.zoom_deg);
        self.orientation.yaw_deg = normalize_yaw(self.orientation.yaw_deg - dx_px * speed);
        self.orientation.pitch_deg = (self.orientation.pitch_deg - dy_px * speed)
            .clamp(-self.config.pitch_limit_deg, self.config.pitch_limit_deg);

        self.pressed_at = Some(at);
    }

    /// Pointer button released. Ends a drag and arms the settle notification.
    pub fn pointer_up(&mut self, now: Time) {
        self.pressed_at = None;
        if matches!(self.mode, Mode::Dragging) {
            self.mode = Mode::Idle;
            self.settle_deadline = Some(now.after(self.config.settle_delay_s));
        }
    }

    /// Scroll input, in ticks. Positive ticks widen the field of view (zoom
    /// out). The target moves in fixed steps; the actual zoom eases toward it
    /// in [`update`](Self::update). Orthogonal to the drag/transition state.
    pub fn scroll(&mut self, ticks: f64) {
        self.zoom_target_deg = (self.zoom_target_deg + ticks * self.config.zoom_step_deg)
            .clamp(self.config.zoom_min_deg, self.config.zoom_max_deg);
        // A scroll mid-transition retargets the transition's zoom leg so the
        // convergence check tracks the live target.
        if let Mode::Transition { target } = &mut self.mode {
            target.zoom_deg = self.zoom_target_deg;
        }
    }

    /// Starts easing toward `target` (scene switch, "go to marker",
    /// recenter). Returns `false` without effect while a drag is in
    /// progress — a mid-drag request is rejected, not queued.
    pub fn transition_to(&mut self, target: Orientation) -> bool {
        if matches!(self.mode, Mode::Dragging) {
            return false;
        }
        let target = self.sanitize(target);
        self.mode = Mode::Transition { target };
        self.zoom_target_deg = target.zoom_deg;
        self.settle_deadline = None;
        true
    }

    /// Immediate reset, e.g. to a scene's default view on scene switch.
    pub fn snap_to(&mut self, orientation: Orientation) {
        let orientation = self.sanitize(orientation);
        self.orientation = orientation;
        self.zoom_target_deg = orientation.zoom_deg;
        self.mode = Mode::Idle;
        self.pressed_at = None;
        self.settle_deadline = None;
        self.gate.reset();
    }

    /// Advances interpolation and emits notifications for this frame.
    pub fn update(&mut self, frame: Frame, bus: &mut EventBus) {
        // Cap dt so a hitch doesn't teleport the camera.
        let dt_s = frame.dt_s.clamp(0.0, 0.1);

        if let Mode::Transition { target } = self.mode {
            self.step_transition(target, dt_s, frame, bus);
        }

        self.step_zoom(dt_s);

        if let Some(deadline) = self.settle_deadline {
            if matches!(self.mode, Mode::Idle) && frame.time >= deadline {
                self.settle_deadline = None;
                bus.emit(frame, self.event_triple(EventKind::Settled));
                self.record_gate(frame.time);
            }
        }

        let interval_s = match self.mode {
            Mode::Dragging => self.config.drag_notify_interval_s,
            _ => self.config.idle_notify_interval_s,
        };
        if self.gate.try_pass(
            frame.time,
            interval_s,
            self.orientation.yaw_deg,
            self.orientation.pitch_deg,
            self.orientation.zoom_deg,
        ) {
            bus.emit(frame, self.event_triple(EventKind::Changed));
        }
    }

    fn step_transition(&mut self, target: Orientation, dt_s: f64, frame: Frame, bus: &mut EventBus) {
        // Time-based factor keeps convergence frame-rate independent.
        let alpha = (self.config.transition_speed_per_s * dt_s).min(1.0);

        let yaw_delta = signed_yaw_delta(self.orientation.yaw_deg, target.yaw_deg);
        self.orientation.yaw_deg = normalize_yaw(self.orientation.yaw_deg + yaw_delta * alpha);
        self.orientation.pitch_deg += (target.pitch_deg - self.orientation.pitch_deg) * alpha;

        let eps = self.config.convergence_epsilon_deg;
        let converged = angular_distance(self.orientation.yaw_deg, target.yaw_deg) < eps
            && (self.orientation.pitch_deg - target.pitch_deg).abs() < eps
            && (self.orientation.zoom_deg - target.zoom_deg).abs() < eps;
        if converged {
            self.orientation = target;
            self.zoom_target_deg = target.zoom_deg;
            self.mode = Mode::Idle;
            bus.emit(frame, self.event_triple(EventKind::TransitionDone));
            self.record_gate(frame.time);
        }
    }

    fn step_zoom(&mut self, dt_s: f64) {
        let diff = self.zoom_target_deg - self.orientation.zoom_deg;
        if diff.abs() <= ZOOM_SNAP_EPS_DEG {
            self.orientation.zoom_deg = self.zoom_target_deg;
            return;
        }
        let alpha = 1.0 - (-self.config.zoom_smoothing_per_s * dt_s).exp();
        self.orientation.zoom_deg += diff * alpha;
    }

    fn sanitize(&self, orientation: Orientation) -> Orientation {
        Orientation {
            yaw_deg: normalize_yaw(orientation.yaw_deg),
            pitch_deg: orientation
                .pitch_deg
                .clamp(-self.config.pitch_limit_deg, self.config.pitch_limit_deg),
            zoom_deg: orientation
                .zoom_deg
                .clamp(self.config.zoom_min_deg, self.config.zoom_max_deg),
        }
    }

    fn record_gate(&mut self, now: Time) {
        self.gate.record(
            now,
            self.orientation.yaw_deg,
            self.orientation.pitch_deg,
            self.orientation.zoom_deg,
        );
    }

    fn event_triple(&self, kind: EventKind) -> EngineEvent {
        let Orientation {
            yaw_deg,
            pitch_deg,
            zoom_deg,
        } = self.orientation;
        match kind {
            EventKind::Changed => EngineEvent::OrientationChanged {
                yaw_deg,
                pitch_deg,
                zoom_deg,
            },
            EventKind::Settled => EngineEvent::OrientationSettled {
                yaw_deg,
                pitch_deg,
                zoom_deg,
            },
            EventKind::TransitionDone => EngineEvent::TransitionCompleted {
                yaw_deg,
                pitch_deg,
                zoom_deg,
            },
        }
    }
}

#[derive(Debug, Copy, Clone)]
enum EventKind {
    Changed,
    Settled,
    TransitionDone,
}
