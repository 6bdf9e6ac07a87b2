use foundation::math::angular_distance;
use foundation::time::Time;

/// Rate- and delta-gate for orientation change notifications.
///
/// A notification passes only when the minimum interval since the last pass
/// has elapsed *and* the orientation moved by at least the configured
/// thresholds. The interval is supplied per call so the owner can use a
/// longer one while a drag is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeGate {
    min_angle_delta_deg: f64,
    min_zoom_delta_deg: f64,
    last_pass: Option<Passed>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Passed {
    time: Time,
    yaw_deg: f64,
    pitch_deg: f64,
    zoom_deg: f64,
}

impl ChangeGate {
    pub fn new(min_angle_delta_deg: f64, min_zoom_delta_deg: f64) -> Self {
        Self {
            min_angle_delta_deg,
            min_zoom_delta_deg,
            last_pass: None,
        }
    }

    /// Returns `true` (and records the values) when a notification should go
    /// out for the given orientation at the given time.
    ///
    /// The first call after construction or [`reset`](Self::reset) always
    /// passes.
    pub fn try_pass(
        &mut self,
        now: Time,
        min_interval_s: f64,
        yaw_deg: f64,
        pitch_deg: f64,
        zoom_deg: f64,
    ) -> bool {
        let Some(last) = self.last_pass else {
            self.record(now, yaw_deg, pitch_deg, zoom_deg);
            return true;
        };

        if now < last.time.after(min_interval_s) {
            return false;
        }

        let moved = angular_distance(yaw_deg, last.yaw_deg) >= self.min_angle_delta_deg
            || (pitch_deg - last.pitch_deg).abs() >= self.min_angle_delta_deg
            || (zoom_deg - last.zoom_deg).abs() >= self.min_zoom_delta_deg;
        if !moved {
            return false;
        }

        self.record(now, yaw_deg, pitch_deg, zoom_deg);
        true
    }

    /// Records values without gating, so an out-of-band notification (e.g. a
    /// settled event) isn't immediately repeated by the gate.
    pub fn record(&mut self, now: Time, yaw_deg: f64, pitch_deg: f64, zoom_deg: f64) {
        self.last_pass = Some(Passed {
            time: now,
            yaw_deg,
            pitch_deg,
            zoom_deg,
        });
    }

    pub fn reset(&mut self) {
        self.last_pass = None;
    }
}
