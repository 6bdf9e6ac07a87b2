use foundation::math::{DEFAULT_SPHERE_RADIUS, PITCH_LIMIT_DEG, ZOOM_MAX_DEG, ZOOM_MIN_DEG};
use serde::{Deserialize, Serialize};

/// Recognized engine options.
///
/// Everything is plain data with defaults; hosts usually construct this once
/// per viewer (or deserialize it from a scene package) and hand it to
/// [`OrbitController`](crate::camera::OrbitController) and
/// [`PlacementService`](crate::placement::PlacementService).
///
/// Out-of-range *runtime* inputs (yaw/pitch/zoom) are clamped at use sites;
/// out-of-range *configuration* is rejected by [`EngineConfig::validate`]
/// because a nonsensical config is a programming error on the host side, not
/// a user gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngineConfig {
    /// Render radius of the panorama sphere (world units).
    pub sphere_radius: f64,
    /// Vertical field-of-view bounds (degrees).
    pub zoom_min_deg: f64,
    pub zoom_max_deg: f64,
    /// Default field of view for a fresh scene view (degrees).
    pub default_zoom_deg: f64,
    /// Pitch magnitude limit (degrees), kept short of 90.
    pub pitch_limit_deg: f64,
    /// Zoom change per scroll tick (degrees of FOV).
    pub zoom_step_deg: f64,
    /// Drag rotate speed at maximum zoom-out (degrees per pixel); scaled
    /// down as the view zooms in so apparent speed stays constant.
    pub drag_rotate_base_deg_per_px: f64,
    /// Programmatic transition interpolation rate (1/s).
    pub transition_speed_per_s: f64,
    /// Exponential smoothing rate for zoom easing (1/s).
    pub zoom_smoothing_per_s: f64,
    /// Quiet period after a drag ends before the settled event fires (s).
    pub settle_delay_s: f64,
    /// Minimum interval between orientation-changed events while idle (s).
    pub idle_notify_interval_s: f64,
    /// Minimum interval between orientation-changed events while dragging (s).
    pub drag_notify_interval_s: f64,
    /// Orientation-changed events are suppressed below these deltas.
    pub notify_min_angle_delta_deg: f64,
    pub notify_min_zoom_delta_deg: f64,
    /// A transition is considered converged within this distance (degrees).
    pub convergence_epsilon_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sphere_radius: DEFAULT_SPHERE_RADIUS,
            zoom_min_deg: ZOOM_MIN_DEG,
            zoom_max_deg: ZOOM_MAX_DEG,
            default_zoom_deg: 75.0,
            pitch_limit_deg: PITCH_LIMIT_DEG,
            zoom_step_deg: 3.0,
            drag_rotate_base_deg_per_px: 0.25,
            transition_speed_per_s: 1.5,
            zoom_smoothing_per_s: 6.0,
            settle_delay_s: 0.1,
            idle_notify_interval_s: 0.016,
            drag_notify_interval_s: 0.1,
            notify_min_angle_delta_deg: 1.0,
            notify_min_zoom_delta_deg: 0.5,
            convergence_epsilon_deg: 0.05,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid { field: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid { field } => write!(f, "config field out of range: {field}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sphere_radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "sphere_radius",
            });
        }
        if !(self.zoom_min_deg > 0.0 && self.zoom_min_deg < self.zoom_max_deg)
            || !(self.zoom_max_deg < 180.0)
        {
            return Err(ConfigError::Invalid {
                field: "zoom_min_deg/zoom_max_deg",
            });
        }
        if !(self.default_zoom_deg >= self.zoom_min_deg
            && self.default_zoom_deg <= self.zoom_max_deg)
        {
            return Err(ConfigError::Invalid {
                field: "default_zoom_deg",
            });
        }
        if !(self.pitch_limit_deg > 0.0 && self.pitch_limit_deg < 90.0) {
            return Err(ConfigError::Invalid {
                field: "pitch_limit_deg",
            });
        }
        if !(self.zoom_step_deg > 0.0) {
            return Err(ConfigError::Invalid {
                field: "zoom_step_deg",
            });
        }
        if !(self.drag_rotate_base_deg_per_px > 0.0) {
            return Err(ConfigError::Invalid {
                field: "drag_rotate_base_deg_per_px",
            });
        }
        if !(self.transition_speed_per_s > 0.0) || !(self.zoom_smoothing_per_s > 0.0) {
            return Err(ConfigError::Invalid {
                field: "transition_speed_per_s/zoom_smoothing_per_s",
            });
        }
        if self.settle_delay_s < 0.0
            || self.idle_notify_interval_s < 0.0
            || self.drag_notify_interval_s < 0.0
        {
            return Err(ConfigError::Invalid {
                field: "settle_delay_s/notify intervals",
            });
        }
        if self.notify_min_angle_delta_deg < 0.0 || self.notify_min_zoom_delta_deg < 0.0 {
            return Err(ConfigError::Invalid {
                field: "notify thresholds",
            });
        }
        if !(self.convergence_epsilon_deg > 0.0) {
            return Err(ConfigError::Invalid {
                field: "convergence_epsilon_deg",
            });
        }
        Ok(())
    }
}
