//! Angular primitives for sphere navigation.
//!
//! All angles are degrees. Every function here is total over ℝ: out-of-range
//! inputs are wrapped or clamped, never rejected.

/// Lower zoom bound (vertical field of view, degrees).
pub const ZOOM_MIN_DEG: f64 = 30.0;
/// Upper zoom bound (vertical field of view, degrees).
pub const ZOOM_MAX_DEG: f64 = 120.0;
/// Pitch bound, kept short of ±90° so yaw stays meaningful.
pub const PITCH_LIMIT_DEG: f64 = 89.0;

/// Wraps a yaw angle into `[0, 360)`.
pub fn normalize_yaw(yaw_deg: f64) -> f64 {
    yaw_deg.rem_euclid(360.0)
}

/// Clamps a pitch angle into `[-89, 89]`.
pub fn clamp_pitch(pitch_deg: f64) -> f64 {
    pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG)
}

/// Clamps a field of view into `[30, 120]`.
pub fn clamp_zoom(zoom_deg: f64) -> f64 {
    zoom_deg.clamp(ZOOM_MIN_DEG, ZOOM_MAX_DEG)
}

/// Circular distance between two yaw values: `min(|a-b|, 360-|a-b|)`.
///
/// `angular_distance(350.0, 10.0) == 20.0`, not 340.
pub fn angular_distance(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (normalize_yaw(a_deg) - normalize_yaw(b_deg)).abs();
    diff.min(360.0 - diff)
}

/// Shortest signed arc from `from_deg` to `to_deg`, in `[-180, 180)`.
///
/// Interpolating yaw by this delta converges across the 0/360 seam instead
/// of sweeping the long way around.
pub fn signed_yaw_delta(from_deg: f64, to_deg: f64) -> f64 {
    normalize_yaw(to_deg - from_deg + 180.0) - 180.0
}
