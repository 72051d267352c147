//! Zoom level arithmetic.

/// Lowest zoom level a view may be set to.
pub const MIN_ZOOM: f64 = 0.25;

/// Highest zoom level a view may be set to.
pub const MAX_ZOOM: f64 = 4.0;

/// Zoom level restored by the reset command.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Default step for zoom in/out.
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    /// Increase by the amount.
    In,
    /// Decrease by the amount.
    Out,
    /// Use the amount as the new level.
    Set,
}

/// Computes the next zoom level, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
///
/// A NaN result (NaN input or amount) yields [`DEFAULT_ZOOM`].
#[must_use]
pub fn apply_zoom(current: f64, action: ZoomAction, amount: f64) -> f64 {
    let level = match action {
        ZoomAction::In => current + amount,
        ZoomAction::Out => current - amount,
        ZoomAction::Set => amount,
    };
    if level.is_nan() {
        return DEFAULT_ZOOM;
    }
    level.clamp(MIN_ZOOM, MAX_ZOOM)
}
