//! Polar coordinate helpers shared by the encoder and decoder.
//!
//! Angles run clockwise from the +x axis in screen coordinates (y grows
//! downward). Both codec sides must use the same pair of functions; the
//! negated terms below are what make the two directions agree.

/// Integer pixel offset at `angle` (radians) and `distance` from a center.
pub fn polar_offset(angle: f64, distance: f64) -> (i64, i64) {
    let flipped = -angle;
    let off_x = (flipped.cos() * distance).round() as i64;
    let off_y = (flipped.sin() * distance).round() as i64;
    (off_x, off_y)
}

/// Angle of a pixel offset in degrees, in `[0, 360]`.
///
/// The +x axis maps to the boundary value 360 rather than 0; the encoder
/// relies on that to keep the segment seam on the foreground side.
pub fn polar_angle_degrees(off_x: f64, off_y: f64) -> f64 {
    off_y.atan2(-off_x).to_degrees() + 180.0
}
