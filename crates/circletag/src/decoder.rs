//! Tag decoding pipeline.
//!
//! Decoding runs as a strict stage sequence over a borrowed pixel buffer:
//! locate the tag center and radius, find the orientation notch on the
//! ring, measure the data layer band, then sample the bits and validate
//! the checksum. The first failing stage aborts the attempt; a decode
//! never returns a partial payload.

use log::debug;
use std::f64::consts::PI;

use crate::color::{is_foreground, Color};
use crate::errors::CircleTagError;
use crate::frame::calculate_hash;
use crate::polar::polar_offset;
use crate::raster::{ImageSize, PixelView};
use crate::trace::{DecodeTrace, NopTrace, TraceEvent};

/// Candidate center offsets grow by this many pixels per iteration.
const CENTER_SEARCH_STEP: i64 = 5;

/// One candidate center is tried per this many pixels of the smaller
/// image dimension.
const CENTER_SEARCH_DIVISOR: i64 = 32;

/// Angular step of the orientation sweep, radians.
const SWEEP_STEP: f64 = PI / 720.0;

/// The orientation sweep samples this far outside the measured radius.
const SWEEP_DISTANCE_OFFSET: i64 = 2;

/// Geometry discovered while locating a tag, filled stage by stage and
/// discarded after the attempt.
#[derive(Clone, Debug, Default, PartialEq)]
struct TagGeometry {
    center_x: i64,
    center_y: i64,
    radius: i64,
    starting_angle: f64,
    segment_size: f64,
    layer_size: i64,
    layer_count: usize,
}

/// State of one decode attempt.
struct DecodeContext<'a, 'b> {
    view: PixelView<'a>,
    base_color: Color,
    tolerance: u32,
    geometry: TagGeometry,
    trace: &'b mut dyn DecodeTrace,
}

impl DecodeContext<'_, '_> {
    /// Walks candidate centers in an alternating zig-zag around the image
    /// center until one sits inside the empty disc of a tag.
    fn find_tag_center(&mut self) -> Result<(), CircleTagError> {
        let width = self.view.size().width as i64;
        let height = self.view.size().height as i64;
        let center_x = width / 2;
        let center_y = height / 2;
        let max_iterations = width.min(height) / CENTER_SEARCH_DIVISOR;

        for iteration in 0..max_iterations {
            let magnitude = iteration * CENTER_SEARCH_STEP;
            // candidates past the half extent have left the image
            if magnitude > center_x || magnitude > center_y {
                break;
            }
            let mut off_x = magnitude;
            let mut off_y = magnitude;
            if iteration % 2 == 0 {
                off_x = -off_x;
                off_y = -off_y;
            }
            if iteration % 4 == 0 {
                off_y = -off_y;
            }
            if iteration % 3 == 0 {
                off_x = -off_x;
            }
            if self.try_center_candidate(center_x + off_x, center_y + off_y) {
                return Ok(());
            }
        }
        Err(CircleTagError::CenterNotFound)
    }

    /// Scans the four cardinal rays from a candidate point; the first
    /// differing pixel per ray marks an edge of the tag's inner disc.
    fn try_center_candidate(&mut self, origin_x: i64, origin_y: i64) -> bool {
        let width = self.view.size().width as i64;
        let height = self.view.size().height as i64;

        let mut left = None;
        let mut right = None;
        let mut top = None;
        let mut bottom = None;

        for i in 1..width / 2 {
            let x = origin_x - i;
            if left.is_none() && x >= 0 {
                let diff = self.view.read(x, origin_y).diff(self.base_color);
                self.trace.record(TraceEvent::CenterProbe { x, y: origin_y, diff });
                if diff > self.tolerance {
                    left = Some(x + 1);
                }
            }
            let x = origin_x + i;
            if right.is_none() && x < width {
                let diff = self.view.read(x, origin_y).diff(self.base_color);
                self.trace.record(TraceEvent::CenterProbe { x, y: origin_y, diff });
                if diff > self.tolerance {
                    right = Some(x - 1);
                }
            }
            let y = origin_y - i;
            if top.is_none() && y >= 0 {
                let diff = self.view.read(origin_x, y).diff(self.base_color);
                self.trace.record(TraceEvent::CenterProbe { x: origin_x, y, diff });
                if diff > self.tolerance {
                    top = Some(y + 1);
                }
            }
            let y = origin_y + i;
            if bottom.is_none() && y < height {
                let diff = self.view.read(origin_x, y).diff(self.base_color);
                self.trace.record(TraceEvent::CenterProbe { x: origin_x, y, diff });
                if diff > self.tolerance {
                    bottom = Some(y - 1);
                }
            }
            if left.is_some() && right.is_some() && top.is_some() && bottom.is_some() {
                break;
            }
        }

        let (Some(left), Some(right), Some(top), Some(bottom)) = (left, right, top, bottom) else {
            return false;
        };

        let tag_width = right - left;
        let tag_height = bottom - top;
        // the empty disc is round; reject candidates whose rays measured
        // an oblong shape
        if (tag_width - tag_height).abs() > 1 {
            return false;
        }

        self.geometry.center_x = left + tag_width / 2;
        self.geometry.center_y = top + tag_height / 2;
        self.geometry.radius = tag_width.min(tag_height) / 2;
        debug!(
            "tag center at ({}, {}), radius {}",
            self.geometry.center_x, self.geometry.center_y, self.geometry.radius
        );
        true
    }

    /// Sweeps a full turn just outside the measured radius looking for the
    /// orientation notch: a foreground-to-background transition followed by
    /// the return to foreground.
    fn find_orientation(&mut self) -> Result<(), CircleTagError> {
        let width = self.view.size().width as i64;
        let height = self.view.size().height as i64;
        let sample_distance = (self.geometry.radius + SWEEP_DISTANCE_OFFSET) as f64;

        let mut starting_angle = -1.0_f64;
        let mut current = 0.0_f64;
        let mut step = 0i64;
        while current < 2.0 * PI {
            current = SWEEP_STEP * step as f64;
            step += 1;

            let (dx, dy) = polar_offset(current, sample_distance);
            let x = self.geometry.center_x + dx;
            let y = self.geometry.center_y + dy;
            if x < 0 || y < 0 || x > width || y > height {
                continue;
            }
            self.trace.record(TraceEvent::AngleProbe { x, y });

            let has_pixel = is_foreground(self.view.read(x, y), self.base_color, self.tolerance);
            if starting_angle < 0.0 && !has_pixel {
                starting_angle = current - SWEEP_STEP;
                self.trace.record(TraceEvent::NotchStart { x, y });
            }
            if starting_angle > 0.0 && has_pixel {
                self.geometry.starting_angle = starting_angle;
                self.geometry.segment_size = current - starting_angle;
                self.trace.record(TraceEvent::NotchEnd { x, y });
                debug!(
                    "orientation notch at {:.4} rad, segment size {:.4} rad",
                    starting_angle, self.geometry.segment_size
                );
                return Ok(());
            }
        }
        Err(CircleTagError::AngleNotFound)
    }

    /// Walks outward through the middle of the marker column to measure
    /// the layer thickness and count.
    fn find_layer_layout(&mut self) -> Result<(), CircleTagError> {
        let width = self.view.size().width as i64;
        let height = self.view.size().height as i64;
        let angle = self.geometry.starting_angle + self.geometry.segment_size / 2.0;
        let used_width = self.geometry.center_x.min(width / 2);

        // the marker column starts one layer past the ring band; the gap
        // up to it measures the layer thickness
        let mut scan_start = self.geometry.radius;
        let mut layer_size = 0;
        let mut data_color = Color(0);
        for i in scan_start..width {
            let (dx, dy) = polar_offset(angle, i as f64);
            let x = self.geometry.center_x + dx;
            let y = self.geometry.center_y + dy;
            if x < 0 || y < 0 || x > width || y > height {
                continue;
            }
            let color = self.view.read(x, y);
            if color.diff(self.base_color) < self.tolerance {
                continue;
            }
            data_color = color;
            layer_size = i - scan_start - 1;
            scan_start = i;
            break;
        }
        if layer_size == 0 || layer_size == used_width {
            return Err(CircleTagError::LayerNotFound);
        }

        // keep walking to the outer end of the marker column
        let mut data_size = -1;
        for i in scan_start..width {
            let (dx, dy) = polar_offset(angle, i as f64);
            let x = self.geometry.center_x + dx;
            let y = self.geometry.center_y + dy;
            if x < 0 || y < 0 || x > width || y > height {
                continue;
            }
            if self.view.read(x, y).diff(data_color) < self.tolerance {
                continue;
            }
            data_size = i - scan_start - 1;
            break;
        }
        if data_size < 0 {
            return Err(CircleTagError::LayerNotFound);
        }

        self.geometry.layer_size = layer_size;
        self.geometry.layer_count = (data_size as f64 / layer_size as f64).round() as usize;
        debug!(
            "layer size {}, layer count {}",
            layer_size, self.geometry.layer_count
        );
        Ok(())
    }

    /// Samples the middle of every data cell, packs bits LSB first, and
    /// validates the decoded payload against the stored checksum.
    fn read_payload(&mut self) -> Result<Vec<u8>, CircleTagError> {
        let segments = (2.0 * PI / self.geometry.segment_size).round() as i64;
        // each layer carries one marker segment plus whole bytes
        if (segments - 1) % 8 != 0 {
            return Err(CircleTagError::InvalidSegmentGeometry(segments.max(0) as usize));
        }

        let half_segment = self.geometry.segment_size / 2.0;
        let half_layer = self.geometry.layer_size / 2;

        let mut payload: Vec<u8> = Vec::new();
        let mut payload_len: Option<usize> = None;
        let mut current_byte = 0u8;
        let mut bit_index = 0u32;

        for layer in 0..self.geometry.layer_count {
            let distance = self.geometry.radius
                + self.geometry.layer_size
                + layer as i64 * self.geometry.layer_size
                + half_layer;
            for segment in 1..segments {
                let angle = self.geometry.starting_angle
                    + half_segment
                    + segment as f64 * self.geometry.segment_size;
                let (dx, dy) = polar_offset(angle, distance as f64);
                let sample = self
                    .view
                    .read(self.geometry.center_x + dx, self.geometry.center_y + dy);
                if is_foreground(sample, self.base_color, self.tolerance) {
                    current_byte |= 1 << bit_index;
                }
                bit_index += 1;
                if bit_index < 8 {
                    continue;
                }
                bit_index = 0;
                match payload_len {
                    None => {
                        payload_len = Some(current_byte as usize);
                        payload = Vec::with_capacity(current_byte as usize);
                        debug!("payload length byte: {}", current_byte);
                    }
                    Some(len) if payload.len() == len => {
                        let computed = calculate_hash(&payload);
                        if computed == current_byte {
                            debug!("checksum valid, decoded {} bytes", payload.len());
                            return Ok(payload);
                        }
                        return Err(CircleTagError::ChecksumMismatch {
                            expected: current_byte,
                            computed,
                        });
                    }
                    Some(_) => payload.push(current_byte),
                }
                current_byte = 0;
            }
        }
        Err(CircleTagError::IncompleteData)
    }
}

/// Decodes the payload stored on a circle tag.
///
/// # Arguments
///
/// * `src` - Row-major RGBA8 pixel buffer.
/// * `size` - Dimensions of `src` in pixels.
/// * `tolerance` - Color difference above which a pixel counts as
///   foreground; [`crate::DEFAULT_TOLERANCE`] suits high-contrast tags.
///
/// # Returns
///
/// The payload bytes stored on the tag.
///
/// # Errors
///
/// Each pipeline stage reports its own [`CircleTagError`] variant; all of
/// them mean "no tag decodable here" and leave `src` untouched.
pub fn decode(src: &[u8], size: ImageSize, tolerance: u32) -> Result<Vec<u8>, CircleTagError> {
    decode_with_trace(src, size, tolerance, &mut NopTrace)
}

/// Same as [`decode`], recording every search probe into `trace`.
pub fn decode_with_trace(
    src: &[u8],
    size: ImageSize,
    tolerance: u32,
    trace: &mut dyn DecodeTrace,
) -> Result<Vec<u8>, CircleTagError> {
    let view = PixelView::new(src, size);
    let base_color = view.read((size.width / 2) as i64, (size.height / 2) as i64);
    let mut context = DecodeContext {
        view,
        base_color,
        tolerance,
        geometry: TagGeometry::default(),
        trace,
    };
    context.find_tag_center()?;
    context.find_orientation()?;
    context.find_layer_layout()?;
    context.read_payload()
}
