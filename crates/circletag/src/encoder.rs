//! Tag rasterization.
//!
//! Every pixel is a pure function of its coordinates, the framed payload
//! and the settings, so rows render in parallel and identical inputs
//! always produce identical buffers.

use rayon::prelude::*;

use crate::color::Color;
use crate::errors::CircleTagError;
use crate::frame::{self, MIN_DATA_FRAME_LEN};
use crate::polar::polar_angle_degrees;
use crate::raster::ImageSize;

/// Settings for rendering a tag.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeConfig {
    /// Rotation of the whole angular layout, in degrees. Default: `0.0`.
    pub angle_offset: f64,
    /// Output image width in pixels. Default: `512`.
    pub width: usize,
    /// Output image height in pixels. Default: `512`.
    pub height: usize,
    /// Fill color outside the tag and for zero bits. Default: `0x00ffffff`.
    pub background: Color,
    /// Color of the ring, the markers and one bits. Default: `0xffffffff`.
    pub foreground: Color,
    /// Inner edge of the ring, as a fraction of half the smaller image
    /// dimension. Default: `0.3`.
    pub starting_radius: f64,
    /// Outer edge of the last layer, as a fraction of half the smaller
    /// image dimension. Default: `0.95`.
    pub ending_radius: f64,
    /// Payload bytes stored per data layer; each byte adds eight segments
    /// next to the per-layer marker. Default: `3`.
    pub bytes_per_layer: usize,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            angle_offset: 0.0,
            width: 512,
            height: 512,
            background: Color(0x00ffffff),
            foreground: Color(0xffffffff),
            starting_radius: 0.3,
            ending_radius: 0.95,
            bytes_per_layer: 3,
        }
    }
}

impl EncodeConfig {
    /// Number of bytes [`encode`] produces for this image size.
    pub fn buffer_len(&self) -> usize {
        self.width * self.height * 4
    }

    /// Image dimensions as an [`ImageSize`].
    pub fn image_size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    fn validate(&self) -> Result<(), CircleTagError> {
        if self.width == 0 || self.height == 0 {
            return Err(CircleTagError::InvalidImageSize(self.width, self.height));
        }
        if self.bytes_per_layer == 0 {
            return Err(CircleTagError::InvalidBytesPerLayer(self.bytes_per_layer));
        }
        let growing = self.starting_radius > 0.0
            && self.starting_radius < self.ending_radius
            && self.ending_radius <= 1.0;
        if !growing {
            return Err(CircleTagError::InvalidRadiusRange(
                self.starting_radius,
                self.ending_radius,
            ));
        }
        Ok(())
    }
}

/// Precomputed per-call rendering state shared by all rows.
struct TagLayout<'a> {
    frame: &'a [u8],
    half_width: f64,
    half_height: f64,
    length_normalizer: f64,
    starting_radius: f64,
    radius_scale: f64,
    segment_scale: f64,
    angle_offset: f64,
    total_layers: f64,
    bytes_per_layer: usize,
    background: Color,
    foreground: Color,
}

impl<'a> TagLayout<'a> {
    fn new(frame: &'a [u8], config: &EncodeConfig) -> Self {
        // integer halves keep odd image sizes centered on a whole pixel
        let half_width = (config.width / 2) as f64;
        let half_height = (config.height / 2) as f64;
        let segments = (config.bytes_per_layer * 8 + 1) as f64;
        Self {
            frame,
            half_width,
            half_height,
            length_normalizer: 1.0 / half_width.min(half_height),
            starting_radius: config.starting_radius,
            radius_scale: 1.0 / (config.ending_radius - config.starting_radius),
            segment_scale: 1.0 / (360.0 / segments),
            angle_offset: config.angle_offset.rem_euclid(360.0),
            total_layers: frame::layer_count(frame.len(), config.bytes_per_layer) as f64,
            bytes_per_layer: config.bytes_per_layer,
            background: config.background,
            foreground: config.foreground,
        }
    }

    /// Angular segment of a pixel offset from the tag center.
    ///
    /// The +x axis yields the out-of-range boundary segment (one past the
    /// last), which keeps the seam on the foreground side of the ring.
    fn segment_at(&self, off_x: f64, off_y: f64) -> usize {
        let mut angle = polar_angle_degrees(off_x, off_y) + self.angle_offset;
        if angle > 360.0 {
            angle -= 360.0;
        }
        (angle * self.segment_scale) as usize
    }

    fn pixel_color(&self, x: usize, y: usize) -> Color {
        let off_x = x as f64 - self.half_width;
        let off_y = y as f64 - self.half_height;
        let length = (off_x * off_x + off_y * off_y).sqrt();
        let distance = length * self.length_normalizer;
        let point_distance = (distance - self.starting_radius) * self.radius_scale;
        if !(0.0..=1.0).contains(&point_distance) {
            return self.background;
        }

        let mut layer = (point_distance * self.total_layers) as usize;
        let segment = self.segment_at(off_x, off_y);

        // layer 0 is the orientation ring; segment 0 is its notch, drawn
        // only when the frame carries meaningful data
        if layer == 0 {
            return if self.frame.len() < MIN_DATA_FRAME_LEN || segment > 0 {
                self.foreground
            } else {
                self.background
            };
        }
        layer -= 1;

        // segment 0 of every data layer is the solid marker column
        if segment == 0 {
            return if self.frame.len() >= MIN_DATA_FRAME_LEN {
                self.foreground
            } else {
                self.background
            };
        }

        let bit_index = segment - 1;
        let data_index = layer * self.bytes_per_layer + bit_index / 8;
        if data_index >= self.frame.len() {
            return self.background;
        }
        let mask = 1u8 << (bit_index % 8);
        if self.frame[data_index] & mask != 0 {
            self.foreground
        } else {
            self.background
        }
    }
}

/// Renders `payload` as a circle tag image.
///
/// # Arguments
///
/// * `payload` - Bytes to store on the tag, at most 255.
/// * `config` - Rendering settings.
///
/// # Returns
///
/// A row-major RGBA8 buffer of `config.buffer_len()` bytes.
///
/// # Errors
///
/// Fails when the payload exceeds 255 bytes or the settings are invalid.
pub fn encode(payload: &[u8], config: &EncodeConfig) -> Result<Vec<u8>, CircleTagError> {
    let mut dst = vec![0u8; config.buffer_len()];
    encode_into(payload, config, &mut dst)?;
    Ok(dst)
}

/// Renders `payload` into a caller-owned buffer.
///
/// `dst` must hold exactly `config.buffer_len()` bytes; rows are filled in
/// parallel.
///
/// # Errors
///
/// Fails when the payload exceeds 255 bytes, the settings are invalid, or
/// `dst` has the wrong length.
pub fn encode_into(
    payload: &[u8],
    config: &EncodeConfig,
    dst: &mut [u8],
) -> Result<(), CircleTagError> {
    config.validate()?;
    if dst.len() != config.buffer_len() {
        return Err(CircleTagError::BufferSizeMismatch(
            dst.len(),
            config.buffer_len(),
        ));
    }
    let frame = frame::encode_frame(payload, config.bytes_per_layer)?;
    let layout = TagLayout::new(&frame, config);

    dst.par_chunks_exact_mut(config.width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            row.chunks_exact_mut(4).enumerate().for_each(|(x, pixel)| {
                pixel.copy_from_slice(&layout.pixel_color(x, y).to_bytes());
            });
        });
    Ok(())
}
