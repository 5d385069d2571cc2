//! Decoder search diagnostics.
//!
//! The decoder probes many pixels before it commits to a tag geometry.
//! Implement [`DecodeTrace`] to observe those probes, or use
//! [`OverlayTrace`] to paint them over a copy of the decoded image when
//! debugging a tag that refuses to decode.

use crate::color::Color;
use crate::raster::{ImageSize, PixelCanvas};

/// A probe recorded while the decoder searches the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// Center-search ray sample with its color difference from the base.
    CenterProbe {
        /// Sampled x coordinate.
        x: i64,
        /// Sampled y coordinate.
        y: i64,
        /// Color difference against the image base color.
        diff: u32,
    },
    /// Orientation sweep sample on the ring.
    AngleProbe {
        /// Sampled x coordinate.
        x: i64,
        /// Sampled y coordinate.
        y: i64,
    },
    /// First sample inside the orientation notch.
    NotchStart {
        /// Sampled x coordinate.
        x: i64,
        /// Sampled y coordinate.
        y: i64,
    },
    /// First sample past the end of the orientation notch.
    NotchEnd {
        /// Sampled x coordinate.
        x: i64,
        /// Sampled y coordinate.
        y: i64,
    },
}

/// Sink for decoder search diagnostics.
pub trait DecodeTrace {
    /// Records one probe event.
    fn record(&mut self, event: TraceEvent);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopTrace;

impl DecodeTrace for NopTrace {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Paints probe events into a caller-provided RGBA buffer.
///
/// The buffer is expected to be a copy of the decoded image (same size) so
/// the probes land on the pixels they sampled. Center probes encode their
/// color difference in the low bits; the remaining events use fixed marker
/// colors.
pub struct OverlayTrace<'a> {
    canvas: PixelCanvas<'a>,
}

impl<'a> OverlayTrace<'a> {
    /// Wraps a destination buffer matching the decoded image size.
    pub fn new(bytes: &'a mut [u8], size: ImageSize) -> Self {
        Self {
            canvas: PixelCanvas::new(bytes, size),
        }
    }
}

impl DecodeTrace for OverlayTrace<'_> {
    fn record(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::CenterProbe { x, y, diff } => {
                self.canvas.write(x, y, Color(0xff000000 | diff));
            }
            TraceEvent::AngleProbe { x, y } => self.canvas.write(x, y, Color(0xff0000ff)),
            TraceEvent::NotchStart { x, y } => self.canvas.write(x, y, Color(0xffff00ff)),
            TraceEvent::NotchEnd { x, y } => self.canvas.write(x, y, Color(0xff00ffff)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_paints_probes() {
        let size = ImageSize::from([4, 4]);
        let mut bytes = vec![0u8; 4 * 4 * 4];
        let mut trace = OverlayTrace::new(&mut bytes, size);
        trace.record(TraceEvent::CenterProbe { x: 0, y: 0, diff: 300 });
        trace.record(TraceEvent::AngleProbe { x: 1, y: 0 });
        trace.record(TraceEvent::NotchStart { x: 2, y: 0 });
        trace.record(TraceEvent::NotchEnd { x: 3, y: 0 });
        // out of range probes are dropped
        trace.record(TraceEvent::AngleProbe { x: 4, y: 4 });

        let view = crate::raster::PixelView::new(&bytes, size);
        assert_eq!(view.read(0, 0), Color(0xff000000 | 300));
        assert_eq!(view.read(1, 0), Color(0xff0000ff));
        assert_eq!(view.read(2, 0), Color(0xffff00ff));
        assert_eq!(view.read(3, 0), Color(0xff00ffff));
    }

    #[test]
    fn nop_trace_discards() {
        let mut trace = NopTrace;
        trace.record(TraceEvent::AngleProbe { x: 0, y: 0 });
    }
}
