#![deny(missing_docs)]
//! # CircleTag
//!
//! Circular visual tag encoding and decoding.
//!
//! A circle tag stores a byte payload (up to 255 bytes) as concentric
//! rings of angular cells around an empty center disc. The innermost ring
//! carries a single notch that fixes the tag orientation; every ring
//! further out starts with a solid marker cell followed by the payload
//! bits. The decoder recovers the payload from a plain RGBA8 buffer by
//! geometric search alone: it needs no prior knowledge of the tag
//! position, radius or rotation, only a color-difference tolerance that
//! separates foreground from background.
//!
//! ```
//! use circletag::{decode, encode, EncodeConfig, DEFAULT_TOLERANCE};
//!
//! # fn main() -> Result<(), circletag::CircleTagError> {
//! let config = EncodeConfig::default();
//! let image = encode(&[0x41, 0x42], &config)?;
//! let payload = decode(&image, config.image_size(), DEFAULT_TOLERANCE)?;
//! assert_eq!(payload, vec![0x41, 0x42]);
//! # Ok(())
//! # }
//! ```

/// Color packing and comparison.
pub mod color;
pub mod decoder;
pub mod encoder;
/// Errors that the codec can produce.
pub mod errors;
/// Frame layout and checksum helpers.
pub mod frame;
pub mod polar;
/// Row-major RGBA8 pixel buffer views.
pub mod raster;
pub mod trace;

pub use crate::color::{is_foreground, Color, DEFAULT_TOLERANCE};
pub use crate::decoder::{decode, decode_with_trace};
pub use crate::encoder::{encode, encode_into, EncodeConfig};
pub use crate::errors::CircleTagError;
pub use crate::frame::{calculate_hash, MAX_PAYLOAD_LEN};
pub use crate::raster::{ImageSize, PixelCanvas, PixelView};
pub use crate::trace::{DecodeTrace, NopTrace, OverlayTrace, TraceEvent};
