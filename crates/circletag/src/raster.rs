use crate::color::Color;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use circletag::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Read-only view over a row-major RGBA8 pixel buffer.
///
/// The decoder samples arbitrary computed coordinates, so reads never fail:
/// any read whose 4-byte span is not fully inside the buffer returns the
/// sentinel `Color(0)` instead.
pub struct PixelView<'a> {
    bytes: &'a [u8],
    size: ImageSize,
}

impl<'a> PixelView<'a> {
    /// Wraps a pixel buffer with its dimensions.
    pub fn new(bytes: &'a [u8], size: ImageSize) -> Self {
        Self { bytes, size }
    }

    /// Dimensions of the viewed buffer.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Reads the packed color at `(x, y)`, or `Color(0)` when the pixel
    /// offset falls outside the buffer.
    pub fn read(&self, x: i64, y: i64) -> Color {
        if x < 0 || y < 0 {
            return Color(0);
        }
        let offset = (y as usize)
            .saturating_mul(self.size.width)
            .saturating_add(x as usize)
            .saturating_mul(4);
        if offset.saturating_add(4) > self.bytes.len() {
            return Color(0);
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.bytes[offset..offset + 4]);
        Color::from_bytes(bytes)
    }
}

/// Mutable counterpart of [`PixelView`] used by the diagnostic overlay.
pub struct PixelCanvas<'a> {
    bytes: &'a mut [u8],
    size: ImageSize,
}

impl<'a> PixelCanvas<'a> {
    /// Wraps a mutable pixel buffer with its dimensions.
    pub fn new(bytes: &'a mut [u8], size: ImageSize) -> Self {
        Self { bytes, size }
    }

    /// Writes `color` at `(x, y)`, silently skipping out-of-range targets.
    pub fn write(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.size.width as i64 || y >= self.size.height as i64 {
            return;
        }
        let offset = (y as usize * self.size.width + x as usize) * 4;
        if offset + 4 <= self.bytes.len() {
            self.bytes[offset..offset + 4].copy_from_slice(&color.to_bytes());
        }
    }
}
