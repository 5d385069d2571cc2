/// Reference color-difference tolerance used by the original tag readers.
///
/// The per-channel absolute differences of two packed colors sum to at most
/// 1020, so this threshold requires roughly one fully flipped channel.
pub const DEFAULT_TOLERANCE: u32 = 250;

/// A packed 32-bit color.
///
/// Channels live in byte order: the first buffer byte of a pixel is the
/// lowest 8 bits of the packed value.
///
/// # Examples
///
/// ```
/// use circletag::Color;
///
/// let color = Color::from_bytes([0xff, 0xff, 0xff, 0x00]);
///
/// assert_eq!(color, Color(0x00ffffff));
/// assert_eq!(color.to_bytes(), [0xff, 0xff, 0xff, 0x00]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    /// Packs four channel bytes, first byte in the lowest bits.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Unpacks the channel bytes, lowest bits first.
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Sum of the per-channel absolute differences to `other`.
    ///
    /// Symmetric, ranges from 0 (equal) to 1020 (all four channels fully
    /// opposed).
    pub fn diff(self, other: Color) -> u32 {
        let a = self.to_bytes();
        let b = other.to_bytes();
        a.iter()
            .zip(b.iter())
            .map(|(ca, cb)| ca.abs_diff(*cb) as u32)
            .sum()
    }
}

/// Whether `sample` stands out from `base` by strictly more than `tolerance`.
pub fn is_foreground(sample: Color, base: Color, tolerance: u32) -> bool {
    sample.diff(base) > tolerance
}
