/// Errors that can occur when encoding or decoding circle tags.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CircleTagError {
    /// The payload does not fit in the one-byte length prefix.
    #[error("Payload length ({0}) exceeds the maximum of 255 bytes")]
    PayloadTooLarge(usize),

    /// The radii do not describe a growing band inside the unit circle.
    #[error("Invalid radius range: requires 0 < starting ({0}) < ending ({1}) <= 1.0")]
    InvalidRadiusRange(f64, f64),

    /// Each layer must carry at least one byte.
    #[error("Invalid bytes per layer ({0}); at least 1 is required")]
    InvalidBytesPerLayer(usize),

    /// The target image has a zero dimension.
    #[error("Invalid image size ({0}x{1}); both dimensions must be non-zero")]
    InvalidImageSize(usize, usize),

    /// The destination buffer does not match the configured image size.
    #[error("Destination length ({0}) does not match the {1} bytes required by the settings")]
    BufferSizeMismatch(usize, usize),

    /// The center search exhausted its candidates without locating a tag.
    #[error("No tag center found in the image")]
    CenterNotFound,

    /// The ring sweep never crossed the orientation notch.
    #[error("No orientation notch found on the tag ring")]
    AngleNotFound,

    /// The radial scan could not measure the data layer band.
    #[error("No data layers found outside the tag ring")]
    LayerNotFound,

    /// The measured segment count cannot hold whole bytes.
    #[error("Invalid segment geometry: {0} segments do not map to whole bytes")]
    InvalidSegmentGeometry(usize),

    /// The stored checksum does not match the decoded payload.
    #[error("Checksum mismatch: stored {expected:#04x}, computed {computed:#04x}")]
    ChecksumMismatch {
        /// Checksum byte stored on the tag.
        expected: u8,
        /// Checksum recomputed from the decoded payload.
        computed: u8,
    },

    /// The layer band ended before the payload and checksum were read.
    #[error("Tag data ended before the payload was complete")]
    IncompleteData,
}
