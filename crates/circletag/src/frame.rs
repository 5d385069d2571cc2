use crate::errors::CircleTagError;

/// Largest payload the one-byte length prefix can describe.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Shortest frame that renders as a readable tag.
///
/// Below this the encoder draws a solid ring with no orientation notch and
/// no layer markers: a tag that is visibly present but carries nothing.
pub(crate) const MIN_DATA_FRAME_LEN: usize = 3;

/// Wrapping 8-bit sum of `bytes`.
///
/// The same function validates the payload on both codec sides, so the
/// checksum survives only when every decoded payload byte matches.
pub fn calculate_hash(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Frames `payload` as `[length][payload..][checksum]`, zero-padded on the
/// right to a multiple of `bytes_per_layer`.
pub(crate) fn encode_frame(
    payload: &[u8],
    bytes_per_layer: usize,
) -> Result<Vec<u8>, CircleTagError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(CircleTagError::PayloadTooLarge(payload.len()));
    }
    let mut frame = Vec::with_capacity(payload.len() + 2 + bytes_per_layer);
    frame.push(payload.len() as u8);
    frame.extend_from_slice(payload);
    frame.push(calculate_hash(payload));
    let partial = frame.len() % bytes_per_layer;
    if partial != 0 {
        frame.resize(frame.len() + bytes_per_layer - partial, 0);
    }
    Ok(frame)
}

/// Ring plus data layers needed to hold `frame_len` bytes.
///
/// Computed from the padded frame length; every frame byte gets a layer
/// slot and layer 0 stays reserved for the orientation ring.
pub(crate) fn layer_count(frame_len: usize, bytes_per_layer: usize) -> usize {
    frame_len / bytes_per_layer + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_wraps_at_byte_range() {
        assert_eq!(calculate_hash(&[]), 0);
        assert_eq!(calculate_hash(&[0x41, 0x42]), 0x83);
        assert_eq!(calculate_hash(&[200, 100]), 44);
        assert_eq!(calculate_hash(&[255, 1]), 0);
    }

    #[test]
    fn frame_layout() -> Result<(), CircleTagError> {
        let frame = encode_frame(&[0x41, 0x42], 3)?;
        assert_eq!(frame, vec![2, 0x41, 0x42, 0x83, 0, 0]);
        Ok(())
    }

    #[test]
    fn frame_without_padding() -> Result<(), CircleTagError> {
        // length + payload + checksum already fill whole layers
        assert_eq!(encode_frame(&[7], 3)?, vec![1, 7, 7]);
        assert_eq!(encode_frame(&[1, 2, 3, 4], 3)?, vec![4, 1, 2, 3, 4, 10]);
        Ok(())
    }

    #[test]
    fn empty_payload_frame() -> Result<(), CircleTagError> {
        assert_eq!(encode_frame(&[], 3)?, vec![0, 0, 0]);
        assert_eq!(encode_frame(&[], 1)?, vec![0, 0]);
        Ok(())
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; 256];
        assert_eq!(
            encode_frame(&payload, 3),
            Err(CircleTagError::PayloadTooLarge(256))
        );
    }

    #[test]
    fn layer_count_includes_ring() {
        assert_eq!(layer_count(6, 3), 3);
        assert_eq!(layer_count(3, 3), 2);
        assert_eq!(layer_count(264, 8), 34);
    }
}
