use crate::types::{FrameBatch, PanelFrame, ProtocolVersion};
use bytes::{BufMut, Bytes, BytesMut};

/// Number of frames per panel in a v1 message. The device only accepts one.
pub const V1_FRAMES_PER_PANEL: u8 = 1;

/// Size of one panel entry in a v1 message
pub const V1_PANEL_SIZE: usize = 7;

/// Size of one panel entry in a v2 message
pub const V2_PANEL_SIZE: usize = 8;

/// Encode a batch into one external control datagram.
///
/// All fields are little-endian. Values wider than their field are
/// truncated, never rejected.
///
/// ```text
/// v1: [count u8]  ([id u8][frames u8][R][G][B][W][transition u8])*
/// v2: [count u16] ([id u16][R][G][B][W][transition u16])*
/// ```
pub fn encode(version: ProtocolVersion, batch: &FrameBatch) -> Bytes {
    let mut buf = BytesMut::with_capacity(encoded_len(version, batch));
    match version {
        ProtocolVersion::V1 => {
            buf.put_u8(batch.len() as u8);
            for panel in batch.iter() {
                encode_v1_panel(panel, &mut buf);
            }
        }
        ProtocolVersion::V2 => {
            buf.put_u16_le(batch.len() as u16);
            for panel in batch.iter() {
                encode_v2_panel(panel, &mut buf);
            }
        }
    }
    buf.freeze()
}

/// Byte length of the datagram `encode` produces
pub fn encoded_len(version: ProtocolVersion, batch: &FrameBatch) -> usize {
    match version {
        ProtocolVersion::V1 => 1 + batch.len() * V1_PANEL_SIZE,
        ProtocolVersion::V2 => 2 + batch.len() * V2_PANEL_SIZE,
    }
}

fn encode_v1_panel(panel: &PanelFrame, buf: &mut BytesMut) {
    let color = &panel.frame;
    buf.put_u8(panel.id as u8);
    buf.put_u8(V1_FRAMES_PER_PANEL);
    buf.put_u8(color.red as u8);
    buf.put_u8(color.green as u8);
    buf.put_u8(color.blue as u8);
    buf.put_u8(color.white as u8);
    buf.put_u8(color.transition as u8);
}

fn encode_v2_panel(panel: &PanelFrame, buf: &mut BytesMut) {
    let color = &panel.frame;
    buf.put_u16_le(panel.id as u16);
    buf.put_u8(color.red as u8);
    buf.put_u8(color.green as u8);
    buf.put_u8(color.blue as u8);
    buf.put_u8(color.white as u8);
    buf.put_u16_le(color.transition as u16);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameColor;

    fn single(id: u32, color: FrameColor) -> FrameBatch {
        let mut batch = FrameBatch::new();
        batch.push(id, color);
        batch
    }

    #[test]
    fn test_encode_v2_single_red_panel() {
        let batch = single(1, FrameColor::new(255, 0, 0, 0, 1));
        let bytes = encode(ProtocolVersion::V2, &batch);
        assert_eq!(
            bytes.as_ref(),
            &[0x01, 0x00, 0x01, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn test_encode_v1_single_panel() {
        let batch = single(42, FrameColor::new(10, 20, 30, 40, 5));
        let bytes = encode(ProtocolVersion::V1, &batch);
        assert_eq!(bytes.as_ref(), &[0x01, 42, 0x01, 10, 20, 30, 40, 5]);
    }

    #[test]
    fn test_encode_v1_keeps_order() {
        let mut batch = FrameBatch::new();
        batch
            .push(3, FrameColor::rgb(1, 1, 1, 0))
            .push(1, FrameColor::rgb(2, 2, 2, 0))
            .push(3, FrameColor::rgb(3, 3, 3, 0));

        let bytes = encode(ProtocolVersion::V1, &batch);
        assert_eq!(bytes.len(), encoded_len(ProtocolVersion::V1, &batch));
        assert_eq!(bytes[0], 3);

        let ids: Vec<u8> = bytes[1..].chunks(V1_PANEL_SIZE).map(|p| p[0]).collect();
        let reds: Vec<u8> = bytes[1..].chunks(V1_PANEL_SIZE).map(|p| p[2]).collect();
        assert_eq!(ids, vec![3, 1, 3]);
        assert_eq!(reds, vec![1, 2, 3]);
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        let batch: FrameBatch = (1..=5)
            .map(|id| crate::types::PanelFrame::new(id, FrameColor::new(id, 0, 0, 0, 1)))
            .collect();

        let v1 = encode(ProtocolVersion::V1, &batch);
        assert_eq!(v1.len(), encoded_len(ProtocolVersion::V1, &batch));
        assert_eq!(v1.len(), 1 + 5 * 7);

        let v2 = encode(ProtocolVersion::V2, &batch);
        assert_eq!(v2.len(), encoded_len(ProtocolVersion::V2, &batch));
        assert_eq!(v2.len(), 2 + 5 * 8);

        // every v1 entry: id, one frame, R, G, B, W, transition
        for (i, entry) in v1[1..].chunks(V1_PANEL_SIZE).enumerate() {
            let id = i as u8 + 1;
            assert_eq!(entry, &[id, 1, id, 0, 0, 0, 1]);
        }
    }

    #[test]
    fn test_encode_v2_wide_fields_little_endian() {
        let batch = single(0x0102, FrameColor::new(1, 2, 3, 4, 0x0A0B));
        let bytes = encode(ProtocolVersion::V2, &batch);
        assert_eq!(
            bytes.as_ref(),
            &[0x01, 0x00, 0x02, 0x01, 1, 2, 3, 4, 0x0B, 0x0A]
        );
    }

    #[test]
    fn test_truncates_out_of_range_values() {
        let batch = single(257, FrameColor::new(256, 511, 0x1_00FF, 300, 256));

        let v1 = encode(ProtocolVersion::V1, &batch);
        assert_eq!(v1.as_ref(), &[0x01, 0x01, 0x01, 0x00, 0xFF, 0xFF, 0x2C, 0x00]);

        let v2 = encode(ProtocolVersion::V2, &batch);
        assert_eq!(
            v2.as_ref(),
            &[0x01, 0x00, 0x01, 0x01, 0x00, 0xFF, 0xFF, 0x2C, 0x00, 0x01]
        );
    }

    #[test]
    fn test_v2_panel_count_above_255() {
        let batch: FrameBatch = (0..300)
            .map(|id| crate::types::PanelFrame::new(id, FrameColor::default()))
            .collect();

        let v2 = encode(ProtocolVersion::V2, &batch);
        assert_eq!(&v2[..2], &[0x2C, 0x01]);
        assert_eq!(v2.len(), 2 + 300 * V2_PANEL_SIZE);

        // v1 count wraps like every other field
        let v1 = encode(ProtocolVersion::V1, &batch);
        assert_eq!(v1[0], 44);
    }

    #[test]
    fn test_empty_batch_encodes_header_only() {
        let batch = FrameBatch::new();
        assert_eq!(encode(ProtocolVersion::V1, &batch).as_ref(), &[0x00]);
        assert_eq!(encode(ProtocolVersion::V2, &batch).as_ref(), &[0x00, 0x00]);
    }
}
