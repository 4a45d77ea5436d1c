//! Stream framing for carrying commands and notifications over a byte stream.
//!
//! BLE writes and notifications are message-oriented; a serial line or TCP
//! socket is not. Each message is therefore prefixed with a direction header
//! and a 2-byte length (little-endian).
//!
//! ```text
//! +--------+--------+--------+-------------------+
//! | header | len_lo | len_hi | data[0..len]      |
//! +--------+--------+--------+-------------------+
//! ```
//!
//! The header is `'<'` for host → device frames and `'>'` for device → host.

use bytes::{Buf, BufMut, BytesMut};

use crate::constants::{MAX_COMMAND_SIZE, NOTIFICATION_SIZE};

/// Largest payload a frame may carry.
pub const MAX_FRAME_PAYLOAD: usize = if MAX_COMMAND_SIZE > NOTIFICATION_SIZE {
    MAX_COMMAND_SIZE
} else {
    NOTIFICATION_SIZE
};

/// Header + length prefix.
const FRAME_OVERHEAD: usize = 3;

/// Direction a frame travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Commands written by the host.
    HostToDevice,
    /// Notifications sent by the device.
    DeviceToHost,
}

impl Direction {
    /// Header byte that starts frames in this direction.
    pub fn header(self) -> u8 {
        match self {
            Direction::HostToDevice => b'<',
            Direction::DeviceToHost => b'>',
        }
    }
}

/// Accumulates stream bytes and splits them into frames travelling in one direction.
#[derive(Debug)]
pub struct FrameCodec {
    direction: Direction,
    buffer: BytesMut,
}

impl FrameCodec {
    /// Create a codec that decodes frames travelling in `direction`.
    pub fn new(direction: Direction) -> Self {
        FrameCodec {
            direction,
            buffer: BytesMut::with_capacity(4 * (FRAME_OVERHEAD + MAX_FRAME_PAYLOAD)),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode a complete frame from the buffer.
    ///
    /// Bytes before a header are discarded. A header announcing a payload
    /// larger than [`MAX_FRAME_PAYLOAD`] is treated as garbage and skipped.
    /// Returns `None` if more data is needed.
    pub fn decode(&mut self) -> Option<Vec<u8>> {
        let header = self.direction.header();
        loop {
            while !self.buffer.is_empty() && self.buffer[0] != header {
                self.buffer.advance(1);
            }

            if self.buffer.len() < FRAME_OVERHEAD {
                return None;
            }

            let len = u16::from_le_bytes([self.buffer[1], self.buffer[2]]) as usize;
            if len > MAX_FRAME_PAYLOAD {
                log::debug!("skipping frame header announcing {} bytes", len);
                self.buffer.advance(1);
                continue;
            }

            if self.buffer.len() < FRAME_OVERHEAD + len {
                return None;
            }

            self.buffer.advance(FRAME_OVERHEAD);
            return Some(self.buffer.split_to(len).to_vec());
        }
    }

    /// Encode `data` as a frame travelling in `direction`.
    pub fn encode(direction: Direction, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_OVERHEAD + data.len());
        buf.push(direction.header());
        buf.put_u16_le(data.len() as u16);
        buf.extend_from_slice(data);
        buf
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_codec_encode_decode() {
        let mut codec = FrameCodec::new(Direction::HostToDevice);

        let data = [0x24, 0x01, 0x02, 0x27];
        let encoded = FrameCodec::encode(Direction::HostToDevice, &data);

        assert_eq!(encoded.len(), 3 + data.len());
        assert_eq!(encoded[0], b'<');
        assert_eq!(encoded[1], data.len() as u8);
        assert_eq!(encoded[2], 0);

        codec.push(&encoded);
        let decoded = codec.decode().expect("should decode frame");
        assert_eq!(decoded, data);
        assert_eq!(codec.buffered_len(), 0);
    }

    #[test]
    fn test_frame_codec_partial() {
        let mut codec = FrameCodec::new(Direction::DeviceToHost);
        let data = [0xAB; NOTIFICATION_SIZE];
        let encoded = FrameCodec::encode(Direction::DeviceToHost, &data);

        codec.push(&encoded[..4]);
        assert!(codec.decode().is_none());

        codec.push(&encoded[4..]);
        assert_eq!(codec.decode().expect("should decode frame"), data);
    }

    #[test]
    fn test_frame_codec_multiple_with_garbage() {
        let mut codec = FrameCodec::new(Direction::HostToDevice);

        codec.push(b"noise");
        codec.push(&FrameCodec::encode(Direction::HostToDevice, &[0x01, 0x00, 0x01]));
        codec.push(&FrameCodec::encode(Direction::HostToDevice, &[0x26, 0x00, 0x26]));

        assert_eq!(codec.decode().unwrap(), vec![0x01, 0x00, 0x01]);
        assert_eq!(codec.decode().unwrap(), vec![0x26, 0x00, 0x26]);
        assert!(codec.decode().is_none());
    }

    #[test]
    fn test_frame_codec_ignores_other_direction() {
        let mut codec = FrameCodec::new(Direction::HostToDevice);
        codec.push(&FrameCodec::encode(Direction::DeviceToHost, &[0x01, 0x02]));
        assert!(codec.decode().is_none());
    }

    #[test]
    fn test_frame_codec_skips_oversized_header() {
        let mut codec = FrameCodec::new(Direction::HostToDevice);
        codec.push(&[b'<', 0xFF, 0x00]);
        codec.push(&FrameCodec::encode(Direction::HostToDevice, &[0x41, 0x00, 0x41]));
        assert_eq!(codec.decode().unwrap(), vec![0x41, 0x00, 0x41]);
    }
}
