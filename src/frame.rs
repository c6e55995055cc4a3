//! Byte level encoding and validation of TMC13 V2.x frames.
//!
//! Every frame on the wire has the same layout in both directions:
//!
//! ```text
//! +------+-----+-----+------+---------+---------+-----------+--------+
//! | 0xBB | LEN | DEV | HOST | CMD_MSB | CMD_LSB | DATA ...  | CHKSUM |
//! +------+-----+-----+------+---------+---------+-----------+--------+
//! ```
//!
//! `LEN` counts the two command bytes plus the data bytes. The checksum is the
//! 8-bit wrapping sum of everything from `DEV` up to and including the last data byte.
//!
//! Nothing in here touches the transport, see [`crate::tmc13::Tmc13`] for that.

use thiserror::Error;

/// First byte of every frame.
pub const START_BYTE: u8 = 0xBB;

/// Start, length, device, host and both command bytes.
pub const HEADER_LEN: usize = 6;

/// Largest data region which still fits the single byte length field.
pub const MAX_DATA_LEN: usize = u8::MAX as usize - 2;

/// Largest possible frame, header + data + checksum.
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_DATA_LEN + 1;

/// Buffer type holding a complete encoded frame.
pub type FrameBuf = heapless::Vec<u8, MAX_FRAME_LEN>;

/// Buffer type holding the data region of a received frame.
///
/// Sized for the full range of the length byte, answers read with
/// [`ResponseLength::DataOnly`] can carry up to 255 data bytes.
pub type DataBuf = heapless::Vec<u8, { u8::MAX as usize }>;

/// Errors raised while building or validating a frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid start byte 0x{0:02X}, expected 0xBB")]
    InvalidStartByte(u8),
    #[error("Unread bytes left in the receive buffer after a complete frame")]
    TrailingBytes,
    #[error("Checksum mismatch: computed 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch { expected: u8, received: u8 },
    #[error("Payload of {0} bytes does not fit in a frame")]
    PayloadTooLong(usize),
    #[error("Length field 0x{0:02X} does not match the frame")]
    InvalidLength(u8),
}

/// How the `LEN` byte of a response maps onto the number of data bytes that follow the
/// command echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseLength {
    /// `LEN` counts the two command bytes plus the data, same as in requests.
    #[default]
    CommandAndData,
    /// `LEN` counts only the data bytes.
    DataOnly,
}

impl ResponseLength {
    /// Number of data bytes announced by a received length byte.
    pub const fn data_len(&self, len: u8) -> Result<usize, FrameError> {
        match self {
            ResponseLength::CommandAndData => {
                if len < 2 {
                    Err(FrameError::InvalidLength(len))
                } else {
                    Ok(len as usize - 2)
                }
            }
            ResponseLength::DataOnly => Ok(len as usize),
        }
    }
}

/// 8-bit wrapping sum of `bytes`.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Build a request frame.
///
/// Fails with [`FrameError::PayloadTooLong`] if `data` is longer than [`MAX_DATA_LEN`].
pub fn encode_request(
    device_address: u8,
    host_address: u8,
    command: u16,
    data: &[u8],
) -> Result<FrameBuf, FrameError> {
    if data.len() > MAX_DATA_LEN {
        return Err(FrameError::PayloadTooLong(data.len()));
    }

    let [msb, lsb] = command.to_be_bytes();
    let too_long = |_| FrameError::PayloadTooLong(data.len());
    let mut frame = FrameBuf::new();
    frame
        .extend_from_slice(&[
            START_BYTE,
            (data.len() + 2) as u8,
            device_address,
            host_address,
            msb,
            lsb,
        ])
        .map_err(too_long)?;
    frame.extend_from_slice(data).map_err(too_long)?;
    let sum = checksum(&frame[2..]);
    frame
        .push(sum)
        .map_err(|_| FrameError::PayloadTooLong(data.len()))?;

    Ok(frame)
}

/// Validate a received frame and hand back its data region.
///
/// `header` is the six bytes from the start byte up to the command echo. The start byte
/// is checked before anything else, then the length byte must announce exactly `data.len()`
/// bytes under `response_length`.
pub fn decode_response<'a>(
    header: &[u8; HEADER_LEN],
    data: &'a [u8],
    received_checksum: u8,
    response_length: ResponseLength,
) -> Result<&'a [u8], FrameError> {
    if header[0] != START_BYTE {
        return Err(FrameError::InvalidStartByte(header[0]));
    }
    if response_length.data_len(header[1])? != data.len() {
        return Err(FrameError::InvalidLength(header[1]));
    }

    let expected = checksum(&header[2..]).wrapping_add(checksum(data));
    if expected != received_checksum {
        return Err(FrameError::ChecksumMismatch {
            expected,
            received: received_checksum,
        });
    }

    Ok(data)
}

/// Split a complete encoded frame back into the parts [`decode_response`] expects.
///
/// Returns `None` if `frame` is too short to hold a header and checksum.
pub fn split_frame(frame: &[u8]) -> Option<(&[u8; HEADER_LEN], &[u8], u8)> {
    if frame.len() < HEADER_LEN + 1 {
        return None;
    }
    let (header, rest) = frame.split_at(HEADER_LEN);
    let (data, checksum) = rest.split_at(rest.len() - 1);
    Some((header.try_into().ok()?, data, checksum[0]))
}
