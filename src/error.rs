//! Our error types for the TMC13 driver.

use thiserror::Error;

use crate::{
    frame::FrameError,
    registry::RegistryError,
    status::{CommandFault, DeviceFault, DeviceWarning},
};

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for TMC13 communications.
///
/// None of these are retried by the driver, every one of them ends the exchange that raised it.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Serial port closed in the middle of a frame")]
    UnexpectedEof,
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("Command rejected: {0}")]
    Command(CommandFault),
    #[error("Device fault 0x{code:04X}: {0}", code = .0.code())]
    DeviceFault(DeviceFault),
    #[error("Device warning 0x{code:04X}: {0}", code = .0.code())]
    Warning(DeviceWarning),
    #[error("Answer too short, expected at least {expected} bytes, got {actual}")]
    ShortPayload { expected: usize, actual: usize },
    #[error("Answer is for channel {actual}, expected channel {expected}")]
    ChannelMismatch { expected: u8, actual: u8 },
    #[error("Host registration rejected with answer 0x{0:02X}")]
    RegistrationRejected(u8),
    #[error("Port registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl<I: embedded_io::Error> Error<I> {
    /// `true` for [`Error::Warning`], which the device reports as non fatal.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::Warning(_))
    }
}

impl<I: embedded_io::Error> From<embedded_io::ReadExactError<I>> for Error<I> {
    fn from(err: embedded_io::ReadExactError<I>) -> Self {
        match err {
            embedded_io::ReadExactError::UnexpectedEof => Error::UnexpectedEof,
            embedded_io::ReadExactError::Other(e) => Error::SerialError(e),
        }
    }
}
