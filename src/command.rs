//! Fixed command codes of the TMC13 V2.x protocol.
//!
//! Only the commands the interface itself issues live here. Measurement commands are
//! device configuration specific and can be passed to [`crate::tmc13::Tmc13`] as raw `u16`.

use strum_macros::EnumIter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u16)]
pub enum Command {
    /// __R__ - Query the active error code.
    ///
    /// Answer carries a 16-bit code, see [`DeviceFault`](crate::status::DeviceFault).
    ErrorStatus = 0x7F51,
    /// __R__ - Query the active warning code.
    ///
    /// Answer carries a 16-bit code, see [`DeviceWarning`](crate::status::DeviceWarning).
    WarningStatus = 0x7F52,
    /// __W__ - Register the sending host with the device.
    ///
    /// A single byte answer of `1` means the host was accepted.
    RegisterHost = 0x7FF0,
}

impl From<Command> for u16 {
    fn from(value: Command) -> Self {
        value as u16
    }
}
