//! Status codes reported by the TMC13.
//!
//! There are three disjoint tables:
//! * [`CommandFault`] - single byte appended to an answer when the device refused a command.
//! * [`DeviceFault`] - 16-bit code returned by the error status query.
//! * [`DeviceWarning`] - 16-bit code returned by the warning status query.
//!
//! Codes missing from a table are not errors, the device is assumed to only report
//! documented codes.

use strum::EnumMessage;
use strum_macros::{EnumCount, EnumIter, EnumMessage, FromRepr};

/// Rejection codes the device appends as the last byte of a command answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumIter, EnumCount, EnumMessage)]
#[repr(u8)]
pub enum CommandFault {
    #[strum(message = "Value is too large")]
    ValueTooLarge = 0x91,
    #[strum(message = "Value is too small")]
    ValueTooSmall = 0x92,
    #[strum(message = "Wrong parameter")]
    WrongParameter = 0x93,
    #[strum(message = "Parameter is read only")]
    ReadOnly = 0x94,
    #[strum(message = "Host is not registered")]
    HostUnknown = 0x95,
    #[strum(message = "Host is not authorized")]
    HostNotAuthorized = 0x96,
    #[strum(message = "Device is in local mode")]
    LocalMode = 0x97,
    #[strum(message = "Operation is not available")]
    OperationUnavailable = 0x98,
}

impl CommandFault {
    /// Look up a fault byte, `None` if it is not a known rejection code.
    pub const fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }

    pub const fn code(&self) -> u8 {
        *self as u8
    }

    pub fn message(&self) -> &'static str {
        self.get_message().unwrap_or("Unknown command fault")
    }
}

impl core::fmt::Display for CommandFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Hardware and communication faults returned by the error status query.
///
/// The numbering is provisional and grouped by category, it is not taken from the
/// published firmware table. Check the codes against your device manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumIter, EnumCount, EnumMessage)]
#[repr(u16)]
pub enum DeviceFault {
    // Communication.
    #[strum(message = "Internal communication error")]
    InternalCommunication = 0x0001,
    #[strum(message = "Measurement board is not responding")]
    MeasurementBoardTimeout = 0x0002,
    #[strum(message = "Configuration memory is corrupted")]
    ConfigurationCorrupted = 0x0003,
    #[strum(message = "Frame buffer overflow")]
    FrameBufferOverflow = 0x0004,

    // Crystal heads.
    #[strum(message = "Crystal head 1 is not connected")]
    Head1Disconnected = 0x0101,
    #[strum(message = "Crystal head 2 is not connected")]
    Head2Disconnected = 0x0102,
    #[strum(message = "Crystal failure on head 1")]
    Head1CrystalFailure = 0x0103,
    #[strum(message = "Crystal failure on head 2")]
    Head2CrystalFailure = 0x0104,
    #[strum(message = "Crystal life limit reached")]
    CrystalLifeLimit = 0x0105,
    #[strum(message = "Oscillator frequency out of range")]
    OscillatorOutOfRange = 0x0106,

    // Power.
    #[strum(message = "Power supply fault")]
    PowerSupply = 0x0201,
    #[strum(message = "Relay output fault")]
    Relay = 0x0202,
    #[strum(message = "Analog output overload")]
    AnalogOutputOverload = 0x0203,

    // Vacuum gauges.
    #[strum(message = "Vacuum gauge 1 is not connected")]
    Gauge1Disconnected = 0x0301,
    #[strum(message = "Vacuum gauge 2 is not connected")]
    Gauge2Disconnected = 0x0302,
    #[strum(message = "Vacuum gauge head on channel 1 does not match the configured type")]
    Gauge1HeadMismatch = 0x0303,
    #[strum(message = "Vacuum gauge head on channel 2 does not match the configured type")]
    Gauge2HeadMismatch = 0x0304,
    #[strum(message = "Vacuum gauge sensor failure")]
    GaugeSensorFailure = 0x0305,
}

impl DeviceFault {
    /// Look up a 16-bit error code, `None` if the code is not in the table.
    pub const fn from_code(code: u16) -> Option<Self> {
        Self::from_repr(code)
    }

    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub fn message(&self) -> &'static str {
        self.get_message().unwrap_or("Unknown device fault")
    }
}

impl core::fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Non fatal conditions returned by the warning status query.
///
/// The numbering is provisional and grouped by category, it is not taken from the
/// published firmware table. Check the codes against your device manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumIter, EnumCount, EnumMessage)]
#[repr(u16)]
pub enum DeviceWarning {
    #[strum(message = "Low disk space")]
    LowDiskSpace = 0x0001,
    #[strum(message = "Internal temperature is high")]
    InternalTemperatureHigh = 0x0002,
    #[strum(message = "Crystal head temperature is high")]
    HeadTemperatureHigh = 0x0003,
    #[strum(message = "DC current limit reached")]
    DcCurrentLimit = 0x0101,
    #[strum(message = "Emission current limit reached")]
    EmissionCurrentLimit = 0x0102,
    #[strum(message = "Interlock is open")]
    InterlockOpen = 0x0201,
    #[strum(message = "Water flow interlock is open")]
    WaterInterlockOpen = 0x0202,
    #[strum(message = "Vacuum interlock is open")]
    VacuumInterlockOpen = 0x0203,
}

impl DeviceWarning {
    /// Look up a 16-bit warning code, `None` if the code is not in the table.
    pub const fn from_code(code: u16) -> Option<Self> {
        Self::from_repr(code)
    }

    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub fn message(&self) -> &'static str {
        self.get_message().unwrap_or("Unknown device warning")
    }
}

impl core::fmt::Display for DeviceWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
