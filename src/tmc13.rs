use crate::{
    command::Command,
    error::{Error, Result},
    frame::{self, DataBuf, FrameError, HEADER_LEN, ResponseLength, START_BYTE},
    registry::PortRegistry,
    status::{CommandFault, DeviceFault, DeviceWarning},
};

/// Answer to [`Command::RegisterHost`] when the device accepted the host.
const REGISTRATION_ACCEPTED: u8 = 0x01;

/// Addressing and framing settings of one session with a TMC13.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address of the TMC13 on the bus.
    pub device_address: u8,
    /// Address this host registers itself with.
    pub host_address: u8,
    /// Measurement channel sent with channel scoped requests. Default is `1`.
    pub channel: u8,
    /// How the length byte of answers is interpreted.
    pub response_length: ResponseLength,
}

impl SessionConfig {
    pub const fn new(device_address: u8, host_address: u8) -> Self {
        Self {
            device_address,
            host_address,
            channel: 1,
            response_length: ResponseLength::CommandAndData,
        }
    }

    pub const fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub const fn with_response_length(mut self, response_length: ResponseLength) -> Self {
        self.response_length = response_length;
        self
    }
}

/// You can create a Tmc13 using any interface which implements [embedded_io::Read],
/// [embedded_io::Write] & [embedded_io::ReadReady].
///
/// Each method performs at most one request and reads at most one answer, blocking on the
/// interface. Timeouts are the business of the interface and surface as [`Error::SerialError`].
/// Nothing is retried: after any error the session is idle again and the caller decides what
/// to do next.
///
/// The device and host addresses are fixed for the lifetime of the session, apart from
/// [`Self::register_host`] which may change the host address.
pub struct Tmc13<S>
where
    S: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady,
{
    interface: S,
    config: SessionConfig,
}

impl<S> Tmc13<S>
where
    S: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady,
{
    /// Create a new Tmc13 instance with the given interface and session settings.
    pub fn new(interface: S, config: SessionConfig) -> Self {
        Self { interface, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn device_address(&self) -> u8 {
        self.config.device_address
    }

    pub fn host_address(&self) -> u8 {
        self.config.host_address
    }

    pub fn channel(&self) -> u8 {
        self.config.channel
    }

    /// Give the interface back, ending the session.
    pub fn release(self) -> S {
        self.interface
    }

    /// Encode and write one request frame. Does not wait for an answer.
    pub fn send_data_frame(&mut self, command: impl Into<u16>, data: &[u8]) -> Result<(), S::Error> {
        let command = command.into();
        let frame = frame::encode_request(
            self.config.device_address,
            self.config.host_address,
            command,
            data,
        )?;
        log::trace!("TX 0x{command:04X}: {:02X?}", frame.as_slice());

        self.interface
            .write_all(&frame)
            .map_err(Error::SerialError)?;
        self.interface.flush().map_err(Error::SerialError)?;
        Ok(())
    }

    /// Read exactly one answer frame and return its data region.
    ///
    /// The start byte is checked as soon as it arrives. Once the checksum byte has been read
    /// the interface must have nothing else buffered, otherwise the stream is out of step with
    /// the length field and [`FrameError::TrailingBytes`] is returned.
    pub fn receive_data_frame(&mut self) -> Result<DataBuf, S::Error> {
        let mut header = [0u8; HEADER_LEN];

        self.interface.read_exact(&mut header[..1])?;
        if header[0] != START_BYTE {
            return Err(FrameError::InvalidStartByte(header[0]).into());
        }
        // Length, device, host and command echo.
        self.interface.read_exact(&mut header[1..])?;

        let data_len = self.config.response_length.data_len(header[1])?;
        let mut data = DataBuf::new();
        data.resize(data_len, 0)
            .map_err(|_| FrameError::InvalidLength(header[1]))?;
        self.interface.read_exact(&mut data)?;

        let mut checksum = [0u8; 1];
        self.interface.read_exact(&mut checksum)?;
        log::trace!(
            "RX {:02X?} {:02X?} {:02X}",
            &header[..],
            data.as_slice(),
            checksum[0]
        );

        frame::decode_response(&header, &data, checksum[0], self.config.response_length)?;

        if self.interface.read_ready().map_err(Error::SerialError)? {
            return Err(FrameError::TrailingBytes.into());
        }

        Ok(data)
    }

    /// Query a double value of the configured channel.
    ///
    /// The leading byte of the answer is skipped without being compared to the channel, see
    /// [`Self::get_double_value_and_channel`] to get hold of it.
    pub fn get_double_value(&mut self, command: impl Into<u16>) -> Result<f64, S::Error> {
        let (_, value) = self.query_channel_double(command.into())?;
        Ok(value)
    }

    /// Query a double value of the configured channel, returning the channel the device
    /// answered for alongside it.
    ///
    /// The echoed channel must match the configured one, otherwise
    /// [`Error::ChannelMismatch`] is returned.
    pub fn get_double_value_and_channel(
        &mut self,
        command: impl Into<u16>,
    ) -> Result<(u8, f64), S::Error> {
        let (channel, value) = self.query_channel_double(command.into())?;
        if channel != self.config.channel {
            return Err(Error::ChannelMismatch {
                expected: self.config.channel,
                actual: channel,
            });
        }
        Ok((channel, value))
    }

    /// Query a single byte value.
    pub fn get_byte_value(&mut self, command: impl Into<u16>) -> Result<u8, S::Error> {
        self.send_data_frame(command, &[])?;
        let answer = self.receive_data_frame()?;
        let value = *answer.first().ok_or(Error::ShortPayload {
            expected: 1,
            actual: 0,
        })?;
        Ok(value)
    }

    /// Query a single byte value of the configured channel, returning `(channel, value)`.
    ///
    /// The echoed channel is returned as is, it is not compared to the configured one.
    pub fn get_byte_value_and_channel(
        &mut self,
        command: impl Into<u16>,
    ) -> Result<(u8, u8), S::Error> {
        self.send_data_frame(command, &[self.config.channel])?;
        let answer = self.receive_data_frame()?;
        match answer.as_slice() {
            [channel, value, ..] => Ok((*channel, *value)),
            short => Err(Error::ShortPayload {
                expected: 2,
                actual: short.len(),
            }),
        }
    }

    /// Write a double value to the configured channel and confirm the device accepted it.
    pub fn set_double_value(&mut self, command: impl Into<u16>, value: f64) -> Result<(), S::Error> {
        let mut payload = [0u8; 9];
        payload[0] = self.config.channel;
        payload[1..].copy_from_slice(&value.to_be_bytes());

        self.send_data_frame(command, &payload)?;
        self.check_response_for_errors()?;
        Ok(())
    }

    /// Write a byte value to the configured channel and confirm the device accepted it.
    pub fn set_byte_value(&mut self, command: impl Into<u16>, value: u8) -> Result<(), S::Error> {
        self.send_data_frame(command, &[self.config.channel, value])?;
        self.check_response_for_errors()?;
        Ok(())
    }

    /// Read one answer and fail if its last byte is a known rejection code.
    ///
    /// Any other answer, including an empty one, is returned unchanged.
    pub fn check_response_for_errors(&mut self) -> Result<DataBuf, S::Error> {
        let answer = self.receive_data_frame()?;
        if let Some(fault) = answer.last().copied().and_then(CommandFault::from_code) {
            log::warn!("Command rejected by device: {fault}");
            return Err(Error::Command(fault));
        }
        Ok(answer)
    }

    /// Query the device error status.
    ///
    /// Codes missing from the [`DeviceFault`] table are treated as "no error".
    pub fn check_error_status(&mut self) -> Result<(), S::Error> {
        let code = self.query_status_code(Command::ErrorStatus)?;
        match DeviceFault::from_code(code) {
            Some(fault) => {
                log::warn!("Device fault 0x{code:04X}: {fault}");
                Err(Error::DeviceFault(fault))
            }
            None => {
                log::debug!("Error status 0x{code:04X}, no known fault");
                Ok(())
            }
        }
    }

    /// Query the device warning status.
    ///
    /// Warnings are non fatal for the device, the caller decides what to do with
    /// [`Error::Warning`] (see [`Error::is_warning`]). Codes missing from the
    /// [`DeviceWarning`] table are treated as "no warning".
    pub fn check_warning_status(&mut self) -> Result<(), S::Error> {
        let code = self.query_status_code(Command::WarningStatus)?;
        match DeviceWarning::from_code(code) {
            Some(warning) => {
                log::warn!("Device warning 0x{code:04X}: {warning}");
                Err(Error::Warning(warning))
            }
            None => {
                log::debug!("Warning status 0x{code:04X}, no known warning");
                Ok(())
            }
        }
    }

    /// Register as `host_address` with the device.
    ///
    /// The new address is only kept if the device accepts it, otherwise the previous
    /// host address stays in place.
    pub fn register_host(&mut self, host_address: u8) -> Result<(), S::Error> {
        let previous = core::mem::replace(&mut self.config.host_address, host_address);

        let answer = match self.get_byte_value(Command::RegisterHost) {
            Ok(answer) => answer,
            Err(err) => {
                self.config.host_address = previous;
                return Err(err);
            }
        };

        if answer == REGISTRATION_ACCEPTED {
            log::debug!(
                "Registered host 0x{host_address:02X} with device 0x{:02X}",
                self.config.device_address
            );
            return Ok(());
        }

        self.config.host_address = previous;
        log::warn!("Host 0x{host_address:02X} registration rejected, answer 0x{answer:02X}");
        match CommandFault::from_code(answer) {
            Some(fault) => Err(Error::Command(fault)),
            None => Err(Error::RegistrationRejected(answer)),
        }
    }

    /// One-time setup of the port behind this session.
    ///
    /// Registers the configured host address unless `registry` says `port_id` has already
    /// been set up by another session. Returns `true` if the setup ran.
    ///
    /// The port is claimed in `registry` before anything is sent, so a port id the registry
    /// can't hold never reaches the device. If registration fails the claim is dropped again.
    pub fn initialize<const N: usize>(
        &mut self,
        registry: &mut PortRegistry<N>,
        port_id: &str,
    ) -> Result<bool, S::Error> {
        if registry.is_initialized(port_id) {
            log::debug!("Port {port_id} already initialized, skipping host registration");
            return Ok(false);
        }

        registry.mark_initialized(port_id)?;
        if let Err(err) = self.register_host(self.config.host_address) {
            registry.release(port_id);
            return Err(err);
        }
        Ok(true)
    }

    fn query_channel_double(&mut self, command: u16) -> Result<(u8, f64), S::Error> {
        self.send_data_frame(command, &[self.config.channel])?;
        let answer = self.receive_data_frame()?;

        // One channel byte followed by a big endian f64.
        let short = Error::ShortPayload {
            expected: 9,
            actual: answer.len(),
        };
        let Some((channel, rest)) = answer.split_first() else {
            return Err(short);
        };
        let raw: [u8; 8] = match rest.get(..8).and_then(|r| r.try_into().ok()) {
            Some(raw) => raw,
            None => return Err(short),
        };
        Ok((*channel, f64::from_be_bytes(raw)))
    }

    /// Send a status query and pull the 16-bit code out of the last two answer bytes.
    fn query_status_code(&mut self, command: Command) -> Result<u16, S::Error> {
        self.send_data_frame(command, &[])?;
        let answer = self.receive_data_frame()?;
        match answer.as_slice() {
            [.., hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
            short => Err(Error::ShortPayload {
                expected: 2,
                actual: short.len(),
            }),
        }
    }
}
