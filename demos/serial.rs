use std::env;

use inquire::Select;
use prevac_tmc13::{
    registry::PortRegistry,
    tmc13::{SessionConfig, Tmc13},
};
use serialport::SerialPort;

// Configuration constants - adjust these for your setup
const BAUD_RATE: u32 = 57600;
// Answers arrive well within this, a missing answer shows up as a timeout error.
const SERIAL_TIMEOUT_MS: u64 = 500;
const DEVICE_ADDRESS: u8 = 0x01;
const HOST_ADDRESS: u8 = 0x20;
const CHANNEL: u8 = 1;
// Thickness reading of the configured channel, check the command list of your device.
const THICKNESS_COMMAND: u16 = 0x0201;

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

impl embedded_io::ReadReady for PortWrapper {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let waiting = self
            .0
            .bytes_to_read()
            .map_err(|e| IoError(e.into()))?;
        Ok(waiting > 0)
    }
}

fn main() {
    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    println!("Using port: {}", port_name);

    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(std::time::Duration::from_millis(SERIAL_TIMEOUT_MS))
        .open()
        .expect("Failed to open serial port");

    let port = PortWrapper(port);

    let config = SessionConfig::new(DEVICE_ADDRESS, HOST_ADDRESS).with_channel(CHANNEL);
    let mut tmc: Tmc13<PortWrapper> = Tmc13::new(port, config);

    // Register this host, once per port.
    let mut registry: PortRegistry = PortRegistry::new();
    let ran_setup = tmc.initialize(&mut registry, &port_name).unwrap();
    println!("Host registration performed: {}", ran_setup);

    // Status before measuring.
    match tmc.check_error_status() {
        Ok(()) => println!("No device fault reported"),
        Err(e) => println!("{}", e),
    }
    match tmc.check_warning_status() {
        Ok(()) => println!("No device warning reported"),
        Err(e) if e.is_warning() => println!("{}", e),
        Err(e) => panic!("Warning status query failed: {}", e),
    }

    let (channel, thickness) = tmc
        .get_double_value_and_channel(THICKNESS_COMMAND)
        .unwrap();
    println!("Channel {}: thickness {}", channel, thickness);
}
