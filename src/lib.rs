//! This crate provides an interface for communicating with the PREVAC TMC13 thickness monitor
//! using its V2.x binary protocol.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! The protocol is a framed, checksummed request/response exchange:
//!
//! ```text
//! [0xBB][LEN][DEV][HOST][CMD_MSB][CMD_LSB][DATA...][CHKSUM]
//! ```
//!
//! * [`frame`] - encoding and validation of frames, no I/O.
//! * [`tmc13`] - the session type, [`tmc13::Tmc13`], doing one exchange per call over any
//!   [`embedded_io`] interface and decoding typed values.
//! * [`status`] - command rejection, device fault and device warning tables.
//! * [`registry`] - tracks which ports already had their one-time setup.
//!
//! The serial port used for TMC13 comms is configured on the port itself (baud rate, timeout).
//! Read timeouts surface unchanged as [`error::Error::SerialError`].

#![cfg_attr(feature = "no-std", no_std)]

pub mod command;
pub mod error;
pub mod frame;
pub mod registry;
pub mod status;
pub mod tmc13;

#[cfg(test)]
mod mock_serial;
