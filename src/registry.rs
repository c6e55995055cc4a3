//! Tracks which physical ports have already received their one-time setup.
//!
//! Several [`Tmc13`](crate::tmc13::Tmc13) sessions (one per channel, say) may end up sharing
//! one serial port. Host registration only has to happen once per port, so the caller keeps
//! one `PortRegistry` and hands it to every session it initializes.

use thiserror::Error;

/// Longest port identifier accepted, e.g. `/dev/ttyUSB0` or `COM12`.
pub const MAX_PORT_ID_LEN: usize = 32;

type PortId = heapless::String<MAX_PORT_ID_LEN>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Port registry is full")]
    Full,
    #[error("Port identifier is longer than {MAX_PORT_ID_LEN} bytes")]
    PortIdTooLong,
}

/// Fixed capacity set of initialized ports. `N` is the number of ports that can be tracked.
#[derive(Debug, Default)]
pub struct PortRegistry<const N: usize = 8> {
    initialized: heapless::Vec<PortId, N>,
}

impl<const N: usize> PortRegistry<N> {
    pub fn new() -> Self {
        Self {
            initialized: heapless::Vec::new(),
        }
    }

    /// Whether `port` has already been set up.
    pub fn is_initialized(&self, port: &str) -> bool {
        self.initialized.iter().any(|p| p.as_str() == port)
    }

    /// Mark `port` as set up.
    ///
    /// Returns `true` if the port was not marked before.
    pub fn mark_initialized(&mut self, port: &str) -> Result<bool, RegistryError> {
        if self.is_initialized(port) {
            return Ok(false);
        }
        let id = PortId::try_from(port).map_err(|_| RegistryError::PortIdTooLong)?;
        self.initialized
            .push(id)
            .map_err(|_| RegistryError::Full)?;
        Ok(true)
    }

    /// Forget `port`, e.g. after it was closed. The next session on it runs setup again.
    ///
    /// Returns `true` if the port was known.
    pub fn release(&mut self, port: &str) -> bool {
        match self.initialized.iter().position(|p| p.as_str() == port) {
            Some(idx) => {
                self.initialized.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.initialized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initialized.is_empty()
    }
}
