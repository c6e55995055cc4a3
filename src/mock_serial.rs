//! We use this mocking module in unit tests to emulate a serial port.

use thiserror::Error;

const BUFFER_CAPACITY: usize = 1024;

/// Our mock type used to emulate a serial port.
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, BUFFER_CAPACITY>,
    /// Buffer containing pre-configured response data to be read
    read_buffer: heapless::Vec<u8, BUFFER_CAPACITY>,
    /// Current position in the read buffer
    read_position: usize,
    /// Largest number of bytes handed out by a single read() call
    max_read_chunk: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Error, Debug)]
pub enum MockSerialError {
    /// Simulated timeout error, also returned once the read buffer is exhausted
    #[error("Timeout")]
    Timeout,
    /// Simulated buffer overflow
    #[error("Buffer overflow")]
    BufferOverflow,
    /// Generic simulated error for testing
    #[error("Simulated error")]
    SimulatedError,
}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::Timeout => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::Timeout);
        }

        let available_bytes = self.read_buffer.len() - self.read_position;
        let bytes_to_read = buf.len().min(available_bytes).min(self.max_read_chunk);

        buf[..bytes_to_read].copy_from_slice(
            &self.read_buffer[self.read_position..self.read_position + bytes_to_read],
        );

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(self.read_position < self.read_buffer.len())
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            max_read_chunk: usize::MAX,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Set the data that will be returned when read() is called
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.append_read_data(data)
    }

    /// Queue more data behind whatever is still unread
    pub fn append_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Number of bytes queued but not yet read
    pub fn unread_len(&self) -> usize {
        self.read_buffer.len() - self.read_position
    }

    /// Hand out at most `chunk` bytes per read() call, like a slow UART would
    pub fn set_max_read_chunk(&mut self, chunk: usize) {
        self.max_read_chunk = chunk.max(1);
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Read, ReadReady, Write};

    #[test]
    fn test_write_data() {
        let mut mock = MockSerial::new();
        mock.write_all(b"Hello, ").unwrap();
        mock.write_all(b"World!").unwrap();
        assert_eq!(mock.written_data(), b"Hello, World!");

        mock.clear_written_data();
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn test_read_in_chunks() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Hello World").unwrap();
        mock.set_max_read_chunk(2);

        let mut buffer = [0u8; 5];
        assert_eq!(mock.read(&mut buffer).unwrap(), 2);
        assert_eq!(&buffer[..2], b"He");

        // read_exact keeps going until the buffer is full.
        let mut rest = [0u8; 9];
        mock.read_exact(&mut rest).unwrap();
        assert_eq!(&rest, b"llo World");
    }

    #[test]
    fn test_read_ready_tracks_unread_bytes() {
        let mut mock = MockSerial::new();
        assert!(!mock.read_ready().unwrap());

        mock.set_read_data(b"ab").unwrap();
        assert!(mock.read_ready().unwrap());

        let mut buffer = [0u8; 2];
        mock.read_exact(&mut buffer).unwrap();
        assert!(!mock.read_ready().unwrap());
        assert_eq!(mock.unread_len(), 0);
    }

    #[test]
    fn test_read_timeout_when_exhausted() {
        let mut mock = MockSerial::new();
        let mut buffer = [0u8; 4];
        assert!(matches!(mock.read(&mut buffer), Err(MockSerialError::Timeout)));
    }

    #[test]
    fn test_error_simulation() {
        let mut mock = MockSerial::new();
        mock.set_write_error(true);
        assert!(matches!(mock.write(b"test"), Err(MockSerialError::SimulatedError)));
        assert!(mock.flush().is_err());
        assert!(mock.written_data().is_empty());

        mock.set_read_data(b"data").unwrap();
        mock.set_read_error(true);
        let mut buffer = [0u8; 4];
        assert!(matches!(mock.read(&mut buffer), Err(MockSerialError::SimulatedError)));
    }
}
