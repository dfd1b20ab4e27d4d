mod usb;

pub use usb::UsbTransport;

use thiserror::Error;

/// A packetized byte source for one card reader session.
///
/// Implementations return one bounded chunk per call and must report an
/// elapsed read window as `TransportError::Timeout` so the accumulator can
/// tell "no card present" apart from a lost device.
pub trait Transport {
    fn read_chunk(&mut self) -> Result<Vec<u8>, TransportError>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("read timed out")]
    Timeout,
    #[error("USB error: {0}")]
    Usb(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Timeouts are the expected idle condition; everything else is fatal.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}
