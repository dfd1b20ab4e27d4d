//! USB HID transport implementation.
//!
//! This module provides a `Transport` backed by a hidapi device handle. It
//! owns device selection and the bounded interrupt reads, emitting raw byte
//! chunks for the accumulator. The handle is acquired once and held for the
//! process lifetime; a lost device surfaces as a fatal transport error.

use hidapi::{HidApi, HidDevice};

use super::{Transport, TransportError};

/// Largest interrupt packet the supported readers emit.
pub const MAX_PACKET_SIZE: usize = 64;
/// Read window per chunk; an elapsed window maps to `TransportError::Timeout`.
pub const READ_TIMEOUT_MS: i32 = 250;

pub struct UsbTransport {
    device: HidDevice,
}

impl UsbTransport {
    /// Open the reader identified by `vendor_id:product_id`.
    ///
    /// Fails with a fatal transport error when the device is missing or
    /// cannot be claimed; no retry is attempted at this layer.
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|err| TransportError::Usb(err.to_string()))?;
        let device = api.open(vendor_id, product_id).map_err(|err| {
            TransportError::Usb(format!(
                "device {vendor_id:04x}:{product_id:04x}: {err}"
            ))
        })?;
        Ok(Self { device })
    }
}

impl Transport for UsbTransport {
    fn read_chunk(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut chunk = vec![0u8; MAX_PACKET_SIZE];
        match self.device.read_timeout(&mut chunk, READ_TIMEOUT_MS) {
            Ok(0) => Err(TransportError::Timeout),
            Ok(read) => {
                chunk.truncate(read);
                Ok(chunk)
            }
            Err(err) => Err(TransportError::Usb(err.to_string())),
        }
    }
}
