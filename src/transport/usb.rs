//! # USB Bulk Transport
//!
//! Writes the whole job to the first BULK OUT endpoint of the printer's
//! interface 0, the layout used by ESC/POS USB printers.
//!
//! libusb calls block, so the transfer runs on the blocking thread pool.
//! Built without the `usb` feature, every send fails with
//! [`TransportError::Usb`].

use std::time::Duration;

use tracing::{info, instrument};

use super::{DEFAULT_USB_TIMEOUT, TransportError};
use crate::printer::parse_usb_id;

/// Interface claimed on the printer.
#[cfg(feature = "usb")]
const PRINTER_INTERFACE: u8 = 0;

/// A USB printer addressed by vendor/product id.
#[derive(Debug, Clone, Copy)]
pub struct UsbTransport {
    vendor_id: u16,
    product_id: u16,
    timeout: Duration,
}

impl UsbTransport {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            timeout: DEFAULT_USB_TIMEOUT,
        }
    }

    /// Build from hex ids such as `04b8` / `0x0202`.
    pub fn from_hex(vendor_id: &str, product_id: &str) -> Result<Self, TransportError> {
        let vid = parse_usb_id(vendor_id)
            .ok_or_else(|| TransportError::Usb(format!("Invalid vendor id: {}", vendor_id)))?;
        let pid = parse_usb_id(product_id)
            .ok_or_else(|| TransportError::Usb(format!("Invalid product id: {}", product_id)))?;
        Ok(Self::new(vid, pid))
    }

    /// Set the bulk write timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[instrument(skip(self, data), fields(vid = self.vendor_id, pid = self.product_id, data_len = data.len()))]
    pub async fn send(self, data: Vec<u8>) -> Result<(), TransportError> {
        info!("Sending to USB printer");

        tokio::task::spawn_blocking(move || self.write_blocking(&data))
            .await
            .map_err(|e| TransportError::Usb(format!("USB task failed: {}", e)))??;

        info!("Print job sent successfully");
        Ok(())
    }

    #[cfg(feature = "usb")]
    fn write_blocking(&self, data: &[u8]) -> Result<(), TransportError> {
        use rusb::{Context, Direction, TransferType, UsbContext};

        let usb = |e: rusb::Error| TransportError::Usb(e.to_string());

        let context = Context::new().map_err(usb)?;
        let handle = context
            .open_device_with_vid_pid(self.vendor_id, self.product_id)
            .ok_or_else(|| {
                TransportError::NotFound(format!(
                    "USB printer {:04x}:{:04x}",
                    self.vendor_id, self.product_id
                ))
            })?;

        // Not supported on every platform
        let _ = handle.set_auto_detach_kernel_driver(true);
        handle.claim_interface(PRINTER_INTERFACE).map_err(usb)?;

        let device = handle.device();
        let descriptor = device.device_descriptor().map_err(usb)?;

        let mut endpoint = None;
        'search: for i in 0..descriptor.num_configurations() {
            let config = device.config_descriptor(i).map_err(usb)?;
            for interface in config.interfaces() {
                for iface in interface.descriptors() {
                    for ep in iface.endpoint_descriptors() {
                        if ep.direction() == Direction::Out
                            && ep.transfer_type() == TransferType::Bulk
                        {
                            endpoint = Some(ep.address());
                            break 'search;
                        }
                    }
                }
            }
        }

        let endpoint =
            endpoint.ok_or_else(|| TransportError::Usb("No BULK OUT endpoint found".into()))?;

        let result = write_all_bulk(&handle, endpoint, data, self.timeout);

        let _ = handle.release_interface(PRINTER_INTERFACE);
        result
    }

    #[cfg(not(feature = "usb"))]
    fn write_blocking(&self, _data: &[u8]) -> Result<(), TransportError> {
        Err(TransportError::Usb(format!(
            "USB support not compiled in (printer {:04x}:{:04x})",
            self.vendor_id, self.product_id
        )))
    }
}

#[cfg(feature = "usb")]
fn write_all_bulk(
    handle: &rusb::DeviceHandle<rusb::Context>,
    endpoint: u8,
    mut data: &[u8],
    timeout: Duration,
) -> Result<(), TransportError> {
    while !data.is_empty() {
        let written = handle
            .write_bulk(endpoint, data, timeout)
            .map_err(|e| match e {
                rusb::Error::Timeout => TransportError::Timeout("USB bulk write".into()),
                other => TransportError::Usb(other.to_string()),
            })?;
        if written == 0 {
            return Err(TransportError::Usb("USB bulk write made no progress".into()));
        }
        data = &data[written..];
    }
    Ok(())
}
