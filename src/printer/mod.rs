//! # Printer Identity
//!
//! A logical printer is either a USB device (vendor/product id pair) or a
//! network printer reachable on raw TCP port 9100.
//!
//! ## Preview Keys
//!
//! | Printer | Key |
//! |---------|-----|
//! | USB `04b8:0202` | `04b8_0202` |
//! | Network `192.168.1.50` | `192.168.1.50` |
//!
//! The key names the printer's preview history and viewer channel. Keys are
//! lowercase, so `/preview/ws/04B8_0202` and `/vid/04b8/pid/0202` meet.
//!
//! ```
//! use eposbridge::printer::PrinterId;
//!
//! let usb = PrinterId::usb("04B8", "0202");
//! assert_eq!(usb.key(), "04b8_0202");
//! assert_eq!(PrinterId::from_key("04b8_0202"), usb);
//! ```

use std::fmt;

/// Raw TCP port used by network receipt printers.
pub const RAW_PRINT_PORT: u16 = 9100;

/// Identity of a logical printer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrinterId {
    /// USB printer, ids kept as the hex strings the client sent.
    Usb {
        vendor_id: String,
        product_id: String,
    },
    /// Network printer by host name or IP address.
    Network { host: String },
}

impl PrinterId {
    pub fn usb(vendor_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self::Usb {
            vendor_id: vendor_id.into().to_ascii_lowercase(),
            product_id: product_id.into().to_ascii_lowercase(),
        }
    }

    pub fn network(host: impl Into<String>) -> Self {
        Self::Network { host: host.into() }
    }

    /// Preview key for this printer.
    pub fn key(&self) -> String {
        match self {
            Self::Usb {
                vendor_id,
                product_id,
            } => format!("{}_{}", vendor_id, product_id),
            Self::Network { host } => host.to_ascii_lowercase(),
        }
    }

    /// Canonical form of a key taken from a URL path.
    pub fn normalize_key(key: &str) -> String {
        Self::from_key(key).key()
    }

    /// Inverse of [`PrinterId::key`]: `vid_pid` is USB, anything else is a host.
    pub fn from_key(key: &str) -> Self {
        match key.split_once('_') {
            Some((vid, pid)) if !vid.is_empty() && !pid.is_empty() && !pid.contains('_') => {
                Self::usb(vid, pid)
            }
            _ => Self::network(key),
        }
    }
}

impl fmt::Display for PrinterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Parse a hex USB id such as `04b8` or `0x04B8`.
pub fn parse_usb_id(value: &str) -> Option<u16> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u16::from_str_radix(digits, 16).ok()
}
