//! ePOS-Print service responses.
//!
//! ```xml
//! <response success='true' code=''></response>
//! <response success='false' code='USB_ERROR'>USB printer not found</response>
//! ```

use quick_xml::escape::escape;

/// Machine-readable failure codes returned to the POS client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    ParseError,
    UsbError,
    NetworkError,
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::ParseError => "PARSE_ERROR",
            ResponseCode::UsbError => "USB_ERROR",
            ResponseCode::NetworkError => "NETWORK_ERROR",
        }
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a successful response.
pub fn success() -> String {
    "<response success='true' code=''></response>".to_string()
}

/// Body of a failed response. The message is XML-escaped.
pub fn failure(code: ResponseCode, message: &str) -> String {
    format!(
        "<response success='false' code='{}'>{}</response>",
        code,
        escape(message)
    )
}
