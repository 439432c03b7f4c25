//! Network printers reachable on raw TCP port 9100.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument};

use super::{DEFAULT_NETWORK_TIMEOUT, TransportError};
use crate::printer::RAW_PRINT_PORT;

/// One-shot connection to a network printer.
///
/// The host may be a name or an address, with or without an explicit port.
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    addr: String,
    timeout: Duration,
}

impl NetworkTransport {
    pub fn new(host: &str) -> Self {
        Self {
            addr: socket_addr(host),
            timeout: DEFAULT_NETWORK_TIMEOUT,
        }
    }

    /// Set the timeout covering connect and write.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connect, write every byte, flush, close.
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    pub async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        info!("Connecting to printer");

        tokio::time::timeout(self.timeout, self.write(data))
            .await
            .map_err(|_| TransportError::Timeout(format!("Printer timeout: {}", self.addr)))??;

        info!("Print job sent successfully");
        Ok(())
    }

    async fn write(&self, data: &[u8]) -> Result<(), TransportError> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| TransportError::Connection(format!("{}: {}", self.addr, e)))?;

        stream.write_all(data).await?;
        stream.flush().await?;
        stream.shutdown().await?;
        Ok(())
    }
}

/// Append the raw print port unless the host already names one.
fn socket_addr(host: &str) -> String {
    if host.parse::<std::net::SocketAddr>().is_ok() {
        return host.to_string();
    }
    if host.contains(':') && !host.starts_with('[') {
        // Bare IPv6 address
        if host.parse::<std::net::Ipv6Addr>().is_ok() {
            return format!("[{}]:{}", host, RAW_PRINT_PORT);
        }
        return host.to_string();
    }
    format!("{}:{}", host, RAW_PRINT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_socket_addr() {
        assert_eq!(socket_addr("10.0.0.7"), "10.0.0.7:9100");
        assert_eq!(socket_addr("printer.local"), "printer.local:9100");
        assert_eq!(socket_addr("10.0.0.7:9101"), "10.0.0.7:9101");
        assert_eq!(socket_addr("::1"), "[::1]:9100");
        assert_eq!(socket_addr("[::1]:9100"), "[::1]:9100");
    }

    #[tokio::test]
    async fn test_send_delivers_all_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        NetworkTransport::new(&addr.to_string())
            .send(b"\x1b@hello\n")
            .await
            .unwrap();

        assert_eq!(server.await.unwrap(), b"\x1b@hello\n");
    }

    #[tokio::test]
    async fn test_refused_connection_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = NetworkTransport::new(&addr.to_string())
            .send(b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)), "{err:?}");
    }
}
