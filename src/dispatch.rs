//! # Print Dispatch
//!
//! One print request, start to finish:
//!
//! ```text
//! XML ──decode──► Program ──to_bytes──► ESC/POS ──┬──► Transport (awaited)
//!                                                 └──► preview task (detached)
//!                                                        render ──► PreviewHub
//! ```
//!
//! The preview task is spawned before delivery starts and never influences the
//! outcome. A job that fails to reach the printer still shows up in preview.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::epos::{self, DecodeError, ResponseCode};
use crate::hub::PreviewHub;
use crate::preview::render_preview;
use crate::printer::PrinterId;
use crate::transport::{Transport, TransportError};

/// Whether encoded bytes go to the physical printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Send to the printer and preview.
    #[default]
    Printer,
    /// Preview only; always reports success once decoding succeeds.
    PreviewOnly,
}

/// A decoded-on-demand print request.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub printer: PrinterId,
    /// Raw ePOS-Print request body.
    pub body: String,
    pub delivery: Delivery,
}

impl PrintJob {
    pub fn new(printer: PrinterId, body: impl Into<String>) -> Self {
        Self {
            printer,
            body: body.into(),
            delivery: Delivery::Printer,
        }
    }

    pub fn preview_only(mut self) -> Self {
        self.delivery = Delivery::PreviewOnly;
        self
    }
}

/// Why a print request failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Parse(#[from] DecodeError),

    #[error("{0}")]
    Usb(TransportError),

    #[error("{0}")]
    Network(TransportError),
}

impl DispatchError {
    /// Code reported to the POS client.
    pub fn code(&self) -> ResponseCode {
        match self {
            DispatchError::Parse(_) => ResponseCode::ParseError,
            DispatchError::Usb(_) => ResponseCode::UsbError,
            DispatchError::Network(_) => ResponseCode::NetworkError,
        }
    }
}

/// Decodes, encodes, previews, and delivers print jobs.
#[derive(Clone)]
pub struct Dispatcher {
    hub: PreviewHub,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(hub: PreviewHub, transport: Arc<dyn Transport>) -> Self {
        Self { hub, transport }
    }

    pub fn hub(&self) -> &PreviewHub {
        &self.hub
    }

    /// Run one job. Parse failures never reach the transport.
    #[instrument(skip(self, job), fields(printer = %job.printer, delivery = ?job.delivery))]
    pub async fn dispatch(&self, job: &PrintJob) -> Result<(), DispatchError> {
        let program = epos::decode(&job.body).inspect_err(|e| {
            warn!(error = %e, "Rejected print request");
        })?;
        let bytes = program.to_bytes();
        info!(ops = program.len(), bytes = bytes.len(), "Encoded print job");

        self.spawn_preview(job.printer.key(), bytes.clone());

        if job.delivery == Delivery::PreviewOnly {
            return Ok(());
        }

        let delivered = match &job.printer {
            PrinterId::Usb {
                vendor_id,
                product_id,
            } => self
                .transport
                .send_usb(&bytes, vendor_id, product_id)
                .await
                .map_err(DispatchError::Usb),
            PrinterId::Network { host } => self
                .transport
                .send_network(&bytes, host)
                .await
                .map_err(DispatchError::Network),
        };
        delivered.inspect_err(|e| error!(error = %e, "Print delivery failed"))
    }

    /// Render and publish in the background. Failures are only logged.
    fn spawn_preview(&self, key: String, bytes: Vec<u8>) {
        let hub = self.hub.clone();
        tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || render_preview(&bytes)).await {
                Ok(Ok(preview)) => {
                    hub.publish(&key, preview);
                }
                Ok(Err(e)) => warn!(printer = %key, error = %e, "Preview rendering failed"),
                Err(e) => error!(printer = %key, error = %e, "Preview task failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    const RECEIPT: &str = r#"<epos-print><text align="center">Hello</text><feed line="2"/></epos-print>"#;

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Usb(String, String, Vec<u8>),
        Network(String, Vec<u8>),
    }

    #[derive(Default)]
    struct MockTransport {
        sent: Mutex<Vec<Sent>>,
        fail: bool,
    }

    impl MockTransport {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn result(&self) -> Result<(), TransportError> {
            if self.fail {
                Err(TransportError::NotFound("mock".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_usb(
            &self,
            data: &[u8],
            vendor_id: &str,
            product_id: &str,
        ) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(Sent::Usb(
                vendor_id.into(),
                product_id.into(),
                data.to_vec(),
            ));
            self.result()
        }

        async fn send_network(&self, data: &[u8], host: &str) -> Result<(), TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Network(host.into(), data.to_vec()));
            self.result()
        }
    }

    fn dispatcher(transport: Arc<MockTransport>) -> Dispatcher {
        Dispatcher::new(PreviewHub::default(), transport)
    }

    async fn next_preview(rx: &mut crate::hub::SnapshotReceiver) -> Arc<crate::hub::PreviewSnapshot> {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("preview not published")
            .expect("hub dropped subscriber")
    }

    #[tokio::test]
    async fn test_network_job_is_delivered_and_previewed() {
        let transport = Arc::new(MockTransport::default());
        let dispatcher = dispatcher(transport.clone());
        let (_, mut rx) = dispatcher.hub().subscribe("10.0.0.7");

        let job = PrintJob::new(PrinterId::network("10.0.0.7"), RECEIPT);
        dispatcher.dispatch(&job).await.unwrap();

        let expected = epos::decode(RECEIPT).unwrap().to_bytes();
        assert_eq!(
            transport.sent(),
            vec![Sent::Network("10.0.0.7".into(), expected)]
        );

        let snapshot = next_preview(&mut rx).await;
        assert_eq!(snapshot.printer, "10.0.0.7");
        assert_eq!(snapshot.width, 600);
    }

    #[tokio::test]
    async fn test_usb_job_uses_usb_transport() {
        let transport = Arc::new(MockTransport::default());
        let dispatcher = dispatcher(transport.clone());

        let job = PrintJob::new(PrinterId::usb("04B8", "0202"), RECEIPT);
        dispatcher.dispatch(&job).await.unwrap();

        match transport.sent().as_slice() {
            [Sent::Usb(vid, pid, _)] => {
                assert_eq!(vid, "04b8");
                assert_eq!(pid, "0202");
            }
            other => panic!("unexpected deliveries: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parse_error_never_reaches_transport() {
        let transport = Arc::new(MockTransport::default());
        let dispatcher = dispatcher(transport.clone());

        let job = PrintJob::new(PrinterId::network("10.0.0.7"), "<epos-print><text>");
        let err = dispatcher.dispatch(&job).await.unwrap_err();

        assert_eq!(err.code(), ResponseCode::ParseError);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failing_transport_still_publishes_preview() {
        let transport = Arc::new(MockTransport::failing());
        let dispatcher = dispatcher(transport.clone());
        let (_, mut rx) = dispatcher.hub().subscribe("04b8_0202");

        let job = PrintJob::new(PrinterId::usb("04b8", "0202"), RECEIPT);
        let err = dispatcher.dispatch(&job).await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::UsbError);

        next_preview(&mut rx).await;
        assert_eq!(dispatcher.hub().history("04b8_0202").len(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_code() {
        let dispatcher = dispatcher(Arc::new(MockTransport::failing()));
        let job = PrintJob::new(PrinterId::network("10.0.0.7"), RECEIPT);
        let err = dispatcher.dispatch(&job).await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::NetworkError);
    }

    #[tokio::test]
    async fn test_preview_only_skips_transport() {
        let transport = Arc::new(MockTransport::failing());
        let dispatcher = dispatcher(transport.clone());
        let (_, mut rx) = dispatcher.hub().subscribe("10.0.0.7");

        let job = PrintJob::new(PrinterId::network("10.0.0.7"), RECEIPT).preview_only();
        dispatcher.dispatch(&job).await.unwrap();

        assert!(transport.sent().is_empty());
        next_preview(&mut rx).await;
    }
}
