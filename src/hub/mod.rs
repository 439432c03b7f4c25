//! # Preview Hub
//!
//! Per-printer fan-out of rendered previews to live viewers, plus a bounded
//! most-recent-first history.
//!
//! ```text
//! Dispatcher ──publish──► PreviewHub
//!                           ├── "04b8_0202" ─ Mutex<PrinterPreviewState>
//!                           │     ├── history: [newest, ..., oldest]
//!                           │     └── subscribers: id → mpsc::Sender
//!                           └── "10.0.0.7"  ─ Mutex<PrinterPreviewState>
//! ```
//!
//! Each printer has its own lock, so publishing to one printer never waits on
//! another. Delivery is a non-blocking `try_send`; a subscriber whose channel
//! is full or closed is dropped inside the same critical section.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::preview::Preview;

/// Default number of snapshots kept per printer.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Default per-subscriber channel capacity.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 16;

/// Handle identifying one live viewer.
pub type SubscriberId = Uuid;

/// Receiving end handed to a viewer on subscribe.
pub type SnapshotReceiver = mpsc::Receiver<Arc<PreviewSnapshot>>;

/// One rendered print job.
#[derive(Debug, Clone)]
pub struct PreviewSnapshot {
    /// Process-wide publish counter.
    pub sequence: u64,
    /// Printer key the job was sent to.
    pub printer: String,
    pub created_at: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl PreviewSnapshot {
    /// PNG bytes as standard base64, the viewer wire format.
    pub fn png_base64(&self) -> String {
        BASE64.encode(&self.png)
    }
}

#[derive(Default)]
struct PrinterPreviewState {
    history: VecDeque<Arc<PreviewSnapshot>>,
    subscribers: HashMap<SubscriberId, mpsc::Sender<Arc<PreviewSnapshot>>>,
}

/// Registry of per-printer preview state.
///
/// Cheap to clone; all clones share the same registry.
#[derive(Clone)]
pub struct PreviewHub {
    printers: Arc<DashMap<String, Arc<Mutex<PrinterPreviewState>>>>,
    sequence: Arc<AtomicU64>,
    history_limit: usize,
    subscriber_buffer: usize,
}

impl Default for PreviewHub {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_SUBSCRIBER_BUFFER)
    }
}

impl PreviewHub {
    /// Create a hub keeping `history_limit` snapshots per printer and giving
    /// each subscriber a channel of `subscriber_buffer` slots.
    pub fn new(history_limit: usize, subscriber_buffer: usize) -> Self {
        Self {
            printers: Arc::new(DashMap::new()),
            sequence: Arc::new(AtomicU64::new(1)),
            history_limit: history_limit.max(1),
            subscriber_buffer: subscriber_buffer.max(1),
        }
    }

    /// Per-printer state, created on first use.
    fn printer(&self, key: &str) -> Arc<Mutex<PrinterPreviewState>> {
        if let Some(state) = self.printers.get(key) {
            return state.clone();
        }
        self.printers.entry(key.to_string()).or_default().clone()
    }

    fn lock(state: &Mutex<PrinterPreviewState>) -> MutexGuard<'_, PrinterPreviewState> {
        // A panic while holding the lock cannot leave the history or the
        // subscriber map half-updated, so a poisoned lock is still usable.
        state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a preview at the head of the printer's history and push it to
    /// every live subscriber of that printer.
    pub fn publish(&self, printer: &str, preview: Preview) -> Arc<PreviewSnapshot> {
        let state = self.printer(printer);
        let mut state = Self::lock(&state);

        let snapshot = Arc::new(PreviewSnapshot {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            printer: printer.to_string(),
            created_at: Utc::now(),
            width: preview.width,
            height: preview.height,
            png: preview.png,
        });

        state.history.push_front(snapshot.clone());
        state.history.truncate(self.history_limit);

        state.subscribers.retain(|id, tx| match tx.try_send(snapshot.clone()) {
            Ok(()) => true,
            Err(e) => {
                debug!(printer, subscriber = %id, error = %e, "Dropping preview subscriber");
                false
            }
        });

        debug!(
            printer,
            sequence = snapshot.sequence,
            subscribers = state.subscribers.len(),
            "Published preview"
        );
        snapshot
    }

    /// Register a live viewer for a printer.
    pub fn subscribe(&self, printer: &str) -> (SubscriberId, SnapshotReceiver) {
        let (tx, rx) = mpsc::channel(self.subscriber_buffer);
        let id = Uuid::new_v4();

        let state = self.printer(printer);
        Self::lock(&state).subscribers.insert(id, tx);

        debug!(printer, subscriber = %id, "Preview subscriber connected");
        (id, rx)
    }

    /// Remove a viewer. Returns whether it was still registered.
    pub fn unsubscribe(&self, printer: &str, id: SubscriberId) -> bool {
        let Some(state) = self.printers.get(printer).map(|s| s.clone()) else {
            return false;
        };
        let removed = Self::lock(&state).subscribers.remove(&id).is_some();
        if removed {
            debug!(printer, subscriber = %id, "Preview subscriber disconnected");
        }
        removed
    }

    /// Snapshot history for a printer, most recent first.
    pub fn history(&self, printer: &str) -> Vec<Arc<PreviewSnapshot>> {
        match self.printers.get(printer).map(|s| s.clone()) {
            Some(state) => Self::lock(&state).history.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Number of live viewers for a printer.
    pub fn subscriber_count(&self, printer: &str) -> usize {
        match self.printers.get(printer).map(|s| s.clone()) {
            Some(state) => Self::lock(&state).subscribers.len(),
            None => 0,
        }
    }

    /// Keys of every printer seen so far.
    pub fn printers(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.printers.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}
