//! Live preview endpoints.
//!
//! Viewers open `GET /preview/ws/:printer` and receive one text frame per
//! print job: the rendered PNG as base64. Anything the viewer sends is
//! ignored. `GET /preview/printers` lists every printer with a history.
//!
//! The `:printer` segment is the printer key (`04b8_0202` or a host) and is
//! matched case-insensitively, like the print routes.

use axum::{
    Json,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::hub::PreviewSnapshot;
use crate::printer::PrinterId;

use super::super::state::AppState;

/// History entry as served over JSON.
#[derive(Debug, Serialize)]
pub struct SnapshotView {
    pub sequence: u64,
    pub printer: String,
    pub created_at: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub png_base64: String,
}

impl From<&PreviewSnapshot> for SnapshotView {
    fn from(snapshot: &PreviewSnapshot) -> Self {
        Self {
            sequence: snapshot.sequence,
            printer: snapshot.printer.clone(),
            created_at: snapshot.created_at,
            width: snapshot.width,
            height: snapshot.height,
            png_base64: snapshot.png_base64(),
        }
    }
}

/// Handle GET /preview/:printer/history - most recent first.
pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(printer): Path<String>,
) -> Json<Vec<SnapshotView>> {
    let printer = PrinterId::normalize_key(&printer);
    let views = state
        .hub()
        .history(&printer)
        .iter()
        .map(|s| SnapshotView::from(s.as_ref()))
        .collect();
    Json(views)
}

/// Handle GET /preview/printers
pub async fn printers(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.hub().printers())
}

/// Handle GET /preview/ws/:printer - live viewer.
pub async fn live(
    State(state): State<Arc<AppState>>,
    Path(printer): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let printer = PrinterId::normalize_key(&printer);
    ws.on_upgrade(move |socket| viewer_session(socket, state, printer))
}

async fn viewer_session(socket: WebSocket, state: Arc<AppState>, printer: String) {
    let (mut sink, mut stream) = socket.split();
    let (id, mut rx) = state.hub().subscribe(&printer);

    info!(
        printer = %printer,
        subscriber = %id,
        viewers = state.hub().subscriber_count(&printer),
        "Preview viewer connected"
    );

    loop {
        tokio::select! {
            snapshot = rx.recv() => {
                // None: the hub dropped this viewer after a failed send
                let Some(snapshot) = snapshot else { break };
                if sink.send(Message::Text(snapshot.png_base64())).await.is_err() {
                    break;
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    state.hub().unsubscribe(&printer, id);
    info!(printer = %printer, subscriber = %id, "Preview viewer disconnected");
}
