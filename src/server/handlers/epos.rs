//! ePOS-Print service endpoints.
//!
//! POS front-ends post the same XML they would send to an Epson printer's
//! `/cgi-bin/epos/service.cgi`; the path prefix picks the physical printer.
//!
//! Every outcome is answered with 200. ePOS-Print clients read the result from
//! the `success` and `code` attributes of the body, not from the status.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::dispatch::PrintJob;
use crate::epos::response;
use crate::printer::PrinterId;

use super::super::state::AppState;

/// Handle POST /vid/:vid/pid/:pid/cgi-bin/epos/service.cgi
pub async fn print_usb(
    State(state): State<Arc<AppState>>,
    Path((vid, pid)): Path<(String, String)>,
    body: String,
) -> Response {
    run(&state, PrintJob::new(PrinterId::usb(vid, pid), body)).await
}

/// Handle POST /ip/:ip/cgi-bin/epos/service.cgi
pub async fn print_network(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
    body: String,
) -> Response {
    run(&state, PrintJob::new(PrinterId::network(ip), body)).await
}

/// Handle POST /vid/:vid/pid/:pid/success/cgi-bin/epos/service.cgi
///
/// Preview only: nothing is sent to the printer.
pub async fn preview_usb(
    State(state): State<Arc<AppState>>,
    Path((vid, pid)): Path<(String, String)>,
    body: String,
) -> Response {
    run(
        &state,
        PrintJob::new(PrinterId::usb(vid, pid), body).preview_only(),
    )
    .await
}

/// Handle POST /ip/:ip/success/cgi-bin/epos/service.cgi
pub async fn preview_network(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
    body: String,
) -> Response {
    run(
        &state,
        PrintJob::new(PrinterId::network(ip), body).preview_only(),
    )
    .await
}

async fn run(state: &AppState, job: PrintJob) -> Response {
    let body = match state.dispatcher.dispatch(&job).await {
        Ok(()) => response::success(),
        Err(e) => response::failure(e.code(), &e.to_string()),
    };
    xml_response(body)
}

fn xml_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/xml; charset=utf-8")], body).into_response()
}
