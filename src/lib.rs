//! Barcode scanning and stock check-in workflows for inventory backends.
//!
//! This crate models the client side of a wedge-scanner driven check-in
//! flow: a [`dialog::BarcodeDialog`] captures scanned codes from a
//! [`input::BarcodeInput`], submits them to the backend through a
//! [`client::BarcodeClient`], and dispatches the typed
//! [`models::ScanResult`] to a workflow handler. Multi-scan workflows
//! accumulate items in a [`session::CheckInSession`] and finalize them as
//! one batch stock transfer.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod client;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod events;
pub mod input;
pub mod logging;
pub mod models;
pub mod session;
pub mod workflows;

pub use client::{BarcodeClient, BarcodeEndpoint};
pub use config::{load_config, ScannerConfig};
pub use dialog::{BarcodeDialog, DialogOptions, DialogState, Disposition, ScanHandler, ScanOutcome};
pub use errors::ScanError;
pub use events::FeedbackSender;
pub use input::{BarcodeInput, InputKey};
pub use models::{
    ItemId, LocationId, Message, ScanResponse, ScanResult, Severity, StockItem, StockLocation,
    TransferItem, TransferRequest,
};
pub use session::CheckInSession;
