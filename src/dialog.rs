//! Barcode dialog controller.
//!
//! Each workflow owns its own dialog instance: the instance carries its
//! input widget, state enum, generation counter and handler, so two
//! concurrent workflows can never interfere through shared state.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::client::{BarcodeClient, BarcodeEndpoint};
use crate::errors::ScanError;
use crate::events::FeedbackSender;
use crate::input::{BarcodeInput, InputKey};
use crate::models::{Message, ScanResponse, ScanResult, Severity};

/// Dialog lifecycle state.
///
/// `Submitting` means exactly one request is in flight; the input is
/// disabled for its duration, which serializes scans and prevents a rapid
/// double-scan from issuing two concurrent submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    AwaitingScan,
    Submitting,
}

/// What a handler wants the dialog to do after a dispatched scan or a
/// finalize action.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Keep the dialog open for further scans.
    KeepOpen,
    /// Keep the dialog open and show a transient message.
    Notify(Message),
    /// Terminal: close the dialog.
    Close,
    /// Terminal: close the dialog, caller navigates to the URL.
    Redirect(String),
}

/// What the embedding UI should do after feeding the dialog an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Nothing happened (empty payload, stale response, dialog not open).
    Ignored,
    /// Dialog is still open and awaiting the next scan.
    Open,
    /// Dialog closed; the caller typically reloads the surrounding view.
    Closed,
    /// Dialog closed; the caller navigates to the URL.
    Redirect(String),
}

/// Caller-supplied logic deciding what each resolved scan means.
#[async_trait]
pub trait ScanHandler: Send {
    /// Dispatch one recognized scan result.
    ///
    /// `Error` and `Unrecognized` results never reach the handler; the
    /// dialog surfaces those itself and stays open.
    async fn on_scan(&mut self, result: ScanResult) -> Result<ScanOutcome, ScanError>;

    /// Finalize a multi-scan batch. Only invoked when [`has_submit`]
    /// returns true.
    ///
    /// [`has_submit`]: ScanHandler::has_submit
    async fn on_submit(&mut self, _client: &BarcodeClient) -> Result<ScanOutcome, ScanError> {
        Ok(ScanOutcome::KeepOpen)
    }

    /// Whether the dialog renders a final submit control at all.
    fn has_submit(&self) -> bool {
        false
    }

    /// Whether the final submit control is currently enabled.
    fn submit_enabled(&self) -> bool {
        false
    }

    /// Discard any accumulated state when the dialog closes.
    fn reset(&mut self) {}
}

/// Presentation and payload options for one dialog instance.
#[derive(Debug, Clone)]
pub struct DialogOptions {
    pub title: String,
    /// Optional content rendered above the input.
    pub header: Option<String>,
    /// Optional content rendered below the input.
    pub footer: Option<String>,
    /// Endpoint scans are submitted to.
    pub endpoint: BarcodeEndpoint,
    /// Extra payload fields sent with every scan (e.g. the target record
    /// for a link operation).
    pub extra: Map<String, Value>,
}

impl DialogOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            header: None,
            footer: None,
            endpoint: BarcodeEndpoint::Scan,
            extra: Map::new(),
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn endpoint(mut self, endpoint: BarcodeEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn extra_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self::new("Scan Barcode")
    }
}

/// Modal workflow capturing scanned codes and dispatching typed results.
pub struct BarcodeDialog<H: ScanHandler> {
    id: Uuid,
    client: Arc<BarcodeClient>,
    options: DialogOptions,
    input: BarcodeInput,
    state: DialogState,
    /// Bumped on every open and close; a response carrying an older
    /// generation is dropped instead of acting on a reused dialog.
    generation: u64,
    handler: H,
    feedback: FeedbackSender,
    last_message: Option<Message>,
}

impl<H: ScanHandler> BarcodeDialog<H> {
    pub fn new(
        client: Arc<BarcodeClient>,
        options: DialogOptions,
        handler: H,
        feedback: FeedbackSender,
    ) -> Self {
        let input = BarcodeInput::new(
            client.config().placeholder.clone(),
            client.config().hint.clone(),
        );
        Self {
            id: Uuid::new_v4(),
            client,
            options,
            input,
            state: DialogState::Idle,
            generation: 0,
            handler,
            feedback,
            last_message: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Idle
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn input(&self) -> &BarcodeInput {
        &self.input
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Most recent inline message, for rendering.
    pub fn last_message(&self) -> Option<&Message> {
        self.last_message.as_ref()
    }

    /// Whether the final submit control should be rendered enabled.
    pub fn submit_control_enabled(&self) -> bool {
        self.state == DialogState::AwaitingScan
            && self.handler.has_submit()
            && self.handler.submit_enabled()
    }

    /// Show the dialog: enable and focus the input, await the first scan.
    #[instrument(skip(self), fields(dialog = %self.id))]
    pub fn open(&mut self) {
        if self.state != DialogState::Idle {
            warn!("Ignoring open() on a dialog that is already open");
            return;
        }
        self.generation += 1;
        self.state = DialogState::AwaitingScan;
        self.last_message = None;
        self.input.clear();
        self.input.set_enabled(true);
        self.input.focus();
    }

    /// Dismiss the dialog, discarding any accumulated session state. A
    /// response still in flight for this dialog will be dropped.
    #[instrument(skip(self), fields(dialog = %self.id))]
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = DialogState::Idle;
        self.input.clear();
        self.input.blur();
        self.handler.reset();
    }

    /// Feed one keystroke to the barcode input, submitting the payload on
    /// the scanner's terminator key.
    pub async fn key(&mut self, key: InputKey) -> Disposition {
        match self.input.key(key) {
            Some(payload) => self.submit(&payload).await,
            None => Disposition::Ignored,
        }
    }

    /// Submit one raw barcode payload.
    ///
    /// Empty or whitespace-only payloads are silently ignored and issue no
    /// request. Only one submission may be in flight at a time; further
    /// submissions are ignored until the response arrives.
    #[instrument(skip(self, raw), fields(dialog = %self.id))]
    pub async fn submit(&mut self, raw: &str) -> Disposition {
        let code = raw.trim();
        if code.is_empty() {
            return Disposition::Ignored;
        }

        if self.state != DialogState::AwaitingScan {
            debug!(state = ?self.state, "Ignoring barcode submission, dialog not awaiting a scan");
            return Disposition::Ignored;
        }

        self.state = DialogState::Submitting;
        self.input.set_enabled(false);
        let generation = self.generation;

        let result = self
            .client
            .submit_barcode(self.options.endpoint, code, &self.options.extra)
            .await;

        self.complete(generation, result).await
    }

    /// Trigger the final explicit submit action (distinct from per-scan
    /// submission), used to finalize a multi-scan batch.
    #[instrument(skip(self), fields(dialog = %self.id))]
    pub async fn finalize(&mut self) -> Disposition {
        if self.state != DialogState::AwaitingScan || !self.handler.has_submit() {
            return Disposition::Ignored;
        }

        self.state = DialogState::Submitting;
        self.input.set_enabled(false);
        let generation = self.generation;

        let result = self.handler.on_submit(&self.client).await;

        if generation != self.generation {
            debug!("Dropping stale finalize result");
            return Disposition::Ignored;
        }

        self.resume();
        match result {
            Ok(outcome) => self.apply(outcome).await,
            Err(e) => {
                self.notify(Message::new(e.severity(), e.to_string())).await;
                Disposition::Open
            }
        }
    }

    /// Resume from `Submitting` and dispatch one response.
    async fn complete(
        &mut self,
        generation: u64,
        result: Result<ScanResponse, ScanError>,
    ) -> Disposition {
        if generation != self.generation || self.state != DialogState::Submitting {
            debug!("Dropping stale barcode response");
            return Disposition::Ignored;
        }

        self.resume();

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(e) => {
                self.notify(Message::new(e.severity(), e.to_string())).await;
                return Disposition::Open;
            }
        };

        match envelope.resolve() {
            ScanResult::Error(message) => {
                self.notify(Message::new(Severity::Danger, message)).await;
                Disposition::Open
            }
            ScanResult::Unrecognized => {
                let message = ScanError::UnknownResponse.to_string();
                self.notify(Message::new(Severity::Danger, message)).await;
                Disposition::Open
            }
            result => match self.handler.on_scan(result).await {
                Ok(outcome) => self.apply(outcome).await,
                Err(e) => {
                    self.notify(Message::new(e.severity(), e.to_string())).await;
                    Disposition::Open
                }
            },
        }
    }

    /// Re-enable and refocus the input after a request settles.
    fn resume(&mut self) {
        self.state = DialogState::AwaitingScan;
        self.input.set_enabled(true);
        self.input.focus();
    }

    async fn apply(&mut self, outcome: ScanOutcome) -> Disposition {
        match outcome {
            ScanOutcome::KeepOpen => Disposition::Open,
            ScanOutcome::Notify(message) => {
                self.notify(message).await;
                Disposition::Open
            }
            ScanOutcome::Close => {
                self.close();
                Disposition::Closed
            }
            ScanOutcome::Redirect(url) => {
                self.close();
                Disposition::Redirect(url)
            }
        }
    }

    async fn notify(&mut self, message: Message) {
        self.last_message = Some(message.clone());
        self.feedback.send(message).await;
    }
}
