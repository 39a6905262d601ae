//! Concrete scanning workflows built on the dialog controller and the
//! check-in session.
//!
//! Two multi-scan workflows share the session shape and differ only in
//! which side is pre-supplied: [`ItemCheckIn`] scans items into a known
//! target location, [`LocationScan`] scans a location for a known list of
//! items. [`LinkBarcode`] and [`ScanToRedirect`] are single-shot.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::client::{BarcodeClient, BarcodeEndpoint};
use crate::dialog::{BarcodeDialog, DialogOptions, ScanHandler, ScanOutcome};
use crate::errors::ScanError;
use crate::events::FeedbackSender;
use crate::models::{ItemId, LocationId, Message, ScanResult, StockItem};
use crate::session::CheckInSession;

/// Scan stock items into a known target location.
pub struct ItemCheckIn {
    session: CheckInSession,
}

impl ItemCheckIn {
    pub fn new(target: LocationId) -> Self {
        Self {
            session: CheckInSession::new(target),
        }
    }

    pub fn session(&self) -> &CheckInSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CheckInSession {
        &mut self.session
    }
}

#[async_trait]
impl ScanHandler for ItemCheckIn {
    async fn on_scan(&mut self, result: ScanResult) -> Result<ScanOutcome, ScanError> {
        match result {
            ScanResult::StockItem { item, .. } => {
                let name = item.part_name();
                self.session.add(item)?;
                Ok(ScanOutcome::Notify(Message::success(format!(
                    "Added stock item: {}",
                    name
                ))))
            }
            _ => Ok(ScanOutcome::Notify(Message::warning(
                "Barcode does not match a valid stock item",
            ))),
        }
    }

    async fn on_submit(&mut self, client: &BarcodeClient) -> Result<ScanOutcome, ScanError> {
        let request = self.session.to_transfer()?;
        client.transfer(&request).await?;
        info!(
            location = request.location,
            items = request.items.len(),
            "Stock check-in submitted"
        );
        self.session.clear();
        Ok(ScanOutcome::Close)
    }

    fn has_submit(&self) -> bool {
        true
    }

    fn submit_enabled(&self) -> bool {
        !self.session.is_empty()
    }

    fn reset(&mut self) {
        self.session.clear();
    }
}

/// Scan a stock location for a known list of items (reverse check-in).
pub struct LocationScan {
    session: CheckInSession,
}

impl LocationScan {
    pub fn new(items: Vec<StockItem>) -> Self {
        Self {
            session: CheckInSession::for_items(items),
        }
    }

    pub fn session(&self) -> &CheckInSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CheckInSession {
        &mut self.session
    }
}

#[async_trait]
impl ScanHandler for LocationScan {
    async fn on_scan(&mut self, result: ScanResult) -> Result<ScanOutcome, ScanError> {
        match result {
            ScanResult::StockLocation { location, .. } => {
                if self.session.target() == Some(location.pk) {
                    return Ok(ScanOutcome::Notify(Message::info(format!(
                        "Location already selected: {}",
                        location.name
                    ))));
                }
                self.session.set_target(location.pk);
                Ok(ScanOutcome::Notify(Message::success(format!(
                    "Items will be moved to: {}",
                    location.name
                ))))
            }
            _ => Ok(ScanOutcome::Notify(Message::warning(
                "Barcode does not match a valid stock location",
            ))),
        }
    }

    async fn on_submit(&mut self, client: &BarcodeClient) -> Result<ScanOutcome, ScanError> {
        let request = self.session.to_transfer()?;
        client.transfer(&request).await?;
        info!(
            location = request.location,
            items = request.items.len(),
            "Stock check-in submitted"
        );
        self.session.clear();
        Ok(ScanOutcome::Close)
    }

    fn has_submit(&self) -> bool {
        true
    }

    fn submit_enabled(&self) -> bool {
        self.session.target().is_some() && !self.session.is_empty()
    }

    fn reset(&mut self) {
        self.session.clear();
    }
}

/// Single-shot workflow associating a scanned barcode with a stock item.
///
/// The scan itself carries the target item id as an extra payload field;
/// any recognized success response closes the dialog, after which the
/// caller reloads the current view.
pub struct LinkBarcode;

#[async_trait]
impl ScanHandler for LinkBarcode {
    async fn on_scan(&mut self, result: ScanResult) -> Result<ScanOutcome, ScanError> {
        match result {
            // A successful link echoes the updated stock item alongside the
            // success acknowledgement.
            ScanResult::StockItem { .. } | ScanResult::Success(_) => Ok(ScanOutcome::Close),
            _ => Ok(ScanOutcome::Notify(Message::warning(
                "Barcode could not be associated with the stock item",
            ))),
        }
    }
}

/// Generic single-shot scan: navigate to whatever the barcode matches.
pub struct ScanToRedirect;

#[async_trait]
impl ScanHandler for ScanToRedirect {
    async fn on_scan(&mut self, result: ScanResult) -> Result<ScanOutcome, ScanError> {
        let url = match result {
            ScanResult::StockItem { url, .. }
            | ScanResult::StockLocation { url, .. }
            | ScanResult::Part { url, .. } => url,
            ScanResult::Url(url) => Some(url),
            _ => None,
        };

        match url {
            Some(url) => Ok(ScanOutcome::Redirect(url)),
            None => Ok(ScanOutcome::Notify(Message::warning(
                "No link found for scanned barcode",
            ))),
        }
    }
}

/// Dialog for checking scanned items into `target`.
pub fn check_in_dialog(
    client: Arc<BarcodeClient>,
    target: LocationId,
    feedback: FeedbackSender,
) -> BarcodeDialog<ItemCheckIn> {
    BarcodeDialog::new(
        client,
        DialogOptions::new("Check Stock Items Into Location"),
        ItemCheckIn::new(target),
        feedback,
    )
}

/// Dialog for scanning a destination location for `items`.
pub fn location_scan_dialog(
    client: Arc<BarcodeClient>,
    items: Vec<StockItem>,
    feedback: FeedbackSender,
) -> BarcodeDialog<LocationScan> {
    BarcodeDialog::new(
        client,
        DialogOptions::new("Scan Items Into Location"),
        LocationScan::new(items),
        feedback,
    )
}

/// Dialog for linking a scanned barcode to `stockitem`.
pub fn link_dialog(
    client: Arc<BarcodeClient>,
    stockitem: ItemId,
    feedback: FeedbackSender,
) -> BarcodeDialog<LinkBarcode> {
    BarcodeDialog::new(
        client,
        DialogOptions::new("Link Barcode to Stock Item")
            .endpoint(BarcodeEndpoint::Link)
            .extra_field("stockitem", Value::from(stockitem)),
        LinkBarcode,
        feedback,
    )
}

/// Dialog for the generic scan-and-navigate flow.
pub fn scan_dialog(client: Arc<BarcodeClient>, feedback: FeedbackSender) -> BarcodeDialog<ScanToRedirect> {
    BarcodeDialog::new(client, DialogOptions::default(), ScanToRedirect, feedback)
}

/// Clear the barcode association on a stock item. On success the caller
/// reloads the current view.
pub async fn unlink_barcode(client: &BarcodeClient, item: ItemId) -> Result<(), ScanError> {
    client.unlink(item).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use crate::models::{PartSummary, Severity, StockLocation};

    fn stock_item(pk: ItemId, location: Option<LocationId>) -> StockItem {
        StockItem {
            pk,
            part: 7,
            part_detail: Some(PartSummary {
                pk: 7,
                name: "M3 bolt".to_string(),
                full_name: None,
                thumbnail: None,
            }),
            location,
            quantity: dec!(25),
            uid: None,
            extra: serde_json::Map::new(),
        }
    }

    fn item_result(pk: ItemId, location: Option<LocationId>) -> ScanResult {
        ScanResult::StockItem {
            item: stock_item(pk, location),
            url: Some(format!("/stock/item/{}/", pk)),
        }
    }

    #[tokio::test]
    async fn check_in_accumulates_scanned_items() {
        let mut handler = ItemCheckIn::new(5);
        assert!(!handler.submit_enabled());

        let outcome = handler.on_scan(item_result(1, Some(2))).await.unwrap();
        assert_matches!(outcome, ScanOutcome::Notify(message) => {
            assert_eq!(message.severity, Severity::Success);
            assert!(message.text.contains("M3 bolt"));
        });
        assert_eq!(handler.session().len(), 1);
        assert!(handler.submit_enabled());
    }

    #[tokio::test]
    async fn check_in_rejects_duplicate_scan() {
        let mut handler = ItemCheckIn::new(5);
        handler.on_scan(item_result(1, Some(2))).await.unwrap();

        let err = handler.on_scan(item_result(1, Some(2))).await.unwrap_err();
        assert_matches!(err, ScanError::DuplicateItem(1));
        assert_eq!(handler.session().len(), 1);
    }

    #[tokio::test]
    async fn check_in_rejects_item_already_at_target() {
        let mut handler = ItemCheckIn::new(5);
        let err = handler.on_scan(item_result(1, Some(5))).await.unwrap_err();
        assert_matches!(err, ScanError::AlreadyAtLocation(1));
        assert!(handler.session().is_empty());
    }

    #[tokio::test]
    async fn check_in_warns_on_non_item_scan() {
        let mut handler = ItemCheckIn::new(5);
        let outcome = handler
            .on_scan(ScanResult::Url("/part/1/".to_string()))
            .await
            .unwrap();
        assert_matches!(outcome, ScanOutcome::Notify(message) => {
            assert_eq!(message.severity, Severity::Warning);
        });
        assert!(handler.session().is_empty());
    }

    #[tokio::test]
    async fn location_scan_sets_target_from_scanned_location() {
        let mut handler = LocationScan::new(vec![stock_item(1, Some(2))]);
        assert!(!handler.submit_enabled());

        let outcome = handler
            .on_scan(ScanResult::StockLocation {
                location: StockLocation {
                    pk: 9,
                    name: "Shelf B".to_string(),
                    description: None,
                    pathstring: None,
                    extra: serde_json::Map::new(),
                },
                url: None,
            })
            .await
            .unwrap();

        assert_matches!(outcome, ScanOutcome::Notify(message) => {
            assert_eq!(message.severity, Severity::Success);
        });
        assert_eq!(handler.session().target(), Some(9));
        assert!(handler.submit_enabled());
    }

    #[tokio::test]
    async fn redirect_handler_prefers_match_url() {
        let mut handler = ScanToRedirect;
        let outcome = handler.on_scan(item_result(42, None)).await.unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::Redirect("/stock/item/42/".to_string())
        );
    }

    #[tokio::test]
    async fn link_handler_closes_on_success() {
        let mut handler = LinkBarcode;
        let outcome = handler
            .on_scan(ScanResult::Success(
                "Barcode associated with Stock Item".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Close);
    }

    #[test]
    fn reset_discards_the_session() {
        let mut handler = ItemCheckIn::new(5);
        handler.session_mut().add(stock_item(1, Some(2))).unwrap();
        handler.reset();
        assert!(handler.session().is_empty());
    }
}
