//! Reverse check-in workflow: a known set of items, destination discovered
//! by scanning a location barcode.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockscan::workflows::location_scan_dialog;
use stockscan::{
    BarcodeClient, Disposition, FeedbackSender, ScannerConfig, Severity, StockItem,
};

fn item(pk: i64, location: i64, quantity: &str) -> StockItem {
    StockItem {
        pk,
        part: pk * 10,
        part_detail: None,
        location: Some(location),
        quantity: quantity.parse().expect("decimal"),
        uid: None,
        extra: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn scanned_location_becomes_the_transfer_target() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/barcode/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "barcode_data": "{'stocklocation': 9}",
            "success": "Match found for barcode data",
            "url": "/stock/location/9/",
            "stocklocation": {"pk": 9, "name": "Shelf B", "pathstring": "Warehouse/Shelf B"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/stock/transfer/"))
        .and(body_json(json!({
            "location": 9,
            "notes": "",
            "items": [
                {"pk": 1, "quantity": "3"},
                {"pk": 2, "quantity": "1.5"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": "Items transferred"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ScannerConfig::for_base_url(server.uri());
    let client = Arc::new(BarcodeClient::new(config)?);
    let (feedback, mut rx) = FeedbackSender::channel(8);

    let items = vec![item(1, 2, "3"), item(2, 4, "1.5")];
    let mut dialog = location_scan_dialog(client, items, feedback);
    dialog.open();

    // No destination yet: the submit control stays disabled.
    assert!(!dialog.submit_control_enabled());
    assert_eq!(dialog.handler().session().len(), 2);

    assert_eq!(
        dialog.submit("{'stocklocation': 9}").await,
        Disposition::Open
    );
    assert_eq!(dialog.handler().session().target(), Some(9));
    assert!(dialog.submit_control_enabled());

    let message = rx.try_recv().expect("feedback message");
    assert_eq!(message.severity, Severity::Success);
    assert!(message.text.contains("Shelf B"));

    assert_eq!(dialog.finalize().await, Disposition::Closed);

    server.verify().await;
    Ok(())
}

#[tokio::test]
async fn duplicate_items_collapse_when_prefilling_the_session() -> Result<()> {
    let server = MockServer::start().await;
    let config = ScannerConfig::for_base_url(server.uri());
    let client = Arc::new(BarcodeClient::new(config)?);
    let (feedback, _rx) = FeedbackSender::channel(8);

    let items = vec![item(1, 2, "3"), item(1, 2, "3"), item(2, 4, "1.5")];
    let dialog = location_scan_dialog(client, items, feedback);

    assert_eq!(dialog.handler().session().len(), 2);
    Ok(())
}

#[tokio::test]
async fn non_location_scan_leaves_the_target_unset() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/barcode/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "barcode_data": "ITEM-A",
            "success": "Match found for barcode data",
            "url": "/stock/item/7/",
            "stockitem": {"pk": 7, "part": 70, "location": 1, "quantity": "2"}
        })))
        .mount(&server)
        .await;

    let config = ScannerConfig::for_base_url(server.uri());
    let client = Arc::new(BarcodeClient::new(config)?);
    let (feedback, mut rx) = FeedbackSender::channel(8);

    let mut dialog = location_scan_dialog(client, vec![item(1, 2, "3")], feedback);
    dialog.open();

    assert_eq!(dialog.submit("ITEM-A").await, Disposition::Open);
    assert_eq!(dialog.handler().session().target(), None);
    assert!(!dialog.submit_control_enabled());

    let message = rx.try_recv().expect("feedback message");
    assert_eq!(message.severity, Severity::Warning);
    Ok(())
}
