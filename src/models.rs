//! Wire types exchanged with the inventory backend.
//!
//! The barcode endpoint reports matches by populating one of several
//! optional fields on an otherwise shared response envelope. Rather than
//! shape-sniffing at each call site, [`ScanResponse::resolve`] converts the
//! envelope into the [`ScanResult`] tagged union exactly once, at the
//! boundary, with an explicit [`ScanResult::Unrecognized`] variant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Primary key of a stock item (the backend uses integer pks).
pub type ItemId = i64;

/// Primary key of a stock location.
pub type LocationId = i64;

/// Severity of an inline dialog message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// An inline feedback message shown inside the dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(Severity::Danger, text)
    }
}

/// Summary of the part owning a stock item, as embedded in scan responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSummary {
    pub pk: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A stock item as returned by the barcode endpoint.
///
/// Treated as opaque passthrough data: unrecognized fields are preserved in
/// `extra` so callers can forward the record unchanged. The only field this
/// workflow ever rewrites is `location`, and that happens server-side on a
/// successful transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub pk: ItemId,
    pub part: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_detail: Option<PartSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationId>,
    pub quantity: Decimal,
    /// Barcode hash currently linked to this item, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl StockItem {
    /// Display name for the owning part, falling back to the pk.
    pub fn part_name(&self) -> String {
        match &self.part_detail {
            Some(part) => part
                .full_name
                .clone()
                .unwrap_or_else(|| part.name.clone()),
            None => format!("Part {}", self.part),
        }
    }
}

/// A stock location as returned by the barcode endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLocation {
    pub pk: LocationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathstring: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Raw response envelope from the barcode endpoints.
///
/// The server echoes `barcode_data` and `hash` on every response and names
/// the plugin that matched, alongside at most one recognized match tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub stockitem: Option<StockItem>,
    #[serde(default)]
    pub stocklocation: Option<StockLocation>,
    #[serde(default)]
    pub part: Option<PartSummary>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub barcode_data: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub plugin: Option<String>,
}

impl ScanResponse {
    /// Collapse the envelope into a single typed result.
    ///
    /// The contract is exactly one populated tag per response; if several
    /// are present the match tags win over `url`, which wins over the
    /// `success`/`error` acknowledgements, mirroring the order in which the
    /// server populates them (a matched item is always accompanied by its
    /// detail `url`).
    pub fn resolve(self) -> ScanResult {
        if let Some(item) = self.stockitem {
            return ScanResult::StockItem {
                item,
                url: self.url,
            };
        }
        if let Some(location) = self.stocklocation {
            return ScanResult::StockLocation {
                location,
                url: self.url,
            };
        }
        if let Some(part) = self.part {
            return ScanResult::Part {
                part,
                url: self.url,
            };
        }
        if let Some(url) = self.url {
            return ScanResult::Url(url);
        }
        if let Some(message) = self.success {
            return ScanResult::Success(message);
        }
        if let Some(message) = self.error {
            return ScanResult::Error(message);
        }
        ScanResult::Unrecognized
    }
}

/// Typed outcome of a single barcode submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult {
    StockItem {
        item: StockItem,
        url: Option<String>,
    },
    StockLocation {
        location: StockLocation,
        url: Option<String>,
    },
    Part {
        part: PartSummary,
        url: Option<String>,
    },
    /// Bare redirect with no matched record.
    Url(String),
    /// Generic acknowledgement (e.g. a successful barcode link).
    Success(String),
    /// Logical error reported by the server.
    Error(String),
    /// None of the recognized tags were present.
    Unrecognized,
}

/// One line of a batch stock transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferItem {
    pub pk: ItemId,
    pub quantity: Decimal,
}

/// Batch transfer of stock items into a target location.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct TransferRequest {
    pub location: LocationId,
    pub notes: String,
    #[validate(length(min = 1))]
    pub items: Vec<TransferItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn parse(value: Value) -> ScanResponse {
        serde_json::from_value(value).expect("valid scan response")
    }

    #[test]
    fn stock_item_match_resolves_with_detail_url() {
        let response = parse(json!({
            "barcode_data": "{'stockitem': 42}",
            "hash": "a1b2c3",
            "plugin": "InternalBarcode",
            "url": "/stock/item/42/",
            "success": "Match found for barcode data",
            "stockitem": {
                "pk": 42,
                "part": 7,
                "part_detail": {"pk": 7, "name": "M3 bolt", "thumbnail": "/media/m3.png"},
                "location": 5,
                "quantity": "25.0"
            }
        }));

        assert_matches!(response.resolve(), ScanResult::StockItem { item, url } => {
            assert_eq!(item.pk, 42);
            assert_eq!(item.location, Some(5));
            assert_eq!(item.quantity, dec!(25.0));
            assert_eq!(url.as_deref(), Some("/stock/item/42/"));
        });
    }

    #[test]
    fn location_match_resolves_before_bare_url() {
        let response = parse(json!({
            "stocklocation": {"pk": 3, "name": "Shelf A", "pathstring": "Warehouse/Shelf A"},
            "url": "/stock/location/3/"
        }));

        assert_matches!(response.resolve(), ScanResult::StockLocation { location, .. } => {
            assert_eq!(location.pk, 3);
            assert_eq!(location.pathstring.as_deref(), Some("Warehouse/Shelf A"));
        });
    }

    #[test]
    fn error_tag_resolves_verbatim() {
        let response = parse(json!({
            "barcode_data": "xyz",
            "error": "No match found for barcode data"
        }));

        assert_matches!(response.resolve(), ScanResult::Error(message) => {
            assert_eq!(message, "No match found for barcode data");
        });
    }

    #[test]
    fn envelope_without_recognized_tags_is_unrecognized() {
        let response = parse(json!({"barcode_data": "xyz", "hash": "deadbeef"}));
        assert_matches!(response.resolve(), ScanResult::Unrecognized);
    }

    #[test]
    fn unknown_stock_item_fields_are_preserved() {
        let response = parse(json!({
            "stockitem": {
                "pk": 1,
                "part": 2,
                "quantity": "1",
                "serial": "SN-0001",
                "status": 10
            }
        }));

        assert_matches!(response.resolve(), ScanResult::StockItem { item, .. } => {
            assert_eq!(item.extra.get("serial"), Some(&json!("SN-0001")));
            assert_eq!(item.extra.get("status"), Some(&json!(10)));
        });
    }

    #[test]
    fn empty_transfer_request_fails_validation() {
        let request = TransferRequest {
            location: 5,
            notes: String::new(),
            items: Vec::new(),
        };
        assert!(request.validate().is_err());
    }
}
