//! Transient accumulation of scanned stock items awaiting one batch transfer.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::errors::ScanError;
use crate::models::{ItemId, LocationId, StockItem, TransferItem, TransferRequest};

/// One rendered row of the accumulated-items table.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub item: ItemId,
    pub part_name: String,
    pub thumbnail: Option<String>,
    pub location: Option<LocationId>,
    pub quantity: Decimal,
}

/// Client-held list of stock items scanned for check-in.
///
/// Lives only for the duration of an open dialog: created empty when the
/// dialog opens, discarded on close, and cleared after a successful batch
/// transfer. No two entries share an item id, and an item already at the
/// target location is rejected at scan time.
#[derive(Debug, Clone)]
pub struct CheckInSession {
    items: Vec<StockItem>,
    ids: HashSet<ItemId>,
    notes: String,
    target: Option<LocationId>,
}

impl CheckInSession {
    /// Session for the forward workflow: the target location is known up
    /// front and items are discovered by scanning.
    pub fn new(target: LocationId) -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
            notes: String::new(),
            target: Some(target),
        }
    }

    /// Session for the reverse workflow: the item set is known up front and
    /// the target location is discovered by scanning.
    pub fn for_items(items: Vec<StockItem>) -> Self {
        let mut session = Self {
            items: Vec::new(),
            ids: HashSet::new(),
            notes: String::new(),
            target: None,
        };
        for item in items {
            // Duplicates in the caller-supplied list collapse silently.
            let _ = session.add(item);
        }
        session
    }

    pub fn target(&self) -> Option<LocationId> {
        self.target
    }

    pub fn set_target(&mut self, target: LocationId) {
        self.target = Some(target);
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    /// Append a scanned item.
    ///
    /// Rejects a duplicate id with a warning-severity error and an item
    /// already at the target location with an info-severity error; in both
    /// cases the session is unchanged.
    pub fn add(&mut self, item: StockItem) -> Result<(), ScanError> {
        if self.ids.contains(&item.pk) {
            return Err(ScanError::DuplicateItem(item.pk));
        }

        if let (Some(target), Some(location)) = (self.target, item.location) {
            if location == target {
                return Err(ScanError::AlreadyAtLocation(item.pk));
            }
        }

        self.ids.insert(item.pk);
        self.items.push(item);
        Ok(())
    }

    /// Remove one entry by id. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: ItemId) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        self.items.retain(|item| item.pk != id);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }

    /// Rows for the accumulated-items table, in scan order.
    pub fn rows(&self) -> Vec<SessionRow> {
        self.items
            .iter()
            .map(|item| SessionRow {
                item: item.pk,
                part_name: item.part_name(),
                thumbnail: item
                    .part_detail
                    .as_ref()
                    .and_then(|part| part.thumbnail.clone()),
                location: item.location,
                quantity: item.quantity,
            })
            .collect()
    }

    /// Convert the session into one batch transfer request.
    pub fn to_transfer(&self) -> Result<TransferRequest, ScanError> {
        let location = self.target.ok_or(ScanError::NoTargetLocation)?;

        if self.items.is_empty() {
            return Err(ScanError::EmptySession);
        }

        Ok(TransferRequest {
            location,
            notes: self.notes.clone(),
            items: self
                .items
                .iter()
                .map(|item| TransferItem {
                    pk: item.pk,
                    quantity: item.quantity,
                })
                .collect(),
        })
    }
}
