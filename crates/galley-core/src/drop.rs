//! Drop orchestration.
//!
//! One entry point per gesture phase: [`GameState::drag_over`] for hover
//! feedback and [`GameState::drop_payload`] for the drop itself. A drop
//! always runs in the same order:
//!
//! 1. reject self-transfers silently,
//! 2. re-run [`can_drop`] against the live target,
//! 3. check the source still holds what the payload claims,
//! 4. insert into the target, then remove from the source.
//!
//! If step 4's removal fails the target is restored from a snapshot, so an
//! item is never duplicated or lost. Failures surface as a toast here and
//! nowhere else.

use crate::appliance::{ApplianceStatus, Rejection};
use crate::id::*;
use crate::item::SlotItem;
use crate::notify::{Notifier, Severity};
use crate::payload::{
    DenyReason, DragData, DragPayload, DragSource, DropEffect, DropTarget, PayloadError, can_drop,
    decode_drag_data, is_self_transfer,
};
use crate::state::{GameState, StateError};

/// A surface the pointer can release over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone<'a> {
    Appliance(&'a str),
    Plate(usize),
    PreparedList,
    Inventory,
    Trash,
}

/// Hover affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragHint {
    Accept(DropEffect),
    Reject(DenyReason),
    /// No affordance at all: the payload's own source, or an unknown target.
    Ignore,
}

/// What a successful drop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Staged {
        appliance: ApplianceId,
        item: ItemId,
        count: u32,
    },
    Shelved { item: ItemId, count: u32 },
    Restocked { item: ItemId, count: u32 },
    Discarded { item: ItemId, count: u32 },
    Trashed { appliance: ApplianceId, count: u32 },
    Plated { plate: usize, dish: ItemId },
}

impl Transfer {
    fn describe(&self) -> String {
        match self {
            Transfer::Staged {
                appliance,
                item,
                count,
            } => with_count(format!("Put {item}"), *count) + &format!(" on {appliance}"),
            Transfer::Shelved { item, count } => with_count(format!("Shelved {item}"), *count),
            Transfer::Restocked { item, count } => {
                with_count(format!("Returned {item}"), *count) + " to stock"
            }
            Transfer::Discarded { item, count } => with_count(format!("Discarded {item}"), *count),
            Transfer::Trashed { appliance, count } => format!("Threw {count} into {appliance}"),
            Transfer::Plated { dish, .. } => format!("Plated {dish}"),
        }
    }
}

fn with_count(text: String, count: u32) -> String {
    if count > 1 { format!("{text} x{count}") } else { text }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropError {
    #[error("{0}")]
    Denied(#[from] DenyReason),
    #[error("{0}")]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("dropped onto its own source")]
    SelfTransfer,
    #[error("out of {0}")]
    OutOfStock(ItemId),
    #[error("the dragged item is no longer there")]
    SourceMissing,
    #[error("nothing is being dragged")]
    NoActiveDrag,
    #[error("that cannot be dropped here")]
    Unsupported,
}

impl GameState {
    // -----------------------------------------------------------------------
    // Gesture entry points
    // -----------------------------------------------------------------------

    /// Hover feedback. Never mutates.
    pub fn drag_over(&self, payload: &DragPayload, zone: DropZone<'_>) -> DragHint {
        if is_self_drop(payload, zone) {
            return DragHint::Ignore;
        }
        let Ok(target) = self.drop_target(zone) else {
            return DragHint::Ignore;
        };
        match can_drop(payload, target, self.catalog()).into_result() {
            Ok(effect) => DragHint::Accept(effect),
            Err(reason) => DragHint::Reject(reason),
        }
    }

    /// Drop `payload` on `zone`. All-or-nothing; the outcome is toasted.
    pub fn drop_payload(
        &mut self,
        payload: &DragPayload,
        zone: DropZone<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<Transfer, DropError> {
        let result = self.apply_drop(payload, zone);
        match &result {
            Ok(transfer) => {
                tracing::debug!(?transfer, "drop applied");
                notifier.show_toast(&transfer.describe(), Severity::Success);
            }
            Err(DropError::SelfTransfer) => {}
            Err(err) => {
                tracing::debug!(%err, item = %payload.item, "drop refused");
                notifier.show_toast(&err.to_string(), Severity::Error);
            }
        }
        result
    }

    /// Drop whatever the drag tracker holds. The payload is consumed whether
    /// or not the drop succeeds.
    pub fn drop_active(
        &mut self,
        zone: DropZone<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<Transfer, DropError> {
        let payload = self.drag.take().ok_or(DropError::NoActiveDrag)?;
        self.drop_payload(&payload, zone, notifier)
    }

    /// Drop raw drag-channel data: a carried plate, a JSON payload or a
    /// legacy string.
    pub fn drop_data(
        &mut self,
        data: &str,
        zone: DropZone<'_>,
        notifier: &mut dyn Notifier,
    ) -> Result<Transfer, DropError> {
        let decoded = match decode_drag_data(data, &self.kitchen) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!(%err, data, "undecodable drag data");
                notifier.show_toast(&err.to_string(), Severity::Error);
                return Err(err.into());
            }
        };
        match (decoded, zone) {
            (DragData::Item(payload), zone) => self.drop_payload(&payload, zone, notifier),
            (DragData::Plate(plate), DropZone::Appliance(appliance)) => {
                let dish = self.plate_onto_appliance(plate, appliance, notifier)?;
                Ok(Transfer::Plated { plate, dish })
            }
            (DragData::Plate(_), _) => Err(DropError::Unsupported),
        }
    }

    // -----------------------------------------------------------------------
    // Orchestration
    // -----------------------------------------------------------------------

    fn drop_target(&self, zone: DropZone<'_>) -> Result<DropTarget<'_>, DropError> {
        Ok(match zone {
            DropZone::Appliance(id) => DropTarget::Appliance(self.appliance(id)?),
            DropZone::Plate(index) => DropTarget::Plate(self.plate(index)?),
            DropZone::PreparedList => DropTarget::PreparedList,
            DropZone::Inventory => DropTarget::Inventory,
            DropZone::Trash => DropTarget::Trash,
        })
    }

    fn apply_drop(&mut self, payload: &DragPayload, zone: DropZone<'_>) -> Result<Transfer, DropError> {
        if is_self_drop(payload, zone) {
            return Err(DropError::SelfTransfer);
        }
        let effect = can_drop(payload, self.drop_target(zone)?, self.catalog()).into_result()?;
        let unit = self.peek_source(payload)?;

        match zone {
            DropZone::Appliance(id) => {
                if self.appliance(id)?.is_trash() {
                    self.discard_into_bin(id, payload, &unit)
                } else {
                    self.stage_on_appliance(id, payload, unit)
                }
            }
            DropZone::Plate(index) => self.plate_from_output(index, payload),
            DropZone::PreparedList | DropZone::Inventory | DropZone::Trash => {
                self.take_source(payload)?;
                let item = unit.item;
                let count = unit.count;
                Ok(match effect {
                    DropEffect::Place => {
                        self.prepared.push_many(&item, count);
                        Transfer::Shelved { item, count }
                    }
                    DropEffect::ReturnToStock => {
                        self.inventory.add(&item, count);
                        Transfer::Restocked { item, count }
                    }
                    DropEffect::Discard => Transfer::Discarded { item, count },
                })
            }
        }
    }

    /// What the payload's source can hand over right now, without touching
    /// it.
    fn peek_source(&self, payload: &DragPayload) -> Result<SlotItem, DropError> {
        let item = payload.item.as_str();
        let max_stack = self.catalog().max_stack(item);
        match &payload.source {
            DragSource::Inventory => {
                if !self.inventory.has(item, 1) {
                    return Err(DropError::OutOfStock(payload.item.clone()));
                }
                Ok(SlotItem::single(item, payload.kind, max_stack))
            }
            DragSource::PreparedList => {
                if !self.prepared.contains(item) {
                    return Err(DropError::SourceMissing);
                }
                Ok(SlotItem::single(item, payload.kind, max_stack))
            }
            DragSource::SeasoningBar => Ok(SlotItem::single(item, payload.kind, max_stack)),
            DragSource::Appliance {
                appliance,
                slot: Some(index),
            } => {
                let source = self.kitchen.get(appliance.as_str()).ok_or(DropError::SourceMissing)?;
                let slot = source
                    .slots()
                    .get(*index)
                    .filter(|s| s.item == payload.item)
                    .ok_or(DropError::SourceMissing)?;
                Ok(SlotItem {
                    count: 1,
                    ..slot.clone()
                })
            }
            DragSource::Appliance {
                appliance,
                slot: None,
            } => {
                let source = self.kitchen.get(appliance.as_str()).ok_or(DropError::SourceMissing)?;
                let output = source
                    .output()
                    .filter(|o| o.item == payload.item)
                    .ok_or(DropError::SourceMissing)?;
                Ok(output.clone().into_slot())
            }
        }
    }

    /// Remove what [`peek_source`](Self::peek_source) promised.
    fn take_source(&mut self, payload: &DragPayload) -> Result<(), DropError> {
        let item = payload.item.as_str();
        match &payload.source {
            DragSource::Inventory => {
                if !self.inventory.try_take(item, 1) {
                    return Err(DropError::OutOfStock(payload.item.clone()));
                }
            }
            DragSource::PreparedList => {
                if !self.prepared.try_take(item) {
                    return Err(DropError::SourceMissing);
                }
            }
            DragSource::SeasoningBar => {}
            DragSource::Appliance {
                appliance,
                slot: Some(index),
            } => {
                self.appliance_mut(appliance.as_str())?.take_one(*index)?;
            }
            DragSource::Appliance {
                appliance,
                slot: None,
            } => {
                self.appliance_mut(appliance.as_str())?.collect_output()?;
            }
        }
        Ok(())
    }

    /// Insert into a cooking appliance, converting a finished output back
    /// into input first.
    fn stage_on_appliance(
        &mut self,
        target_id: &str,
        payload: &DragPayload,
        unit: SlotItem,
    ) -> Result<Transfer, DropError> {
        let target = self.appliance_mut(target_id)?;
        let snapshot = target.clone();
        if target.status() == ApplianceStatus::Done {
            target.convert_done_to_input()?;
        }
        if let Err(rejection) = target.add_item(unit.clone()) {
            *target = snapshot;
            return Err(rejection.into());
        }
        let appliance = target.id().clone();

        if let Err(err) = self.take_source(payload) {
            tracing::warn!(%err, %appliance, "drop source vanished, rolling back");
            *self.appliance_mut(target_id)? = snapshot;
            return Err(err);
        }
        Ok(Transfer::Staged {
            appliance,
            item: unit.item,
            count: unit.count,
        })
    }

    /// Discard into a trash bin. A finished batch fills the bin up to its
    /// remaining room; the rest of the batch is lost with it.
    fn discard_into_bin(
        &mut self,
        bin_id: &str,
        payload: &DragPayload,
        unit: &SlotItem,
    ) -> Result<Transfer, DropError> {
        let bin = self.appliance_mut(bin_id)?;
        let room = bin.trash_room();
        if room == 0 {
            return Err(Rejection::TrashFull.into());
        }
        let snapshot = bin.clone();
        let count = unit.count.min(room);
        for _ in 0..count {
            bin.add_trash()?;
        }
        let appliance = bin.id().clone();

        if let Err(err) = self.take_source(payload) {
            *self.appliance_mut(bin_id)? = snapshot;
            return Err(err);
        }
        Ok(Transfer::Trashed { appliance, count })
    }

    /// One unit of a finished dish onto a plate.
    fn plate_from_output(&mut self, plate: usize, payload: &DragPayload) -> Result<Transfer, DropError> {
        let DragSource::Appliance {
            appliance,
            slot: None,
        } = &payload.source
        else {
            return Err(DropError::SourceMissing);
        };
        if !self.plate(plate)?.is_empty() {
            return Err(DenyReason::PlateOccupied.into());
        }
        let unit = self.appliance_mut(appliance.as_str())?.take_one_output()?;
        self.plate_mut(plate)?
            .put_dish(unit.item.clone())
            .map_err(StateError::from)?;
        Ok(Transfer::Plated {
            plate,
            dish: unit.item,
        })
    }
}

/// Dropping back where the drag started does nothing.
fn is_self_drop(payload: &DragPayload, zone: DropZone<'_>) -> bool {
    match (zone, &payload.source) {
        (DropZone::Appliance(id), _) => is_self_transfer(payload, id),
        (DropZone::Inventory, DragSource::Inventory)
        | (DropZone::PreparedList, DragSource::PreparedList) => true,
        _ => false,
    }
}
