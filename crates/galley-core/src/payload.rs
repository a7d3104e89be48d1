//! Drag payload protocol.
//!
//! A [`DragPayload`] describes the item under the pointer and where it came
//! from. It travels through the host's drag-data channel as JSON
//! ([`WirePayload`]); older hosts send colon-delimited strings, which
//! [`parse_legacy`] turns into the same payload by reading the live kitchen.
//!
//! [`can_drop`] is the single, pure gate consulted both while hovering and
//! once more at drop time.

use crate::appliance::{Appliance, ApplianceStatus};
use crate::catalog::Catalog;
use crate::disruption::DisruptionKind;
use crate::id::*;
use crate::item::{ItemKind, OutputItem, SlotItem};
use crate::kitchen::Kitchen;
use crate::plate::Plate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Where a dragged item was picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    Inventory,
    PreparedList,
    SeasoningBar,
    /// From an appliance. `slot` is `None` when the drag carries the
    /// appliance's finished output rather than one staged unit.
    Appliance {
        appliance: ApplianceId,
        slot: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub kind: ItemKind,
    pub item: ItemId,
    pub source: DragSource,
    pub count: u32,
    pub max_stack: u32,
}

impl DragPayload {
    /// Normalizing constructor: `count >= 1`, `max_stack >= count`.
    pub fn new(
        kind: ItemKind,
        item: impl Into<ItemId>,
        source: DragSource,
        count: u32,
        max_stack: u32,
    ) -> Self {
        let count = count.max(1);
        Self {
            kind,
            item: item.into(),
            source,
            count,
            max_stack: max_stack.max(count),
        }
    }

    /// One raw ingredient from stock.
    pub fn inventory(item: impl Into<ItemId>, max_stack: u32) -> Self {
        Self::new(ItemKind::Raw, item, DragSource::Inventory, 1, max_stack)
    }

    /// One unit from the prepared shelf.
    pub fn prepared(item: impl Into<ItemId>, max_stack: u32) -> Self {
        Self::new(ItemKind::Prepared, item, DragSource::PreparedList, 1, max_stack)
    }

    pub fn seasoning(item: impl Into<ItemId>, max_stack: u32) -> Self {
        Self::new(ItemKind::Seasoning, item, DragSource::SeasoningBar, 1, max_stack)
    }

    /// One unit of a staged slot.
    pub fn slot_unit(appliance: impl Into<ApplianceId>, index: usize, slot: &SlotItem) -> Self {
        Self::new(
            slot.kind,
            slot.item.clone(),
            DragSource::Appliance {
                appliance: appliance.into(),
                slot: Some(index),
            },
            1,
            slot.max_stack,
        )
    }

    /// The whole finished output of an appliance.
    pub fn output_batch(appliance: impl Into<ApplianceId>, output: &OutputItem) -> Self {
        Self::new(
            output.kind,
            output.item.clone(),
            DragSource::Appliance {
                appliance: appliance.into(),
                slot: None,
            },
            output.count,
            output.count,
        )
    }

    pub fn source_appliance(&self) -> Option<&ApplianceId> {
        match &self.source {
            DragSource::Appliance { appliance, .. } => Some(appliance),
            _ => None,
        }
    }

    /// The payload as a one-unit (or whole-batch) slot item.
    pub fn to_slot(&self) -> SlotItem {
        SlotItem::new(self.item.clone(), self.kind, self.count, self.max_stack)
    }

    pub fn to_wire(&self) -> WirePayload {
        let (source, source_appliance_id, source_slot_index) = match &self.source {
            DragSource::Inventory => (WireSource::Inventory, None, None),
            DragSource::PreparedList => (WireSource::PreparedList, None, None),
            DragSource::SeasoningBar => (WireSource::SeasoningBar, None, None),
            DragSource::Appliance { appliance, slot } => {
                (WireSource::Appliance, Some(appliance.clone()), *slot)
            }
        };
        WirePayload {
            kind: self.kind,
            id: self.item.clone(),
            source,
            source_appliance_id,
            source_slot_index,
            count: self.count,
            max_stack: self.max_stack,
        }
    }

    /// Serialize for the drag-data channel.
    pub fn encode(&self) -> Result<String, PayloadError> {
        serde_json::to_string(&self.to_wire()).map_err(|e| PayloadError::Json(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireSource {
    Inventory,
    PreparedList,
    SeasoningBar,
    Appliance,
}

fn one() -> u32 {
    1
}

/// JSON shape of a payload. Display-only fields (`name`, `icon`, `image`)
/// are ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePayload {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub id: ItemId,
    pub source: WireSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_appliance_id: Option<ApplianceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_slot_index: Option<usize>,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default = "one")]
    pub max_stack: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed drag data: {0}")]
    Json(String),
    #[error("appliance payload without sourceApplianceId")]
    MissingSourceAppliance,
    #[error("unrecognized drag data '{0}'")]
    Unrecognized(String),
    #[error("unknown appliance '{0}'")]
    UnknownAppliance(ApplianceId),
    #[error("appliance '{appliance}' has no slot {index}")]
    NoSuchSlot { appliance: ApplianceId, index: usize },
    #[error("appliance '{0}' has no finished output")]
    NoOutput(ApplianceId),
}

impl TryFrom<WirePayload> for DragPayload {
    type Error = PayloadError;

    fn try_from(wire: WirePayload) -> Result<Self, Self::Error> {
        let source = match wire.source {
            WireSource::Inventory => DragSource::Inventory,
            WireSource::PreparedList => DragSource::PreparedList,
            WireSource::SeasoningBar => DragSource::SeasoningBar,
            WireSource::Appliance => DragSource::Appliance {
                appliance: wire
                    .source_appliance_id
                    .ok_or(PayloadError::MissingSourceAppliance)?,
                slot: wire.source_slot_index,
            },
        };
        Ok(DragPayload::new(
            wire.kind,
            wire.id,
            source,
            wire.count,
            wire.max_stack,
        ))
    }
}

/// Decoded content of the drag-data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragData {
    Item(DragPayload),
    /// A plate being carried, by index.
    Plate(usize),
}

const PLATE_PREFIX: &str = "plate:";
const LEGACY_SLOT_PREFIX: &str = "appliance-ingredient:";
const LEGACY_OUTPUT_PREFIX: &str = "appliance-dish:";

/// Decode drag data: plate marker, then JSON, then the legacy strings.
pub fn decode_drag_data(data: &str, kitchen: &Kitchen) -> Result<DragData, PayloadError> {
    if let Some(index) = data.strip_prefix(PLATE_PREFIX) {
        return index
            .trim()
            .parse()
            .map(DragData::Plate)
            .map_err(|_| PayloadError::Unrecognized(data.to_string()));
    }
    match serde_json::from_str::<WirePayload>(data) {
        Ok(wire) => DragPayload::try_from(wire).map(DragData::Item),
        Err(json_err) => {
            tracing::trace!(%json_err, "drag data is not JSON, trying legacy format");
            parse_legacy(data, kitchen).map(DragData::Item)
        }
    }
}

/// Resolve a legacy string against the current kitchen.
///
/// - `appliance-ingredient:<id>:<slot>` is one unit of that slot.
/// - `appliance-dish:<id>` is the appliance's whole finished output.
pub fn parse_legacy(data: &str, kitchen: &Kitchen) -> Result<DragPayload, PayloadError> {
    if let Some(rest) = data.strip_prefix(LEGACY_SLOT_PREFIX) {
        let (id, index) = rest
            .rsplit_once(':')
            .ok_or_else(|| PayloadError::Unrecognized(data.to_string()))?;
        let index: usize = index
            .parse()
            .map_err(|_| PayloadError::Unrecognized(data.to_string()))?;
        let appliance = legacy_source(kitchen, id)?;
        let slot = appliance
            .slots()
            .get(index)
            .ok_or_else(|| PayloadError::NoSuchSlot {
                appliance: appliance.id().clone(),
                index,
            })?;
        return Ok(DragPayload::slot_unit(appliance.id().clone(), index, slot));
    }

    if let Some(id) = data.strip_prefix(LEGACY_OUTPUT_PREFIX) {
        let appliance = legacy_source(kitchen, id)?;
        let output = appliance
            .output()
            .ok_or_else(|| PayloadError::NoOutput(appliance.id().clone()))?;
        return Ok(DragPayload::output_batch(appliance.id().clone(), output));
    }

    Err(PayloadError::Unrecognized(data.to_string()))
}

fn legacy_source<'k>(kitchen: &'k Kitchen, id: &str) -> Result<&'k Appliance, PayloadError> {
    kitchen
        .get(id)
        .ok_or_else(|| PayloadError::UnknownAppliance(ApplianceId::from(id)))
}

// ---------------------------------------------------------------------------
// Drop validation
// ---------------------------------------------------------------------------

/// The surface a payload is hovering over.
#[derive(Debug, Clone, Copy)]
pub enum DropTarget<'a> {
    Inventory,
    PreparedList,
    Appliance(&'a Appliance),
    Plate(&'a Plate),
    Trash,
}

/// What an allowed drop will do with the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    /// The item lands on the target.
    Place,
    /// A raw ingredient goes back into stock.
    ReturnToStock,
    /// The item is thrown away.
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    #[error("only raw ingredients can go back to stock")]
    OnlyRawToStock,
    #[error("finished dishes must be plated")]
    DishMustBePlated,
    #[error("this cannot go on the prepared list")]
    NotShelvable,
    #[error("the trash bin is being emptied")]
    TrashBusy,
    #[error("the appliance is busy ({0:?})")]
    ApplianceBusy(ApplianceStatus),
    #[error("the appliance is out of action: {0}")]
    Disrupted(DisruptionKind),
    #[error("{item} cannot go on {appliance}")]
    NotAllowedOn { item: ItemId, appliance: ApplianceId },
    #[error("only finished dishes can be plated")]
    OnlyDishesOnPlates,
    #[error("the plate is not empty")]
    PlateOccupied,
    #[error("plates are filled from a finished appliance")]
    NotFinishedOutput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropVerdict {
    Allowed(DropEffect),
    Denied(DenyReason),
}

impl DropVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, DropVerdict::Allowed(_))
    }

    pub fn into_result(self) -> Result<DropEffect, DenyReason> {
        match self {
            DropVerdict::Allowed(effect) => Ok(effect),
            DropVerdict::Denied(reason) => Err(reason),
        }
    }
}

/// Whether `payload` may enter `target`. Total and side-effect free.
/// The self-transfer guard is separate: see [`is_self_transfer`].
pub fn can_drop(payload: &DragPayload, target: DropTarget<'_>, catalog: &Catalog) -> DropVerdict {
    use DropVerdict::{Allowed, Denied};

    match target {
        DropTarget::Inventory => match payload.kind {
            ItemKind::Raw => Allowed(DropEffect::ReturnToStock),
            _ => Denied(DenyReason::OnlyRawToStock),
        },

        DropTarget::PreparedList => match payload.kind {
            ItemKind::Dish => Denied(DenyReason::DishMustBePlated),
            ItemKind::Prepared => Allowed(DropEffect::Place),
            ItemKind::Raw if payload.source_appliance().is_some() => {
                Allowed(DropEffect::ReturnToStock)
            }
            ItemKind::Seasoning => Allowed(DropEffect::Discard),
            ItemKind::Raw => Denied(DenyReason::NotShelvable),
        },

        DropTarget::Appliance(appliance) if appliance.is_trash() => {
            if appliance.status().accepts_items() {
                Allowed(DropEffect::Discard)
            } else {
                Denied(DenyReason::TrashBusy)
            }
        }

        DropTarget::Appliance(appliance) => {
            if payload.kind == ItemKind::Dish {
                return Denied(DenyReason::DishMustBePlated);
            }
            if let Some(disruption) = appliance.disruption() {
                return Denied(DenyReason::Disrupted(disruption.kind));
            }
            let status = appliance.status();
            if !matches!(
                status,
                ApplianceStatus::Idle | ApplianceStatus::HasIngredients | ApplianceStatus::Done
            ) {
                return Denied(DenyReason::ApplianceBusy(status));
            }
            if payload.kind == ItemKind::Seasoning {
                return Allowed(DropEffect::Place);
            }
            let allowed = catalog.allowed_appliances(payload.item.as_str());
            if allowed.is_empty() || allowed.contains(appliance.id()) {
                Allowed(DropEffect::Place)
            } else {
                Denied(DenyReason::NotAllowedOn {
                    item: payload.item.clone(),
                    appliance: appliance.id().clone(),
                })
            }
        }

        DropTarget::Plate(plate) => {
            if payload.kind != ItemKind::Dish {
                Denied(DenyReason::OnlyDishesOnPlates)
            } else if !matches!(payload.source, DragSource::Appliance { slot: None, .. }) {
                Denied(DenyReason::NotFinishedOutput)
            } else if !plate.is_empty() {
                Denied(DenyReason::PlateOccupied)
            } else {
                Allowed(DropEffect::Place)
            }
        }

        DropTarget::Trash => Allowed(DropEffect::Discard),
    }
}

/// A payload picked up from `target` must not be dropped back onto it.
pub fn is_self_transfer(payload: &DragPayload, target: &str) -> bool {
    payload.source_appliance().is_some_and(|a| a == target)
}

// ---------------------------------------------------------------------------
// Drag tracker
// ---------------------------------------------------------------------------

/// Holds the single active drag. Starting a drag replaces any stale one;
/// a drop consumes it; drag-end always clears it.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Option<DragPayload>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, payload: DragPayload) {
        if let Some(stale) = self.active.replace(payload) {
            tracing::trace!(item = %stale.item, "stale drag replaced");
        }
    }

    pub fn current(&self) -> Option<&DragPayload> {
        self.active.as_ref()
    }

    /// Consume the payload at drop time.
    pub fn take(&mut self) -> Option<DragPayload> {
        self.active.take()
    }

    /// Drag gesture finished, with or without a drop.
    pub fn end(&mut self) {
        self.active = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}
