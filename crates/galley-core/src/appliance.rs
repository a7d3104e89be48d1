//! The per-appliance state machine.
//!
//! ```text
//! Idle --add--> HasIngredients --start--> Processing --100%--> Done
//! Done --collect/convert--> Idle | HasIngredients
//! Done --burn timer--> Burned --clean--> Cleaning --100%--> Idle
//! Idle|HasIngredients|Processing|Done --break--> Broken --repair--> Repairing --100%--> Idle
//! ```
//!
//! Trash bins run a parallel machine: discards raise `trash_count` while
//! Idle/HasIngredients, and emptying goes through Cleaning back to Idle.
//!
//! Every operation validates the current status first and returns a
//! [`Rejection`] without touching state when it does not apply. Burning and
//! breaking are the only transitions the machine forces on itself.

use crate::catalog::ApplianceDef;
use crate::disruption::{ActionRequired, Disruption, DisruptionKind};
use crate::id::*;
use crate::item::{OutputItem, SlotItem};
use crate::time::{Millis, Timer, progress_percent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplianceStatus {
    Idle,
    HasIngredients,
    Processing,
    Done,
    Burned,
    Cleaning,
    Broken,
    Repairing,
}

impl ApplianceStatus {
    /// Statuses in which slots may be added or removed.
    pub fn accepts_items(self) -> bool {
        matches!(self, ApplianceStatus::Idle | ApplianceStatus::HasIngredients)
    }
}

/// Why a state-machine operation did not take effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("appliance is {0:?}")]
    WrongStatus(ApplianceStatus),
    #[error("all {capacity} slots are in use")]
    CapacityFull { capacity: u32 },
    #[error("stack of {item} is at its limit of {max_stack}")]
    StackFull { item: ItemId, max_stack: u32 },
    #[error("nothing to process")]
    Empty,
    #[error("no slot at index {0}")]
    NoSuchSlot(usize),
    #[error("nothing to collect")]
    NothingToCollect,
    #[error("trash bins cannot {0}")]
    TrashBin(&'static str),
    #[error("not a trash bin")]
    NotTrashBin,
    #[error("trash bin is full")]
    TrashFull,
    #[error("appliance is out of action: {0}")]
    Disrupted(DisruptionKind),
    #[error("appliance is not disrupted")]
    NotDisrupted,
    #[error("not enough money: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },
}

/// A transition the machine made on its own during [`Appliance::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Completed(OutputItem),
    Burned,
    Cleaned,
    Emptied { discarded: u32 },
    Repaired,
}

/// One placed appliance. Fields are private; the methods below are the only
/// way to mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct Appliance {
    def: ApplianceDef,
    status: ApplianceStatus,
    slots: Vec<SlotItem>,
    output: Option<OutputItem>,
    /// Output fixed at start time, released on completion.
    pending: Option<OutputItem>,
    progress: f64,
    burn_progress: f64,
    timer: Option<Timer>,
    burn_timer: Option<Millis>,
    trash_count: u32,
    disruption: Option<Disruption>,
}

impl Appliance {
    pub fn new(def: ApplianceDef) -> Self {
        Self {
            def,
            status: ApplianceStatus::Idle,
            slots: Vec::new(),
            output: None,
            pending: None,
            progress: 0.0,
            burn_progress: 0.0,
            timer: None,
            burn_timer: None,
            trash_count: 0,
            disruption: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn id(&self) -> &ApplianceId {
        &self.def.id
    }

    pub fn def(&self) -> &ApplianceDef {
        &self.def
    }

    pub fn status(&self) -> ApplianceStatus {
        self.status
    }

    pub fn slots(&self) -> &[SlotItem] {
        &self.slots
    }

    pub fn output(&self) -> Option<&OutputItem> {
        self.output.as_ref()
    }

    /// The output a running cook will produce.
    pub fn pending_output(&self) -> Option<&OutputItem> {
        self.pending.as_ref()
    }

    /// Processing, cleaning or repair progress, 0 to 100.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Decay of a finished output towards burning, 0 to 100.
    pub fn burn_progress(&self) -> f64 {
        self.burn_progress
    }

    pub fn start_time(&self) -> Option<Millis> {
        self.timer.map(|t| t.start)
    }

    pub fn process_time(&self) -> Option<Millis> {
        self.timer.map(|t| t.duration)
    }

    pub fn burn_timer(&self) -> Option<Millis> {
        self.burn_timer
    }

    pub fn trash_count(&self) -> u32 {
        self.trash_count
    }

    pub fn disruption(&self) -> Option<Disruption> {
        self.disruption
    }

    pub fn is_trash(&self) -> bool {
        self.def.is_trash()
    }

    pub fn capacity(&self) -> u32 {
        self.def.capacity
    }

    /// Idle with nothing blocking it: free for a new job.
    pub fn is_available(&self) -> bool {
        self.status == ApplianceStatus::Idle && self.disruption.is_none()
    }

    /// Trash fill level, 0 to 100. Always 0 for cooking appliances.
    pub fn fill_percent(&self) -> f64 {
        if !self.is_trash() || self.def.capacity == 0 {
            return 0.0;
        }
        (self.trash_count as f64 / self.def.capacity as f64 * 100.0).min(100.0)
    }

    /// Units the trash bin can still take.
    pub fn trash_room(&self) -> u32 {
        if self.is_trash() {
            self.def.capacity.saturating_sub(self.trash_count)
        } else {
            0
        }
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    fn ensure_status(&self, allowed: &[ApplianceStatus]) -> Result<(), Rejection> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(Rejection::WrongStatus(self.status))
        }
    }

    fn ensure_cooking(&self, action: &'static str) -> Result<(), Rejection> {
        if self.is_trash() {
            return Err(Rejection::TrashBin(action));
        }
        match self.disruption {
            Some(d) => Err(Rejection::Disrupted(d.kind)),
            None => Ok(()),
        }
    }

    fn ensure_trash(&self) -> Result<(), Rejection> {
        if self.is_trash() {
            Ok(())
        } else {
            Err(Rejection::NotTrashBin)
        }
    }

    // -----------------------------------------------------------------------
    // Staging
    // -----------------------------------------------------------------------

    /// Stage `item`. An existing slot of the same item absorbs it if the
    /// result stays within that slot's stack limit; otherwise a new slot is
    /// opened if capacity allows.
    pub fn add_item(&mut self, item: SlotItem) -> Result<(), Rejection> {
        self.ensure_cooking("hold ingredients")?;
        self.ensure_status(&[ApplianceStatus::Idle, ApplianceStatus::HasIngredients])?;

        if let Some(slot) = self.slots.iter_mut().find(|s| s.item == item.item) {
            if slot.count + item.count > slot.max_stack {
                return Err(Rejection::StackFull {
                    item: slot.item.clone(),
                    max_stack: slot.max_stack,
                });
            }
            slot.count += item.count;
        } else {
            if self.slots.len() >= self.def.capacity as usize {
                return Err(Rejection::CapacityFull {
                    capacity: self.def.capacity,
                });
            }
            self.slots
                .push(SlotItem::new(item.item, item.kind, item.count, item.max_stack));
        }

        self.status = ApplianceStatus::HasIngredients;
        Ok(())
    }

    /// Whether [`add_item`](Self::add_item) would accept `item` right now.
    pub fn can_accept(&self, item: &SlotItem) -> Result<(), Rejection> {
        let mut probe = self.clone();
        probe.add_item(item.clone())
    }

    /// Remove the whole slot at `index`.
    pub fn remove_item(&mut self, index: usize) -> Result<SlotItem, Rejection> {
        self.ensure_status(&[ApplianceStatus::Idle, ApplianceStatus::HasIngredients])?;
        if index >= self.slots.len() {
            return Err(Rejection::NoSuchSlot(index));
        }
        let removed = self.slots.remove(index);
        self.settle_after_removal();
        Ok(removed)
    }

    /// Remove one unit from the slot at `index`.
    pub fn take_one(&mut self, index: usize) -> Result<SlotItem, Rejection> {
        self.ensure_status(&[ApplianceStatus::Idle, ApplianceStatus::HasIngredients])?;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(Rejection::NoSuchSlot(index))?;
        let unit = SlotItem {
            count: 1,
            ..slot.clone()
        };
        if slot.count > 1 {
            slot.count -= 1;
        } else {
            self.slots.remove(index);
        }
        self.settle_after_removal();
        Ok(unit)
    }

    /// Empty every slot, returning what was staged.
    pub fn clear(&mut self) -> Result<Vec<SlotItem>, Rejection> {
        self.ensure_status(&[ApplianceStatus::HasIngredients])?;
        let removed = std::mem::take(&mut self.slots);
        self.status = ApplianceStatus::Idle;
        Ok(removed)
    }

    fn settle_after_removal(&mut self) {
        if self.slots.is_empty() {
            self.status = ApplianceStatus::Idle;
        }
    }

    // -----------------------------------------------------------------------
    // Processing
    // -----------------------------------------------------------------------

    /// Begin cooking the staged slots. `output` is fixed now, so later
    /// changes cannot alter what the cook yields.
    pub fn start_processing(
        &mut self,
        process_time: Millis,
        output: OutputItem,
        now: Millis,
    ) -> Result<(), Rejection> {
        self.ensure_cooking("cook")?;
        self.ensure_status(&[ApplianceStatus::HasIngredients])?;
        if self.slots.is_empty() {
            return Err(Rejection::Empty);
        }
        tracing::debug!(
            appliance = %self.def.id,
            output = %output.item,
            count = output.count,
            process_time,
            "processing started"
        );
        self.status = ApplianceStatus::Processing;
        self.progress = 0.0;
        self.timer = Some(Timer::new(now, process_time));
        self.pending = Some(output);
        Ok(())
    }

    /// Advance timers to `now`. Returns the transition made, if any.
    pub fn tick(&mut self, now: Millis) -> Option<Transition> {
        match self.status {
            ApplianceStatus::Processing => {
                let timer = self.timer?;
                self.progress = timer.progress(now);
                if !timer.is_finished(now) {
                    return None;
                }
                let output = self.pending.take()?;
                self.slots.clear();
                self.output = Some(output.clone());
                self.status = ApplianceStatus::Done;
                self.progress = 100.0;
                self.burn_progress = 0.0;
                self.burn_timer = Some(now);
                tracing::debug!(appliance = %self.def.id, output = %output.item, "processing done");
                Some(Transition::Completed(output))
            }
            ApplianceStatus::Done if self.def.burn_time > 0 => {
                let since = self.burn_timer?;
                self.burn_progress = progress_percent(now, since, self.def.burn_time);
                if now.saturating_sub(since) < self.def.burn_time {
                    return None;
                }
                self.wipe();
                self.status = ApplianceStatus::Burned;
                tracing::debug!(appliance = %self.def.id, "output burned");
                Some(Transition::Burned)
            }
            ApplianceStatus::Cleaning => {
                let timer = self.timer?;
                self.progress = timer.progress(now);
                if !timer.is_finished(now) {
                    return None;
                }
                self.wipe();
                self.status = ApplianceStatus::Idle;
                if self.is_trash() {
                    let discarded = std::mem::take(&mut self.trash_count);
                    tracing::debug!(appliance = %self.def.id, discarded, "trash emptied");
                    Some(Transition::Emptied { discarded })
                } else {
                    tracing::debug!(appliance = %self.def.id, "cleaned");
                    Some(Transition::Cleaned)
                }
            }
            ApplianceStatus::Repairing => {
                let timer = self.timer?;
                self.progress = timer.progress(now);
                if !timer.is_finished(now) {
                    return None;
                }
                self.wipe();
                self.status = ApplianceStatus::Idle;
                tracing::debug!(appliance = %self.def.id, "repaired");
                Some(Transition::Repaired)
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Finished output
    // -----------------------------------------------------------------------

    /// Take the finished output and fully reset to Idle.
    pub fn collect_output(&mut self) -> Result<OutputItem, Rejection> {
        if self.status != ApplianceStatus::Done {
            return Err(Rejection::NothingToCollect);
        }
        let output = self.output.take().ok_or(Rejection::NothingToCollect)?;
        self.reset();
        Ok(output)
    }

    /// Take one unit of the finished output. The appliance resets once the
    /// last unit leaves.
    pub fn take_one_output(&mut self) -> Result<OutputItem, Rejection> {
        if self.status != ApplianceStatus::Done {
            return Err(Rejection::NothingToCollect);
        }
        let output = self.output.as_mut().ok_or(Rejection::NothingToCollect)?;
        let unit = OutputItem {
            count: 1,
            ..output.clone()
        };
        if output.count > 1 {
            output.count -= 1;
        } else {
            self.reset();
        }
        Ok(unit)
    }

    /// Turn the finished output back into a single staged slot so more can
    /// be added to it. The whole batch stays together: its count becomes the
    /// slot's stack limit.
    pub fn convert_done_to_input(&mut self) -> Result<(), Rejection> {
        if self.status != ApplianceStatus::Done {
            return Err(Rejection::WrongStatus(self.status));
        }
        let output = self.output.take().ok_or(Rejection::NothingToCollect)?;
        self.wipe();
        self.slots.push(output.into_slot());
        self.status = ApplianceStatus::HasIngredients;
        Ok(())
    }

    /// Full reset to Idle: contents, output, progress and timers cleared.
    pub fn reset(&mut self) {
        self.wipe();
        self.status = ApplianceStatus::Idle;
    }

    fn wipe(&mut self) {
        self.slots.clear();
        self.output = None;
        self.pending = None;
        self.progress = 0.0;
        self.burn_progress = 0.0;
        self.timer = None;
        self.burn_timer = None;
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Scrub a burned appliance.
    pub fn begin_clean(&mut self, now: Millis) -> Result<(), Rejection> {
        self.ensure_status(&[ApplianceStatus::Burned])?;
        self.status = ApplianceStatus::Cleaning;
        self.progress = 0.0;
        self.timer = Some(Timer::new(now, self.def.clean_time));
        Ok(())
    }

    /// Forced breakdown. Whatever was inside is lost.
    pub fn break_down(&mut self) -> Result<(), Rejection> {
        self.ensure_cooking("break")?;
        self.ensure_status(&[
            ApplianceStatus::Idle,
            ApplianceStatus::HasIngredients,
            ApplianceStatus::Processing,
            ApplianceStatus::Done,
        ])?;
        self.wipe();
        self.status = ApplianceStatus::Broken;
        tracing::debug!(appliance = %self.def.id, "broke down");
        Ok(())
    }

    /// Start repairing a broken appliance. Payment is the caller's concern.
    pub fn begin_repair(&mut self, repair_time: Millis, now: Millis) -> Result<(), Rejection> {
        self.ensure_status(&[ApplianceStatus::Broken])?;
        self.status = ApplianceStatus::Repairing;
        self.progress = 0.0;
        self.timer = Some(Timer::new(now, repair_time));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Trash
    // -----------------------------------------------------------------------

    /// Discard one unit into the bin. Returns the new fill count.
    pub fn add_trash(&mut self) -> Result<u32, Rejection> {
        self.ensure_trash()?;
        self.ensure_status(&[ApplianceStatus::Idle, ApplianceStatus::HasIngredients])?;
        if self.trash_count >= self.def.capacity {
            return Err(Rejection::TrashFull);
        }
        self.trash_count += 1;
        self.status = ApplianceStatus::HasIngredients;
        Ok(self.trash_count)
    }

    /// Start emptying a non-empty bin.
    pub fn start_emptying(&mut self, now: Millis) -> Result<(), Rejection> {
        self.ensure_trash()?;
        self.ensure_status(&[ApplianceStatus::HasIngredients])?;
        if self.trash_count == 0 {
            return Err(Rejection::Empty);
        }
        self.status = ApplianceStatus::Cleaning;
        self.progress = 0.0;
        self.timer = Some(Timer::new(now, self.def.clean_time));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Disruptions
    // -----------------------------------------------------------------------

    /// Interrupt a running cook. The contents are lost and the appliance
    /// stays blocked until the disruption is resolved.
    pub fn trigger_disruption(&mut self, kind: DisruptionKind) -> Result<(), Rejection> {
        self.ensure_cooking("be disrupted")?;
        self.ensure_status(&[ApplianceStatus::Processing])?;
        self.reset();
        self.disruption = Some(Disruption::new(kind));
        Ok(())
    }

    /// Clear the active disruption. Repair-type disruptions continue into
    /// Repairing. Payment is the caller's concern.
    pub fn resolve_disruption(&mut self, now: Millis) -> Result<Disruption, Rejection> {
        let disruption = self.disruption.take().ok_or(Rejection::NotDisrupted)?;
        if let ActionRequired::Repair { time, .. } = disruption.action {
            self.status = ApplianceStatus::Repairing;
            self.progress = 0.0;
            self.timer = Some(Timer::new(now, time));
        }
        Ok(disruption)
    }
}
