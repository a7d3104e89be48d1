//! Appliance disruptions: flavor mishaps that interrupt a cook.
//!
//! A disruption is an optional extension on an appliance, separate from its
//! main status. Triggering one destroys the contents in progress, leaves the
//! appliance Idle and blocks every insertion until the player resolves it.
//! Resolution may cost money and, for repair-type disruptions, puts the
//! appliance into Repairing.
//!
//! Probabilities and cooldowns belong to the host; the core only exposes the
//! deterministic trigger and resolve operations.

use crate::appliance::Rejection;
use crate::event::KitchenEvent;
use crate::id::*;
use crate::notify::{Notifier, Severity};
use crate::state::{GameState, StateError};
use crate::time::Millis;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionKind {
    WokFlipped,
    WokSpatulaBroken,
    SteamerExploded,
    MixerCrazy,
    GrillSelfBurn,
}

/// What the player must do to clear a disruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRequired {
    Click,
    Buy { cost: u32 },
    Repair { cost: u32, time: Millis },
}

impl ActionRequired {
    pub fn cost(self) -> u32 {
        match self {
            ActionRequired::Click => 0,
            ActionRequired::Buy { cost } | ActionRequired::Repair { cost, .. } => cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disruption {
    pub kind: DisruptionKind,
    pub action: ActionRequired,
}

impl Disruption {
    pub fn new(kind: DisruptionKind) -> Self {
        Self {
            kind,
            action: kind.action(),
        }
    }
}

impl DisruptionKind {
    pub const ALL: [DisruptionKind; 5] = [
        DisruptionKind::WokFlipped,
        DisruptionKind::WokSpatulaBroken,
        DisruptionKind::SteamerExploded,
        DisruptionKind::MixerCrazy,
        DisruptionKind::GrillSelfBurn,
    ];

    /// The appliance this mishap can happen to.
    pub fn appliance(self) -> &'static str {
        match self {
            DisruptionKind::WokFlipped | DisruptionKind::WokSpatulaBroken => "wok",
            DisruptionKind::SteamerExploded => "steamer",
            DisruptionKind::MixerCrazy => "mixer",
            DisruptionKind::GrillSelfBurn => "grill",
        }
    }

    pub fn action(self) -> ActionRequired {
        match self {
            DisruptionKind::WokFlipped | DisruptionKind::MixerCrazy => ActionRequired::Click,
            DisruptionKind::WokSpatulaBroken => ActionRequired::Buy { cost: 5 },
            DisruptionKind::SteamerExploded => ActionRequired::Buy { cost: 30 },
            DisruptionKind::GrillSelfBurn => ActionRequired::Repair {
                cost: 20,
                time: 3000,
            },
        }
    }

    pub fn for_appliance(appliance: &str) -> impl Iterator<Item = DisruptionKind> + '_ {
        Self::ALL
            .into_iter()
            .filter(move |kind| kind.appliance() == appliance)
    }
}

impl fmt::Display for DisruptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DisruptionKind::WokFlipped => "the wok flipped over",
            DisruptionKind::WokSpatulaBroken => "the spatula snapped",
            DisruptionKind::SteamerExploded => "the steamer blew its lid",
            DisruptionKind::MixerCrazy => "the mixer went haywire",
            DisruptionKind::GrillSelfBurn => "the grill caught fire",
        };
        f.write_str(text)
    }
}

// ---------------------------------------------------------------------------
// GameState operations
// ---------------------------------------------------------------------------

impl GameState {
    /// Interrupt a running cook on `appliance`.
    pub fn trigger_disruption(
        &mut self,
        appliance: &str,
        kind: DisruptionKind,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Result<(), StateError> {
        let target = self.appliance_mut(appliance)?;
        target.trigger_disruption(kind)?;
        let id = target.id().clone();
        tracing::debug!(appliance = %id, ?kind, "disruption triggered");
        notifier.show_toast(&format!("{}: {kind}!", target.def().name), Severity::Error);
        self.events.record(KitchenEvent::DisruptionTriggered {
            appliance: id,
            kind,
            at: now,
        });
        Ok(())
    }

    /// Pay for and perform the action the active disruption requires.
    pub fn resolve_disruption(
        &mut self,
        appliance: &str,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Result<Disruption, StateError> {
        let money = self.money;
        let target = self.appliance_mut(appliance)?;
        let disruption = target.disruption().ok_or(Rejection::NotDisrupted)?;
        let cost = disruption.action.cost();
        if cost > money {
            notifier.show_toast(&format!("Not enough money, need {cost}"), Severity::Error);
            return Err(Rejection::InsufficientFunds {
                needed: cost,
                available: money,
            }
            .into());
        }

        let resolved = target.resolve_disruption(now)?;
        let id = target.id().clone();
        self.money -= cost;
        if cost > 0 {
            notifier.show_toast(&format!("-{cost} coins"), Severity::Money);
        }
        notifier.show_toast(&format!("{id} is back in service"), Severity::Success);
        self.events.record(KitchenEvent::DisruptionResolved {
            appliance: id.clone(),
            kind: resolved.kind,
            at: now,
        });
        if let ActionRequired::Repair { cost, .. } = resolved.action {
            self.events.record(KitchenEvent::RepairStarted {
                appliance: id,
                cost,
                at: now,
            });
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliance::ApplianceStatus;
    use crate::notify::ToastLog;
    use crate::test_utils::*;

    #[test]
    fn kinds_map_to_their_appliance() {
        let wok: Vec<_> = DisruptionKind::for_appliance("wok").collect();
        assert_eq!(
            wok,
            vec![DisruptionKind::WokFlipped, DisruptionKind::WokSpatulaBroken]
        );
        assert_eq!(DisruptionKind::for_appliance("cutting_board").count(), 0);
    }

    #[test]
    fn action_costs() {
        assert_eq!(DisruptionKind::WokFlipped.action().cost(), 0);
        assert_eq!(DisruptionKind::SteamerExploded.action().cost(), 30);
        assert_eq!(
            DisruptionKind::GrillSelfBurn.action(),
            ActionRequired::Repair {
                cost: 20,
                time: 3000
            }
        );
    }

    #[test]
    fn trigger_requires_processing() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        let result =
            state.trigger_disruption("wok", DisruptionKind::WokFlipped, 0, &mut log);
        assert!(matches!(
            result,
            Err(StateError::Rejected(Rejection::WrongStatus(ApplianceStatus::Idle)))
        ));
        assert!(log.entries.is_empty());
    }

    #[test]
    fn buy_disruption_charges_and_clears() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        start_wok_cook(&mut state, 0);
        state
            .trigger_disruption("wok", DisruptionKind::WokSpatulaBroken, 10, &mut log)
            .unwrap();

        let wok = state.kitchen.get("wok").unwrap();
        assert_eq!(wok.status(), ApplianceStatus::Idle);
        assert!(wok.slots().is_empty());
        assert!(wok.disruption().is_some());

        let money = state.money;
        state.resolve_disruption("wok", 20, &mut log).unwrap();
        assert_eq!(state.money, money - 5);
        assert!(state.kitchen.get("wok").unwrap().disruption().is_none());
    }

    #[test]
    fn resolve_without_funds_changes_nothing() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        start_wok_cook(&mut state, 0);
        state
            .trigger_disruption("wok", DisruptionKind::WokSpatulaBroken, 10, &mut log)
            .unwrap();
        state.money = 2;

        let result = state.resolve_disruption("wok", 20, &mut log);
        assert!(matches!(
            result,
            Err(StateError::Rejected(Rejection::InsufficientFunds { needed: 5, available: 2 }))
        ));
        assert_eq!(state.money, 2);
        assert!(state.kitchen.get("wok").unwrap().disruption().is_some());
    }

    #[test]
    fn resolve_without_disruption_rejected() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        assert!(matches!(
            state.resolve_disruption("wok", 0, &mut log),
            Err(StateError::Rejected(Rejection::NotDisrupted))
        ));
    }
}
