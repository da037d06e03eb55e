//! Floyd's repairs for the active vehicle.
use serde::{Deserialize, Serialize};

use crate::constants::{
    PROPER_FIX_COST, PROPER_FIX_RELIABILITY, QUICK_FIX_COST, QUICK_FIX_RELIABILITY,
    QUICK_FIX_WEAR_RELIEF,
};
use crate::error::ActionError;
use crate::format::fmt_money;
use crate::run_log::LogTone;
use crate::state::RunState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    QuickFix,
    ProperFix,
}

impl RepairKind {
    #[must_use]
    pub const fn cost(self) -> i64 {
        match self {
            Self::QuickFix => QUICK_FIX_COST,
            Self::ProperFix => PROPER_FIX_COST,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::QuickFix => "a quick fix",
            Self::ProperFix => "a proper fix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReceipt {
    pub kind: RepairKind,
    pub vehicle: String,
    pub cost: i64,
    pub wear_delta: i32,
    pub reliability_delta: i32,
}

/// $150: reliability +10, wear -8.
///
/// # Errors
///
/// Returns [`ActionError::InsufficientFunds`] when cash is below the cost.
pub fn quick_fix(state: &mut RunState) -> Result<RepairReceipt, ActionError> {
    repair(state, RepairKind::QuickFix)
}

/// $400: wear reset to zero, reliability +4.
///
/// # Errors
///
/// Returns [`ActionError::InsufficientFunds`] when cash is below the cost.
pub fn proper_fix(state: &mut RunState) -> Result<RepairReceipt, ActionError> {
    repair(state, RepairKind::ProperFix)
}

fn repair(state: &mut RunState, kind: RepairKind) -> Result<RepairReceipt, ActionError> {
    let cost = kind.cost();
    if state.cash < cost {
        return Err(state.reject(ActionError::InsufficientFunds {
            action: kind.label(),
            cost,
            cash: state.cash,
        }));
    }

    state.cash -= cost;
    let vehicle = state.fleet.active_mut();
    let (wear_delta, reliability_delta) = match kind {
        RepairKind::QuickFix => (
            vehicle.add_wear(-QUICK_FIX_WEAR_RELIEF),
            vehicle.adjust_reliability(QUICK_FIX_RELIABILITY),
        ),
        RepairKind::ProperFix => (
            {
                let wear = vehicle.wear;
                vehicle.add_wear(-wear)
            },
            vehicle.adjust_reliability(PROPER_FIX_RELIABILITY),
        ),
    };
    let receipt = RepairReceipt {
        kind,
        vehicle: vehicle.name.clone(),
        cost,
        wear_delta,
        reliability_delta,
    };
    log::debug!("{receipt:?}");
    state.note(
        format!(
            "Floyd: ({}) {} done for {}. Wear {}% • Reliability +{}",
            receipt.vehicle,
            match kind {
                RepairKind::QuickFix => "Quick fix",
                RepairKind::ProperFix => "Proper fix",
            },
            fmt_money(cost),
            receipt.wear_delta,
            receipt.reliability_delta
        ),
        LogTone::Good,
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::rolls::ScriptedRolls;

    fn state_with_cash(cash: i64) -> RunState {
        let cfg = RunConfig {
            starting_cash: cash,
            ..RunConfig::default()
        };
        RunState::new(&cfg, &mut ScriptedRolls::new()).unwrap()
    }

    #[test]
    fn proper_fix_resets_wear() {
        let mut state = state_with_cash(500);
        state.fleet.active_mut().wear = 64;
        state.fleet.active_mut().reliability = 93;
        let receipt = proper_fix(&mut state).unwrap();
        assert_eq!(state.cash, 100);
        assert_eq!(state.active_vehicle().wear, 0);
        assert_eq!(state.active_vehicle().reliability, 95);
        assert_eq!(receipt.wear_delta, -64);
        assert_eq!(receipt.reliability_delta, 2);
    }

    #[test]
    fn proper_fix_needs_four_hundred() {
        let mut state = state_with_cash(399);
        state.fleet.active_mut().wear = 40;
        let err = proper_fix(&mut state).unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientFunds {
                action: "a proper fix",
                cost: 400,
                cash: 399
            }
        );
        assert_eq!(state.cash, 399);
        assert_eq!(state.active_vehicle().wear, 40);
        assert_eq!(state.log.len(), 1);
    }
}
