//! End-of-day bookkeeping: overhead, overnight recovery, scheduled fleet
//! expansion and the insolvency notice.
use serde::{Deserialize, Serialize};

use crate::constants::{
    EXPANSION_BASE_COST, EXPANSION_COST_PER_VEHICLE, EXPANSION_DAYS, OVERHEAD_BASE,
    OVERHEAD_PER_VEHICLE, OVERNIGHT_RECOVERY_MAX, OVERNIGHT_RECOVERY_MIN,
};
use crate::format::fmt_money;
use crate::rolls::Rolls;
use crate::run_log::LogTone;
use crate::state::RunState;

/// What happened to the expansion offer on a scheduled day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpansionOutcome {
    Purchased { vehicle: String, cost: i64 },
    Missed { cost: i64 },
    /// Every roster vehicle is already in the fleet.
    RosterExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    /// The day that just started.
    pub day: u32,
    pub overhead: i64,
    /// Wear shed by each vehicle overnight, in fleet order.
    pub recovered: Vec<i32>,
    pub expansion: Option<ExpansionOutcome>,
    pub insolvent: bool,
}

#[must_use]
pub fn overhead_for(fleet_size: usize) -> i64 {
    OVERHEAD_BASE + OVERHEAD_PER_VEHICLE * i64::try_from(fleet_size).unwrap_or(i64::MAX / 2)
}

#[must_use]
pub fn expansion_cost(fleet_size: usize) -> i64 {
    EXPANSION_BASE_COST
        + EXPANSION_COST_PER_VEHICLE * i64::try_from(fleet_size).unwrap_or(i64::MAX / 2)
}

/// True on the days the expansion offer appears.
#[must_use]
pub fn is_expansion_day(day: u32) -> bool {
    EXPANSION_DAYS.contains(&day)
}

/// Close out the current day and open the next.
///
/// Recovery draws one value per vehicle from `upkeep_rolls`; the new job
/// batch comes from `job_rolls`.
pub fn end_day<U, J>(state: &mut RunState, upkeep_rolls: &mut U, job_rolls: &mut J) -> DayReport
where
    U: Rolls + ?Sized,
    J: Rolls + ?Sized,
{
    let overhead = overhead_for(state.fleet.len());
    state.cash -= overhead;
    state.day += 1;
    log::info!(
        "day {} begins: overhead {overhead}, cash {}",
        state.day,
        state.cash
    );
    state.note(
        format!(
            "Floyd: Day {}. Overhead {} for {} vehicle(s).",
            state.day,
            fmt_money(overhead),
            state.fleet.len()
        ),
        LogTone::Info,
    );

    let recovered = state
        .fleet
        .iter_mut()
        .map(|vehicle| {
            let relief = upkeep_rolls.int_between(OVERNIGHT_RECOVERY_MIN, OVERNIGHT_RECOVERY_MAX);
            -vehicle.add_wear(-relief)
        })
        .collect();

    let expansion = is_expansion_day(state.day).then(|| offer_expansion(state));

    let insolvent = state.is_insolvent();
    if insolvent {
        log::warn!("run insolvent on day {}: cash {}", state.day, state.cash);
        state.note(
            format!(
                "Floyd: We're underwater at {}. Something has to give.",
                fmt_money(state.cash)
            ),
            LogTone::Bad,
        );
    }

    state.refresh_jobs(job_rolls);
    DayReport {
        day: state.day,
        overhead,
        recovered,
        expansion,
        insolvent,
    }
}

fn offer_expansion(state: &mut RunState) -> ExpansionOutcome {
    let cost = expansion_cost(state.fleet.len());
    let Some(vehicle) = state.fleet.next_available() else {
        log::info!("expansion offer skipped on day {}: roster exhausted", state.day);
        return ExpansionOutcome::RosterExhausted;
    };
    if state.cash < cost {
        log::info!(
            "expansion missed on day {}: cost {cost}, cash {}",
            state.day,
            state.cash
        );
        state.note(
            format!(
                "Floyd: A {} came up for {}. Couldn't swing it.",
                vehicle.name,
                fmt_money(cost)
            ),
            LogTone::Bad,
        );
        return ExpansionOutcome::Missed { cost };
    }

    state.cash -= cost;
    let name = vehicle.name.clone();
    state.fleet.push(vehicle);
    log::info!("fleet expanded with {name} for {cost}");
    state.note(
        format!(
            "Floyd: Picked up {name} for {}. Fleet is {} strong.",
            fmt_money(cost),
            state.fleet.len()
        ),
        LogTone::Good,
    );
    ExpansionOutcome::Purchased {
        vehicle: name,
        cost,
    }
}
