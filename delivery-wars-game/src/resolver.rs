//! Delivery resolution: strategy modifiers, forecast odds, outcome rolls and
//! the state changes that follow a dispatched job.
//!
//! Resolution is a pure function of the run state and two draw sources. The
//! first feeds the outcome rolls in a fixed order:
//!
//! 1. strategy draws (CARMA delta, then pay modifier)
//! 2. on-time draw
//! 3. enforcement draw
//! 4. ticket cost, only when ticketed
//! 5. breakdown draw, only when wear is at or above the breakdown threshold
//! 6. wear gain
//! 7. reliability loss, only when post-gain wear is high
//!
//! The second source regenerates the job board afterwards.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    BREAKDOWN_BASE_CHANCE, BREAKDOWN_CHANCE_CEILING, BREAKDOWN_CHANCE_FLOOR,
    BREAKDOWN_PAYOUT_FACTOR, BREAKDOWN_RELIABILITY_COEFFICIENT, BREAKDOWN_WEAR_COEFFICIENT,
    BREAKDOWN_WEAR_THRESHOLD, CLEAN_RUN_HEAT_DECAY, ENFORCE_CHANCE_CAP, ENFORCE_WEAR_DIVISOR,
    LATE_PAYOUT_FACTOR, ON_TIME_BASE, ON_TIME_BASE_CEILING, ON_TIME_BASE_FLOOR,
    ON_TIME_CHANCE_CEILING, ON_TIME_CHANCE_FLOOR, ON_TIME_DISTANCE_DIVISOR,
    ON_TIME_RELIABILITY_DIVISOR, ON_TIME_WEAR_DIVISOR, RELIABILITY_GAIN, RELIABILITY_GAIN_WEAR,
    RELIABILITY_LOSS_MAX, RELIABILITY_LOSS_MIN, RELIABILITY_LOSS_WEAR, TICKET_COST_MAX,
    TICKET_COST_MIN, TICKET_HEAT_GAIN, TICKET_HEAT_SURCHARGE, WEAR_DISTANCE_DIVISOR,
    WEAR_GAIN_CEILING, WEAR_GAIN_FLOOR, WEAR_GAIN_MAX, WEAR_GAIN_MIN,
};
use crate::energy::energy_needed;
use crate::error::ActionError;
use crate::format::{fmt_kwh, fmt_money};
use crate::jobs::{Job, JobId};
use crate::numbers::scale_floor;
use crate::rolls::Rolls;
use crate::run_log::LogTone;
use crate::state::RunState;
use crate::vehicle::Vehicle;

/// How the player asks the driver to run a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    SpendCarma,
    EarnCarma,
    GrayRoute,
    SafeRoute,
}

impl Strategy {
    pub const ALL: [Self; 4] = [
        Self::SpendCarma,
        Self::EarnCarma,
        Self::GrayRoute,
        Self::SafeRoute,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpendCarma => "Spend CARMA",
            Self::EarnCarma => "Earn CARMA",
            Self::GrayRoute => "Gray Route",
            Self::SafeRoute => "Safe Route",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SpendCarma => "spend-carma",
            Self::EarnCarma => "earn-carma",
            Self::GrayRoute => "gray-route",
            Self::SafeRoute => "safe-route",
        }
    }

    /// Draw this strategy's modifiers. CARMA is drawn before pay.
    pub fn roll_mods<R: Rolls + ?Sized>(self, rolls: &mut R) -> StrategyMods {
        match self {
            Self::SpendCarma => StrategyMods {
                eta: 18,
                pay: 0,
                enforce: 8,
                wear: 6,
                carma_delta: -rolls.int_between(3, 7),
            },
            Self::EarnCarma => {
                let carma_delta = rolls.int_between(3, 6);
                StrategyMods {
                    eta: -10,
                    pay: -i64::from(rolls.int_between(20, 90)),
                    enforce: -6,
                    wear: 2,
                    carma_delta,
                }
            }
            Self::GrayRoute => StrategyMods {
                eta: 25,
                pay: i64::from(rolls.int_between(40, 160)),
                enforce: 22,
                wear: 10,
                carma_delta: 0,
            },
            Self::SafeRoute => StrategyMods {
                eta: 6,
                pay: -i64::from(rolls.int_between(10, 80)),
                enforce: -18,
                wear: 1,
                carma_delta: 0,
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "spendcarma" | "spend" => Ok(Self::SpendCarma),
            "earncarma" | "earn" => Ok(Self::EarnCarma),
            "grayroute" | "gray" | "greyroute" | "grey" => Ok(Self::GrayRoute),
            "saferoute" | "safe" => Ok(Self::SafeRoute),
            _ => Err(format!("unknown strategy: {s}")),
        }
    }
}

/// Realized strategy modifiers for one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrategyMods {
    pub eta: i32,
    pub pay: i64,
    pub enforce: i32,
    pub wear: i32,
    pub carma_delta: i32,
}

/// Odds shown to the player before the outcome is rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub on_time_chance: i32,
    pub enforce_chance: i32,
}

#[must_use]
pub fn forecast(job: &Job, vehicle: &Vehicle, mods: &StrategyMods) -> Forecast {
    let distance = i32::try_from(job.distance).unwrap_or(i32::MAX);
    let base_on_time = (ON_TIME_BASE
        - distance / ON_TIME_DISTANCE_DIVISOR
        - vehicle.wear / ON_TIME_WEAR_DIVISOR)
        .clamp(ON_TIME_BASE_FLOOR, ON_TIME_BASE_CEILING);
    let on_time_chance = (base_on_time + mods.eta + vehicle.reliability / ON_TIME_RELIABILITY_DIVISOR)
        .clamp(ON_TIME_CHANCE_FLOOR, ON_TIME_CHANCE_CEILING);
    let enforce_chance = (job.enforce + mods.enforce + vehicle.wear / ENFORCE_WEAR_DIVISOR)
        .clamp(0, ENFORCE_CHANCE_CAP);
    Forecast {
        on_time_chance,
        enforce_chance,
    }
}

/// Breakdown percentage for a worn vehicle; `None` below the wear threshold.
#[must_use]
pub fn breakdown_chance(wear: i32, reliability: i32) -> Option<f64> {
    if wear < BREAKDOWN_WEAR_THRESHOLD {
        return None;
    }
    let raw = f64::from(wear - BREAKDOWN_WEAR_THRESHOLD).mul_add(
        BREAKDOWN_WEAR_COEFFICIENT,
        BREAKDOWN_BASE_CHANCE,
    ) - f64::from(reliability) * BREAKDOWN_RELIABILITY_COEFFICIENT;
    Some(raw.clamp(BREAKDOWN_CHANCE_FLOOR, BREAKDOWN_CHANCE_CEILING))
}

/// Late penalty first, then breakdown penalty, each floored.
#[must_use]
pub fn compute_payout(base_pay: i64, pay_mod: i64, on_time: bool, broke_down: bool) -> i64 {
    let mut payout = base_pay + pay_mod;
    if !on_time {
        payout = scale_floor(payout, LATE_PAYOUT_FACTOR);
    }
    if broke_down {
        payout = scale_floor(payout, BREAKDOWN_PAYOUT_FACTOR);
    }
    payout
}

/// Everything that happened on one delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub job_id: JobId,
    pub job_name: String,
    pub vehicle: String,
    pub vehicle_index: usize,
    pub strategy: Strategy,
    pub mods: StrategyMods,
    pub forecast: Forecast,
    pub on_time: bool,
    /// Ticket cost when enforcement caught the run.
    pub ticket: Option<i64>,
    pub broke_down: bool,
    pub payout: i64,
    pub energy_kwh: f64,
    pub wear_gain: i32,
    pub reliability_delta: i32,
}

impl DeliveryReport {
    /// Cash change including any ticket.
    #[must_use]
    pub fn net_cash(&self) -> i64 {
        self.payout - self.ticket.unwrap_or(0)
    }
}

/// Run `job_id` with `strategy` on the named vehicle, or the active one.
///
/// # Errors
///
/// Refuses without touching the run (beyond one advisory line) when the job is
/// not on the board, the vehicle slot is empty, CARMA is spent out for
/// [`Strategy::SpendCarma`], or the vehicle lacks the charge for the route.
pub fn resolve_job<R, J>(
    state: &mut RunState,
    job_id: &JobId,
    strategy: Strategy,
    vehicle: Option<usize>,
    rolls: &mut R,
    job_rolls: &mut J,
) -> Result<DeliveryReport, ActionError>
where
    R: Rolls + ?Sized,
    J: Rolls + ?Sized,
{
    let Some(job) = state.jobs.find(job_id).cloned() else {
        return Err(state.reject(ActionError::UnknownJob {
            id: job_id.to_string(),
        }));
    };
    let vehicle_index = vehicle.unwrap_or_else(|| state.fleet.active_index());
    let Some(runner) = state.fleet.get(vehicle_index).cloned() else {
        return Err(state.reject(ActionError::UnknownVehicle {
            index: vehicle_index,
            fleet_size: state.fleet.len(),
        }));
    };
    if strategy == Strategy::SpendCarma && state.carma <= 0 {
        return Err(state.reject(ActionError::CarmaDepleted));
    }
    let need_kwh = energy_needed(&runner, job.distance);
    if runner.charge_kwh < need_kwh {
        return Err(state.reject(ActionError::InsufficientCharge {
            vehicle: runner.name,
            miles: job.distance,
            need_kwh,
            have_kwh: runner.charge_kwh,
        }));
    }

    let mods = strategy.roll_mods(rolls);
    let odds = forecast(&job, &runner, &mods);
    log::debug!(
        "forecast {} on {} via {strategy}: on-time {}% enforcement {}%",
        job.id,
        runner.name,
        odds.on_time_chance,
        odds.enforce_chance
    );
    state.note(
        format!(
            "Chip: ({}) Forecast: On-time {}% • Enforcement {}% • Strategy: {strategy}",
            runner.name, odds.on_time_chance, odds.enforce_chance
        ),
        LogTone::Good,
    );

    let on_time = rolls.percent() <= f64::from(odds.on_time_chance);
    let ticket = (rolls.percent() <= f64::from(odds.enforce_chance)).then(|| {
        i64::from(rolls.int_between(TICKET_COST_MIN, TICKET_COST_MAX))
            + i64::from(state.heat) * TICKET_HEAT_SURCHARGE
    });
    let broke_down = breakdown_chance(runner.wear, runner.reliability)
        .is_some_and(|chance| rolls.percent() <= chance);

    state.adjust_carma(mods.carma_delta);
    let payout = compute_payout(job.base_pay, mods.pay, on_time, broke_down);
    state.cash += payout;

    let wear_gain = (rolls.int_between(WEAR_GAIN_MIN, WEAR_GAIN_MAX)
        + mods.wear
        + i32::try_from(job.distance).unwrap_or(i32::MAX) / WEAR_DISTANCE_DIVISOR)
        .clamp(WEAR_GAIN_FLOOR, WEAR_GAIN_CEILING);

    if let Some(cost) = ticket {
        state.cash -= cost;
        state.add_heat(TICKET_HEAT_GAIN);
    } else {
        state.add_heat(-CLEAN_RUN_HEAT_DECAY);
    }

    let mut reliability_delta = 0;
    if let Some(vehicle) = state.fleet.get_mut(vehicle_index) {
        vehicle.drain(need_kwh);
        vehicle.add_wear(wear_gain);
        if vehicle.wear >= RELIABILITY_LOSS_WEAR {
            let loss = rolls.int_between(RELIABILITY_LOSS_MIN, RELIABILITY_LOSS_MAX);
            reliability_delta += vehicle.adjust_reliability(-loss);
        }
        if vehicle.wear < RELIABILITY_GAIN_WEAR {
            reliability_delta += vehicle.adjust_reliability(RELIABILITY_GAIN);
        }
    }

    let report = DeliveryReport {
        job_id: job.id.clone(),
        job_name: job.name().to_string(),
        vehicle: runner.name,
        vehicle_index,
        strategy,
        mods,
        forecast: odds,
        on_time,
        ticket,
        broke_down,
        payout,
        energy_kwh: need_kwh,
        wear_gain,
        reliability_delta,
    };
    log::debug!(
        "resolved {}: payout {} ticket {:?} breakdown {} wear +{}",
        report.job_id,
        report.payout,
        report.ticket,
        report.broke_down,
        report.wear_gain
    );
    let tone = if on_time { LogTone::Good } else { LogTone::Bad };
    state.note(outcome_line(&report), tone);

    state.fleet.rotate_after(vehicle_index);
    state.refresh_jobs(job_rolls);
    Ok(report)
}

fn outcome_line(report: &DeliveryReport) -> String {
    let mut parts = vec![if report.on_time { "On time" } else { "Late" }.to_string()];
    if let Some(cost) = report.ticket {
        parts.push(format!("Ticket -{}", fmt_money(cost)));
    }
    if report.broke_down {
        parts.push("Breakdown (limped in)".to_string());
    }
    parts.push(format!("Energy -{}", fmt_kwh(report.energy_kwh)));
    let payout = if report.payout < 0 {
        fmt_money(report.payout)
    } else {
        format!("+{}", fmt_money(report.payout))
    };
    format!(
        "Delivery: ({}) {} → {payout} • {} • Wear +{}%",
        report.vehicle,
        report.job_name,
        parts.join(" • "),
        report.wear_gain
    )
}
