use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use delivery_wars_game::{
    ActionError, ExpansionOutcome, RunConfig, RunSession, RunState, energy_needed,
};
use serde::{Deserialize, Serialize};

use crate::logic::invariants::{check_refusal, check_state};
use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision, TurnAction};

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub days: u32,
    pub actions_per_day: usize,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            days: 10,
            actions_per_day: 3,
        }
    }

    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub const fn with_actions_per_day(mut self, actions: usize) -> Self {
        self.actions_per_day = actions;
        self
    }
}

/// Outcome counters and invariant findings for one automated run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRecord {
    pub policy: Option<GameplayStrategy>,
    pub seed: u64,
    pub days_played: u32,
    pub final_cash: i64,
    pub final_carma: i32,
    pub final_heat: i32,
    pub fleet_size: usize,
    pub deliveries: u32,
    pub on_time: u32,
    pub tickets: u32,
    pub breakdowns: u32,
    pub refusals: u32,
    pub repairs: u32,
    pub charges: u32,
    pub expansions: u32,
    pub missed_expansions: u32,
    pub insolvent_days: u32,
    pub draws: u64,
    pub violations: Vec<String>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl RunRecord {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Play one seeded run with `config.strategy`, checking invariants after
/// every action and every day change.
pub fn simulate_run(config: SimulationConfig) -> Result<RunRecord> {
    let started = Instant::now();
    let mut session = RunSession::new(RunConfig::with_seed(config.seed))
        .with_context(|| format!("failed to start run for seed {}", config.seed))?;
    let mut policy = config.strategy.create_policy(config.seed);
    let mut record = RunRecord {
        policy: Some(config.strategy),
        seed: config.seed,
        ..RunRecord::default()
    };

    for _ in 0..config.days {
        for _ in 0..config.actions_per_day {
            let decision = policy.decide(session.state());
            play_turn(&mut session, policy.as_ref(), &decision, &mut record);
        }
        let report = session.end_day();
        record.days_played += 1;
        match report.expansion {
            Some(ExpansionOutcome::Purchased { .. }) => record.expansions += 1,
            Some(ExpansionOutcome::Missed { .. }) => record.missed_expansions += 1,
            Some(ExpansionOutcome::RosterExhausted) | None => {}
        }
        if report.insolvent {
            record.insolvent_days += 1;
        }
        note_violations(&mut record, session.state(), "end of day");
    }

    let state = session.state();
    record.final_cash = state.cash;
    record.final_carma = state.carma;
    record.final_heat = state.heat;
    record.fleet_size = state.fleet.len();
    record.draws = session.streams().total_draws();
    record.duration = started.elapsed();
    Ok(record)
}

fn play_turn(
    session: &mut RunSession,
    policy: &dyn PlayerPolicy,
    decision: &PolicyDecision,
    record: &mut RunRecord,
) {
    let before = session.state().clone();
    log::info!(
        "[{} seed {} day {}] {:?} ({})",
        policy.name(),
        record.seed,
        before.day,
        decision.action,
        decision.rationale.as_deref().unwrap_or("-")
    );

    let outcome: Result<(), ActionError> = match decision.action {
        TurnAction::Deliver { job, strategy } => {
            let job_id = before
                .jobs
                .jobs()
                .get(job)
                .map(|job| job.id.clone())
                .unwrap_or_else(|| "missing".into());
            session.resolve(&job_id, strategy).map(|report| {
                record.deliveries += 1;
                record.on_time += u32::from(report.on_time);
                record.tickets += u32::from(report.ticket.is_some());
                record.breakdowns += u32::from(report.broke_down);
                check_delivery_budget(&before, &report.job_id, record);
            })
        }
        TurnAction::Charge(location) => session.charge_to_full(location).map(|_| {
            record.charges += 1;
        }),
        TurnAction::QuickFix => session.quick_fix().map(|_| record.repairs += 1),
        TurnAction::ProperFix => session.proper_fix().map(|_| record.repairs += 1),
    };

    if let Err(err) = outcome {
        record.refusals += 1;
        log::debug!("refused: {err}");
        if let Some(violation) = check_refusal(&before, session.state(), &err) {
            record.violations.push(format!("day {}: {violation}", before.day));
        }
    }
    note_violations(record, session.state(), "after action");
}

// A successful delivery must have had the charge for the route.
fn check_delivery_budget(
    before: &RunState,
    job_id: &delivery_wars_game::JobId,
    record: &mut RunRecord,
) {
    let Some(job) = before.jobs.find(job_id) else {
        record
            .violations
            .push(format!("day {}: resolved job {job_id} not on board", before.day));
        return;
    };
    let vehicle = before.active_vehicle();
    if vehicle.charge_kwh < energy_needed(vehicle, job.distance) {
        record.violations.push(format!(
            "day {}: {} ran {}mi without the charge",
            before.day, vehicle.name, job.distance
        ));
    }
}

fn note_violations(record: &mut RunRecord, state: &RunState, when: &str) {
    for violation in check_state(state) {
        record
            .violations
            .push(format!("day {} {when}: {violation}", state.day));
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_policy_survives_ten_days_without_violations() {
        for strategy in GameplayStrategy::ALL {
            for seed in [1, 42, 1337] {
                let record = simulate_run(SimulationConfig::new(strategy, seed)).unwrap();
                assert!(
                    record.passed(),
                    "{strategy} seed {seed}: {:?}",
                    record.violations
                );
                assert_eq!(record.days_played, 10);
                assert!(record.draws > 0);
            }
        }
    }

    #[test]
    fn runs_are_reproducible() {
        let config = SimulationConfig::new(GameplayStrategy::Wildcard, 77).with_days(6);
        let a = simulate_run(config).unwrap();
        let b = simulate_run(config).unwrap();
        assert_eq!(a.final_cash, b.final_cash);
        assert_eq!(a.deliveries, b.deliveries);
        assert_eq!(a.draws, b.draws);
    }

    #[test]
    fn action_budget_bounds_deliveries() {
        let config = SimulationConfig::new(GameplayStrategy::Cautious, 5)
            .with_days(2)
            .with_actions_per_day(4);
        let record = simulate_run(config).unwrap();
        assert_eq!(
            record.deliveries + record.refusals + record.charges + record.repairs,
            8
        );
    }
}
