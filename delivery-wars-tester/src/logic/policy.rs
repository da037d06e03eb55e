use std::fmt;
use std::str::FromStr;

use delivery_wars_game::{ChargeLocation, Job, RunState, Strategy, energy_needed};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// One move a policy makes on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    /// Take the job in `job` slot of the current board.
    Deliver { job: usize, strategy: Strategy },
    Charge(ChargeLocation),
    QuickFix,
    ProperFix,
}

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub action: TurnAction,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(action: TurnAction, rationale: Option<String>) -> Self {
        Self { action, rationale }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick the next action for the current run state.
    fn decide(&mut self, state: &RunState) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameplayStrategy {
    Cautious,
    Hustler,
    Karmic,
    Wildcard,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Cautious, Self::Hustler, Self::Karmic, Self::Wildcard];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Hustler => "Hustler",
            Self::Karmic => "Karmic",
            Self::Wildcard => "Wildcard",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cautious => "cautious",
            Self::Hustler => "hustler",
            Self::Karmic => "karmic",
            Self::Wildcard => "wildcard",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Cautious => "Lowest-risk job on the Safe Route, garage charging, proper fixes",
            Self::Hustler => "Best-paying job on the Gray Route, gray-dock charging",
            Self::Karmic => "Spends CARMA when flush, earns it back otherwise",
            Self::Wildcard => "Seeded random jobs, strategies and charge locations",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Hustler => Box::new(HustlerPolicy),
            Self::Karmic => Box::new(KarmicPolicy),
            Self::Wildcard => Box::new(WildcardPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown policy: {s}"))
    }
}

struct CautiousPolicy;
struct HustlerPolicy;
struct KarmicPolicy;

struct WildcardPolicy {
    rng: ChaCha20Rng,
}

impl WildcardPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

fn can_run(state: &RunState, job: &Job) -> bool {
    let vehicle = state.active_vehicle();
    vehicle.charge_kwh >= energy_needed(vehicle, job.distance)
}

/// Slot of the job maximizing `score` among jobs the active vehicle can run.
fn best_runnable(state: &RunState, score: impl Fn(&Job) -> i64) -> Option<usize> {
    state
        .jobs
        .iter()
        .enumerate()
        .filter(|(_, job)| can_run(state, job))
        .max_by_key(|(_, job)| score(job))
        .map(|(idx, _)| idx)
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn decide(&mut self, state: &RunState) -> PolicyDecision {
        let wear = state.active_vehicle().wear;
        if wear >= 50 && state.cash >= 800 {
            return PolicyDecision::new(TurnAction::ProperFix, Some(format!("wear {wear}")));
        }
        match best_runnable(state, |job| -i64::from(job.enforce)) {
            Some(idx) => PolicyDecision::new(
                TurnAction::Deliver {
                    job: idx,
                    strategy: Strategy::SafeRoute,
                },
                Some(format!("enforce {}", state.jobs.jobs()[idx].enforce)),
            ),
            None => PolicyDecision::new(
                TurnAction::Charge(ChargeLocation::Garage),
                Some("nothing in range".to_string()),
            ),
        }
    }
}

impl PlayerPolicy for HustlerPolicy {
    fn name(&self) -> &'static str {
        "Hustler"
    }

    fn decide(&mut self, state: &RunState) -> PolicyDecision {
        let wear = state.active_vehicle().wear;
        if wear >= 70 && state.cash >= 150 {
            return PolicyDecision::new(TurnAction::QuickFix, Some(format!("wear {wear}")));
        }
        match best_runnable(state, |job| job.base_pay) {
            Some(idx) => PolicyDecision::new(
                TurnAction::Deliver {
                    job: idx,
                    strategy: Strategy::GrayRoute,
                },
                Some(format!("pay {}", state.jobs.jobs()[idx].base_pay)),
            ),
            None => PolicyDecision::new(
                TurnAction::Charge(ChargeLocation::GrayDock),
                Some("cheap juice".to_string()),
            ),
        }
    }
}

impl PlayerPolicy for KarmicPolicy {
    fn name(&self) -> &'static str {
        "Karmic"
    }

    fn decide(&mut self, state: &RunState) -> PolicyDecision {
        let strategy = if state.carma > 10 {
            Strategy::SpendCarma
        } else {
            Strategy::EarnCarma
        };
        match best_runnable(state, |job| job.base_pay - i64::from(job.enforce) * 5) {
            Some(idx) => PolicyDecision::new(
                TurnAction::Deliver { job: idx, strategy },
                Some(format!("carma {}", state.carma)),
            ),
            None => PolicyDecision::new(
                TurnAction::Charge(ChargeLocation::PublicDock),
                Some("topping up".to_string()),
            ),
        }
    }
}

impl PlayerPolicy for WildcardPolicy {
    fn name(&self) -> &'static str {
        "Wildcard"
    }

    fn decide(&mut self, state: &RunState) -> PolicyDecision {
        let roll = self.rng.gen_range(0..20);
        let action = match roll {
            0 => TurnAction::QuickFix,
            1 => TurnAction::ProperFix,
            2 | 3 => TurnAction::Charge(
                ChargeLocation::ALL[self.rng.gen_range(0..ChargeLocation::ALL.len())],
            ),
            _ => TurnAction::Deliver {
                job: self.rng.gen_range(0..state.jobs.jobs().len()),
                strategy: Strategy::ALL[self.rng.gen_range(0..Strategy::ALL.len())],
            },
        };
        PolicyDecision::new(action, Some(format!("roll {roll}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_wars_game::RunSession;

    fn state(seed: u64) -> RunState {
        RunSession::with_seed(seed).unwrap().into_state()
    }

    #[test]
    fn keys_round_trip_through_from_str() {
        for strategy in GameplayStrategy::ALL {
            assert_eq!(strategy.key().parse::<GameplayStrategy>(), Ok(strategy));
        }
        assert_eq!("HUSTLER".parse::<GameplayStrategy>(), Ok(GameplayStrategy::Hustler));
        assert!("reckless".parse::<GameplayStrategy>().is_err());
    }

    #[test]
    fn cautious_takes_lowest_enforcement() {
        let state = state(5);
        let mut policy = GameplayStrategy::Cautious.create_policy(5);
        let decision = policy.decide(&state);
        let TurnAction::Deliver { job, strategy } = decision.action else {
            panic!("expected a delivery, got {:?}", decision.action);
        };
        assert_eq!(strategy, Strategy::SafeRoute);
        let lowest = state.jobs.iter().map(|j| j.enforce).min().unwrap();
        assert_eq!(state.jobs.jobs()[job].enforce, lowest);
    }

    #[test]
    fn empty_battery_sends_policies_to_charge() {
        let mut state = state(6);
        state.fleet.active_mut().charge_kwh = 0.0;
        let decision = GameplayStrategy::Hustler.create_policy(6).decide(&state);
        assert_eq!(
            decision.action,
            TurnAction::Charge(ChargeLocation::GrayDock)
        );
        let decision = GameplayStrategy::Karmic.create_policy(6).decide(&state);
        assert_eq!(
            decision.action,
            TurnAction::Charge(ChargeLocation::PublicDock)
        );
    }

    #[test]
    fn karmic_switches_on_carma() {
        let mut state = state(7);
        let mut policy = GameplayStrategy::Karmic.create_policy(7);
        assert!(matches!(
            policy.decide(&state).action,
            TurnAction::Deliver {
                strategy: Strategy::SpendCarma,
                ..
            }
        ));
        state.carma = 4;
        assert!(matches!(
            policy.decide(&state).action,
            TurnAction::Deliver {
                strategy: Strategy::EarnCarma,
                ..
            }
        ));
    }

    #[test]
    fn wildcard_is_seeded() {
        let state = state(8);
        let mut a = GameplayStrategy::Wildcard.create_policy(99);
        let mut b = GameplayStrategy::Wildcard.create_policy(99);
        for _ in 0..20 {
            assert_eq!(a.decide(&state).action, b.decide(&state).action);
        }
    }
}
