//! Run-state checks applied after every automated action.
use delivery_wars_game::constants::{
    CARMA_MAX, CARMA_MIN, HEAT_MIN, JOB_BATCH_SIZE, RELIABILITY_CEILING, RELIABILITY_FLOOR,
    WEAR_MAX, WEAR_MIN,
};
use delivery_wars_game::{ActionError, RunState};

/// Every bound violated by `state`, as readable messages.
#[must_use]
pub fn check_state(state: &RunState) -> Vec<String> {
    let mut violations = Vec::new();
    if !(CARMA_MIN..=CARMA_MAX).contains(&state.carma) {
        violations.push(format!("carma {} out of bounds", state.carma));
    }
    if !(HEAT_MIN..=state.heat_cap).contains(&state.heat) {
        violations.push(format!(
            "heat {} outside 0..={}",
            state.heat, state.heat_cap
        ));
    }
    if state.jobs.jobs().len() != JOB_BATCH_SIZE {
        violations.push(format!("{} jobs on the board", state.jobs.jobs().len()));
    }
    if state.fleet.active_index() >= state.fleet.len() {
        violations.push(format!(
            "active index {} past fleet of {}",
            state.fleet.active_index(),
            state.fleet.len()
        ));
    }
    if state.log.len() > state.log.capacity() {
        violations.push(format!("log holds {} entries", state.log.len()));
    }
    for vehicle in state.fleet.iter() {
        if !(WEAR_MIN..=WEAR_MAX).contains(&vehicle.wear) {
            violations.push(format!("{} wear {}", vehicle.name, vehicle.wear));
        }
        if !(RELIABILITY_FLOOR..=RELIABILITY_CEILING).contains(&vehicle.reliability) {
            violations.push(format!(
                "{} reliability {}",
                vehicle.name, vehicle.reliability
            ));
        }
        if vehicle.charge_kwh < 0.0 || vehicle.charge_kwh > vehicle.battery_kwh {
            violations.push(format!(
                "{} charge {:.2} of {:.2} kWh",
                vehicle.name, vehicle.charge_kwh, vehicle.battery_kwh
            ));
        }
    }
    violations
}

/// A refused action may only add its advisory to the log.
#[must_use]
pub fn check_refusal(before: &RunState, after: &RunState, err: &ActionError) -> Option<String> {
    let advisory = err.advisory();
    if after.log.latest().map(|entry| entry.text.as_str()) != Some(advisory.as_str()) {
        return Some(format!("refusal without advisory: {err}"));
    }
    let expected_len = (before.log.len() + 1).min(before.log.capacity());
    if after.log.len() != expected_len {
        return Some(format!(
            "refusal logged {} lines",
            after.log.len().saturating_sub(before.log.len())
        ));
    }
    let mut before = before.clone();
    let mut after = after.clone();
    before.log.clear();
    after.log.clear();
    (before != after).then(|| format!("refusal mutated the run: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_wars_game::{RunSession, Strategy};

    #[test]
    fn fresh_run_is_clean() {
        let session = RunSession::with_seed(1).unwrap();
        assert!(check_state(session.state()).is_empty());
    }

    #[test]
    fn flags_out_of_bounds_fields() {
        let mut state = RunSession::with_seed(1).unwrap().into_state();
        state.carma = 140;
        state.fleet.active_mut().wear = -3;
        let violations = check_state(&state);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("carma 140"));
    }

    #[test]
    fn genuine_refusal_passes() {
        let mut session = RunSession::with_seed(2).unwrap();
        session.with_state_mut(|state| state.carma = 0);
        let before = session.state().clone();
        let job = before.jobs.jobs()[0].id.clone();
        let err = session.resolve(&job, Strategy::SpendCarma).unwrap_err();
        assert_eq!(check_refusal(&before, session.state(), &err), None);
    }

    #[test]
    fn mutation_on_refusal_is_caught() {
        let mut session = RunSession::with_seed(3).unwrap();
        session.with_state_mut(|state| state.carma = 0);
        let before = session.state().clone();
        let job = before.jobs.jobs()[0].id.clone();
        let err = session.resolve(&job, Strategy::SpendCarma).unwrap_err();
        session.with_state_mut(|state| state.cash -= 1);
        assert!(check_refusal(&before, session.state(), &err).is_some());
    }
}
