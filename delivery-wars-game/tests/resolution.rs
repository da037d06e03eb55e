use delivery_wars_game::{
    ActionError, Fleet, JobId, LogTone, RunConfig, RunState, ScriptedRolls, Strategy, resolve_job,
};

// An empty script draws every job as a 5-mile Warehouse Run paying $220
// with 5% enforcement.
fn scripted_state() -> RunState {
    RunState::new(&RunConfig::default(), &mut ScriptedRolls::new()).unwrap()
}

fn first_job(state: &RunState) -> JobId {
    state.jobs.jobs()[0].id.clone()
}

fn without_log(state: &RunState) -> RunState {
    let mut copy = state.clone();
    copy.log.clear();
    copy
}

#[test]
fn scripted_board_is_predictable() {
    let state = scripted_state();
    let job = &state.jobs.jobs()[0];
    assert_eq!(job.distance, 5);
    assert_eq!(job.base_pay, 220);
    assert_eq!(job.enforce, 5);
    assert_eq!(job.id.as_str(), "00000000-1");
}

#[test]
fn spend_carma_without_carma_changes_nothing_but_the_log() {
    let mut state = scripted_state();
    state.carma = 0;
    let before = state.clone();
    let job = first_job(&state);
    let mut rolls = ScriptedRolls::new().ints([5, 6]).percents([1.0, 1.0]);
    let mut job_rolls = ScriptedRolls::new();

    let err = resolve_job(
        &mut state,
        &job,
        Strategy::SpendCarma,
        None,
        &mut rolls,
        &mut job_rolls,
    )
    .unwrap_err();

    assert_eq!(err, ActionError::CarmaDepleted);
    assert_eq!(state.log.len(), before.log.len() + 1);
    assert_eq!(state.log.latest().map(|e| e.tone), Some(LogTone::Bad));
    assert_eq!(without_log(&state), without_log(&before));
    assert_eq!(rolls.remaining(), 4, "no draws on a refused action");
}

#[test]
fn insufficient_charge_blocks_the_run() {
    let mut state = scripted_state();
    state.fleet.active_mut().charge_kwh = 3.0;
    let before = state.clone();
    let job = first_job(&state);

    let err = resolve_job(
        &mut state,
        &job,
        Strategy::GrayRoute,
        None,
        &mut ScriptedRolls::new(),
        &mut ScriptedRolls::new(),
    )
    .unwrap_err();

    assert!(matches!(err, ActionError::InsufficientCharge { miles: 5, .. }));
    assert_eq!(state.cash, before.cash);
    assert_eq!(state.heat, before.heat);
    assert_eq!(state.carma, before.carma);
    assert_eq!(state.active_vehicle().wear, before.active_vehicle().wear);
    assert_eq!(state.jobs, before.jobs);
    assert!(
        state
            .log
            .latest()
            .is_some_and(|e| e.text.contains("Not enough charge for 5mi"))
    );
}

#[test]
fn unknown_job_and_vehicle_are_refused() {
    let mut state = scripted_state();
    let err = resolve_job(
        &mut state,
        &JobId::from("gone"),
        Strategy::SafeRoute,
        None,
        &mut ScriptedRolls::new(),
        &mut ScriptedRolls::new(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ActionError::UnknownJob {
            id: "gone".to_string()
        }
    );

    let job = first_job(&state);
    let err = resolve_job(
        &mut state,
        &job,
        Strategy::SafeRoute,
        Some(3),
        &mut ScriptedRolls::new(),
        &mut ScriptedRolls::new(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ActionError::UnknownVehicle {
            index: 3,
            fleet_size: 1
        }
    );
    assert_eq!(state.log.len(), 2);
    assert_eq!(state.cash, 1_000);
}

#[test]
fn late_breakdown_payout_floors_twice() {
    let mut state = scripted_state();
    {
        let vehicle = state.fleet.active_mut();
        vehicle.wear = 80;
        vehicle.reliability = 40;
    }
    let job = first_job(&state);
    // pay +100, wear gain 6, reliability loss 1; late, clean, broken down
    let mut rolls = ScriptedRolls::new()
        .ints([100, 6, 1])
        .percents([99.0, 99.0, 0.0]);

    let report = resolve_job(
        &mut state,
        &job,
        Strategy::GrayRoute,
        None,
        &mut rolls,
        &mut ScriptedRolls::new(),
    )
    .unwrap();

    assert!(!report.on_time);
    assert!(report.broke_down);
    assert_eq!(report.ticket, None);
    assert_eq!(report.payout, 72);
    assert_eq!(state.cash, 1_072);
    assert_eq!(report.wear_gain, 16);
    assert_eq!(state.active_vehicle().wear, 96);
    assert_eq!(state.active_vehicle().reliability, 39);
    assert_eq!(state.heat, 0);
    assert_eq!(rolls.remaining(), 0);

    let latest = state.log.latest().unwrap();
    assert_eq!(latest.tone, LogTone::Bad);
    assert!(latest.text.contains("Late"));
    assert!(latest.text.contains("Breakdown (limped in)"));
    assert!(latest.text.contains("+$72"));
}

#[test]
fn ticket_costs_scale_with_heat() {
    let mut state = scripted_state();
    state.heat = 4;
    let job = first_job(&state);
    // pay -10, ticket 200, wear gain 6; on time and ticketed
    let mut rolls = ScriptedRolls::new()
        .ints([10, 200, 6])
        .percents([0.0, 0.0]);

    let report = resolve_job(
        &mut state,
        &job,
        Strategy::SafeRoute,
        None,
        &mut rolls,
        &mut ScriptedRolls::new(),
    )
    .unwrap();

    assert!(report.on_time);
    assert_eq!(report.ticket, Some(260));
    assert_eq!(report.payout, 210);
    assert_eq!(report.net_cash(), -50);
    assert_eq!(state.cash, 950);
    assert_eq!(state.heat, 6);
    assert_eq!(state.active_vehicle().wear, 7);
    assert_eq!(state.active_vehicle().reliability, 71);
    assert!((state.active_vehicle().charge_kwh - (250.0 - 5.0 * 0.808)).abs() < 1e-9);
    // wear stays under 60, so no breakdown or reliability draws happen
    assert_eq!(rolls.remaining(), 0);

    let lines: Vec<&str> = state.log.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Ticket -$260"));
    assert!(lines[0].contains("Energy -4.0 kWh"));
    assert!(lines[1].contains("Forecast"));
}

#[test]
fn carma_strategies_move_carma() {
    let mut state = scripted_state();
    let job = first_job(&state);
    let mut rolls = ScriptedRolls::new().ints([7]);
    let report = resolve_job(
        &mut state,
        &job,
        Strategy::SpendCarma,
        None,
        &mut rolls,
        &mut ScriptedRolls::new(),
    )
    .unwrap();
    assert_eq!(report.mods.carma_delta, -7);
    assert_eq!(state.carma, 13);

    let job = first_job(&state);
    let mut rolls = ScriptedRolls::new().ints([6, 20]);
    resolve_job(
        &mut state,
        &job,
        Strategy::EarnCarma,
        None,
        &mut rolls,
        &mut ScriptedRolls::new(),
    )
    .unwrap();
    assert_eq!(state.carma, 19);
}

#[test]
fn fleet_rotates_after_each_delivery() {
    let mut state = scripted_state();
    state.fleet = Fleet::from_names(&["Dream", "Earl", "Rocket"]).unwrap();
    let mut visited = Vec::new();
    for _ in 0..3 {
        let job = first_job(&state);
        let report = resolve_job(
            &mut state,
            &job,
            Strategy::SafeRoute,
            None,
            &mut ScriptedRolls::new(),
            &mut ScriptedRolls::new(),
        )
        .unwrap();
        visited.push(report.vehicle_index);
    }
    assert_eq!(visited, vec![0, 1, 2]);
    assert_eq!(state.fleet.active_index(), 0);
}

#[test]
fn named_vehicle_runs_and_cursor_follows_it() {
    let mut state = scripted_state();
    state.fleet = Fleet::from_names(&["Dream", "Earl", "Rocket"]).unwrap();
    let job = first_job(&state);
    let report = resolve_job(
        &mut state,
        &job,
        Strategy::SafeRoute,
        Some(1),
        &mut ScriptedRolls::new(),
        &mut ScriptedRolls::new(),
    )
    .unwrap();
    assert_eq!(report.vehicle, "Earl");
    assert!(state.fleet.get(1).is_some_and(|v| v.wear > 0));
    assert_eq!(state.fleet.get(0).map(|v| v.wear), Some(0));
    assert_eq!(state.fleet.active_index(), 2);
}

#[test]
fn resolution_replaces_the_whole_board() {
    let mut state = scripted_state();
    let before: Vec<JobId> = state.jobs.iter().map(|j| j.id.clone()).collect();
    let job = first_job(&state);
    resolve_job(
        &mut state,
        &job,
        Strategy::SafeRoute,
        None,
        &mut ScriptedRolls::new(),
        &mut ScriptedRolls::new(),
    )
    .unwrap();
    assert_eq!(state.jobs.jobs().len(), 3);
    assert!(state.jobs.iter().all(|j| !before.contains(&j.id)));
}
