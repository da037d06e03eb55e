use crate::config::RunConfig;
use crate::energy::{ChargeLocation, ChargeQuote, charge_to_full};
use crate::error::{ActionError, ConfigError};
use crate::garage::{self, RepairReceipt};
use crate::jobs::JobId;
use crate::progression::{self, DayReport};
use crate::resolver::{DeliveryReport, Strategy, resolve_job};
use crate::rolls::RunStreams;
use crate::state::{RunSnapshot, RunState};

/// Owning context for one run: configuration, seeded draw streams and state.
#[derive(Debug, Clone)]
pub struct RunSession {
    config: RunConfig,
    streams: RunStreams,
    state: RunState,
}

impl RunSession {
    /// Start a run from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration fails validation.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let mut streams = RunStreams::from_user_seed(config.seed);
        let state = RunState::new(&config, streams.jobs())?;
        log::info!(
            "new run: seed {} vehicle {} cash {}",
            config.seed,
            config.starting_vehicle,
            config.starting_cash
        );
        Ok(Self {
            config,
            streams,
            state,
        })
    }

    /// Start a default run with `seed`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the default configuration is invalid.
    pub fn with_seed(seed: u64) -> Result<Self, ConfigError> {
        Self::new(RunConfig::with_seed(seed))
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Apply a closure to the mutable run state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut RunState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub const fn streams(&self) -> &RunStreams {
        &self.streams
    }

    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        self.state.snapshot()
    }

    /// Dispatch the active vehicle on `job_id`.
    ///
    /// # Errors
    ///
    /// See [`resolve_job`].
    pub fn resolve(
        &mut self,
        job_id: &JobId,
        strategy: Strategy,
    ) -> Result<DeliveryReport, ActionError> {
        self.resolve_with(job_id, strategy, None)
    }

    /// Dispatch a specific vehicle slot, or the active one when `None`.
    ///
    /// # Errors
    ///
    /// See [`resolve_job`].
    pub fn resolve_with(
        &mut self,
        job_id: &JobId,
        strategy: Strategy,
        vehicle: Option<usize>,
    ) -> Result<DeliveryReport, ActionError> {
        let (rolls, job_rolls) = self.streams.resolve_and_jobs();
        resolve_job(&mut self.state, job_id, strategy, vehicle, rolls, job_rolls)
    }

    pub fn end_day(&mut self) -> DayReport {
        let (upkeep, jobs) = self.streams.upkeep_and_jobs();
        progression::end_day(&mut self.state, upkeep, jobs)
    }

    /// # Errors
    ///
    /// Returns [`ActionError::InsufficientFunds`] when cash is short.
    pub fn quick_fix(&mut self) -> Result<RepairReceipt, ActionError> {
        garage::quick_fix(&mut self.state)
    }

    /// # Errors
    ///
    /// Returns [`ActionError::InsufficientFunds`] when cash is short.
    pub fn proper_fix(&mut self) -> Result<RepairReceipt, ActionError> {
        garage::proper_fix(&mut self.state)
    }

    /// # Errors
    ///
    /// See [`charge_to_full`].
    pub fn charge_to_full(&mut self, location: ChargeLocation) -> Result<ChargeQuote, ActionError> {
        charge_to_full(&mut self.state, location)
    }

    /// Redraw the job batch without taking a job.
    pub fn refresh_jobs(&mut self) {
        self.state.refresh_jobs(self.streams.jobs());
    }

    /// # Errors
    ///
    /// Returns [`ActionError::UnknownVehicle`] for an empty slot.
    pub fn select_vehicle(&mut self, idx: usize) -> Result<(), ActionError> {
        self.state.select_vehicle(idx)
    }

    /// Throw the current run away and start over from the same configuration.
    /// The draw streams continue, so the new run differs from the last one.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration no longer validates.
    pub fn new_run(&mut self) -> Result<(), ConfigError> {
        self.state = RunState::new(&self.config, self.streams.jobs())?;
        log::info!("run restarted on seed {}", self.config.seed);
        Ok(())
    }

    /// Restart from `seed` with fresh streams.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration no longer validates.
    pub fn reseed(&mut self, seed: u64) -> Result<(), ConfigError> {
        self.config.seed = seed;
        self.streams = RunStreams::from_user_seed(seed);
        self.new_run()
    }

    /// Consume the session, returning the run state.
    #[must_use]
    pub fn into_state(self) -> RunState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_board() {
        let a = RunSession::with_seed(42).unwrap();
        let b = RunSession::with_seed(42).unwrap();
        assert_eq!(a.state().jobs, b.state().jobs);
        let c = RunSession::with_seed(43).unwrap();
        assert_ne!(a.state().jobs, c.state().jobs);
    }

    #[test]
    fn new_run_resets_state_but_keeps_config() {
        let mut session = RunSession::with_seed(8).unwrap();
        session.with_state_mut(|state| {
            state.cash = -40;
            state.day = 6;
        });
        session.new_run().unwrap();
        assert_eq!(session.state().day, 1);
        assert_eq!(session.state().cash, 1_000);
        assert_eq!(session.config().seed, 8);
    }

    #[test]
    fn reseed_matches_fresh_session() {
        let mut session = RunSession::with_seed(1).unwrap();
        session.end_day();
        session.reseed(77).unwrap();
        let fresh = RunSession::with_seed(77).unwrap();
        assert_eq!(session.state(), fresh.state());
        assert_eq!(session.streams().total_draws(), fresh.streams().total_draws());
    }

    #[test]
    fn session_resolve_uses_the_board() {
        let mut session = RunSession::with_seed(3).unwrap();
        let job = session.state().jobs.jobs()[0].id.clone();
        let report = session.resolve(&job, Strategy::SafeRoute).unwrap();
        assert_eq!(report.vehicle, "Dream");
        assert!(session.state().jobs.find(&job).is_none());
        assert!(session.streams().total_draws() > 0);
    }

    #[test]
    fn invalid_config_fails_construction() {
        let cfg = RunConfig {
            heat_cap: 0,
            ..RunConfig::default()
        };
        assert!(RunSession::new(cfg).is_err());
    }
}
