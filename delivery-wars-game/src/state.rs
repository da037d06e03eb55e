//! Run state and the read-only snapshot handed to presentation layers.
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::constants::{CARMA_MAX, CARMA_MIN, HEAT_MIN};
use crate::energy::EnergyPrices;
use crate::error::{ActionError, ConfigError};
use crate::format::{fmt_money, fmt_price};
use crate::jobs::{Job, JobBoard};
use crate::rolls::Rolls;
use crate::run_log::{LogEntry, LogTone, RunLog};
use crate::vehicle::{Fleet, Vehicle};

/// Everything that persists for the lifetime of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Current day, starting at 1.
    pub day: u32,
    /// Whole dollars; negative means insolvent.
    pub cash: i64,
    pub carma: i32,
    pub heat: i32,
    pub heat_cap: i32,
    pub fleet: Fleet,
    pub log: RunLog,
    pub jobs: JobBoard,
}

impl RunState {
    /// Build the opening state for `cfg`, drawing the first job batch.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is invalid.
    pub fn new<R: Rolls + ?Sized>(cfg: &RunConfig, job_rolls: &mut R) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let vehicle = Vehicle::from_roster(&cfg.starting_vehicle)?;
        Ok(Self {
            day: 1,
            cash: cfg.starting_cash,
            carma: cfg.starting_carma,
            heat: cfg.starting_heat,
            heat_cap: cfg.heat_cap,
            fleet: Fleet::new(vehicle),
            log: RunLog::with_capacity(cfg.log_capacity),
            jobs: JobBoard::generate(cfg.starting_heat, job_rolls),
        })
    }

    #[must_use]
    pub fn active_vehicle(&self) -> &Vehicle {
        self.fleet.active()
    }

    /// Soft loss condition; the run keeps going until the player restarts.
    #[must_use]
    pub const fn is_insolvent(&self) -> bool {
        self.cash < 0
    }

    /// Shift CARMA by `delta`, clamped to 0-99.
    pub fn adjust_carma(&mut self, delta: i32) {
        self.carma = (self.carma + delta).clamp(CARMA_MIN, CARMA_MAX);
    }

    /// Shift heat by `delta`, clamped to the run's cap.
    pub fn add_heat(&mut self, delta: i32) {
        self.heat = (self.heat + delta).clamp(HEAT_MIN, self.heat_cap);
    }

    /// Append a player-facing log line.
    pub fn note(&mut self, text: impl Into<String>, tone: LogTone) {
        self.log.push(text, tone);
    }

    /// Log the advisory for a refused action and hand the error back.
    pub fn reject(&mut self, err: ActionError) -> ActionError {
        log::debug!("action refused: {err}");
        let tone = if matches!(err, ActionError::AlreadyCharged { .. }) {
            LogTone::Info
        } else {
            LogTone::Bad
        };
        self.note(err.advisory(), tone);
        err
    }

    /// Replace the job batch using current heat.
    pub fn refresh_jobs<R: Rolls + ?Sized>(&mut self, rolls: &mut R) {
        self.jobs.refresh(self.heat, rolls);
    }

    /// Make the vehicle in slot `idx` active.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownVehicle`] when the slot is empty.
    pub fn select_vehicle(&mut self, idx: usize) -> Result<(), ActionError> {
        if !self.fleet.select(idx) {
            return Err(self.reject(ActionError::UnknownVehicle {
                index: idx,
                fleet_size: self.fleet.len(),
            }));
        }
        let line = format!("Chip: {} is up next.", self.fleet.active().name);
        self.note(line, LogTone::Info);
        Ok(())
    }

    /// Plain-data projection for renderers.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        let prices = EnergyPrices::default();
        RunSnapshot {
            day: self.day,
            cash: self.cash,
            cash_label: fmt_money(self.cash),
            carma: self.carma,
            heat: self.heat,
            heat_cap: self.heat_cap,
            fleet_size: self.fleet.len(),
            active: VehicleSummary::from(self.active_vehicle()),
            elec_price_label: fmt_price(prices.elec_per_kwh),
            gas_price_label: fmt_price(prices.gas_per_gallon),
            jobs: self.jobs.jobs().to_vec(),
            log: self.log.iter().cloned().collect(),
            insolvent: self.is_insolvent(),
        }
    }
}

/// Display-oriented view of the active vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub name: String,
    pub fuel_label: String,
    pub wear: i32,
    pub reliability: i32,
    pub charge_pct: i32,
    /// Present only for hybrids.
    pub gas_gallons: Option<f64>,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            name: vehicle.name.clone(),
            fuel_label: vehicle.fuel.label().to_string(),
            wear: vehicle.wear,
            reliability: vehicle.reliability,
            charge_pct: vehicle.charge_pct(),
            gas_gallons: vehicle.gas_gallons.filter(|_| vehicle.is_hybrid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub day: u32,
    pub cash: i64,
    pub cash_label: String,
    pub carma: i32,
    pub heat: i32,
    pub heat_cap: i32,
    pub fleet_size: usize,
    pub active: VehicleSummary,
    pub elec_price_label: String,
    pub gas_price_label: String,
    pub jobs: Vec<Job>,
    pub log: Vec<LogEntry>,
    pub insolvent: bool,
}
