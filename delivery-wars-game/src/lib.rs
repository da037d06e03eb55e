//! Delivery Wars Game Engine
//!
//! Platform-agnostic job resolution and progression engine for the Delivery
//! Wars dispatch game. This crate provides all game mechanics without UI or
//! platform-specific dependencies; renderers read [`RunSnapshot`] and drive
//! the run through [`RunSession`].

pub mod config;
pub mod constants;
pub mod energy;
pub mod error;
pub mod format;
pub mod garage;
pub mod jobs;
pub mod numbers;
pub mod progression;
pub mod resolver;
pub mod rolls;
pub mod run_log;
pub mod session;
pub mod state;
pub mod vehicle;

// Re-export commonly used types
pub use config::RunConfig;
pub use energy::{
    ChargeLocation, ChargeQuote, EnergyPrices, EnergySpec, FuelKind, LocationModifiers, ROSTER,
    charge_quote, charge_to_full, energy_needed, energy_spec,
};
pub use error::{ActionError, ConfigError};
pub use format::{fmt_kwh, fmt_money, fmt_price};
pub use garage::{RepairKind, RepairReceipt, proper_fix, quick_fix};
pub use jobs::{Job, JobBoard, JobId, JobKind, Zone, generate_job};
pub use progression::{DayReport, ExpansionOutcome, end_day, expansion_cost, overhead_for};
pub use resolver::{
    DeliveryReport, Forecast, Strategy, StrategyMods, breakdown_chance, compute_payout, forecast,
    resolve_job,
};
pub use rolls::{CountingRng, Rolls, RunStreams, ScriptedRolls};
pub use run_log::{LogEntry, LogTone, RunLog};
pub use session::RunSession;
pub use state::{RunSnapshot, RunState, VehicleSummary};
pub use vehicle::{Fleet, Vehicle};
