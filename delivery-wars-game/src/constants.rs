//! Centralized balance and tuning constants for Delivery Wars.
//!
//! These values define the deterministic math for the dispatch simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Run bounds ---------------------------------------------------------------
pub const CARMA_MIN: i32 = 0;
pub const CARMA_MAX: i32 = 99;
pub const HEAT_MIN: i32 = 0;
pub const HEAT_CAP_DEFAULT: i32 = 25;
pub const WEAR_MIN: i32 = 0;
pub const WEAR_MAX: i32 = 100;
pub const RELIABILITY_FLOOR: i32 = 20;
pub const RELIABILITY_CEILING: i32 = 95;
pub const LOG_CAPACITY_DEFAULT: usize = 12;
pub const JOB_BATCH_SIZE: usize = 3;

// Starting run -------------------------------------------------------------
pub(crate) const STARTING_CASH: i64 = 1_000;
pub(crate) const STARTING_CARMA: i32 = 20;
pub(crate) const STARTING_HEAT: i32 = 0;
pub(crate) const STARTING_VEHICLE: &str = "Dream";
pub(crate) const VEHICLE_START_RELIABILITY: i32 = 70;

// Job generation -----------------------------------------------------------
pub(crate) const JOB_DISTANCE_MIN: i32 = 5;
pub(crate) const JOB_DISTANCE_MAX: i32 = 26;
pub(crate) const JOB_DEADLINE_MIN: i32 = 10;
pub(crate) const JOB_DEADLINE_MAX: i32 = 36;
pub(crate) const JOB_BASE_PAY_MIN: i32 = 180;
pub(crate) const JOB_BASE_PAY_MAX: i32 = 520;
pub(crate) const JOB_PER_MILE_MIN: i32 = 8;
pub(crate) const JOB_PER_MILE_MAX: i32 = 18;
pub(crate) const JOB_PRIORITY_BONUS: i64 = 120;
pub(crate) const JOB_ENFORCE_MIN: i32 = 5;
pub(crate) const JOB_ENFORCE_MAX: i32 = 30;
pub(crate) const JOB_SUGARTOWN_ENFORCE_BONUS: i32 = 25;
pub(crate) const JOB_NIGHT_ENFORCE_RELIEF: i32 = 10;
pub(crate) const JOB_HEAT_ENFORCE_FACTOR: i32 = 2;
pub(crate) const JOB_ENFORCE_CAP: i32 = 95;

// Resolution ---------------------------------------------------------------
pub(crate) const ON_TIME_BASE: i32 = 70;
pub(crate) const ON_TIME_BASE_FLOOR: i32 = 20;
pub(crate) const ON_TIME_BASE_CEILING: i32 = 85;
pub(crate) const ON_TIME_DISTANCE_DIVISOR: i32 = 2;
pub(crate) const ON_TIME_WEAR_DIVISOR: i32 = 4;
pub(crate) const ON_TIME_RELIABILITY_DIVISOR: i32 = 10;
pub(crate) const ON_TIME_CHANCE_FLOOR: i32 = 10;
pub(crate) const ON_TIME_CHANCE_CEILING: i32 = 95;
pub(crate) const ENFORCE_WEAR_DIVISOR: i32 = 3;
pub(crate) const ENFORCE_CHANCE_CAP: i32 = 98;
pub(crate) const TICKET_COST_MIN: i32 = 120;
pub(crate) const TICKET_COST_MAX: i32 = 520;
pub(crate) const TICKET_HEAT_SURCHARGE: i64 = 15;
pub(crate) const TICKET_HEAT_GAIN: i32 = 2;
pub(crate) const CLEAN_RUN_HEAT_DECAY: i32 = 1;
pub(crate) const BREAKDOWN_WEAR_THRESHOLD: i32 = 70;
pub(crate) const BREAKDOWN_BASE_CHANCE: f64 = 10.0;
pub(crate) const BREAKDOWN_WEAR_COEFFICIENT: f64 = 1.2;
pub(crate) const BREAKDOWN_RELIABILITY_COEFFICIENT: f64 = 0.2;
pub(crate) const BREAKDOWN_CHANCE_FLOOR: f64 = 5.0;
pub(crate) const BREAKDOWN_CHANCE_CEILING: f64 = 55.0;
pub(crate) const LATE_PAYOUT_FACTOR: f64 = 0.65;
pub(crate) const BREAKDOWN_PAYOUT_FACTOR: f64 = 0.35;
pub(crate) const WEAR_GAIN_MIN: i32 = 6;
pub(crate) const WEAR_GAIN_MAX: i32 = 14;
pub(crate) const WEAR_GAIN_FLOOR: i32 = 4;
pub(crate) const WEAR_GAIN_CEILING: i32 = 30;
pub(crate) const WEAR_DISTANCE_DIVISOR: i32 = 6;
pub(crate) const RELIABILITY_LOSS_WEAR: i32 = 60;
pub(crate) const RELIABILITY_LOSS_MIN: i32 = 0;
pub(crate) const RELIABILITY_LOSS_MAX: i32 = 2;
pub(crate) const RELIABILITY_GAIN_WEAR: i32 = 30;
pub(crate) const RELIABILITY_GAIN: i32 = 1;

// Day progression ----------------------------------------------------------
pub(crate) const OVERHEAD_BASE: i64 = 280;
pub(crate) const OVERHEAD_PER_VEHICLE: i64 = 120;
pub(crate) const OVERNIGHT_RECOVERY_MIN: i32 = 3;
pub(crate) const OVERNIGHT_RECOVERY_MAX: i32 = 8;
pub(crate) const EXPANSION_DAYS: [u32; 2] = [4, 7];
pub(crate) const EXPANSION_BASE_COST: i64 = 1_800;
pub(crate) const EXPANSION_COST_PER_VEHICLE: i64 = 900;

// Floyd's garage -----------------------------------------------------------
pub(crate) const QUICK_FIX_COST: i64 = 150;
pub(crate) const QUICK_FIX_RELIABILITY: i32 = 10;
pub(crate) const QUICK_FIX_WEAR_RELIEF: i32 = 8;
pub(crate) const PROPER_FIX_COST: i64 = 400;
pub(crate) const PROPER_FIX_RELIABILITY: i32 = 4;

// Energy -------------------------------------------------------------------
pub const ELEC_PRICE_PER_KWH: f64 = 0.22;
pub const GAS_PRICE_PER_GALLON: f64 = 4.20;
pub(crate) const FULL_CHARGE_EPSILON_KWH: f64 = 0.01;
/// Float noise below this many dollars is dropped before a charge rounds up.
pub(crate) const CHARGE_COST_EPSILON: f64 = 1e-6;
