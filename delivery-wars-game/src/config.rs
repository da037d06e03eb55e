//! Run configuration.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CARMA_MAX, CARMA_MIN, HEAT_CAP_DEFAULT, LOG_CAPACITY_DEFAULT, STARTING_CARMA, STARTING_CASH,
    STARTING_HEAT, STARTING_VEHICLE,
};
use crate::energy::energy_spec;
use crate::error::ConfigError;

/// Largest heat cap a run may configure.
const HEAT_CAP_LIMIT: i32 = 99;

/// Starting conditions and run-wide limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "RunConfig::default_starting_cash")]
    pub starting_cash: i64,
    #[serde(default = "RunConfig::default_starting_carma")]
    pub starting_carma: i32,
    #[serde(default = "RunConfig::default_starting_heat")]
    pub starting_heat: i32,
    #[serde(default = "RunConfig::default_starting_vehicle")]
    pub starting_vehicle: String,
    #[serde(default = "RunConfig::default_heat_cap")]
    pub heat_cap: i32,
    #[serde(default = "RunConfig::default_log_capacity")]
    pub log_capacity: usize,
}

impl RunConfig {
    const fn default_starting_cash() -> i64 {
        STARTING_CASH
    }

    const fn default_starting_carma() -> i32 {
        STARTING_CARMA
    }

    const fn default_starting_heat() -> i32 {
        STARTING_HEAT
    }

    fn default_starting_vehicle() -> String {
        STARTING_VEHICLE.to_string()
    }

    const fn default_heat_cap() -> i32 {
        HEAT_CAP_DEFAULT
    }

    const fn default_log_capacity() -> usize {
        LOG_CAPACITY_DEFAULT
    }

    /// Default configuration with a specific seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every invariant the run state relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if energy_spec(&self.starting_vehicle).is_none() {
            return Err(ConfigError::UnknownVehicle {
                name: self.starting_vehicle.clone(),
            });
        }
        Self::check_range("heat_cap", self.heat_cap, 1, HEAT_CAP_LIMIT)?;
        Self::check_range("starting_heat", self.starting_heat, 0, self.heat_cap)?;
        Self::check_range("starting_carma", self.starting_carma, CARMA_MIN, CARMA_MAX)?;
        if self.log_capacity == 0 {
            return Err(ConfigError::EmptyLog);
        }
        Ok(())
    }

    fn check_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), ConfigError> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::RangeViolation {
                field,
                min: i64::from(min),
                max: i64::from(max),
                value: i64::from(value),
            })
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_cash: Self::default_starting_cash(),
            starting_carma: Self::default_starting_carma(),
            starting_heat: Self::default_starting_heat(),
            starting_vehicle: Self::default_starting_vehicle(),
            heat_cap: Self::default_heat_cap(),
            log_capacity: Self::default_log_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = RunConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.starting_cash, 1_000);
        assert_eq!(cfg.starting_vehicle, "Dream");
        assert_eq!(cfg.heat_cap, 25);
        assert_eq!(cfg.log_capacity, 12);
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = RunConfig::from_json(r#"{ "seed": 9, "starting_cash": 2000 }"#).unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.starting_cash, 2_000);
        assert_eq!(cfg.starting_carma, 20);
    }

    #[test]
    fn unknown_vehicle_is_rejected() {
        let err = RunConfig::from_json(r#"{ "starting_vehicle": "Herbie" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVehicle { .. }));
    }

    #[test]
    fn range_violations_are_reported() {
        let cfg = RunConfig {
            starting_heat: 30,
            ..RunConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "starting_heat must be between 0 and 25 (got 30)"
        );

        let cfg = RunConfig {
            log_capacity: 0,
            ..RunConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyLog)));
        assert!(matches!(
            RunConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
