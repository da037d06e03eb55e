//! Error types for player actions and run configuration.

use thiserror::Error;

use crate::format::{fmt_kwh, fmt_money};

/// Reasons a player action is refused. A refused action leaves the run
/// untouched apart from one advisory log line.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("no CARMA left to spend")]
    CarmaDepleted,
    #[error("{vehicle} needs {need_kwh:.1} kWh for {miles}mi but holds {have_kwh:.1} kWh")]
    InsufficientCharge {
        vehicle: String,
        miles: u32,
        need_kwh: f64,
        have_kwh: f64,
    },
    #[error("{action} costs {cost} but only {cash} is available")]
    InsufficientFunds {
        action: &'static str,
        cost: i64,
        cash: i64,
    },
    #[error("{vehicle} is already fully charged")]
    AlreadyCharged { vehicle: String },
    #[error("job {id} is not on the board")]
    UnknownJob { id: String },
    #[error("vehicle slot {index} is outside a fleet of {fleet_size}")]
    UnknownVehicle { index: usize, fleet_size: usize },
}

impl ActionError {
    /// Player-facing advisory line in the dispatcher or mechanic voice.
    #[must_use]
    pub fn advisory(&self) -> String {
        match self {
            Self::CarmaDepleted => "Chip: CARMA depleted. Can't spend what you don't have.".into(),
            Self::InsufficientCharge {
                vehicle,
                miles,
                need_kwh,
                have_kwh,
            } => format!(
                "Chip: ({vehicle}) Not enough charge for {miles}mi. Need {}, have {}. Charge up.",
                fmt_kwh(*need_kwh),
                fmt_kwh(*have_kwh)
            ),
            Self::InsufficientFunds { action, cost, cash } => format!(
                "Floyd: Not enough cash for {action}. It's {}, you've got {}.",
                fmt_money(*cost),
                fmt_money(*cash)
            ),
            Self::AlreadyCharged { vehicle } => format!("Chip: ({vehicle}) Already full."),
            Self::UnknownJob { id } => format!("Chip: Job {id} already went to someone else."),
            Self::UnknownVehicle { index, fleet_size } => format!(
                "Floyd: There's no slot {} in a fleet of {fleet_size}.",
                index + 1
            ),
        }
    }
}

/// Errors raised when run configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no energy specification for vehicle {name:?}")]
    UnknownVehicle { name: String },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("a fleet needs at least one vehicle")]
    EmptyFleet,
    #[error("active vehicle {index} is outside a fleet of {fleet_size}")]
    ActiveOutOfRange { index: usize, fleet_size: usize },
    #[error("log capacity must be at least 1")]
    EmptyLog,
    #[error("invalid run configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisories_use_player_voice() {
        let err = ActionError::InsufficientFunds {
            action: "a quick fix",
            cost: 150,
            cash: 100,
        };
        assert_eq!(
            err.advisory(),
            "Floyd: Not enough cash for a quick fix. It's $150, you've got $100."
        );
        assert!(ActionError::CarmaDepleted.advisory().starts_with("Chip:"));
    }

    #[test]
    fn charge_error_formats_energy() {
        let err = ActionError::InsufficientCharge {
            vehicle: "Dream".into(),
            miles: 20,
            need_kwh: 16.16,
            have_kwh: 3.0,
        };
        assert!(err.advisory().contains("Need 16.2 kWh, have 3.0 kWh"));
        assert!(err.to_string().contains("16.2 kWh"));
    }
}
