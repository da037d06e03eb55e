//! Energy pricing, per-vehicle efficiency specs, and charging.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CHARGE_COST_EPSILON, ELEC_PRICE_PER_KWH, FULL_CHARGE_EPSILON_KWH, GAS_PRICE_PER_GALLON,
};
use crate::error::ActionError;
use crate::format::{fmt_kwh, fmt_money};
use crate::numbers::ceil_f64_to_i64;
use crate::run_log::LogTone;
use crate::state::RunState;
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelKind {
    Electric,
    Hybrid,
}

impl FuelKind {
    /// Short label shown next to the active vehicle.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electric => "EV",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// Where a vehicle can be charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChargeLocation {
    Garage,
    PublicDock,
    /// Cheap power off the books; draws attention and abuses the pack.
    GrayDock,
}

impl ChargeLocation {
    pub const ALL: [Self; 3] = [Self::Garage, Self::PublicDock, Self::GrayDock];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Garage => "garage",
            Self::PublicDock => "publicDock",
            Self::GrayDock => "grayDock",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Garage => "the garage",
            Self::PublicDock => "a public dock",
            Self::GrayDock => "a gray dock",
        }
    }

    #[must_use]
    pub const fn modifiers(self) -> LocationModifiers {
        match self {
            Self::Garage => LocationModifiers {
                markup_elec: 1.00,
                markup_gas: 1.00,
                heat_delta: 0,
                wear_delta: 0,
            },
            Self::PublicDock => LocationModifiers {
                markup_elec: 1.35,
                markup_gas: 1.15,
                heat_delta: 1,
                wear_delta: 2,
            },
            Self::GrayDock => LocationModifiers {
                markup_elec: 0.80,
                markup_gas: 1.00,
                heat_delta: 3,
                wear_delta: 6,
            },
        }
    }
}

impl fmt::Display for ChargeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargeLocation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "garage" => Ok(Self::Garage),
            "publicDock" | "public-dock" | "public" => Ok(Self::PublicDock),
            "grayDock" | "gray-dock" | "gray" => Ok(Self::GrayDock),
            _ => Err(()),
        }
    }
}

/// Price markups and side effects of a charging location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationModifiers {
    pub markup_elec: f64,
    pub markup_gas: f64,
    pub heat_delta: i32,
    pub wear_delta: i32,
}

/// Static efficiency and capacity for a named vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySpec {
    pub fuel: FuelKind,
    pub kwh_per_mile: f64,
    pub battery_kwh: f64,
    pub gas_mpg: Option<f64>,
    pub tank_gallons: Option<f64>,
}

impl EnergySpec {
    const fn electric(kwh_per_mile: f64, battery_kwh: f64) -> Self {
        Self {
            fuel: FuelKind::Electric,
            kwh_per_mile,
            battery_kwh,
            gas_mpg: None,
            tank_gallons: None,
        }
    }
}

/// Every vehicle name the lot can ever hand out, in purchase order.
pub const ROSTER: [&str; 10] = [
    "Clyde",
    "Earl",
    "Betsy",
    "Dream",
    "Bags",
    "Screw",
    "Rocket",
    "Colt",
    "Big Jim",
    "Queen Bee",
];

/// Look up the efficiency spec for a roster name.
#[must_use]
pub fn energy_spec(name: &str) -> Option<EnergySpec> {
    let spec = match name {
        "Rocket" => EnergySpec::electric(0.200, 60.0),
        "Betsy" => EnergySpec::electric(0.240, 90.0),
        "Bags" => EnergySpec::electric(0.440, 120.0),
        "Screw" => EnergySpec::electric(0.645, 180.0),
        "Dream" => EnergySpec::electric(0.808, 250.0),
        "Earl" => EnergySpec::electric(0.792, 220.0),
        "Clyde" => EnergySpec::electric(0.817, 240.0),
        "Queen Bee" => EnergySpec::electric(0.924, 300.0),
        // Very large pack; the drama is intentional.
        "Big Jim" => EnergySpec::electric(2.030, 2_000.0),
        "Colt" => EnergySpec {
            fuel: FuelKind::Hybrid,
            kwh_per_mile: 0.280,
            battery_kwh: 18.0,
            gas_mpg: Some(18.0),
            tank_gallons: Some(12.0),
        },
        _ => return None,
    };
    Some(spec)
}

/// Unit prices before location markup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyPrices {
    pub elec_per_kwh: f64,
    pub gas_per_gallon: f64,
}

impl Default for EnergyPrices {
    fn default() -> Self {
        Self {
            elec_per_kwh: ELEC_PRICE_PER_KWH,
            gas_per_gallon: GAS_PRICE_PER_GALLON,
        }
    }
}

/// Electricity a route of `miles` draws from the vehicle.
#[must_use]
pub fn energy_needed(vehicle: &Vehicle, miles: u32) -> f64 {
    f64::from(miles) * vehicle.kwh_per_mile
}

/// Price of topping a vehicle off at a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeQuote {
    pub location: ChargeLocation,
    pub needed_kwh: f64,
    /// Whole dollars, rounded up.
    pub cost: i64,
}

#[must_use]
pub fn charge_quote(vehicle: &Vehicle, location: ChargeLocation) -> ChargeQuote {
    let needed_kwh = (vehicle.battery_kwh - vehicle.charge_kwh).clamp(0.0, vehicle.battery_kwh);
    let raw = needed_kwh * ELEC_PRICE_PER_KWH * location.modifiers().markup_elec;
    ChargeQuote {
        location,
        needed_kwh,
        cost: ceil_f64_to_i64(raw - CHARGE_COST_EPSILON).max(0),
    }
}

/// Charge the active vehicle to full at `location`.
///
/// # Errors
///
/// Returns [`ActionError::AlreadyCharged`] when the pack is already full and
/// [`ActionError::InsufficientFunds`] when cash does not cover the quote. In
/// both cases only an advisory is logged.
pub fn charge_to_full(
    state: &mut RunState,
    location: ChargeLocation,
) -> Result<ChargeQuote, ActionError> {
    let quote = charge_quote(state.active_vehicle(), location);
    let name = state.active_vehicle().name.clone();
    if quote.needed_kwh <= FULL_CHARGE_EPSILON_KWH {
        return Err(state.reject(ActionError::AlreadyCharged { vehicle: name }));
    }
    if state.cash < quote.cost {
        return Err(state.reject(ActionError::InsufficientFunds {
            action: "a charge",
            cost: quote.cost,
            cash: state.cash,
        }));
    }

    let mods = location.modifiers();
    state.cash -= quote.cost;
    state.add_heat(mods.heat_delta);
    let vehicle = state.fleet.active_mut();
    vehicle.top_up();
    vehicle.add_wear(mods.wear_delta);

    log::debug!(
        "charged {name} at {location}: {:.2} kWh for ${}",
        quote.needed_kwh,
        quote.cost
    );
    let mut line = format!(
        "Floyd: ({name}) Charged {} at {} for {}.",
        fmt_kwh(quote.needed_kwh),
        location.label(),
        fmt_money(quote.cost)
    );
    if mods.heat_delta > 0 || mods.wear_delta > 0 {
        line.push_str(&format!(
            " Heat +{} • Wear +{}%",
            mods.heat_delta, mods.wear_delta
        ));
    }
    let tone = if matches!(location, ChargeLocation::GrayDock) {
        LogTone::Bad
    } else {
        LogTone::Good
    };
    state.note(line, tone);
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_roster_name_has_a_spec() {
        for name in ROSTER {
            assert!(energy_spec(name).is_some(), "missing spec for {name}");
        }
        assert!(energy_spec("Herbie").is_none());
    }

    #[test]
    fn only_colt_is_hybrid() {
        let hybrids: Vec<&str> = ROSTER
            .into_iter()
            .filter(|name| energy_spec(name).is_some_and(|s| s.fuel == FuelKind::Hybrid))
            .collect();
        assert_eq!(hybrids, vec!["Colt"]);
    }

    #[test]
    fn energy_needed_scales_with_distance() {
        let vehicle = Vehicle::from_roster("Rocket").unwrap();
        assert!((energy_needed(&vehicle, 10) - 2.0).abs() < 1e-9);
        assert!(energy_needed(&vehicle, 0).abs() < 1e-9);
    }

    #[test]
    fn quote_applies_markup_and_rounds_up() {
        let mut vehicle = Vehicle::from_roster("Rocket").unwrap();
        vehicle.charge_kwh = 50.0;
        let garage = charge_quote(&vehicle, ChargeLocation::Garage);
        assert!((garage.needed_kwh - 10.0).abs() < 1e-9);
        assert_eq!(garage.cost, 3);
        let public = charge_quote(&vehicle, ChargeLocation::PublicDock);
        assert_eq!(public.cost, 3);
        vehicle.charge_kwh = 0.0;
        assert_eq!(charge_quote(&vehicle, ChargeLocation::GrayDock).cost, 11);
        assert_eq!(charge_quote(&vehicle, ChargeLocation::PublicDock).cost, 18);
    }

    #[test]
    fn whole_dollar_quote_ignores_float_noise() {
        let mut vehicle = Vehicle::from_roster("Dream").unwrap();
        vehicle.charge_kwh = 199.999_999_999_999_97;
        let quote = charge_quote(&vehicle, ChargeLocation::Garage);
        assert!((quote.needed_kwh - 50.0).abs() < 1e-9);
        assert_eq!(quote.cost, 11);

        vehicle.charge_kwh = vehicle.battery_kwh - 0.02;
        assert_eq!(charge_quote(&vehicle, ChargeLocation::Garage).cost, 1);
    }

    #[test]
    fn locations_parse_from_keys() {
        for location in ChargeLocation::ALL {
            assert_eq!(location.as_str().parse::<ChargeLocation>(), Ok(location));
        }
        assert!("moon".parse::<ChargeLocation>().is_err());
    }
}
