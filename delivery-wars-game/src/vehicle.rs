//! Vehicles and the fleet cursor.
use serde::{Deserialize, Serialize};

use crate::constants::{
    RELIABILITY_CEILING, RELIABILITY_FLOOR, VEHICLE_START_RELIABILITY, WEAR_MAX, WEAR_MIN,
};
use crate::energy::{FuelKind, ROSTER, energy_spec};
use crate::error::ConfigError;
use crate::numbers::round_f64_to_i32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
    pub fuel: FuelKind,
    pub battery_kwh: f64,
    pub kwh_per_mile: f64,
    /// Stored electricity, always within `[0, battery_kwh]`.
    pub charge_kwh: f64,
    /// Degradation percentage (0-100)
    pub wear: i32,
    /// Dependability percentage; drift and repairs keep it within 20-95.
    pub reliability: i32,
    #[serde(default)]
    pub gas_mpg: Option<f64>,
    #[serde(default)]
    pub tank_gallons: Option<f64>,
    #[serde(default)]
    pub gas_gallons: Option<f64>,
}

impl Vehicle {
    /// Build a fresh vehicle from the roster: no wear, full battery, full tank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownVehicle`] when the name has no energy spec.
    pub fn from_roster(name: &str) -> Result<Self, ConfigError> {
        let spec = energy_spec(name).ok_or_else(|| ConfigError::UnknownVehicle {
            name: name.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            fuel: spec.fuel,
            battery_kwh: spec.battery_kwh,
            kwh_per_mile: spec.kwh_per_mile,
            charge_kwh: spec.battery_kwh,
            wear: 0,
            reliability: VEHICLE_START_RELIABILITY,
            gas_mpg: spec.gas_mpg,
            tank_gallons: spec.tank_gallons,
            gas_gallons: spec.tank_gallons,
        })
    }

    /// Charge as a rounded percentage of capacity.
    #[must_use]
    pub fn charge_pct(&self) -> i32 {
        if self.battery_kwh <= 0.0 {
            return 0;
        }
        round_f64_to_i32(self.charge_kwh / self.battery_kwh * 100.0).clamp(0, 100)
    }

    /// Miles the current charge covers.
    #[must_use]
    pub fn range_miles(&self) -> f64 {
        if self.kwh_per_mile <= 0.0 {
            return 0.0;
        }
        self.charge_kwh / self.kwh_per_mile
    }

    /// Remove `kwh` from the pack, clamping at empty.
    pub fn drain(&mut self, kwh: f64) {
        self.charge_kwh = (self.charge_kwh - kwh).clamp(0.0, self.battery_kwh);
    }

    /// Fill the pack to capacity.
    pub const fn top_up(&mut self) {
        self.charge_kwh = self.battery_kwh;
    }

    /// Shift wear by `delta`, clamped to 0-100, returning the applied change.
    pub fn add_wear(&mut self, delta: i32) -> i32 {
        let before = self.wear;
        self.wear = (self.wear + delta).clamp(WEAR_MIN, WEAR_MAX);
        self.wear - before
    }

    /// Shift reliability by `delta`, clamped to 20-95, returning the applied change.
    pub fn adjust_reliability(&mut self, delta: i32) -> i32 {
        let before = self.reliability;
        self.reliability = (self.reliability + delta).clamp(RELIABILITY_FLOOR, RELIABILITY_CEILING);
        self.reliability - before
    }

    #[must_use]
    pub const fn is_hybrid(&self) -> bool {
        matches!(self.fuel, FuelKind::Hybrid)
    }
}

/// Ordered vehicles with an active cursor. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FleetParts")]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    active_idx: usize,
}

#[derive(Deserialize)]
struct FleetParts {
    vehicles: Vec<Vehicle>,
    active_idx: usize,
}

impl TryFrom<FleetParts> for Fleet {
    type Error = ConfigError;

    fn try_from(parts: FleetParts) -> Result<Self, Self::Error> {
        if parts.vehicles.is_empty() {
            return Err(ConfigError::EmptyFleet);
        }
        if parts.active_idx >= parts.vehicles.len() {
            return Err(ConfigError::ActiveOutOfRange {
                index: parts.active_idx,
                fleet_size: parts.vehicles.len(),
            });
        }
        Ok(Self {
            vehicles: parts.vehicles,
            active_idx: parts.active_idx,
        })
    }
}

impl Fleet {
    #[must_use]
    pub fn new(first: Vehicle) -> Self {
        Self {
            vehicles: vec![first],
            active_idx: 0,
        }
    }

    /// Build a fleet from roster names, first vehicle active.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownVehicle`] for a name without a spec and
    /// [`ConfigError::EmptyFleet`] when `names` is empty.
    pub fn from_names(names: &[&str]) -> Result<Self, ConfigError> {
        let mut iter = names.iter();
        let first = iter.next().ok_or(ConfigError::EmptyFleet)?;
        let mut fleet = Self::new(Vehicle::from_roster(first)?);
        for name in iter {
            fleet.push(Vehicle::from_roster(name)?);
        }
        Ok(fleet)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active_idx
    }

    #[must_use]
    pub fn active(&self) -> &Vehicle {
        &self.vehicles[self.active_idx]
    }

    pub fn active_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicles[self.active_idx]
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Vehicle> {
        self.vehicles.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vehicle> {
        self.vehicles.iter_mut()
    }

    /// Make `idx` the active vehicle. Returns false when out of range.
    pub fn select(&mut self, idx: usize) -> bool {
        if idx < self.vehicles.len() {
            self.active_idx = idx;
            true
        } else {
            false
        }
    }

    /// Point the cursor at the vehicle after `idx`, wrapping around.
    pub fn rotate_after(&mut self, idx: usize) {
        self.active_idx = (idx + 1) % self.vehicles.len();
    }

    pub fn push(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vehicles.iter().any(|v| v.name == name)
    }

    /// First roster vehicle not already in the fleet.
    #[must_use]
    pub fn next_available(&self) -> Option<Vehicle> {
        ROSTER
            .into_iter()
            .filter(|name| !self.contains(name))
            .find_map(|name| Vehicle::from_roster(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_vehicle_starts_fresh() {
        let dream = Vehicle::from_roster("Dream").unwrap();
        assert_eq!(dream.wear, 0);
        assert_eq!(dream.reliability, 70);
        assert!((dream.charge_kwh - 250.0).abs() < f64::EPSILON);
        assert_eq!(dream.charge_pct(), 100);
        assert!(dream.gas_gallons.is_none());

        let colt = Vehicle::from_roster("Colt").unwrap();
        assert!(colt.is_hybrid());
        assert_eq!(colt.gas_gallons, Some(12.0));
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let err = Vehicle::from_roster("Herbie").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVehicle { name } if name == "Herbie"));
    }

    #[test]
    fn wear_and_reliability_clamp() {
        let mut vehicle = Vehicle::from_roster("Earl").unwrap();
        assert_eq!(vehicle.add_wear(-5), 0);
        assert_eq!(vehicle.add_wear(130), 100);
        assert_eq!(vehicle.wear, 100);
        assert_eq!(vehicle.adjust_reliability(40), 25);
        assert_eq!(vehicle.reliability, 95);
        vehicle.adjust_reliability(-200);
        assert_eq!(vehicle.reliability, 20);
    }

    #[test]
    fn drain_never_goes_negative() {
        let mut vehicle = Vehicle::from_roster("Rocket").unwrap();
        vehicle.drain(500.0);
        assert!(vehicle.charge_kwh.abs() < f64::EPSILON);
        assert_eq!(vehicle.charge_pct(), 0);
        vehicle.top_up();
        assert!((vehicle.range_miles() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn fleet_rotation_wraps() {
        let mut fleet = Fleet::from_names(&["Dream", "Clyde", "Earl"]).unwrap();
        assert_eq!(fleet.active_index(), 0);
        fleet.rotate_after(0);
        assert_eq!(fleet.active_index(), 1);
        fleet.rotate_after(2);
        assert_eq!(fleet.active_index(), 0);
        assert!(!fleet.select(3));
        assert!(fleet.select(2));
        assert_eq!(fleet.active().name, "Earl");
    }

    #[test]
    fn next_available_follows_roster_order() {
        let fleet = Fleet::from_names(&["Clyde", "Earl"]).unwrap();
        assert_eq!(fleet.next_available().map(|v| v.name), Some("Betsy".into()));

        let mut full = Fleet::from_names(&ROSTER).unwrap();
        assert!(full.next_available().is_none());
        full.select(9);
        assert_eq!(full.active().name, "Queen Bee");
    }

    #[test]
    fn deserialized_fleet_keeps_its_cursor_in_range() {
        let mut fleet = Fleet::from_names(&["Dream", "Clyde"]).unwrap();
        fleet.select(1);
        let json = serde_json::to_string(&fleet).unwrap();
        let back: Fleet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fleet);
        assert_eq!(back.active().name, "Clyde");

        let mut value = serde_json::to_value(&fleet).unwrap();
        value["active_idx"] = serde_json::json!(2);
        let err = serde_json::from_value::<Fleet>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("outside a fleet of 2"));

        value["vehicles"] = serde_json::json!([]);
        value["active_idx"] = serde_json::json!(0);
        let err = serde_json::from_value::<Fleet>(value).unwrap_err();
        assert!(err.to_string().contains("at least one vehicle"));
    }
}
