//! Fuel cost and parcel revenue.
//!
//! ```text
//! cost(km)        = fuel_price / km_per_unit · km · distance_factor
//! charge(parcel)  = (needed − 1) · per_unit_rate + base_rate
//! profit(p, leg)  = charge(p) − cost(leg)
//! ```
//!
//! All functions are pure.  Distances that are negative, NaN or infinite
//! cost nothing and are reported with a warning.

use cs_core::Parcel;
use tracing::warn;

use crate::{DispatchError, DispatchResult};

// ── CostConfig ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostConfig {
    pub fuel_price_per_unit: f64,
    pub km_per_fuel_unit:    f64,
    pub distance_factor:     f64,
    pub base_rate:           f64,
    pub per_unit_rate:       f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            fuel_price_per_unit: 270.0,
            km_per_fuel_unit:    30.0,
            distance_factor:     0.01,
            base_rate:           100.0,
            per_unit_rate:       30.0,
        }
    }
}

impl CostConfig {
    pub fn validate(&self) -> DispatchResult<()> {
        let fields = [
            ("fuel_price_per_unit", self.fuel_price_per_unit),
            ("km_per_fuel_unit", self.km_per_fuel_unit),
            ("distance_factor", self.distance_factor),
            ("base_rate", self.base_rate),
            ("per_unit_rate", self.per_unit_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(DispatchError::Cost(format!("{name} must be finite, got {value}")));
            }
        }
        if self.km_per_fuel_unit <= 0.0 {
            return Err(DispatchError::Cost(format!(
                "km_per_fuel_unit must be positive, got {}",
                self.km_per_fuel_unit
            )));
        }
        Ok(())
    }
}

// ── CostModel ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CostModel {
    config: CostConfig,
}

impl CostModel {
    pub fn new(config: CostConfig) -> DispatchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    /// Fuel cost of driving `distance_km`.
    pub fn moving_cost(&self, distance_km: f64) -> f64 {
        if !distance_km.is_finite() || distance_km < 0.0 {
            warn!(distance_km, "degenerate distance; costed at zero");
            return 0.0;
        }
        let c = &self.config;
        c.fuel_price_per_unit / c.km_per_fuel_unit * distance_km * c.distance_factor
    }

    /// Cost of a leg given in metres.  An unreachable leg costs nothing.
    pub fn leg_cost(&self, distance_m: Option<f64>) -> f64 {
        distance_m.map_or(0.0, |m| self.moving_cost(m / 1_000.0))
    }

    /// Revenue for carrying `parcel`; zero when there is none.
    pub fn parcel_charge(&self, parcel: Option<&Parcel>) -> f64 {
        match parcel {
            Some(p) => {
                let extra = p.needed_capacity.saturating_sub(1) as f64;
                extra * self.config.per_unit_rate + self.config.base_rate
            }
            None => 0.0,
        }
    }

    /// Charge minus the cost of the relevant leg.  Zero when there is no
    /// parcel, whatever the leg.
    pub fn parcel_profit(&self, parcel: Option<&Parcel>, leg_m: Option<f64>) -> f64 {
        match parcel {
            Some(_) => self.parcel_charge(parcel) - self.leg_cost(leg_m),
            None => 0.0,
        }
    }
}
