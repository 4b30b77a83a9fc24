//! Vessel consumption profiles and named presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::constants::{
    DEFAULT_CO2_TONS_PER_FUEL_TON, DEFAULT_FUEL_PRICE_USD_PER_TON, DEFAULT_FUEL_TONS_PER_NM,
    DEFAULT_SERVICE_SPEED_KNOTS,
};

/// Consumption and cost parameters used to score a voyage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselProfile {
    /// Bunker fuel burned per nautical mile, in metric tons.
    pub fuel_tons_per_nm: f64,
    /// Bunker price in USD per metric ton.
    pub fuel_price_usd_per_ton: f64,
    /// Tons of CO₂ emitted per ton of fuel burned.
    pub co2_tons_per_fuel_ton: f64,
    /// Speed used to estimate voyage duration.
    pub service_speed_knots: f64,
}

impl Default for VesselProfile {
    fn default() -> Self {
        Self {
            fuel_tons_per_nm: DEFAULT_FUEL_TONS_PER_NM,
            fuel_price_usd_per_ton: DEFAULT_FUEL_PRICE_USD_PER_TON,
            co2_tons_per_fuel_ton: DEFAULT_CO2_TONS_PER_FUEL_TON,
            service_speed_knots: DEFAULT_SERVICE_SPEED_KNOTS,
        }
    }
}

impl VesselProfile {
    /// Derive a per-mile profile from daily consumption at a given speed.
    pub fn from_daily_consumption(
        fuel_tons_per_day: f64,
        speed_knots: f64,
        fuel_price_usd_per_ton: f64,
    ) -> Result<Self> {
        let profile = Self {
            fuel_tons_per_nm: fuel_tons_per_day / 24.0 / speed_knots,
            fuel_price_usd_per_ton,
            co2_tons_per_fuel_ton: DEFAULT_CO2_TONS_PER_FUEL_TON,
            service_speed_knots: speed_knots,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Every field must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("fuel_tons_per_nm", self.fuel_tons_per_nm),
            ("fuel_price_usd_per_ton", self.fuel_price_usd_per_ton),
            ("co2_tons_per_fuel_ton", self.co2_tons_per_fuel_ton),
            ("service_speed_knots", self.service_speed_knots),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidVesselProfile {
                    message: format!("{name} must be finite and positive, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Named container ship size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VesselClass {
    Feeder,
    Panamax,
    #[default]
    PostPanamax,
    UltraLarge,
}

impl VesselClass {
    pub const ALL: [VesselClass; 4] = [
        VesselClass::Feeder,
        VesselClass::Panamax,
        VesselClass::PostPanamax,
        VesselClass::UltraLarge,
    ];

    pub fn profile(self) -> VesselProfile {
        match self {
            VesselClass::Feeder => VesselProfile {
                fuel_tons_per_nm: 0.08,
                service_speed_knots: 13.0,
                ..VesselProfile::default()
            },
            VesselClass::Panamax => VesselProfile {
                fuel_tons_per_nm: 0.18,
                ..VesselProfile::default()
            },
            VesselClass::PostPanamax => VesselProfile::default(),
            VesselClass::UltraLarge => VesselProfile {
                fuel_tons_per_nm: 0.42,
                service_speed_knots: 15.0,
                ..VesselProfile::default()
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VesselClass::Feeder => "feeder",
            VesselClass::Panamax => "panamax",
            VesselClass::PostPanamax => "post-panamax",
            VesselClass::UltraLarge => "ultra-large",
        }
    }
}

impl fmt::Display for VesselClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VesselClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        VesselClass::ALL
            .into_iter()
            .find(|class| class.as_str() == wanted)
            .ok_or_else(|| Error::InvalidVesselProfile {
                message: format!(
                    "unknown vessel class '{}', expected one of: {}",
                    s.trim(),
                    VesselClass::ALL.map(VesselClass::as_str).join(", ")
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_post_panamax() {
        assert_eq!(VesselClass::default().profile(), VesselProfile::default());
        let profile = VesselProfile::default();
        assert_eq!(profile.fuel_tons_per_nm, 0.3);
        assert_eq!(profile.fuel_price_usd_per_ton, 600.0);
        assert_eq!(profile.co2_tons_per_fuel_ton, 3.1);
        assert_eq!(profile.service_speed_knots, 14.0);
    }

    #[test]
    fn daily_consumption_converts_to_per_mile_rate() {
        let profile = VesselProfile::from_daily_consumption(100.8, 14.0, 550.0).expect("valid");
        assert!((profile.fuel_tons_per_nm - 0.3).abs() < 1e-12);
        assert_eq!(profile.fuel_price_usd_per_ton, 550.0);
    }

    #[test]
    fn rejects_non_positive_fields() {
        let profile = VesselProfile {
            service_speed_knots: 0.0,
            ..VesselProfile::default()
        };
        let error = profile.validate().expect_err("zero speed");
        assert!(format!("{error}").contains("service_speed_knots"));
        assert!(VesselProfile::from_daily_consumption(f64::NAN, 14.0, 600.0).is_err());
    }

    #[test]
    fn all_presets_are_valid_and_ordered_by_consumption() {
        let rates: Vec<f64> = VesselClass::ALL
            .iter()
            .map(|class| {
                let profile = class.profile();
                profile.validate().expect("preset valid");
                profile.fuel_tons_per_nm
            })
            .collect();
        assert!(rates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn class_parses_from_text() {
        assert_eq!(
            "Ultra_Large".parse::<VesselClass>().expect("parses"),
            VesselClass::UltraLarge
        );
        let error = "dinghy".parse::<VesselClass>().expect_err("unknown");
        assert!(format!("{error}").contains("feeder, panamax, post-panamax, ultra-large"));
    }
}
