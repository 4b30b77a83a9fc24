//! Default consumption figures for a post-panamax container ship.

/// Bunker fuel burned per nautical mile (metric tons).
pub const DEFAULT_FUEL_TONS_PER_NM: f64 = 0.3;

/// IFO 380 bunker price (USD per metric ton).
pub const DEFAULT_FUEL_PRICE_USD_PER_TON: f64 = 600.0;

/// CO₂ emitted per ton of heavy fuel oil burned.
pub const DEFAULT_CO2_TONS_PER_FUEL_TON: f64 = 3.1;

/// Typical slow-steaming service speed.
pub const DEFAULT_SERVICE_SPEED_KNOTS: f64 = 14.0;
