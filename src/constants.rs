//! Physical and empirical constants shared by the estimation pipelines.
//!
//! Everything here is immutable. Per-call tunables (emissivity overrides,
//! wind floors, roughness length) live in [`crate::options::WbgtOptions`].

/// Stefan-Boltzmann constant [W/(m²·K⁴)].
pub const SIGMA: f64 = 5.670374419e-8;

/// Default black-globe emissivity [-].
pub const GLOBE_EMISSIVITY: f64 = 0.98;

/// Solar constant used for the clear-sky bound [W/m²].
pub const SOLAR_CONSTANT: f64 = 1367.0;

/// Cosine of zenith below which the sun is treated as down (about 89.5°).
pub const CZA_MIN: f64 = 0.00873;

/// Upper cap on the measured-to-clear-sky irradiance ratio [-].
pub const NORMSOLAR_MAX: f64 = 0.85;

/// Upper cap on the direct-beam fraction [-].
pub const DIRECT_BEAM_MAX: f64 = 0.9;

/// Reference height that all wind speeds are adjusted to [m].
pub const REF_HEIGHT: f64 = 2.0;

/// 0 °C in kelvin.
pub const KELVIN: f64 = 273.15;

/// One knot [m/s].
pub const KNOT: f64 = 1852.0 / 3600.0;

/// Default minimum wind speed for the log-law pipelines: 2 knots [m/s].
pub const MIN_SPEED: f64 = 2.0 * KNOT;

/// Hard floor of the rational globe model: 1690 m/h [m/s].
pub const DIMICELI_MIN_SPEED: f64 = 1690.0 / 3600.0;

/// Hard floor of the fixed-point (wick/globe) model [m/s].
pub const LILJEGREN_MIN_SPEED: f64 = 0.13;

/// Marker returned by the globe and wick solvers on non-convergence [°C].
pub const INVALID_TEMPERATURE: f64 = -9999.0;

/// Any value at or below this is a solver failure, never a temperature [°C].
pub const INVALID_THRESHOLD: f64 = -9000.0;

/// Weights of the WBGT index: natural wet-bulb, globe, air.
pub const WBGT_WEIGHTS: [f64; 3] = [0.7, 0.2, 0.1];

/// Standard site defaults used by the solar-position models.
pub const DEFAULT_ELEVATION: f64 = 0.0;
pub const DEFAULT_PRESSURE: f64 = 1013.25;
pub const DEFAULT_TEMPERATURE: f64 = 15.0;

/// Returns true for values produced by a failed solver.
#[inline]
pub fn is_invalid(value: f64) -> bool {
    value <= INVALID_THRESHOLD
}
