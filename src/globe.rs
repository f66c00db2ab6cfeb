//! Black-globe energy balance.
//!
//! A globe exposed to sun and wind settles where convective loss balances
//! net radiative gain:
//!
//! `h(Tg, Ta, u) · (Tg - Ta) = ε · (S_eff - σ·Tg⁴)`
//!
//! Three strategies solve it, all behind [`GlobeSolver`]:
//!
//! - [`rational::RationalGlobe`]: closed form, convection depends on wind only.
//! - [`newton::NewtonGlobe`]: damped Newton iteration, mixed natural and
//!   forced convection.
//! - [`fixed_point::FixedPointGlobe`]: relaxed fixed-point iteration with
//!   convection from a Nusselt correlation for a sphere.
//!
//! Solvers never fail loudly. Non-convergence yields
//! [`crate::constants::INVALID_TEMPERATURE`], which [`finalize`] turns into NaN.

pub mod fixed_point;
pub mod newton;
pub mod rational;

use rayon::prelude::*;

use crate::constants::{CZA_MIN, is_invalid};
use crate::psychro::relative_humidity;

/// Per-sample inputs of the globe and wick balances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeInput {
    /// Air temperature [°C].
    pub temp_air: f64,
    /// Dew-point temperature [°C].
    pub temp_dew: f64,
    /// Barometric pressure [hPa].
    pub pressure: f64,
    /// Wind speed at 2 m, already floored [m/s].
    pub speed: f64,
    /// Global irradiance [W/m²].
    pub solar: f64,
    /// Direct-beam fraction [-].
    pub direct_beam_fraction: f64,
    /// Cosine of the solar zenith angle [-].
    pub cos_zenith: f64,
}

impl GlobeInput {
    /// Relative humidity as a fraction.
    pub fn relative_humidity(&self) -> f64 {
        relative_humidity(self.temp_air, self.temp_dew)
    }

    /// Cosine of zenith safe to divide by in direct-beam terms.
    pub fn beam_cos_zenith(&self) -> f64 {
        self.cos_zenith.max(CZA_MIN)
    }

    /// True when any observation of the sample is NaN.
    pub fn has_missing(&self) -> bool {
        [
            self.temp_air,
            self.temp_dew,
            self.pressure,
            self.speed,
            self.solar,
            self.direct_beam_fraction,
            self.cos_zenith,
        ]
        .iter()
        .any(|v| v.is_nan())
    }

    /// True when the direct-beam terms contribute.
    pub fn has_direct_beam(&self) -> bool {
        self.direct_beam_fraction > 0.0 && self.solar != 0.0
    }
}

/// Common interface of the globe-temperature strategies.
pub trait GlobeSolver: Sync {
    /// Globe temperature [°C], or [`crate::constants::INVALID_TEMPERATURE`] on failure.
    /// Missing (NaN) inputs give NaN.
    fn solve(&self, input: &GlobeInput) -> f64;
}

/// Maps a solver sentinel to NaN.
pub fn finalize(value: f64) -> f64 {
    if is_invalid(value) { f64::NAN } else { value }
}

/// Globe temperatures for a batch, with failures already mapped to NaN.
#[derive(Debug, Clone, Default)]
pub struct GlobeBatch {
    /// Globe temperature [°C], NaN where the solver failed.
    pub values: Vec<f64>,
    /// Number of samples where the solver returned the sentinel.
    pub failures: usize,
}

/// Solves every sample independently, in parallel.
pub fn solve_batch(solver: &dyn GlobeSolver, inputs: &[GlobeInput]) -> GlobeBatch {
    let raw: Vec<f64> = inputs.par_iter().map(|input| solver.solve(input)).collect();
    let failures = raw.iter().filter(|v| is_invalid(**v)).count();
    GlobeBatch {
        values: raw.into_iter().map(finalize).collect(),
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INVALID_TEMPERATURE;

    struct Failing;
    impl GlobeSolver for Failing {
        fn solve(&self, input: &GlobeInput) -> f64 {
            if input.temp_air > 30.0 {
                INVALID_TEMPERATURE
            } else {
                input.temp_air + 10.0
            }
        }
    }

    fn input(temp_air: f64) -> GlobeInput {
        GlobeInput {
            temp_air,
            temp_dew: 10.0,
            pressure: 1013.25,
            speed: 1.0,
            solar: 500.0,
            direct_beam_fraction: 0.5,
            cos_zenith: 0.8,
        }
    }

    #[test]
    fn test_finalize() {
        assert!(finalize(INVALID_TEMPERATURE).is_nan());
        assert_eq!(finalize(12.5), 12.5);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let inputs = [input(20.0), input(35.0), input(25.0)];
        let batch = solve_batch(&Failing, &inputs);
        assert_eq!(batch.failures, 1);
        assert_eq!(batch.values[0], 30.0);
        assert!(batch.values[1].is_nan());
        assert_eq!(batch.values[2], 35.0);
    }

    #[test]
    fn test_missing_inputs_are_not_failures() {
        use crate::globe::fixed_point::{FixedPointGlobe, wick_temperature};
        use crate::globe::newton::NewtonGlobe;
        use crate::globe::rational::RationalGlobe;

        let mut missing_wind = input(25.0);
        missing_wind.speed = f64::NAN;
        let mut missing_air = input(25.0);
        missing_air.temp_air = f64::NAN;
        assert!(missing_wind.has_missing() && missing_air.has_missing());
        assert!(!input(25.0).has_missing());

        let inputs = [missing_wind, input(25.0), missing_air];
        let solvers: [&dyn GlobeSolver; 3] = [
            &RationalGlobe::default(),
            &NewtonGlobe::default(),
            &FixedPointGlobe::default(),
        ];
        for solver in solvers {
            let batch = solve_batch(solver, &inputs);
            assert_eq!(batch.failures, 0);
            assert!(batch.values[0].is_nan());
            assert!(batch.values[1].is_finite());
            assert!(batch.values[2].is_nan());
        }
        assert!(wick_temperature(&missing_wind, true).is_nan());
        assert!(wick_temperature(&missing_air, false).is_nan());
    }

    #[test]
    fn test_beam_guard() {
        let mut i = input(20.0);
        i.cos_zenith = 0.0;
        assert!(i.beam_cos_zenith() > 0.0);
        i.direct_beam_fraction = 0.0;
        assert!(!i.has_direct_beam());
    }
}
