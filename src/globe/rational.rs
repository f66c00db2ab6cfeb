//! Closed-form globe temperature (Dimiceli et al., 2011).
//!
//! Linearizing the radiative loss around ambient gives
//!
//! `Tg = (B + C·Ta + 7.68e6) / (C + 2.56e5)`
//!
//! where `B` collects the radiant load and `C` the wind-driven convection.
//! Temperatures in `B` stay in °C, as in the published regression.

use crate::constants::SIGMA;
use crate::globe::{GlobeInput, GlobeSolver};

/// Default convective heat-transfer coefficient of the regression.
pub const CONVECTIVE_COEFFICIENT: f64 = 0.315;

/// Wind-speed exponent of the convective term.
const SPEED_EXPONENT: f64 = 0.58;

/// Scale of the convective term.
const CONVECTIVE_SCALE: f64 = 5.3865e-8;

/// Atmospheric vapour pressure [hPa] of the regression.
///
/// The humidity ratio and enhancement factor are combined with a
/// saturation pressure whose constants differ from the ratio's. Kept as
/// published; downstream regressions were fitted with it.
pub fn atmospheric_vapor_pressure(temp_air: f64, temp_dew: f64, pressure: f64) -> f64 {
    (17.67 * (temp_dew - temp_air) / (temp_dew + 243.5)).exp()
        * (1.0007 + 3.46e-6 * pressure)
        * 6.112
        * (17.502 * temp_air / (240.97 + temp_air)).exp()
}

/// Thermal emissivity of the atmosphere, `0.575·e^(1/7)`.
pub fn thermal_emissivity(temp_air: f64, temp_dew: f64, pressure: f64) -> f64 {
    0.575 * atmospheric_vapor_pressure(temp_air, temp_dew, pressure).powf(1.0 / 7.0)
}

/// Radiant term `B`.
///
/// The direct-beam part is skipped when there is no beam.
pub fn factor_b(input: &GlobeInput) -> f64 {
    let direct = if input.has_direct_beam() {
        input.direct_beam_fraction / (4.0 * SIGMA * input.beam_cos_zenith())
    } else {
        0.0
    };
    let diffuse = 1.2 / SIGMA * (1.0 - input.direct_beam_fraction);
    let emissivity = thermal_emissivity(input.temp_air, input.temp_dew, input.pressure);
    input.solar * (direct + diffuse) + emissivity * input.temp_air.powi(4)
}

/// Convective term `C`, wind speed in metres per hour.
pub fn factor_c(speed_m_per_h: f64, convective_coefficient: f64) -> f64 {
    convective_coefficient * speed_m_per_h.powf(SPEED_EXPONENT) / CONVECTIVE_SCALE
}

/// Rational globe-temperature strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RationalGlobe {
    pub convective_coefficient: f64,
}

impl Default for RationalGlobe {
    fn default() -> Self {
        Self {
            convective_coefficient: CONVECTIVE_COEFFICIENT,
        }
    }
}

impl GlobeSolver for RationalGlobe {
    fn solve(&self, input: &GlobeInput) -> f64 {
        let b = factor_b(input);
        let c = factor_c(input.speed * 3600.0, self.convective_coefficient);
        (b + c * input.temp_air + 7.68e6) / (c + 2.56e5)
    }
}
