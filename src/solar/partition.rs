//! Clear-sky normalization of measured global irradiance.
//!
//! The measured irradiance is compared with the top-of-atmosphere bound
//! implied by the sun's geometry. The ratio is capped and turned into a
//! direct-beam fraction with the empirical model of Liljegren et al. (2008).

use crate::constants::{CZA_MIN, DIRECT_BEAM_MAX, NORMSOLAR_MAX, SOLAR_CONSTANT};

/// Irradiance split for a single sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RadiationPartition {
    /// Adjusted global irradiance [W/m²].
    pub solar: f64,
    /// Direct-beam fraction, in [0, 0.9].
    pub direct_beam_fraction: f64,
    /// Clear-sky top-of-atmosphere irradiance [W/m²].
    pub toa: f64,
}

impl RadiationPartition {
    /// Share of the irradiance arriving as diffuse light.
    pub fn diffuse_fraction(&self) -> f64 {
        1.0 - self.direct_beam_fraction
    }
}

/// Top-of-atmosphere irradiance on a horizontal surface [W/m²].
///
/// Zero when the sun is within about half a degree of the horizon.
pub fn toa_irradiance(cos_zenith: f64, distance: f64) -> f64 {
    if cos_zenith < CZA_MIN {
        return 0.0;
    }
    SOLAR_CONSTANT * cos_zenith.max(0.0) / (distance * distance)
}

/// Direct-beam fraction for a clear-sky ratio.
pub fn direct_beam_fraction(normsolar: f64) -> f64 {
    if normsolar > 0.0 {
        (3.0 - 1.34 * normsolar - 1.65 / normsolar)
            .exp()
            .clamp(0.0, DIRECT_BEAM_MAX)
    } else {
        0.0
    }
}

/// Splits a measured irradiance given the sun's geometry.
pub fn partition(solar: f64, distance: f64, cos_zenith: f64) -> RadiationPartition {
    let toa = toa_irradiance(cos_zenith, distance);
    if toa <= 0.0 {
        return RadiationPartition::default();
    }
    if !solar.is_finite() {
        return RadiationPartition {
            solar: f64::NAN,
            direct_beam_fraction: 0.0,
            toa,
        };
    }
    let normsolar = (solar / toa).min(NORMSOLAR_MAX);
    RadiationPartition {
        solar: normsolar * toa,
        direct_beam_fraction: direct_beam_fraction(normsolar),
        toa,
    }
}
