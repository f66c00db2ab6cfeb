//! Globe and wet-wick temperatures by fixed-point relaxation (Liljegren et
//! al., 2008).
//!
//! Both balances are solved for the surface temperature with convection
//! taken from Nusselt correlations evaluated at the film temperature. Each
//! iterate is relaxed `0.9·old + 0.1·new`; the loop stops when successive
//! raw iterates differ by less than [`CONVERGENCE`].

use crate::constants::{INVALID_TEMPERATURE, KELVIN};
use crate::globe::{GlobeInput, GlobeSolver};
use crate::psychro::{
    PRANDTL, RATIO, air_density, atmospheric_emissivity, buck_esat, dew_point, diffusivity,
    heat_of_evaporation, thermal_conductivity, viscosity,
};

/// Stefan-Boltzmann constant as used by the model's fitted constants.
const STEFANB: f64 = 5.6696e-8;

pub const GLOBE_DIAMETER: f64 = 0.0508;
const GLOBE_EMISSIVITY: f64 = 0.95;
const GLOBE_ALBEDO: f64 = 0.05;

const WICK_DIAMETER: f64 = 0.007;
const WICK_LENGTH: f64 = 0.0254;
const WICK_EMISSIVITY: f64 = 0.95;
const WICK_ALBEDO: f64 = 0.4;

const SURFACE_EMISSIVITY: f64 = 0.999;
const SURFACE_ALBEDO: f64 = 0.45;

/// Convergence threshold between raw iterates [K].
pub const CONVERGENCE: f64 = 0.02;
pub const MAX_ITER: usize = 50;

/// Convective heat-transfer coefficient of a sphere [W/(m²·K)].
///
/// - `diameter` [m], `tk` film temperature [K], `pressure` [hPa], `speed` [m/s]
pub fn h_sphere(diameter: f64, tk: f64, pressure: f64, speed: f64) -> f64 {
    let reynolds = speed * air_density(pressure, tk) * diameter / viscosity(tk);
    let nusselt = 2.0 + 0.6 * reynolds.sqrt() * PRANDTL.powf(0.3333);
    nusselt * thermal_conductivity(tk) / diameter
}

/// Convective heat-transfer coefficient of a cylinder in cross flow
/// [W/(m²·K)].
pub fn h_cylinder(diameter: f64, tk: f64, pressure: f64, speed: f64) -> f64 {
    let reynolds = speed * air_density(pressure, tk) * diameter / viscosity(tk);
    let nusselt = 0.281 * reynolds.powf(0.6) * PRANDTL.powf(0.44);
    nusselt * thermal_conductivity(tk) / diameter
}

/// Longwave irradiance from sky and ground, per unit `σ` [K⁴].
fn longwave(air_k: f64, rh: f64) -> f64 {
    // Ground assumed at air temperature
    0.5 * (atmospheric_emissivity(air_k, rh) * air_k.powi(4) + SURFACE_EMISSIVITY * air_k.powi(4))
}

/// Relaxed fixed-point loop shared by the globe and wick balances.
///
/// `step` maps the current temperature [K] to the next raw iterate.
fn relax<F>(start: f64, step: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut prev = start;
    for _ in 0..MAX_ITER {
        let next = step(prev);
        let converged = (next - prev).abs() < CONVERGENCE;
        prev = 0.9 * prev + 0.1 * next;
        if converged {
            return next - KELVIN;
        }
    }
    INVALID_TEMPERATURE
}

/// Fixed-point globe-temperature strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointGlobe {
    /// Globe diameter [m].
    pub diameter: f64,
}

impl Default for FixedPointGlobe {
    fn default() -> Self {
        Self {
            diameter: GLOBE_DIAMETER,
        }
    }
}

impl GlobeSolver for FixedPointGlobe {
    fn solve(&self, input: &GlobeInput) -> f64 {
        if input.has_missing() {
            return f64::NAN;
        }
        let air_k = input.temp_air + KELVIN;
        let rh = input.relative_humidity();
        let beam = if input.has_direct_beam() {
            input.direct_beam_fraction * (1.0 / (2.0 * input.beam_cos_zenith()) - 1.0)
        } else {
            0.0
        };
        let shortwave = input.solar / (2.0 * STEFANB * GLOBE_EMISSIVITY)
            * (1.0 - GLOBE_ALBEDO)
            * (beam + 1.0 + SURFACE_ALBEDO);
        let lw = longwave(air_k, rh);

        relax(air_k, |prev| {
            let film = 0.5 * (prev + air_k);
            let h = h_sphere(self.diameter, film, input.pressure, input.speed);
            (lw - h / (STEFANB * GLOBE_EMISSIVITY) * (prev - air_k) + shortwave).powf(0.25)
        })
    }
}

/// Wet-wick temperature [°C], or the sentinel on non-convergence. NaN when
/// an input is missing.
///
/// Without radiation this is the psychrometric wet-bulb; with radiation it
/// is the natural wet-bulb of an unshielded wick.
pub fn wick_temperature(input: &GlobeInput, radiative: bool) -> f64 {
    if input.has_missing() {
        return f64::NAN;
    }
    let air_k = input.temp_air + KELVIN;
    let rh = input.relative_humidity();
    let e_air = rh * buck_esat(air_k);
    let lw = longwave(air_k, rh);
    let aspect = 0.25 * WICK_DIAMETER / WICK_LENGTH;

    // Fraction of beam intercepted by a vertical cylinder, tan(zenith) / π
    let beam = if input.has_direct_beam() {
        let cz = input.beam_cos_zenith();
        input.direct_beam_fraction * ((1.0 - cz * cz).sqrt() / cz / std::f64::consts::PI + aspect)
    } else {
        0.0
    };
    let shortwave = (1.0 - WICK_ALBEDO)
        * input.solar
        * ((1.0 - input.direct_beam_fraction) * (1.0 + aspect) + beam + SURFACE_ALBEDO);

    relax(dew_point(e_air), |prev| {
        let film = 0.5 * (prev + air_k);
        let heat = if radiative {
            let net = STEFANB * WICK_EMISSIVITY * (lw - prev.powi(4)) + shortwave;
            net / h_cylinder(WICK_DIAMETER, film, input.pressure, input.speed)
        } else {
            0.0
        };
        let e_wick = buck_esat(prev);
        let schmidt = viscosity(film)
            / (air_density(input.pressure, film) * diffusivity(film, input.pressure));
        air_k
            - heat_of_evaporation(film) / RATIO * (e_wick - e_air) / (input.pressure - e_wick)
                * (PRANDTL / schmidt).powf(0.56)
            + heat
    })
}
