//! Globe temperature by Newton root-finding (Bernard, Lee 2022).
//!
//! Convection mixes a forced term in wind speed with a natural term in the
//! globe-air temperature difference, which makes the balance implicit in
//! `Tg`. The residual is solved with a damped Newton iteration using a
//! central finite-difference derivative.

use crate::constants::{GLOBE_EMISSIVITY, INVALID_TEMPERATURE, KELVIN, SIGMA};
use crate::globe::{GlobeInput, GlobeSolver};

/// Default relative step tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 50;

/// Halvings of the Newton step before accepting a non-decreasing residual.
const MAX_HALVINGS: usize = 12;

/// Damped Newton iteration on a scalar function.
///
/// Each step is halved while `|f|` does not decrease. Converges when the
/// step is below `tolerance` relative to `max(|x|, 1)`. Returns `None` when
/// the derivative vanishes, a value stops being finite, or `max_iter` is
/// reached.
pub fn newton<F>(f: F, x0: f64, tolerance: f64, max_iter: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let mut x = x0;
    let mut fx = f(x);
    if !fx.is_finite() {
        return None;
    }

    for _ in 0..max_iter {
        let dx = 1e-6 * x.abs().max(1.0);
        let slope = (f(x + dx) - f(x - dx)) / (2.0 * dx);
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }

        let full_step = fx / slope;
        let mut lambda = 1.0;
        let mut next = x - full_step;
        let mut f_next = f(next);
        for _ in 0..MAX_HALVINGS {
            if f_next.abs() < fx.abs() {
                break;
            }
            lambda *= 0.5;
            next = x - lambda * full_step;
            f_next = f(next);
        }
        if !f_next.is_finite() {
            return None;
        }

        if (next - x).abs() <= tolerance * next.abs().max(1.0) {
            return Some(next);
        }
        x = next;
        fx = f_next;
    }
    None
}

/// Convective heat-transfer coefficient of the globe [W/(m²·K)].
///
/// Cube-root blend of forced `10.9·u^0.566` and natural
/// `0.35 + 1.77·|Tg - Ta|^0.25` convection.
pub fn convective_coefficient(globe: f64, temp_air: f64, speed: f64) -> f64 {
    let forced = 10.9 * speed.powf(0.566);
    let natural = 0.35 + 1.77 * (globe - temp_air).abs().powf(0.25);
    (forced.powi(3) + natural.powi(3)).cbrt()
}

/// Newton globe-temperature strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonGlobe {
    /// Globe emissivity [-].
    pub emissivity: f64,
    /// Relative step tolerance.
    pub tolerance: f64,
    pub max_iter: usize,
}

impl Default for NewtonGlobe {
    fn default() -> Self {
        Self {
            emissivity: GLOBE_EMISSIVITY,
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl NewtonGlobe {
    /// Energy-balance residual [W/m²] at globe temperature `globe` [°C].
    pub fn residual(&self, globe: f64, input: &GlobeInput) -> f64 {
        let h = convective_coefficient(globe, input.temp_air, input.speed);
        let direct = if input.has_direct_beam() {
            input.direct_beam_fraction / (4.0 * input.beam_cos_zenith())
        } else {
            0.0
        };
        let diffuse = (1.0 - input.direct_beam_fraction) / 2.0;
        let air_k = input.temp_air + KELVIN;
        let globe_k = globe + KELVIN;
        let absorbed = SIGMA * air_k.powi(4) + input.solar * (direct + diffuse);
        h * (globe - input.temp_air) - self.emissivity * (absorbed - SIGMA * globe_k.powi(4))
    }
}

impl GlobeSolver for NewtonGlobe {
    fn solve(&self, input: &GlobeInput) -> f64 {
        let f = |tg: f64| self.residual(tg, input);
        if input.has_missing() {
            return f64::NAN;
        }
        newton(f, input.temp_air + 1.0, self.tolerance, self.max_iter)
            .unwrap_or(INVALID_TEMPERATURE)
    }
}
