//! Moist-air thermodynamics.
//!
//! Two vapour-pressure formulations are in use: Bolton (1980) for relative
//! humidity from dew point, and Buck (1981) with the moist-air enhancement
//! factor for the wick and globe energy balances.

use crate::constants::KELVIN;

/// Specific heat of dry air at constant pressure [J/(kg·K)].
pub const CP: f64 = 1003.5;
/// Molecular weight of dry air [kg/kmol].
pub const M_AIR: f64 = 28.97;
/// Molecular weight of water vapour [kg/kmol].
pub const M_H2O: f64 = 18.015;
/// Universal gas constant [J/(kmol·K)].
pub const R_GAS: f64 = 8314.34;
/// Gas constant of dry air [J/(kg·K)].
pub const R_AIR: f64 = R_GAS / M_AIR;
/// `Cp * M_AIR / M_H2O`.
pub const RATIO: f64 = CP * M_AIR / M_H2O;
/// Prandtl number of air.
pub const PRANDTL: f64 = CP / (CP + 1.25 * R_AIR);

/// Moist-air enhancement for pressures above 800 hPa.
const BUCK_ENHANCEMENT: f64 = 1.004;

/// Saturation vapour pressure over water, Bolton (1980) [hPa]. `t` in °C.
pub fn saturation_vapor_pressure(t: f64) -> f64 {
    6.112 * (17.67 * t / (t + 243.5)).exp()
}

/// Relative humidity as a fraction, from air and dew-point temperature [°C].
pub fn relative_humidity(temp_air: f64, temp_dew: f64) -> f64 {
    saturation_vapor_pressure(temp_dew) / saturation_vapor_pressure(temp_air)
}

/// Saturation vapour pressure over water, Buck (1981) with enhancement [hPa].
/// `tk` in kelvin.
pub fn buck_esat(tk: f64) -> f64 {
    let y = (tk - KELVIN) / (tk - 32.18);
    BUCK_ENHANCEMENT * 6.1121 * (17.502 * y).exp()
}

/// Dew point [K] for a vapour pressure [hPa]; inverse of [`buck_esat`].
pub fn dew_point(e: f64) -> f64 {
    let z = (e / (6.1121 * BUCK_ENHANCEMENT)).ln();
    KELVIN + 240.97 * z / (17.502 - z)
}

/// Dry-air density [kg/m³]. `pressure` in hPa, `tk` in kelvin.
pub fn air_density(pressure: f64, tk: f64) -> f64 {
    pressure * 100.0 / (R_AIR * tk)
}

/// Dynamic viscosity of air [kg/(m·s)], Bird, Stewart & Lightfoot p.23.
pub fn viscosity(tk: f64) -> f64 {
    const SIGMA: f64 = 3.617;
    const EPS_KAPPA: f64 = 97.0;
    let tr = tk / EPS_KAPPA;
    let omega = (tr - 2.9) / 0.4 * (-0.034) + 1.048;
    2.6693e-6 * (M_AIR * tk).sqrt() / (SIGMA * SIGMA * omega)
}

/// Thermal conductivity of air [W/(m·K)].
pub fn thermal_conductivity(tk: f64) -> f64 {
    (CP + 1.25 * R_AIR) * viscosity(tk)
}

/// Diffusivity of water vapour in air [m²/s]. `pressure` in hPa.
pub fn diffusivity(tk: f64, pressure: f64) -> f64 {
    const P_CRIT_AIR: f64 = 36.4;
    const P_CRIT_H2O: f64 = 218.0;
    const T_CRIT_AIR: f64 = 132.0;
    const T_CRIT_H2O: f64 = 647.3;
    const A: f64 = 3.640e-4;
    const B: f64 = 2.334;

    let p_crit13 = (P_CRIT_AIR * P_CRIT_H2O).powf(1.0 / 3.0);
    let t_crit512 = (T_CRIT_AIR * T_CRIT_H2O).powf(5.0 / 12.0);
    let t_crit12 = (T_CRIT_AIR * T_CRIT_H2O).sqrt();
    let m_mix = (1.0 / M_AIR + 1.0 / M_H2O).sqrt();
    let p_atm = pressure / 1013.25;
    A * (tk / t_crit12).powf(B) * p_crit13 * t_crit512 * m_mix / p_atm * 1e-4
}

/// Heat of evaporation [J/kg], fitted for 283-313 K.
pub fn heat_of_evaporation(tk: f64) -> f64 {
    (313.15 - tk) / 30.0 * (-71_100.0) + 2.4073e6
}

/// Clear-sky atmospheric emissivity (Oke). `rh` as a fraction.
pub fn atmospheric_emissivity(tk: f64, rh: f64) -> f64 {
    let e = rh * buck_esat(tk);
    0.575 * e.powf(0.143)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bolton_at_freezing() {
        assert!((saturation_vapor_pressure(0.0) - 6.112).abs() < 1e-12);
        let e = saturation_vapor_pressure(25.0);
        assert!((e - 31.67).abs() < 0.05, "e(25) = {e}");
    }

    #[test]
    fn test_relative_humidity() {
        assert!((relative_humidity(20.0, 20.0) - 1.0).abs() < 1e-12);
        let rh = relative_humidity(25.0, 15.0);
        assert!((rh - 0.5383).abs() < 1e-3, "rh = {rh}");
    }

    #[test]
    fn test_dew_point_inverts_esat() {
        for t in [-10.0, 0.0, 12.5, 30.0, 45.0] {
            let tk = t + KELVIN;
            let back = dew_point(buck_esat(tk));
            assert!((back - tk).abs() < 1e-9, "{t}: {back}");
        }
    }

    #[test]
    fn test_air_properties_at_room_temperature() {
        let tk = 298.15;
        let mu = viscosity(tk);
        assert!(mu > 1.7e-5 && mu < 1.9e-5, "mu = {mu}");
        let k = thermal_conductivity(tk);
        assert!(k > 0.024 && k < 0.028, "k = {k}");
        let d = diffusivity(tk, 1013.25);
        assert!(d > 2.2e-5 && d < 2.8e-5, "D = {d}");
        let rho = air_density(1013.25, tk);
        assert!((rho - 1.184).abs() < 0.01, "rho = {rho}");
    }

    #[test]
    fn test_prandtl_number() {
        assert!((PRANDTL - 0.7368).abs() < 1e-3, "Pr = {PRANDTL}");
    }

    #[test]
    fn test_emissivity_grows_with_humidity() {
        let dry = atmospheric_emissivity(300.0, 0.2);
        let wet = atmospheric_emissivity(300.0, 0.9);
        assert!(dry < wet && wet < 1.0);
    }
}
