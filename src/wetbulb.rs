//! Empirical wet-bulb models.
//!
//! Psychrometric wet-bulb depends on temperature and humidity only. Natural
//! wet-bulb adds the effect of radiant load and ventilation on an unshielded
//! wick. Each family is a closed enum selected by configuration.

use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::psychro::saturation_vapor_pressure;

/// Psychrometric wet-bulb formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsychrometricWetBulb {
    /// Quadratic regression in temperature and RH (Dimiceli et al., 2011).
    #[serde(alias = "primary")]
    Dimiceli,
    /// Arctangent fit (Stull, 2011), valid for RH 5-99 % and -20..50 °C.
    #[serde(alias = "alternate")]
    Stull,
}

impl Default for PsychrometricWetBulb {
    fn default() -> Self {
        Self::Dimiceli
    }
}

impl FromStr for PsychrometricWetBulb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dimiceli" | "primary" => Ok(Self::Dimiceli),
            "stull" | "alternate" => Ok(Self::Stull),
            other => anyhow::bail!("Unsupported psychrometric wet bulb algorithm: {other}"),
        }
    }
}

impl PsychrometricWetBulb {
    /// Wet-bulb temperature [°C] for air temperature [°C] and RH [%].
    pub fn compute(&self, temp_air: f64, rh_percent: f64) -> f64 {
        match self {
            Self::Dimiceli => dimiceli_psychrometric(temp_air, rh_percent),
            Self::Stull => stull_psychrometric(temp_air, rh_percent),
        }
    }
}

/// Quadratic psychrometric wet-bulb regression [°C].
pub fn dimiceli_psychrometric(t: f64, rh: f64) -> f64 {
    let t2 = t * t;
    -5.806 + 0.672 * t - 0.006 * t2
        + (0.061 + 0.004 * t + 99.0e-6 * t2) * rh
        + (-33.0e-6 - 5.0e-6 * t - 1.0e-7 * t2) * rh * rh
}

/// Stull (2011) wet-bulb temperature [°C].
pub fn stull_psychrometric(t: f64, rh: f64) -> f64 {
    t * (0.151977 * (rh + 8.313659).sqrt()).atan() + (t + rh).atan() - (rh - 1.676331).atan()
        + 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan()
        - 4.686035
}

/// Natural wet-bulb formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalWetBulb {
    /// Humidity and globe-air difference (Malchaire, 1976).
    #[serde(alias = "variant_a")]
    Malchaire,
    /// Linear in direct solar and wind (Hunter & Minyard, 1999).
    #[serde(alias = "variant_b")]
    HunterMinyard,
    /// NWS NDFD regression adding the wet-bulb depression (Boyer).
    #[serde(alias = "variant_c")]
    Boyer,
}

impl Default for NaturalWetBulb {
    fn default() -> Self {
        Self::HunterMinyard
    }
}

impl FromStr for NaturalWetBulb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "malchaire" | "variant_a" => Ok(Self::Malchaire),
            "hunter_minyard" | "variant_b" => Ok(Self::HunterMinyard),
            "boyer" | "variant_c" => Ok(Self::Boyer),
            other => anyhow::bail!("Unsupported natural wet bulb algorithm: {other}"),
        }
    }
}

/// Inputs shared by the natural wet-bulb regressions.
#[derive(Debug, Clone, Copy)]
pub struct NaturalWetBulbInput {
    /// Air temperature [°C].
    pub temp_air: f64,
    /// Relative humidity as a fraction.
    pub relative_humidity: f64,
    /// Psychrometric wet-bulb [°C].
    pub psychrometric: f64,
    /// Globe temperature [°C].
    pub globe: f64,
    /// Direct-beam irradiance, `solar * f_db` [W/m²].
    pub direct_solar: f64,
    /// Wind speed at 2 m [m/s].
    pub speed: f64,
}

impl NaturalWetBulb {
    /// Natural wet-bulb temperature [°C].
    pub fn compute(&self, input: &NaturalWetBulbInput) -> f64 {
        let i = input;
        match self {
            // The regression was fitted with RH as a fraction.
            Self::Malchaire => {
                (0.16 * (i.globe - i.temp_air) + 0.8) / 200.0
                    * (560.0 - 2.0 * i.relative_humidity - 5.0 * i.temp_air)
                    - 0.8
                    + i.psychrometric
            }
            Self::HunterMinyard => {
                i.psychrometric + 0.0021 * i.direct_solar - 0.43 * i.speed + 1.93
            }
            Self::Boyer => {
                i.psychrometric + 0.001651 * i.direct_solar - 0.09555 * i.speed
                    + 0.13235 * (i.temp_air - i.psychrometric)
                    + 0.20249
            }
        }
    }
}

/// Psychrometric wet-bulb of the Bernard pipeline [°C], linear in the
/// vapour pressure [kPa] at dew point.
pub fn bernard_psychrometric(temp_air: f64, temp_dew: f64) -> f64 {
    let ea = saturation_vapor_pressure(temp_dew) / 10.0;
    0.376 + 5.79 * ea + (0.388 - 0.0465 * ea) * temp_air
}

/// Wind factor of the wet-bulb depression, small globe-air difference.
pub fn bernard_factor_c(speed: f64) -> f64 {
    if speed < 0.03 {
        0.85
    } else if speed > 3.0 {
        1.0
    } else {
        0.96 + 0.069 * speed.log10()
    }
}

/// Wind offset of the radiant correction, large globe-air difference [°C].
pub fn bernard_factor_e(speed: f64) -> f64 {
    if speed < 0.1 {
        1.1
    } else if speed > 1.0 {
        -0.1
    } else {
        0.1 / speed.powf(1.1) - 0.2
    }
}

/// Natural wet-bulb of the Bernard pipeline (Bernard & Pourmoghani, 1999).
///
/// Below a 4 °C globe-air difference the wick tracks the psychrometric
/// depression; above it, a quarter of the difference is added.
pub fn bernard_natural(temp_air: f64, psychrometric: f64, globe: f64, speed: f64) -> f64 {
    if globe - temp_air < 4.0 {
        temp_air - bernard_factor_c(speed) * (temp_air - psychrometric)
    } else {
        psychrometric + 0.25 * (globe - temp_air) + bernard_factor_e(speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psychro::relative_humidity;

    #[test]
    fn test_dimiceli_reference_values() {
        let expected = [18.59627755506145, 27.445752527955726];
        for ((t, td), e) in [(25.0, 15.0), (35.0, 25.0)].into_iter().zip(expected) {
            let rh = 100.0 * relative_humidity(t, td);
            let got = dimiceli_psychrometric(t, rh);
            assert!((got - e).abs() < 1e-9, "{got} vs {e}");
        }
    }

    #[test]
    fn test_stull_published_value() {
        // Stull (2011): T = 20 °C, RH = 50 % gives 13.7 °C
        let tw = stull_psychrometric(20.0, 50.0);
        assert!((tw - 13.7).abs() < 0.05, "tw = {tw}");
    }

    #[test]
    fn test_stull_saturated_air() {
        let tw = PsychrometricWetBulb::Stull.compute(25.0, 99.0);
        assert!((tw - 25.0).abs() < 0.3, "tw = {tw}");
    }

    #[test]
    fn test_wet_bulb_below_dry_bulb() {
        for alg in [PsychrometricWetBulb::Dimiceli, PsychrometricWetBulb::Stull] {
            for rh in [20.0, 40.0, 60.0, 80.0] {
                let tw = alg.compute(30.0, rh);
                assert!(tw < 30.0, "{alg:?} at {rh} %: {tw}");
            }
        }
    }

    #[test]
    fn test_names_and_aliases() -> Result<()> {
        assert_eq!("primary".parse::<PsychrometricWetBulb>()?, PsychrometricWetBulb::Dimiceli);
        assert_eq!("Stull".parse::<PsychrometricWetBulb>()?, PsychrometricWetBulb::Stull);
        assert_eq!("variant_a".parse::<NaturalWetBulb>()?, NaturalWetBulb::Malchaire);
        assert_eq!("HUNTER_MINYARD".parse::<NaturalWetBulb>()?, NaturalWetBulb::HunterMinyard);
        assert_eq!("variant_c".parse::<NaturalWetBulb>()?, NaturalWetBulb::Boyer);
        assert!("bogus".parse::<NaturalWetBulb>().is_err());
        assert!("tertiary".parse::<PsychrometricWetBulb>().is_err());
        Ok(())
    }

    #[test]
    fn test_serde_aliases() -> Result<()> {
        let a: NaturalWetBulb = serde_json::from_str("\"variant_b\"")?;
        assert_eq!(a, NaturalWetBulb::HunterMinyard);
        let b: PsychrometricWetBulb = serde_json::from_str("\"alternate\"")?;
        assert_eq!(b, PsychrometricWetBulb::Stull);
        assert_eq!(serde_json::to_string(&NaturalWetBulb::HunterMinyard)?, "\"hunter_minyard\"");
        Ok(())
    }

    #[test]
    fn test_natural_variants() {
        let input = NaturalWetBulbInput {
            temp_air: 30.0,
            relative_humidity: 0.5,
            psychrometric: 22.0,
            globe: 45.0,
            direct_solar: 400.0,
            speed: 2.0,
        };
        let hm = NaturalWetBulb::HunterMinyard.compute(&input);
        assert!((hm - (22.0 + 0.84 - 0.86 + 1.93)).abs() < 1e-12);
        let boyer = NaturalWetBulb::Boyer.compute(&input);
        assert!((boyer - (22.0 + 0.6604 - 0.1911 + 0.13235 * 8.0 + 0.20249)).abs() < 1e-12);
        let mal = NaturalWetBulb::Malchaire.compute(&input);
        assert!(mal > input.psychrometric, "mal = {mal}");
    }

    #[test]
    fn test_bernard_psychrometric_reference() {
        let a = bernard_psychrometric(25.0, 15.0);
        let b = bernard_psychrometric(35.0, 25.0);
        assert!((a - 17.96148884743604).abs() < 1e-12, "a = {a}");
        assert!((b - 27.140425028129574).abs() < 1e-12, "b = {b}");
    }

    #[test]
    fn test_bernard_wind_factors() {
        let speeds = [0.029, 0.03, 1.5, 3.0, 3.1];
        let expected = [0.85, 0.8549213665756566, 0.972150296874842, 0.9929213665756567, 1.0];
        for (u, e) in speeds.into_iter().zip(expected) {
            let c = bernard_factor_c(u);
            assert!((c - e).abs() < 1e-12, "c({u}) = {c}");
        }
        let speeds = [0.09, 0.1, 0.5, 0.99, 1.0, 1.1];
        let expected = [
            1.1,
            1.0589254117941675,
            0.014354692507258626,
            -0.0988883294140563,
            -0.1,
            -0.1,
        ];
        for (u, e) in speeds.into_iter().zip(expected) {
            let v = bernard_factor_e(u);
            assert!((v - e).abs() < 1e-12, "e({u}) = {v}");
        }
    }

    #[test]
    fn test_bernard_natural_branches() {
        // Shaded: plain psychrometric depression
        let shade = bernard_natural(30.0, 22.0, 31.0, 5.0);
        assert!((shade - 22.0).abs() < 1e-12);
        // Sunny: quarter of the globe excess plus wind offset
        let sun = bernard_natural(30.0, 22.0, 46.0, 5.0);
        assert!((sun - (22.0 + 4.0 - 0.1)).abs() < 1e-12);
    }
}
