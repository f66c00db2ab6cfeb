//! Run options of the WBGT methods.
//!
//! Every field has a documented default, so a partial JSON document (or an
//! empty one) deserializes into a usable configuration.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::constants::{GLOBE_EMISSIVITY, REF_HEIGHT};
use crate::globe::fixed_point::GLOBE_DIAMETER;
use crate::globe::newton::{DEFAULT_MAX_ITER, DEFAULT_TOLERANCE};
use crate::globe::rational::CONVECTIVE_COEFFICIENT;
use crate::solar::{SiteConditions, SolarModel};
use crate::wetbulb::{NaturalWetBulb, PsychrometricWetBulb};

/// Fixed-point (Liljegren) pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiljegrenConfig {
    /// Globe diameter [m]. Default 0.0508 (2 in).
    pub globe_diameter: f64,
    /// Urban terrain for the wind power law. Default false.
    pub urban: bool,
    /// Vertical temperature difference, upper minus lower [°C], used for
    /// the night-time stability class. Default 0.
    pub vertical_temperature_difference: f64,
}

impl Default for LiljegrenConfig {
    fn default() -> Self {
        Self {
            globe_diameter: GLOBE_DIAMETER,
            urban: false,
            vertical_temperature_difference: 0.0,
        }
    }
}

/// Newton (Bernard) pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BernardConfig {
    /// Globe emissivity [-]. Default 0.98.
    pub emissivity: f64,
    /// Relative step tolerance of the root finder. Default 1e-8.
    pub tolerance: f64,
    /// Iteration cap of the root finder. Default 50.
    pub max_iter: usize,
}

impl Default for BernardConfig {
    fn default() -> Self {
        Self {
            emissivity: GLOBE_EMISSIVITY,
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

/// Rational (Dimiceli) pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimiceliConfig {
    /// Convective heat-transfer coefficient. Default 0.315.
    pub convective_coefficient: f64,
}

impl Default for DimiceliConfig {
    fn default() -> Self {
        Self {
            convective_coefficient: CONVECTIVE_COEFFICIENT,
        }
    }
}

/// Options shared by all methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WbgtOptions {
    /// Direct-beam fraction override, broadcast from length 1.
    ///
    /// When both this and [`Self::cosine_zenith`] are set, solar geometry is
    /// skipped and the measured irradiance is used as is.
    pub direct_beam_fraction: Option<Vec<f64>>,
    /// Cosine of zenith override, broadcast from length 1.
    pub cosine_zenith: Option<Vec<f64>>,
    /// Height of the wind measurement [m]. Default 2.
    pub wind_measurement_height: f64,
    /// Requested floor on the 2 m wind speed [m/s]. Each method raises it to
    /// its own hard floor.
    pub minimum_wind_speed: Option<f64>,
    /// Psychrometric wet-bulb formulation (rational pipeline).
    pub wetbulb_algorithm: PsychrometricWetBulb,
    /// Natural wet-bulb formulation (rational pipeline).
    pub natural_wetbulb_algorithm: NaturalWetBulb,
    /// Local standard time minus GMT [h], negative in the Americas.
    pub gmt_offset_hours: Option<f64>,
    /// Averaging window of the observations [min]. Default 1.
    pub averaging_minutes: Option<f64>,
    pub solar_model: SolarModel,
    pub site: SiteConditions,
    /// Roughness length of the log wind profile [m]. Default 0.1.
    pub roughness_length: f64,
    /// Zero-plane displacement of the log wind profile [m]. Default 0.
    pub zero_plane_displacement: f64,
    pub liljegren: LiljegrenConfig,
    pub bernard: BernardConfig,
    pub dimiceli: DimiceliConfig,
}

impl WbgtOptions {
    pub fn new() -> Self {
        Self {
            direct_beam_fraction: None,
            cosine_zenith: None,
            wind_measurement_height: REF_HEIGHT,
            minimum_wind_speed: None,
            wetbulb_algorithm: PsychrometricWetBulb::default(),
            natural_wetbulb_algorithm: NaturalWetBulb::default(),
            gmt_offset_hours: None,
            averaging_minutes: None,
            solar_model: SolarModel::default(),
            site: SiteConditions::default(),
            roughness_length: 0.1,
            zero_plane_displacement: 0.0,
            liljegren: LiljegrenConfig::default(),
            bernard: BernardConfig::default(),
            dimiceli: DimiceliConfig::default(),
        }
    }

    /// Checks the wind profile and time settings.
    ///
    /// The log-law heights must sit above `zero_plane_displacement +
    /// roughness_length`, and the time shifts must be finite.
    pub fn validate(&self) -> Result<()> {
        let z0 = self.roughness_length;
        let d = self.zero_plane_displacement;
        let h = self.wind_measurement_height;
        ensure!(z0.is_finite() && z0 > 0.0, "Roughness length must be positive, got {z0}");
        ensure!(
            d.is_finite() && d >= 0.0,
            "Zero-plane displacement must be non-negative, got {d}"
        );
        ensure!(
            h.is_finite() && h > d + z0,
            "Wind measurement height {h} m must exceed displacement plus roughness ({} m)",
            d + z0
        );
        ensure!(
            REF_HEIGHT > d + z0,
            "Displacement plus roughness ({} m) must stay below the reference height ({} m)",
            d + z0,
            REF_HEIGHT
        );
        if let Some(gmt) = self.gmt_offset_hours {
            ensure!(gmt.is_finite(), "GMT offset must be finite, got {gmt}");
        }
        if let Some(avg) = self.averaging_minutes {
            ensure!(
                avg.is_finite() && avg >= 0.0,
                "Averaging window must be finite and non-negative, got {avg}"
            );
        }
        if let Some(min) = self.minimum_wind_speed {
            ensure!(min.is_finite(), "Minimum wind speed must be finite, got {min}");
        }
        Ok(())
    }

    /// Parses and validates options from a JSON string. Missing fields take
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).context("Failed to parse WBGT options")?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open options file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let options: Self = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse options from: {}", path.display()))?;
        options
            .validate()
            .with_context(|| format!("Invalid options in: {}", path.display()))?;
        Ok(options)
    }

    /// Writes options to a pretty-printed JSON file.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write options to: {}", path.display()))?;
        Ok(())
    }
}

impl Default for WbgtOptions {
    fn default() -> Self {
        Self::new()
    }
}
