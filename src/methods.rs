//! Named WBGT methods.
//!
//! A method composes the solar, wind, globe and wet-bulb stages into one
//! pipeline. Names resolve through a static table to a [`Method`], whose
//! [`Method::run`] selects the pipeline.

pub mod bernard;
pub mod dimiceli;
pub mod liljegren;
pub mod ono;

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::batch::{ObservationBatch, broadcast};
use crate::constants::WBGT_WEIGHTS;
use crate::globe::GlobeInput;
use crate::options::WbgtOptions;
use crate::solar::{partition, solar_geometry};
use crate::time::adjust_instants;
use crate::wind::{floor_speed, log_law};

/// WBGT estimation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Fixed-point globe and wick balances (Liljegren et al., 2008).
    Liljegren,
    /// Newton globe balance with Bernard wet-bulb regressions.
    Bernard,
    /// Closed-form globe temperature (Dimiceli et al., 2011).
    Dimiceli,
    /// Direct WBGT regression (Ono & Tonouchi, 2014).
    Ono,
}

/// Lookup table of method names.
pub const METHODS: &[(&str, Method)] = &[
    ("liljegren", Method::Liljegren),
    ("bernard", Method::Bernard),
    ("dimiceli", Method::Dimiceli),
    ("ono", Method::Ono),
];

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Liljegren => "liljegren",
            Self::Bernard => "bernard",
            Self::Dimiceli => "dimiceli",
            Self::Ono => "ono",
        }
    }

    /// Runs the method's pipeline over a batch. Invalid options are rejected
    /// before any sample is processed.
    pub fn run(&self, batch: &ObservationBatch, options: &WbgtOptions) -> Result<WbgtResult> {
        options.validate()?;
        debug!(
            "running {} on {} samples ({:?} solar model)",
            self.name(),
            batch.len(),
            options.solar_model
        );
        match self {
            Self::Liljegren => liljegren::run(batch, options),
            Self::Bernard => bernard::run(batch, options),
            Self::Dimiceli => dimiceli::run(batch, options),
            Self::Ono => ono::run(batch, options),
        }
    }
}

impl FromStr for Method {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        match METHODS.iter().find(|(name, _)| *name == key) {
            Some((_, method)) => Ok(*method),
            None => bail!("Unsupported WBGT method: {s}"),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Estimates WBGT with the method called `method`.
///
/// Fails on unknown method names and on malformed options. Samples where a
/// solver did not converge come out as NaN.
pub fn estimate_wbgt(
    method: &str,
    batch: &ObservationBatch,
    options: &WbgtOptions,
) -> Result<WbgtResult> {
    let method: Method = method.parse()?;
    method.run(batch, options)
}

/// Output of a method run. All arrays have one value per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WbgtResult {
    /// Globe temperature [°C].
    pub globe_temperature: Vec<f64>,
    /// Psychrometric wet-bulb temperature [°C].
    pub psychrometric_wetbulb: Vec<f64>,
    /// Natural wet-bulb temperature [°C].
    pub natural_wetbulb: Vec<f64>,
    /// Wet bulb globe temperature [°C].
    pub wbgt: Vec<f64>,
    /// Irradiance used by the pipeline [W/m²].
    pub solar: Vec<f64>,
    /// Wind speed used by the pipeline [m/s].
    pub speed: Vec<f64>,
    /// Floor applied to the wind speed [m/s], if any.
    pub min_speed: Option<f64>,
    /// Cosine of zenith used by the pipeline.
    pub cosine_zenith: Vec<f64>,
    /// Direct-beam fraction used by the pipeline.
    pub direct_beam_fraction: Vec<f64>,
}

impl WbgtResult {
    pub fn len(&self) -> usize {
        self.wbgt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wbgt.is_empty()
    }
}

/// `0.7·Tnwb + 0.2·Tg + 0.1·Ta`.
pub fn weighted_wbgt(natural_wetbulb: f64, globe: f64, temp_air: f64) -> f64 {
    let [w_nwb, w_globe, w_air] = WBGT_WEIGHTS;
    w_nwb * natural_wetbulb + w_globe * globe + w_air * temp_air
}

/// Irradiance and sun geometry fed to the energy balances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolarInputs {
    /// Irradiance [W/m²], clear-sky adjusted unless fully overridden.
    pub solar: Vec<f64>,
    pub cos_zenith: Vec<f64>,
    pub direct_beam_fraction: Vec<f64>,
}

/// Resolves the solar inputs of a batch.
///
/// With both overrides present the measured irradiance is used untouched.
/// Otherwise the sun is located at the shifted instants and the irradiance is
/// partitioned with the computed geometry. Each override then replaces its
/// computed counterpart in the energy-balance inputs only.
pub fn prepare_solar(batch: &ObservationBatch, options: &WbgtOptions) -> Result<SolarInputs> {
    let n = batch.len();
    let f_db = options
        .direct_beam_fraction
        .as_deref()
        .map(|v| broadcast("direct_beam_fraction", v, n))
        .transpose()?;
    let cos_zenith = options
        .cosine_zenith
        .as_deref()
        .map(|v| broadcast("cosine_zenith", v, n))
        .transpose()?;

    if let (Some(f_db), Some(cos_zenith)) = (&f_db, &cos_zenith) {
        debug!("direct beam fraction and cos(zenith) given, skipping solar geometry");
        return Ok(SolarInputs {
            solar: batch.solar.clone(),
            cos_zenith: cos_zenith.clone(),
            direct_beam_fraction: f_db.clone(),
        });
    }

    let instants = adjust_instants(
        &batch.timestamps,
        options.gmt_offset_hours,
        options.averaging_minutes,
    );
    let geometry = solar_geometry(
        &instants,
        &batch.latitude,
        &batch.longitude,
        &options.site,
        options.solar_model,
    )?;

    let mut inputs = SolarInputs {
        solar: Vec::with_capacity(n),
        cos_zenith: Vec::with_capacity(n),
        direct_beam_fraction: Vec::with_capacity(n),
    };
    for i in 0..n {
        let cz = geometry.cos_zenith[i];
        let split = partition(batch.solar[i], geometry.distance[i], cz);
        inputs.solar.push(split.solar);
        inputs.cos_zenith.push(cz);
        inputs.direct_beam_fraction.push(split.direct_beam_fraction);
    }
    if let Some(cos_zenith) = cos_zenith {
        inputs.cos_zenith = cos_zenith;
    }
    if let Some(f_db) = f_db {
        inputs.direct_beam_fraction = f_db;
    }
    Ok(inputs)
}

/// Log-law wind speed at 2 m, floored at `min_speed` [m/s]. Missing speeds
/// stay NaN.
pub fn log_law_speed(speed: &[f64], min_speed: f64, options: &WbgtOptions) -> Vec<f64> {
    speed
        .iter()
        .map(|u| {
            let at_2m = log_law(
                *u,
                options.wind_measurement_height,
                options.roughness_length,
                options.zero_plane_displacement,
            );
            floor_speed(at_2m, min_speed)
        })
        .collect()
}

/// Assembles per-sample energy-balance inputs.
pub fn globe_inputs(
    batch: &ObservationBatch,
    speed: &[f64],
    solar: &SolarInputs,
) -> Vec<GlobeInput> {
    (0..batch.len())
        .map(|i| GlobeInput {
            temp_air: batch.temp_air[i],
            temp_dew: batch.temp_dew[i],
            pressure: batch.pressure[i],
            speed: speed[i],
            solar: solar.solar[i],
            direct_beam_fraction: solar.direct_beam_fraction[i],
            cos_zenith: solar.cos_zenith[i],
        })
        .collect()
}

/// Logs samples where a solver gave up.
fn report_failures(method: Method, quantity: &str, failures: usize, total: usize) {
    if failures > 0 {
        warn!("{method}: {quantity} did not converge for {failures} of {total} samples");
    }
}
