//! Solar geometry: sun-earth distance and zenith angle per sample.

pub mod almanac;
pub mod coefficients;
pub mod partition;
pub mod spa;

use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::batch::{broadcast, broadcast_or};
use crate::constants::{DEFAULT_ELEVATION, DEFAULT_PRESSURE, DEFAULT_TEMPERATURE};
use crate::time::unix_seconds;

pub use partition::{RadiationPartition, partition};

/// Sun position for a single sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SunPosition {
    /// Earth-sun distance [AU].
    pub distance: f64,
    /// Topocentric zenith angle, refraction included [deg].
    pub zenith: f64,
}

impl SunPosition {
    pub fn cos_zenith(&self) -> f64 {
        self.zenith.to_radians().cos().clamp(-1.0, 1.0)
    }
}

/// Location and local atmosphere of a single sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Latitude in degrees (positive north).
    pub latitude: f64,
    /// Longitude in degrees (positive east).
    pub longitude: f64,
    /// Elevation [m].
    pub elevation: f64,
    /// Mean local pressure [hPa], used for refraction.
    pub pressure: f64,
    /// Mean local temperature [°C], used for refraction.
    pub temperature: f64,
}

impl Default for Observer {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            elevation: DEFAULT_ELEVATION,
            pressure: DEFAULT_PRESSURE,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Which solar-position model to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarModel {
    /// Full NREL SPA periodic-term model.
    Spa,
    /// Astronomical Almanac low-precision model, roughly 5x cheaper.
    Almanac,
}

impl Default for SolarModel {
    fn default() -> Self {
        Self::Spa
    }
}

impl FromStr for SolarModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spa" => Ok(Self::Spa),
            "almanac" => Ok(Self::Almanac),
            other => anyhow::bail!("Unsupported solar model: {other}"),
        }
    }
}

/// Site atmosphere and time-scale parameters of the solar models.
///
/// Arrays are broadcast from length 1; absent arrays use the standard
/// atmosphere at sea level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConditions {
    /// Elevation [m]. Default 0.
    pub elevation: Option<Vec<f64>>,
    /// Mean pressure [hPa]. Default 1013.25.
    pub pressure: Option<Vec<f64>>,
    /// Mean temperature [°C]. Default 15.
    pub temperature: Option<Vec<f64>>,
    /// TT - UT [s]. Default 0.
    pub delta_t: f64,
    /// Refraction at sunrise/sunset [deg]. Default 0.
    pub atmos_refract: f64,
}

impl SolarModel {
    /// Evaluates the model for one instant [Unix seconds] and observer.
    pub fn sun_position(
        &self,
        unix_seconds: f64,
        observer: &Observer,
        site: &SiteConditions,
    ) -> SunPosition {
        match self {
            Self::Spa => {
                spa::sun_position(unix_seconds, observer, site.delta_t, site.atmos_refract)
            }
            Self::Almanac => almanac::sun_position(unix_seconds, observer),
        }
    }
}

/// Sun geometry for N samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolarGeometry {
    /// Earth-sun distance [AU].
    pub distance: Vec<f64>,
    /// Zenith angle [deg].
    pub zenith: Vec<f64>,
    /// Cosine of the zenith angle, in [-1, 1].
    pub cos_zenith: Vec<f64>,
}

impl SolarGeometry {
    pub fn len(&self) -> usize {
        self.zenith.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zenith.is_empty()
    }
}

/// Computes the sun's geometry for every sample, in parallel.
///
/// `latitude` and `longitude` are broadcast to the number of instants.
pub fn solar_geometry(
    instants: &[DateTime<Utc>],
    latitude: &[f64],
    longitude: &[f64],
    site: &SiteConditions,
    model: SolarModel,
) -> Result<SolarGeometry> {
    let n = instants.len();
    if n == 0 {
        return Ok(SolarGeometry::default());
    }
    let lat = broadcast("latitude", latitude, n)?;
    let lon = broadcast("longitude", longitude, n)?;
    let elev = broadcast_or("elevation", site.elevation.as_deref(), DEFAULT_ELEVATION, n)?;
    let pres = broadcast_or(
        "site pressure",
        site.pressure.as_deref(),
        DEFAULT_PRESSURE,
        n,
    )?;
    let temp = broadcast_or(
        "site temperature",
        site.temperature.as_deref(),
        DEFAULT_TEMPERATURE,
        n,
    )?;

    let observers: Vec<Observer> = (0..n)
        .map(|i| Observer {
            latitude: lat[i],
            longitude: lon[i],
            elevation: elev[i],
            pressure: pres[i],
            temperature: temp[i],
        })
        .collect();

    let mut positions = vec![SunPosition::default(); n];
    positions
        .par_iter_mut()
        .zip(observers.par_iter())
        .zip(instants.par_iter())
        .for_each(|((pos, observer), t)| {
            *pos = model.sun_position(unix_seconds(t), observer, site);
        });

    Ok(SolarGeometry {
        distance: positions.iter().map(|p| p.distance).collect(),
        zenith: positions.iter().map(|p| p.zenith).collect(),
        cos_zenith: positions.iter().map(SunPosition::cos_zenith).collect(),
    })
}
