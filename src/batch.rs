//! Observation batches: equal-length input arrays in canonical units.

use anyhow::{Result, ensure};
use chrono::{DateTime, Utc};

/// Expands a length-1 array to `n`, or checks that it already has length `n`.
pub fn broadcast(name: &str, values: &[f64], n: usize) -> Result<Vec<f64>> {
    match values.len() {
        1 => Ok(vec![values[0]; n]),
        len if len == n => Ok(values.to_vec()),
        len => anyhow::bail!("{name}: expected 1 or {n} values, got {len}"),
    }
}

/// Like [`broadcast`], falling back to a constant when the array is absent.
pub fn broadcast_or(
    name: &str,
    values: Option<&[f64]>,
    default: f64,
    n: usize,
) -> Result<Vec<f64>> {
    match values {
        Some(v) => broadcast(name, v, n),
        None => Ok(vec![default; n]),
    }
}

/// Meteorological observations for N samples.
///
/// Units: irradiance W/m², pressure hPa, temperatures °C, wind m/s,
/// coordinates in decimal degrees (longitude positive east).
#[derive(Debug, Clone)]
pub struct ObservationBatch {
    pub timestamps: Vec<DateTime<Utc>>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub solar: Vec<f64>,
    pub pressure: Vec<f64>,
    pub temp_air: Vec<f64>,
    pub temp_dew: Vec<f64>,
    pub wind_speed: Vec<f64>,
}

impl ObservationBatch {
    /// Builds a batch, broadcasting length-1 arrays to the longest length.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        latitude: &[f64],
        longitude: &[f64],
        solar: &[f64],
        pressure: &[f64],
        temp_air: &[f64],
        temp_dew: &[f64],
        wind_speed: &[f64],
    ) -> Result<Self> {
        let n = [
            timestamps.len(),
            latitude.len(),
            longitude.len(),
            solar.len(),
            pressure.len(),
            temp_air.len(),
            temp_dew.len(),
            wind_speed.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        ensure!(n > 0, "Observation batch is empty");

        let timestamps = match timestamps.len() {
            1 => vec![timestamps[0]; n],
            len => {
                ensure!(len == n, "timestamps: expected 1 or {n} values, got {len}");
                timestamps
            }
        };

        Ok(Self {
            timestamps,
            latitude: broadcast("latitude", latitude, n)?,
            longitude: broadcast("longitude", longitude, n)?,
            solar: broadcast("solar", solar, n)?,
            pressure: broadcast("pressure", pressure, n)?,
            temp_air: broadcast("temp_air", temp_air, n)?,
            temp_dew: broadcast("temp_dew", temp_dew, n)?,
            wind_speed: broadcast("wind_speed", wind_speed, n)?,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
