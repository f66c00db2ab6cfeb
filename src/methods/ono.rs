//! Direct WBGT regression on surface observations (Ono & Tonouchi, 2014).
//!
//! No globe or wet-bulb temperature is produced; those outputs are NaN.

use anyhow::Result;

use crate::batch::ObservationBatch;
use crate::methods::WbgtResult;
use crate::options::WbgtOptions;
use crate::psychro::relative_humidity;

/// WBGT [°C] from air temperature [°C], RH [%], global irradiance
/// [kW/m²] and wind speed [m/s].
pub fn ono_wbgt(temp_air: f64, rh_percent: f64, solar_kw: f64, speed: f64) -> f64 {
    0.735 * temp_air + 0.0374 * rh_percent + 0.00292 * temp_air * rh_percent + 7.619 * solar_kw
        - 4.557 * solar_kw * solar_kw
        - 0.0572 * speed
        - 4.064
}

pub fn run(batch: &ObservationBatch, _options: &WbgtOptions) -> Result<WbgtResult> {
    let n = batch.len();
    let wbgt = (0..n)
        .map(|i| {
            let rh = 100.0 * relative_humidity(batch.temp_air[i], batch.temp_dew[i]);
            ono_wbgt(batch.temp_air[i], rh, batch.solar[i] / 1000.0, batch.wind_speed[i])
        })
        .collect();

    Ok(WbgtResult {
        globe_temperature: vec![f64::NAN; n],
        psychrometric_wetbulb: vec![f64::NAN; n],
        natural_wetbulb: vec![f64::NAN; n],
        wbgt,
        solar: batch.solar.clone(),
        speed: batch.wind_speed.clone(),
        min_speed: None,
        cosine_zenith: vec![f64::NAN; n],
        direct_beam_fraction: vec![f64::NAN; n],
    })
}
