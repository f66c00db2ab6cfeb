//! Newton globe balance with the Bernard wet-bulb regressions.

use anyhow::Result;

use crate::batch::ObservationBatch;
use crate::constants::MIN_SPEED;
use crate::globe::newton::NewtonGlobe;
use crate::globe::solve_batch;
use crate::methods::{
    Method, SolarInputs, WbgtResult, globe_inputs, log_law_speed, prepare_solar, report_failures,
    weighted_wbgt,
};
use crate::options::WbgtOptions;
use crate::wetbulb::{bernard_natural, bernard_psychrometric};

pub fn run(batch: &ObservationBatch, options: &WbgtOptions) -> Result<WbgtResult> {
    let n = batch.len();
    let solar = prepare_solar(batch, options)?;

    let min_speed = options.minimum_wind_speed.unwrap_or(MIN_SPEED).max(0.0);
    let speed = log_law_speed(&batch.wind_speed, min_speed, options);
    let inputs = globe_inputs(batch, &speed, &solar);

    let solver = NewtonGlobe {
        emissivity: options.bernard.emissivity,
        tolerance: options.bernard.tolerance,
        max_iter: options.bernard.max_iter,
    };
    let globe = solve_batch(&solver, &inputs);
    report_failures(Method::Bernard, "globe temperature", globe.failures, n);

    let mut psychrometric = Vec::with_capacity(n);
    let mut natural = Vec::with_capacity(n);
    let mut wbgt = Vec::with_capacity(n);
    for i in 0..n {
        let ta = batch.temp_air[i];
        let tpsy = bernard_psychrometric(ta, batch.temp_dew[i]);
        let tnwb = bernard_natural(ta, tpsy, globe.values[i], speed[i]);
        psychrometric.push(tpsy);
        natural.push(tnwb);
        wbgt.push(weighted_wbgt(tnwb, globe.values[i], ta));
    }

    let SolarInputs {
        solar,
        cos_zenith,
        direct_beam_fraction,
    } = solar;
    Ok(WbgtResult {
        globe_temperature: globe.values,
        psychrometric_wetbulb: psychrometric,
        natural_wetbulb: natural,
        wbgt,
        solar,
        speed,
        min_speed: Some(min_speed),
        cosine_zenith: cos_zenith,
        direct_beam_fraction,
    })
}
