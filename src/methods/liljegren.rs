//! Full-physics pipeline: fixed-point globe and wick balances.

use anyhow::Result;
use rayon::prelude::*;

use crate::batch::ObservationBatch;
use crate::constants::{LILJEGREN_MIN_SPEED, REF_HEIGHT, is_invalid};
use crate::globe::fixed_point::{FixedPointGlobe, wick_temperature};
use crate::globe::{GlobeInput, finalize, solve_batch};
use crate::methods::{
    Method, SolarInputs, WbgtResult, globe_inputs, prepare_solar, report_failures, weighted_wbgt,
};
use crate::options::WbgtOptions;
use crate::wind::{StabilityClass, floor_speed, power_law};

/// Wind speed at 2 m [m/s].
///
/// Measurements above or below the reference height are scaled with the
/// stability-class power law. The result is floored at `min_speed`; a
/// missing speed stays NaN.
pub fn adjust_speed(
    speed: f64,
    height: f64,
    solar: f64,
    cos_zenith: f64,
    min_speed: f64,
    options: &WbgtOptions,
) -> f64 {
    if (height - REF_HEIGHT).abs() > f64::EPSILON {
        let class = StabilityClass::from_srdt(
            cos_zenith > 0.0,
            speed,
            solar,
            options.liljegren.vertical_temperature_difference,
        );
        floor_speed(power_law(speed, height, class, options.liljegren.urban), min_speed)
    } else {
        floor_speed(speed, min_speed)
    }
}

/// Solves the wick balance for every sample, counting failures.
fn wick_batch(inputs: &[GlobeInput], radiative: bool) -> (Vec<f64>, usize) {
    let raw: Vec<f64> = inputs
        .par_iter()
        .map(|input| wick_temperature(input, radiative))
        .collect();
    let failures = raw.iter().filter(|v| is_invalid(**v)).count();
    (raw.into_iter().map(finalize).collect(), failures)
}

pub fn run(batch: &ObservationBatch, options: &WbgtOptions) -> Result<WbgtResult> {
    let n = batch.len();
    let SolarInputs {
        solar,
        cos_zenith,
        direct_beam_fraction,
    } = prepare_solar(batch, options)?;

    let min_speed = options
        .minimum_wind_speed
        .unwrap_or(0.0)
        .max(LILJEGREN_MIN_SPEED);
    let speed: Vec<f64> = (0..n)
        .map(|i| {
            adjust_speed(
                batch.wind_speed[i],
                options.wind_measurement_height,
                solar[i],
                cos_zenith[i],
                min_speed,
                options,
            )
        })
        .collect();

    let solar_inputs = SolarInputs {
        solar,
        cos_zenith,
        direct_beam_fraction,
    };
    let inputs = globe_inputs(batch, &speed, &solar_inputs);

    let solver = FixedPointGlobe {
        diameter: options.liljegren.globe_diameter,
    };
    let globe = solve_batch(&solver, &inputs);
    report_failures(Method::Liljegren, "globe temperature", globe.failures, n);

    let (natural, failures) = wick_batch(&inputs, true);
    report_failures(Method::Liljegren, "natural wet bulb", failures, n);
    let (psychrometric, failures) = wick_batch(&inputs, false);
    report_failures(Method::Liljegren, "psychrometric wet bulb", failures, n);

    let wbgt = (0..n)
        .map(|i| weighted_wbgt(natural[i], globe.values[i], batch.temp_air[i]))
        .collect();

    Ok(WbgtResult {
        globe_temperature: globe.values,
        psychrometric_wetbulb: psychrometric,
        natural_wetbulb: natural,
        wbgt,
        solar: solar_inputs.solar,
        speed,
        min_speed: Some(min_speed),
        cosine_zenith: solar_inputs.cos_zenith,
        direct_beam_fraction: solar_inputs.direct_beam_fraction,
    })
}
