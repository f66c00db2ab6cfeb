//! Closed-form globe temperature with configurable wet-bulb regressions.

use anyhow::Result;

use crate::batch::ObservationBatch;
use crate::constants::{DIMICELI_MIN_SPEED, MIN_SPEED};
use crate::globe::rational::RationalGlobe;
use crate::globe::{GlobeSolver, finalize};
use crate::methods::{
    SolarInputs, WbgtResult, globe_inputs, log_law_speed, prepare_solar, weighted_wbgt,
};
use crate::options::WbgtOptions;
use crate::wetbulb::NaturalWetBulbInput;

pub fn run(batch: &ObservationBatch, options: &WbgtOptions) -> Result<WbgtResult> {
    let n = batch.len();
    let solar = prepare_solar(batch, options)?;

    let min_speed = options
        .minimum_wind_speed
        .unwrap_or(MIN_SPEED)
        .max(DIMICELI_MIN_SPEED);
    let speed = log_law_speed(&batch.wind_speed, min_speed, options);
    let inputs = globe_inputs(batch, &speed, &solar);

    let solver = RationalGlobe {
        convective_coefficient: options.dimiceli.convective_coefficient,
    };

    let mut globe = Vec::with_capacity(n);
    let mut psychrometric = Vec::with_capacity(n);
    let mut natural = Vec::with_capacity(n);
    let mut wbgt = Vec::with_capacity(n);
    for input in &inputs {
        let tg = finalize(solver.solve(input));
        let rh = input.relative_humidity();
        let tpsy = options
            .wetbulb_algorithm
            .compute(input.temp_air, 100.0 * rh);
        let tnwb = options.natural_wetbulb_algorithm.compute(&NaturalWetBulbInput {
            temp_air: input.temp_air,
            relative_humidity: rh,
            psychrometric: tpsy,
            globe: tg,
            direct_solar: input.solar * input.direct_beam_fraction,
            speed: input.speed,
        });
        globe.push(tg);
        psychrometric.push(tpsy);
        natural.push(tnwb);
        wbgt.push(weighted_wbgt(tnwb, tg, input.temp_air));
    }

    let SolarInputs {
        solar,
        cos_zenith,
        direct_beam_fraction,
    } = solar;
    Ok(WbgtResult {
        globe_temperature: globe,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wetbulb::NaturalWetBulb;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_hard_floor_wins_over_lower_request() -> Result<()> {
        let t = Utc.with_ymd_and_hms(2000, 6, 1, 16, 0, 0).unwrap();
        let batch = ObservationBatch::new(
            vec![t],
            &[33.73],
            &[-83.62],
            &[500.0],
            &[985.0],
            &[25.0],
            &[15.0],
            &[0.0],
        )?;
        let opts = WbgtOptions {
            minimum_wind_speed: Some(0.0),
            natural_wetbulb_algorithm: NaturalWetBulb::Malchaire,
            ..WbgtOptions::default()
        };
        let res = run(&batch, &opts)?;
        assert_eq!(res.min_speed, Some(DIMICELI_MIN_SPEED));
        assert!((res.speed[0] - DIMICELI_MIN_SPEED).abs() < 1e-12);
        assert!(res.globe_temperature[0] > 25.0);
        Ok(())
    }
}
