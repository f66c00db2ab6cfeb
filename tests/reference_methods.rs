use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use wbgt::constants::DIMICELI_MIN_SPEED;
use wbgt::methods::METHODS;
use wbgt::methods::ono::ono_wbgt;
use wbgt::psychro::relative_humidity;
use wbgt::{Method, NaturalWetBulb, ObservationBatch, WbgtOptions, WbgtResult, estimate_wbgt};

const MPH: f64 = 0.44704;

/// 33°43'59"N, 83°22'59"W
fn location() -> (f64, f64) {
    let lat = 33.0 + (43.0 + 59.0 / 60.0) / 60.0;
    let lon = -84.0 + (22.0 + 59.0 / 60.0) / 60.0;
    (lat, lon)
}

fn at_16_utc(month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, month, 1, 16, 0, 0).unwrap()
}

/// Two contrasting samples at the same instant: a mild humid morning and a
/// hot windy afternoon.
fn two_samples() -> ObservationBatch {
    let (lat, lon) = location();
    ObservationBatch::new(
        vec![at_16_utc(6)],
        &[lat],
        &[lon],
        &[500.0, 805.0],
        &[985.0, 1013.0],
        &[25.0, 35.0],
        &[15.0, 25.0],
        &[MPH, 5.0 * MPH],
    )
    .unwrap()
}

/// First day of each month of 2000, alternating the two samples above.
fn monthly_samples() -> ObservationBatch {
    let (lat, lon) = location();
    let pick = |a: f64, b: f64| -> Vec<f64> {
        (0..12).map(|i| if i % 2 == 0 { a } else { b }).collect()
    };
    ObservationBatch::new(
        (1..=12).map(at_16_utc).collect(),
        &[lat],
        &[lon],
        &pick(500.0, 805.0),
        &pick(985.0, 1013.0),
        &pick(25.0, 35.0),
        &pick(15.0, 25.0),
        &pick(MPH, 5.0 * MPH),
    )
    .unwrap()
}

fn assert_close(got: &[f64], expected: &[f64], tol: f64, what: &str) {
    assert_eq!(got.len(), expected.len(), "{what}: length");
    for (i, (g, e)) in got.iter().zip(expected).enumerate() {
        assert!((g - e).abs() < tol, "{what}[{i}]: {g} vs {e}");
    }
}

fn assert_weighted(res: &WbgtResult, temp_air: &[f64]) {
    for i in 0..res.len() {
        let expected = 0.7 * res.natural_wetbulb[i]
            + 0.2 * res.globe_temperature[i]
            + 0.1 * temp_air[i];
        assert!((res.wbgt[i] - expected).abs() < 1e-10, "wbgt[{i}]");
    }
}

#[test]
fn test_liljegren_reference_scenario() -> Result<()> {
    let batch = two_samples();
    let res = estimate_wbgt("liljegren", &batch, &WbgtOptions::default())?;

    // Reference values were produced in single precision, which alone
    // accounts for up to 2.4e-4 of difference in Tg
    let tol = 3e-4;
    assert_close(&res.globe_temperature, &[41.970542908, 48.868949890], tol, "Tg");
    assert_close(&res.natural_wetbulb, &[23.320886612, 29.015771866], tol, "Tnwb");
    assert_close(&res.psychrometric_wetbulb, &[18.278467178, 27.251123428], tol, "Tpsy");
    assert_close(&res.wbgt, &[27.218729019, 33.584831238], tol, "Twbg");
    assert_weighted(&res, &batch.temp_air);
    assert_eq!(res.min_speed, Some(0.13));
    Ok(())
}

#[test]
fn test_bernard_monthly_reference() -> Result<()> {
    let batch = monthly_samples();
    let opts = WbgtOptions {
        minimum_wind_speed: Some(0.0),
        ..WbgtOptions::default()
    };
    let res = Method::Bernard.run(&batch, &opts)?;

    let tg = [
        43.373697999106,
        47.251008278667,
        40.871798055794,
        46.480333391746,
        41.149121325362,
        46.290998065833,
        41.158800636094,
        46.226155488287,
        40.934495622227,
        46.726021531819,
        41.054584894706,
        47.164626916066,
    ];
    assert_close(&res.globe_temperature, &tg, 2e-3, "Tg");
    assert_close(&res.natural_wetbulb[..2], &[22.597361554457, 30.1031770977963], 2e-3, "Tnwb");
    assert_close(&res.wbgt[..2], &[26.9928926879412, 34.0224256241908], 2e-3, "Twbg");
    assert_close(
        &res.psychrometric_wetbulb[..2],
        &[17.96148884743604, 27.140425028129574],
        1e-10,
        "Tpsy",
    );
    assert_weighted(&res, &batch.temp_air);
    Ok(())
}

#[test]
fn test_dimiceli_monthly_reference() -> Result<()> {
    let batch = monthly_samples();
    let opts = WbgtOptions {
        minimum_wind_speed: Some(DIMICELI_MIN_SPEED),
        natural_wetbulb_algorithm: NaturalWetBulb::Malchaire,
        ..WbgtOptions::default()
    };
    let res = estimate_wbgt("dimiceli", &batch, &opts)?;

    let tg = [
        38.31750513722974,
        40.68555674157649,
        41.64127240504196,
        41.51158271804979,
        45.10703183815943,
        42.48553616231467,
        45.25068705123203,
        42.09318854558204,
        44.2397145788166,
        40.92169020316264,
        40.53945394120878,
        40.60748977555843,
    ];
    let tnwb = [
        24.15500188961772,
        29.92728729928154,
        25.30881184626314,
        30.18095989953724,
        26.51191285155729,
        30.48006102924928,
        26.56178120930073,
        30.35957106528275,
        26.21083301991828,
        29.99980389187549,
        24.92632745083094,
        29.90331293185496,
    ];
    let twbg = [
        27.07200235017836,
        32.58621245781237,
        28.54442277339258,
        32.92898847328603,
        30.07974536372199,
        33.33314995293743,
        30.14338425675692,
        33.17033745481433,
        29.69552602970612,
        32.68420076494537,
        28.05632000382341,
        32.55381700741015,
    ];
    assert_close(&res.globe_temperature, &tg, 1e-4, "Tg");
    assert_close(&res.natural_wetbulb, &tnwb, 1e-4, "Tnwb");
    assert_close(&res.wbgt, &twbg, 1e-4, "Twbg");
    // 1 mph is below the hard floor
    assert!((res.speed[0] - DIMICELI_MIN_SPEED).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_ono_regression() -> Result<()> {
    let batch = two_samples();
    let res = estimate_wbgt("ono", &batch, &WbgtOptions::default())?;
    for i in 0..2 {
        let rh = 100.0 * relative_humidity(batch.temp_air[i], batch.temp_dew[i]);
        let solar_kw = batch.solar[i] / 1000.0;
        let expected = ono_wbgt(batch.temp_air[i], rh, solar_kw, batch.wind_speed[i]);
        assert!((res.wbgt[i] - expected).abs() < 1e-12);
        assert!(res.globe_temperature[i].is_nan());
        assert!(res.psychrometric_wetbulb[i].is_nan());
        assert!(res.natural_wetbulb[i].is_nan());
    }
    assert_eq!(res.speed, batch.wind_speed);
    assert!(res.min_speed.is_none());
    Ok(())
}

#[test]
fn test_every_method_reports_every_sample() -> Result<()> {
    let batch = monthly_samples();
    for method in ["liljegren", "bernard", "dimiceli", "ono"] {
        let res = estimate_wbgt(method, &batch, &WbgtOptions::default())?;
        assert_eq!(res.len(), batch.len(), "{method}");
        assert_eq!(res.globe_temperature.len(), batch.len());
        assert_eq!(res.solar.len(), batch.len());
        assert_eq!(res.speed.len(), batch.len());
        assert!(res.wbgt.iter().all(|w| w.is_finite()), "{method}");
    }
    Ok(())
}

#[test]
fn test_unsupported_method_fails() {
    let batch = two_samples();
    for name in ["", "wbgt", "liljegren2", "stull"] {
        let res = estimate_wbgt(name, &batch, &WbgtOptions::default());
        assert!(res.is_err(), "{name:?} should be rejected");
    }
}

#[test]
fn test_missing_solar_propagates_nan() -> Result<()> {
    let (lat, lon) = location();
    let batch = ObservationBatch::new(
        vec![at_16_utc(6)],
        &[lat],
        &[lon],
        &[f64::NAN, 600.0],
        &[1000.0],
        &[30.0],
        &[20.0],
        &[2.0],
    )?;
    for method in ["liljegren", "bernard", "dimiceli"] {
        let res = estimate_wbgt(method, &batch, &WbgtOptions::default())?;
        assert!(res.globe_temperature[0].is_nan(), "{method}");
        assert!(res.wbgt[0].is_nan(), "{method}");
        assert_eq!(res.direct_beam_fraction[0], 0.0);
        assert!(res.wbgt[1].is_finite(), "{method}");
    }
    Ok(())
}

/// Two samples at 16 UTC in June; the first one has `column` replaced by NaN.
fn with_missing(column: &str) -> Result<ObservationBatch> {
    let (lat, lon) = location();
    let mut temp_air = vec![30.0, 30.0];
    let mut temp_dew = vec![20.0, 20.0];
    let mut wind_speed = vec![2.0, 2.0];
    match column {
        "temp_air" => temp_air[0] = f64::NAN,
        "temp_dew" => temp_dew[0] = f64::NAN,
        "wind_speed" => wind_speed[0] = f64::NAN,
        other => anyhow::bail!("no such column: {other}"),
    }
    ObservationBatch::new(
        vec![at_16_utc(6)],
        &[lat],
        &[lon],
        &[600.0],
        &[1000.0],
        &temp_air,
        &temp_dew,
        &wind_speed,
    )
}

#[test]
fn test_missing_wind_propagates_nan() -> Result<()> {
    let batch = with_missing("wind_speed")?;
    for (name, method) in METHODS {
        let res = method.run(&batch, &WbgtOptions::default())?;
        assert!(res.speed[0].is_nan(), "{name}: speed = {}", res.speed[0]);
        assert!(res.wbgt[0].is_nan(), "{name}: wbgt = {}", res.wbgt[0]);
        assert!(res.wbgt[1].is_finite(), "{name}");
    }
    // Also when the measurement height needs a profile adjustment
    let opts = WbgtOptions {
        wind_measurement_height: 10.0,
        ..WbgtOptions::default()
    };
    for (name, method) in METHODS {
        let res = method.run(&batch, &opts)?;
        assert!(res.wbgt[0].is_nan(), "{name}");
        assert!(res.wbgt[1].is_finite(), "{name}");
    }
    Ok(())
}

#[test]
fn test_missing_temperatures_propagate_nan() -> Result<()> {
    for column in ["temp_air", "temp_dew"] {
        let batch = with_missing(column)?;
        for (name, method) in METHODS {
            let res = method.run(&batch, &WbgtOptions::default())?;
            assert!(res.wbgt[0].is_nan(), "{name} with missing {column}");
            assert!(res.wbgt[1].is_finite(), "{name} with missing {column}");
            if *method != Method::Ono {
                assert!(res.natural_wetbulb[0].is_nan(), "{name} with missing {column}");
                assert!(res.psychrometric_wetbulb[0].is_nan(), "{name} with missing {column}");
            }
        }
    }
    Ok(())
}

#[test]
fn test_invalid_wind_profile_fails_fast() -> Result<()> {
    let batch = two_samples();
    for height in [0.1, 0.05, 0.0, -2.0] {
        let opts = WbgtOptions {
            wind_measurement_height: height,
            ..WbgtOptions::default()
        };
        for (name, _) in METHODS {
            assert!(estimate_wbgt(name, &batch, &opts).is_err(), "{name} at {height} m");
        }
    }
    let opts = WbgtOptions {
        roughness_length: 0.0,
        ..WbgtOptions::default()
    };
    assert!(estimate_wbgt("bernard", &batch, &opts).is_err());
    let opts = WbgtOptions {
        gmt_offset_hours: Some(f64::NAN),
        ..WbgtOptions::default()
    };
    assert!(estimate_wbgt("liljegren", &batch, &opts).is_err());
    Ok(())
}

#[test]
fn test_cos_zenith_override_only_reaches_energy_balance() -> Result<()> {
    let batch = two_samples();
    let opts = WbgtOptions {
        cosine_zenith: Some(vec![0.3]),
        ..WbgtOptions::default()
    };
    for method in ["liljegren", "bernard", "dimiceli"] {
        let base = estimate_wbgt(method, &batch, &WbgtOptions::default())?;
        let res = estimate_wbgt(method, &batch, &opts)?;
        assert_eq!(res.solar, base.solar, "{method}");
        assert_eq!(res.direct_beam_fraction, base.direct_beam_fraction, "{method}");
        assert_eq!(res.cosine_zenith, vec![0.3, 0.3], "{method}");
        // A lower sun strengthens the direct beam on the globe
        assert!(res.globe_temperature[0] > base.globe_temperature[0], "{method}");
    }
    Ok(())
}
