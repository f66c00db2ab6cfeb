//! Low-precision solar coordinates from the Astronomical Almanac (1990).
//!
//! Accurate to about 0.01° in right ascension and declination between 1950
//! and 2050, which is plenty for partitioning hourly irradiance. Formulas:
//! A.A. 1990 C24 (coordinates), B6 (sidereal time), B61 (refraction).

use std::f64::consts::TAU;

use crate::solar::{Observer, SunPosition};

/// Days from 1900 January 0.0 to the Unix epoch.
const UNIX_EPOCH_DAYS_1900: f64 = 25_568.0;

/// Days from 1900 January 0.0 to J2000.0 (2000 January 1.5).
const J2000_DAYS_1900: f64 = 36_525.5;

/// Ratio of mean solar day to mean sidereal day.
const SIDEREAL_RATIO: f64 = 1.00273790934;

/// Fractional part of `x / period`, scaled back by `scale`, as C `modf` does.
fn wrap(x: f64, period: f64, scale: f64) -> f64 {
    (x / period).fract() * scale
}

/// Refraction correction to be added to the altitude [deg].
fn refraction(altitude: f64, tan_alt: f64, pressure: f64, temperature: f64) -> f64 {
    if altitude < -1.0 || tan_alt == 6.0e6 {
        0.0
    } else if altitude < 19.225 {
        (0.1594 + altitude * (0.0196 + 0.00002 * altitude)) * pressure
            / ((1.0 + altitude * (0.505 + 0.0845 * altitude)) * (273.0 + temperature))
    } else {
        0.00452 * (pressure / (273.0 + temperature)) / tan_alt
    }
}

/// Sun position for an instant given in Unix seconds (UT).
pub fn sun_position(unix_seconds: f64, observer: &Observer) -> SunPosition {
    let days_1900 = unix_seconds / 86_400.0 + UNIX_EPOCH_DAYS_1900;
    let days_j2000 = days_1900 - J2000_DAYS_1900;
    let ut = days_1900.fract() * 24.0;
    // Julian centuries since J2000 at 0h UT of the date
    let cent = (days_1900.trunc() - J2000_DAYS_1900) / 36_525.0;

    let mean_anomaly = wrap(357.528 + 0.9856003 * days_j2000, 360.0, TAU);
    let mean_longitude = wrap(280.460 + 0.9856474 * days_j2000, 360.0, TAU);
    let obliquity = (23.439 - 4.0e-7 * days_j2000).to_radians();
    let ecliptic_long = (1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin())
        .to_radians()
        + mean_longitude;

    let distance =
        1.00014 - 0.01671 * mean_anomaly.cos() - 0.00014 * (2.0 * mean_anomaly).cos();

    let mut ra = (obliquity.cos() * ecliptic_long.sin()).atan2(ecliptic_long.cos());
    if ra < 0.0 {
        ra += TAU;
    }
    let ra_hours = wrap(ra, TAU, 24.0);
    let dec = (obliquity.sin() * ecliptic_long.sin()).asin();

    let mut gmst0h = 24_110.54841 + cent * (8_640_184.812866 + cent * (0.093104 - cent * 6.2e-6));
    gmst0h = wrap(gmst0h, 86_400.0, 24.0);
    if gmst0h < 0.0 {
        gmst0h += 24.0;
    }

    let mut lmst = wrap(gmst0h + ut * SIDEREAL_RATIO + observer.longitude / 15.0, 24.0, 24.0);
    if lmst < 0.0 {
        lmst += 24.0;
    }

    let mut lha = lmst - ra_hours;
    if lha < -12.0 {
        lha += 24.0;
    } else if lha > 12.0 {
        lha -= 24.0;
    }
    let lha = lha / 24.0 * TAU;

    let lat = observer.latitude.to_radians();
    let altitude = (dec.sin() * lat.sin() + dec.cos() * lha.cos() * lat.cos())
        .clamp(-1.0, 1.0)
        .asin();
    // 1.57079615 rad is 89.99999°
    let tan_alt = if altitude.abs() < 1.57079615 {
        altitude.tan()
    } else {
        6.0e6
    };
    let altitude = altitude.to_degrees();
    let refr = refraction(altitude, tan_alt, observer.pressure, observer.temperature);

    SunPosition {
        distance,
        zenith: 90.0 - (altitude + refr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::spa;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_epoch_offset() {
        // 2000-01-01 00:00 UT is day 36525 counted from 1900 January 0
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let days = t.timestamp() as f64 / 86_400.0 + UNIX_EPOCH_DAYS_1900;
        assert!((days - 36_525.0).abs() < 1e-12);
    }

    #[test]
    fn test_close_to_spa_across_a_year() {
        let obs = Observer {
            latitude: 40.0,
            longitude: -105.0,
            ..Observer::default()
        };
        for month in 1..=12 {
            let t = Utc.with_ymd_and_hms(2015, month, 15, 18, 0, 0).unwrap();
            let ts = t.timestamp() as f64;
            let low = sun_position(ts, &obs);
            let full = spa::sun_position(ts, &obs, 0.0, 0.0);
            assert!(
                (low.zenith - full.zenith).abs() < 0.05,
                "month {month}: {} vs {}",
                low.zenith,
                full.zenith
            );
            assert!((low.distance - full.distance).abs() < 1e-4);
        }
    }

    #[test]
    fn test_refraction_branches() {
        assert_eq!(refraction(-2.0, -0.03, 1013.25, 15.0), 0.0);
        assert_eq!(refraction(89.999999, 6.0e6, 1013.25, 15.0), 0.0);
        let low = refraction(5.0, 5f64.to_radians().tan(), 1013.25, 15.0);
        let high = refraction(30.0, 30f64.to_radians().tan(), 1013.25, 15.0);
        assert!(low > high && high > 0.0);
    }
}
