//! NREL Solar Position Algorithm (Reda & Andreas, 2004).
//!
//! Topocentric zenith angle and earth-sun distance for a single instant and
//! observer. Stated accuracy is ±0.0003° over -2000..6000; the periodic-term
//! tables are truncated the same way as the reference implementation.

use crate::solar::coefficients::{B_TERMS, L_TERMS, NUTATION_PE, NUTATION_Y, R_TERMS};
use crate::solar::{Observer, SunPosition};
use crate::time::julian_day;

const J2000: f64 = 2_451_545.0;

/// Earth equatorial radius [m].
const EARTH_RADIUS: f64 = 6_378_140.0;

/// Polar-to-equatorial axis ratio of the reference ellipsoid.
const EARTH_FLATTENING: f64 = 0.99664719;

/// Apparent solar radius plus the default refraction at sunrise [deg].
const SUN_RADIUS: f64 = 0.26667;

/// Time scales derived from a Julian Day.
#[derive(Debug, Clone, Copy)]
struct JulianTimes {
    jd: f64,
    /// Julian century.
    jc: f64,
    /// Julian ephemeris century.
    jce: f64,
    /// Julian ephemeris millennium.
    jme: f64,
}

impl JulianTimes {
    fn new(jd: f64, delta_t: f64) -> Self {
        let jde = jd + delta_t / 86_400.0;
        let jc = (jd - J2000) / 36_525.0;
        let jce = (jde - J2000) / 36_525.0;
        Self {
            jd,
            jc,
            jce,
            jme: jce / 10.0,
        }
    }
}

/// Sums `Σ_i (Σ_k A cos(B + C jme)) jme^i / 1e8` over a group of tables.
fn periodic_sum(tables: &[&[[f64; 3]]], jme: f64) -> f64 {
    let mut total = 0.0;
    let mut power = 1.0;
    for table in tables {
        let s: f64 = table
            .iter()
            .map(|[a, b, c]| a * (b + c * jme).cos())
            .sum();
        total += s * power;
        power *= jme;
    }
    total / 1e8
}

/// Earth heliocentric longitude [deg], in [0, 360).
fn heliocentric_longitude(jme: f64) -> f64 {
    periodic_sum(&L_TERMS, jme).to_degrees().rem_euclid(360.0)
}

/// Earth heliocentric latitude [deg].
fn heliocentric_latitude(jme: f64) -> f64 {
    periodic_sum(&B_TERMS, jme).to_degrees()
}

/// Earth radius vector [AU].
fn heliocentric_radius(jme: f64) -> f64 {
    periodic_sum(&R_TERMS, jme)
}

/// Nutation in longitude and obliquity [deg].
fn nutation(jce: f64) -> (f64, f64) {
    let jce2 = jce * jce;
    let jce3 = jce2 * jce;
    // Mean elongation of the moon, mean anomalies of sun and moon, moon's
    // argument of latitude, longitude of the ascending node.
    let x = [
        297.85036 + 445_267.111480 * jce - 0.0019142 * jce2 + jce3 / 189_474.0,
        357.52772 + 35_999.050340 * jce - 0.0001603 * jce2 - jce3 / 300_000.0,
        134.96298 + 477_198.867398 * jce + 0.0086972 * jce2 + jce3 / 56_250.0,
        93.27191 + 483_202.017538 * jce - 0.0036825 * jce2 + jce3 / 327_270.0,
        125.04452 - 1934.136261 * jce + 0.0020708 * jce2 + jce3 / 450_000.0,
    ];

    let mut dpsi = 0.0;
    let mut deps = 0.0;
    for (y, [a, b, c, d]) in NUTATION_Y.iter().zip(NUTATION_PE.iter()) {
        let arg: f64 = x
            .iter()
            .zip(y.iter())
            .map(|(xj, yj)| xj * f64::from(*yj))
            .sum::<f64>()
            .to_radians();
        dpsi += (a + b * jce) * arg.sin();
        deps += (c + d * jce) * arg.cos();
    }
    (dpsi / 36_000_000.0, deps / 36_000_000.0)
}

/// True obliquity of the ecliptic [deg].
fn true_obliquity(jme: f64, deps: f64) -> f64 {
    let u = jme / 10.0;
    // Coefficients of U^0..U^10 [arc seconds].
    const E0: [f64; 11] = [
        84381.448, -4680.93, -1.55, 1999.25, -51.38, -249.67, -39.05, 7.12, 27.87, 5.79, 2.45,
    ];
    let e0 = E0.iter().rev().fold(0.0, |acc, c| acc * u + c);
    e0 / 3600.0 + deps
}

/// Apparent sidereal time at Greenwich [deg].
fn apparent_sidereal_time(t: &JulianTimes, dpsi: f64, epsilon: f64) -> f64 {
    let v0 = 280.46061837 + 360.98564736629 * (t.jd - J2000) + 0.000387933 * t.jc * t.jc
        - t.jc.powi(3) / 38_710_000.0;
    v0.rem_euclid(360.0) + dpsi * epsilon.to_radians().cos()
}

/// Geocentric right ascension and declination [deg].
fn geocentric_equatorial(lambda: f64, epsilon: f64, beta: f64) -> (f64, f64) {
    let (l, e, b) = (lambda.to_radians(), epsilon.to_radians(), beta.to_radians());
    let alpha = (l.sin() * e.cos() - b.tan() * e.sin())
        .atan2(l.cos())
        .to_degrees()
        .rem_euclid(360.0);
    let delta = (b.sin() * e.cos() + b.cos() * e.sin() * l.sin())
        .asin()
        .to_degrees();
    (alpha, delta)
}

/// Atmospheric refraction correction to the elevation angle [deg].
fn refraction(pressure: f64, temperature: f64, e0: f64, atmos_refract: f64) -> f64 {
    if e0 >= -(SUN_RADIUS + atmos_refract) {
        (pressure / 1010.0) * (283.0 / (273.0 + temperature)) * 1.02
            / (60.0 * (e0 + 10.3 / (e0 + 5.11)).to_radians().tan())
    } else {
        0.0
    }
}

/// Sun position for an instant given in Unix seconds (UT).
///
/// `delta_t` is TT - UT [s]; `atmos_refract` is the refraction assumed at
/// sunrise/sunset [deg].
pub fn sun_position(
    unix_seconds: f64,
    observer: &Observer,
    delta_t: f64,
    atmos_refract: f64,
) -> SunPosition {
    let t = JulianTimes::new(julian_day(unix_seconds), delta_t);

    let l = heliocentric_longitude(t.jme);
    let b = heliocentric_latitude(t.jme);
    let r = heliocentric_radius(t.jme);

    // Geocentric ecliptic coordinates
    let theta = (l + 180.0).rem_euclid(360.0);
    let beta = -b;

    let (dpsi, deps) = nutation(t.jce);
    let epsilon = true_obliquity(t.jme, deps);

    let aberration = -20.4898 / (3600.0 * r);
    let lambda = theta + dpsi + aberration;
    let nu = apparent_sidereal_time(&t, dpsi, epsilon);
    let (alpha, delta) = geocentric_equatorial(lambda, epsilon, beta);

    // Observer local hour angle
    let h = (nu + observer.longitude - alpha).rem_euclid(360.0);

    // Parallax on the reference ellipsoid
    let xi = (8.794 / (3600.0 * r)).to_radians();
    let lat = observer.latitude.to_radians();
    let u = (EARTH_FLATTENING * lat.tan()).atan();
    let x = u.cos() + observer.elevation / EARTH_RADIUS * lat.cos();
    let y = EARTH_FLATTENING * u.sin() + observer.elevation / EARTH_RADIUS * lat.sin();

    let (hr, dr) = (h.to_radians(), delta.to_radians());
    let denom = dr.cos() - x * xi.sin() * hr.cos();
    let delta_alpha = (-x * xi.sin() * hr.sin()).atan2(denom);
    let delta_prime = ((dr.sin() - y * xi.sin()) * delta_alpha.cos()).atan2(denom);
    let h_prime = hr - delta_alpha;

    let e0 = (lat.sin() * delta_prime.sin() + lat.cos() * delta_prime.cos() * h_prime.cos())
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();
    let de = refraction(observer.pressure, observer.temperature, e0, atmos_refract);

    SunPosition {
        distance: r,
        zenith: 90.0 - (e0 + de),
    }
}
