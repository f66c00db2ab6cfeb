//! Wind-speed adjustment to the 2 m reference height.
//!
//! Two profiles are supported: the neutral logarithmic law, and the EPA
//! power law whose exponent depends on the Pasquill stability class
//! (EPA-454/5-99-005, section 6.2.5).

use crate::constants::REF_HEIGHT;

/// Logarithmic wind profile: speed at `REF_HEIGHT` from a speed measured at
/// `z_ref` [m].
///
/// - `roughness`: roughness length z0 [m]
/// - `displacement`: zero-plane displacement d [m]
pub fn log_law(speed: f64, z_ref: f64, roughness: f64, displacement: f64) -> f64 {
    speed * ((REF_HEIGHT - displacement) / roughness).ln()
        / ((z_ref - displacement) / roughness).ln()
}

/// Raises `speed` to `min_speed`. A missing (NaN) speed stays missing.
pub fn floor_speed(speed: f64, min_speed: f64) -> f64 {
    if speed.is_nan() { speed } else { speed.max(min_speed) }
}

/// Pasquill atmospheric stability class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityClass {
    /// Very unstable.
    A,
    B,
    C,
    /// Neutral.
    D,
    E,
    /// Very stable.
    F,
}

// Rows: speed bins. Columns: daytime solar bins (0-3) then night dT<0, dT>=0.
const SRDT_TABLE: [[StabilityClass; 6]; 5] = {
    use StabilityClass::*;
    [
        [A, A, B, D, E, F],
        [A, B, C, D, E, F],
        [B, B, C, D, D, D],
        [C, C, D, D, D, D],
        [C, D, D, D, D, D],
    ]
};

const URBAN_EXPONENTS: [f64; 6] = [0.15, 0.15, 0.20, 0.25, 0.30, 0.30];
const RURAL_EXPONENTS: [f64; 6] = [0.07, 0.07, 0.10, 0.15, 0.35, 0.55];

impl StabilityClass {
    /// Solar radiation / delta-T method.
    ///
    /// - `daytime`: sun above the horizon
    /// - `speed`: measured wind speed [m/s]
    /// - `solar`: global irradiance [W/m²], used by day
    /// - `vertical_dt`: upper minus lower temperature [°C], used at night
    pub fn from_srdt(daytime: bool, speed: f64, solar: f64, vertical_dt: f64) -> Self {
        let (row, col) = if daytime {
            let col = if solar >= 925.0 {
                0
            } else if solar >= 675.0 {
                1
            } else if solar >= 175.0 {
                2
            } else {
                3
            };
            let row = if speed >= 6.0 {
                4
            } else if speed >= 5.0 {
                3
            } else if speed >= 3.0 {
                2
            } else if speed >= 2.0 {
                1
            } else {
                0
            };
            (row, col)
        } else {
            let col = if vertical_dt >= 0.0 { 5 } else { 4 };
            let row = if speed >= 2.5 {
                2
            } else if speed >= 2.0 {
                1
            } else {
                0
            };
            (row, col)
        };
        SRDT_TABLE[row][col]
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Power-law exponent for urban or rural terrain.
    pub fn exponent(self, urban: bool) -> f64 {
        if urban {
            URBAN_EXPONENTS[self.index()]
        } else {
            RURAL_EXPONENTS[self.index()]
        }
    }
}

/// Power-law wind profile: speed at `REF_HEIGHT` from a speed at `z_ref`.
pub fn power_law(speed: f64, z_ref: f64, class: StabilityClass, urban: bool) -> f64 {
    speed * (REF_HEIGHT / z_ref).powf(class.exponent(urban))
}
