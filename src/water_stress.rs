use crate::crop_params::{CropParameters, EXPANSION, POLLINATION, SENESCENCE, STOMATAL};
use crate::error::{Result, StressError};
use nalgebra::{Vector3, Vector4};

// Shape factors closer to zero than this use the linear limit of the stress curve
const SHAPE_EPSILON: f64 = 1e-8;

// Root zone water stress coefficients (1 = no stress, 0 = full stress)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StressCoefficients {
    pub exp: f64,     // Leaf expansion
    pub sto: f64,     // Stomatal closure
    pub sen: f64,     // Canopy senescence
    pub pol: f64,     // Pollination failure, 1 - Drel
    pub sto_lin: f64, // Stomatal closure without curve shape, 1 - Drel
}

impl Default for StressCoefficients {
    fn default() -> Self {
        StressCoefficients {
            exp: 1.0,
            sto: 1.0,
            sen: 1.0,
            pol: 1.0,
            sto_lin: 1.0,
        }
    }
}

// Temperature stress on pollination from the external temperature model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemperatureStress {
    pub pol_c: f64, // Cold stress [-]
    pub pol_h: f64, // Heat stress [-]
}

impl Default for TemperatureStress {
    fn default() -> Self {
        TemperatureStress {
            pol_c: 1.0,
            pol_h: 1.0,
        }
    }
}

/// Water stress coefficients for a crop on the current day.
///
/// `beta` enables the senescence threshold reduction once early senescence
/// has been triggered (`t_early_sen > 0`).
pub fn water_stress(
    crop: &CropParameters,
    t_early_sen: f64,
    dr: f64,
    taw: f64,
    et0: f64,
    beta: bool,
) -> Result<StressCoefficients> {
    water_stress_coefficients(
        &crop.p_up,
        &crop.p_lo,
        crop.et_adj,
        crop.beta,
        &crop.fshape_w,
        t_early_sen,
        dr,
        taw,
        et0,
        beta,
    )
}

/// Converts root zone depletion `dr` [mm] into the five stress coefficients.
///
/// Thresholds are fractions of `taw` [mm]. With `et_adj` the first three
/// thresholds shift with `et0` [mm/day]; the pollination threshold never does.
#[allow(clippy::too_many_arguments)]
pub fn water_stress_coefficients(
    p_up: &Vector4<f64>,
    p_lo: &Vector4<f64>,
    et_adj: bool,
    beta_param: f64,
    fshape_w: &Vector3<f64>,
    t_early_sen: f64,
    dr: f64,
    taw: f64,
    et0: f64,
    beta: bool,
) -> Result<StressCoefficients> {
    if !taw.is_finite() || taw < 0.0 {
        return Err(StressError::invalid(
            "taw",
            taw,
            "total available water must be finite and non-negative",
        ));
    }
    if !dr.is_finite() {
        return Err(StressError::invalid("dr", dr, "depletion must be finite"));
    }

    let mut p_up = *p_up;
    let mut p_lo = *p_lo;
    if et_adj {
        let shift = 0.04 * (5.0 - et0);
        for ii in [EXPANSION, STOMATAL, SENESCENCE] {
            p_up[ii] += shift * (10.0 - 9.0 * p_up[ii]).log10();
            p_lo[ii] += shift * (10.0 - 9.0 * p_lo[ii]).log10();
        }
    }

    if beta && t_early_sen > 0.0 {
        p_up[SENESCENCE] *= 1.0 - beta_param / 100.0;
    }

    if let Some(p) = p_up.iter().chain(p_lo.iter()).find(|p| p.is_nan()) {
        return Err(StressError::invalid(
            "p_up/p_lo",
            *p,
            "threshold undefined after ET adjustment",
        ));
    }
    let p_up = p_up.map(|p| p.clamp(0.0, 1.0));
    let p_lo = p_lo.map(|p| p.clamp(0.0, 1.0));

    let drel = Vector4::from_fn(|ii, _| relative_depletion(dr, taw, p_up[ii], p_lo[ii]));
    let ks = Vector3::from_fn(|ii, _| shaped_coefficient(drel[ii], fshape_w[ii]));

    log::trace!(
        "water stress: dr={dr:.3} taw={taw:.3} p_up={:?} p_lo={:?} drel={:?}",
        p_up.as_slice(),
        p_lo.as_slice(),
        drel.as_slice()
    );

    Ok(StressCoefficients {
        exp: ks[EXPANSION],
        sto: ks[STOMATAL],
        sen: ks[SENESCENCE],
        pol: 1.0 - drel[POLLINATION],
        sto_lin: 1.0 - drel[STOMATAL],
    })
}

// Depletion between the two thresholds, scaled to [0, 1]
fn relative_depletion(dr: f64, taw: f64, p_up: f64, p_lo: f64) -> f64 {
    if dr <= p_up * taw {
        0.0
    } else if dr < p_lo * taw {
        1.0 - (p_lo - dr / taw) / (p_lo - p_up)
    } else {
        1.0
    }
}

// Convex (or concave) stress curve; linear when the shape factor vanishes
fn shaped_coefficient(drel: f64, shape: f64) -> f64 {
    if shape.abs() < SHAPE_EPSILON {
        1.0 - drel
    } else {
        1.0 - ((drel * shape).exp() - 1.0) / (shape.exp() - 1.0)
    }
}
