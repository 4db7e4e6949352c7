use crate::error::{Result, StressError};
use crate::water_stress::{StressCoefficients, TemperatureStress};

// Fractional flowering curves closer than this are treated as a plateau
const PLATEAU_TOLERANCE: f64 = 1e-7;

// Cumulative fraction of flowers open `t` days into a flowering period of `flowering_cd` days
fn cumulative_flowering(t: f64, flowering_cd: f64) -> f64 {
    if t == 0.0 {
        return 0.0;
    }
    let t_pct = (100.0 * (t / flowering_cd)).min(100.0);
    let f = 0.00558 * (0.63 * t_pct.ln()).exp() - 0.000969 * t_pct - 0.00383;
    f.max(0.0)
}

/// Fraction of total flowering that takes place on day `hi_t` of flowering.
///
/// Averages the cumulative curve over the previous and current day. Zero
/// before flowering starts and once the curve has levelled off.
pub fn fractional_flowering(hi_t: f64, flowering_cd: f64) -> Result<f64> {
    if hi_t <= 0.0 {
        return Ok(0.0);
    }
    if flowering_cd <= 0.0 {
        return Err(StressError::invalid(
            "flowering_cd",
            flowering_cd,
            "flowering duration must be positive once flowering has started",
        ));
    }

    let f1 = cumulative_flowering(hi_t - 1.0, flowering_cd);
    let f2 = cumulative_flowering(hi_t, flowering_cd);
    if (f1 - f2).abs() < PLATEAU_TOLERANCE {
        Ok(0.0)
    } else {
        Ok(100.0 * ((f1 + f2) / 2.0) / flowering_cd)
    }
}

/// Harvest index adjustment for failure of pollination.
///
/// Adds today's share of flowering, scaled by the most limiting of the water
/// and the two temperature stresses, to the running factor `fpol`. Nothing
/// pollinates while canopy cover is below `cc_min`. The result never exceeds 1.
#[allow(clippy::too_many_arguments)]
pub fn hi_adj_pollination(
    cc: f64,
    fpol: f64,
    flowering_cd: f64,
    cc_min: f64,
    exc: f64,
    ksw: &StressCoefficients,
    kst: &TemperatureStress,
    hi_t: f64,
) -> Result<f64> {
    let frac_flow = fractional_flowering(hi_t, flowering_cd)?;

    let d_fpol = if cc < cc_min {
        0.0
    } else {
        let ks = ksw.pol.min(kst.pol_c).min(kst.pol_h);
        ks * frac_flow * (1.0 + exc / 100.0)
    };

    let fpol = (fpol + d_fpol).min(1.0);
    log::trace!("pollination: HIt={hi_t} FracFlow={frac_flow:.5} dFpol={d_fpol:.5} Fpol={fpol:.5}");
    Ok(fpol)
}
