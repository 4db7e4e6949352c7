use crate::error::{Result, StressError};
use std::f64::consts::PI;

// Canopy cover at or below which no harvestable yield develops
const CC_NO_YIELD: f64 = 0.01;

/// Harvest index adjustment for pre-anthesis water stress.
///
/// Mild stress before flowering (biomass `b` somewhat below the no-stress
/// biomass `b_ns`) raises the harvest index by up to `dhi_pre` percent
/// following a sine-shaped response. Returns 0 when canopy cover `cc` is
/// gone at the start of flowering.
pub fn hi_adj_pre_anthesis(b: f64, b_ns: f64, cc: f64, dhi_pre: f64) -> Result<f64> {
    if cc <= CC_NO_YIELD {
        return Ok(0.0);
    }
    if dhi_pre <= 0.0 {
        return Ok(1.0);
    }
    if b_ns <= 0.0 {
        return Err(StressError::invalid(
            "b_ns",
            b_ns,
            "no-stress biomass must be positive to form a biomass ratio",
        ));
    }

    let br = b / b_ns;
    let br_range = dhi_pre.ln() / 5.62;
    let br_upp = 1.0;
    let br_low = 1.0 - br_range;
    let br_top = br_upp - br_range / 3.0;

    // The ratios are only formed inside their interval, so a collapsed range never divides by zero
    let fpre = if br >= br_low && br < br_top {
        let ratio_low = (br - br_low) / (br_top - br_low);
        1.0 + ((1.0 + ((1.5 - ratio_low) * PI).sin()) / 2.0) * (dhi_pre / 100.0)
    } else if br > br_top && br <= br_upp {
        let ratio_upp = (br - br_top) / (br_upp - br_top);
        1.0 + ((1.0 + ((0.5 + ratio_upp) * PI).sin()) / 2.0) * (dhi_pre / 100.0)
    } else {
        1.0
    };

    log::trace!("pre-anthesis: Br={br:.4} range=[{br_low:.4}, {br_top:.4}, {br_upp}] Fpre={fpre:.5}");
    Ok(fpre)
}
