use crate::crop_params::CropParameters;
use crate::crop_state::CropRunningState;
use crate::error::{Result, StressError};
use crate::water_stress::StressCoefficients;

// Both corrections need an essentially unconstrained pre-anthesis factor and a green canopy
const FPRE_MIN: f64 = 0.99;
const CC_MIN: f64 = 0.001;

/// Harvest index adjustment for post-anthesis water stress.
///
/// Two corrections run over their own windows after the start of yield
/// formation: restricted leaf expansion raises the harvest index (`sCor1`,
/// `fpost_upp`) and stomatal closure lowers it (`sCor2`, `fpost_dwn`). Both
/// are blended into `state.fpost` in proportion to the shorter window.
///
/// While the averaging period `DayCor` is not yet positive both tracks are
/// left untouched: neither accumulator advances and each factor keeps its
/// value, so `Fpost` is recombined from the stored factors.
pub fn hi_adj_post_anthesis(
    crop: &CropParameters,
    ksw: &StressCoefficients,
    state: &mut CropRunningState,
) -> Result<()> {
    let tmax1 = crop.expansion_window();
    let tmax2 = crop.stomatal_window();
    if tmax1 < 0 {
        return Err(StressError::invalid(
            "canopy_dev_end_cd - hi_start_cd",
            tmax1 as f64,
            "leaf expansion window cannot be negative",
        ));
    }
    if tmax2 < 0 {
        return Err(StressError::invalid(
            "yld_form_cd",
            tmax2 as f64,
            "yield formation window cannot be negative",
        ));
    }

    let dap = state.dap - state.delayed_cds;
    let day_cor = dap - 1 - crop.hi_start_cd;
    let ready = state.fpre > FPRE_MIN && state.cc > CC_MIN;

    // Leaf expansion
    if ready && dap <= crop.canopy_dev_end_cd + 1 && tmax1 > 0 && crop.a_hi > 0.0 {
        if day_cor > 0 {
            let d_cor = 1.0 + (1.0 - ksw.exp) / crop.a_hi;
            state.s_cor1 += d_cor / tmax1 as f64;
            state.fpost_upp = (tmax1 as f64 / day_cor as f64) * state.s_cor1;
        } else {
            log::warn!("post-anthesis: DayCor={day_cor} at DAP {}, leaf expansion track skipped", state.dap);
        }
    }

    // Stomatal closure
    if ready && dap <= crop.hi_end_cd + 1 && tmax2 > 0 && crop.b_hi > 0.0 {
        if day_cor > 0 {
            let d_cor = ksw.sto.powf(0.1) * (1.0 - (1.0 - ksw.sto) / crop.b_hi);
            state.s_cor2 += d_cor / tmax2 as f64;
            state.fpost_dwn = (tmax2 as f64 / day_cor as f64) * state.s_cor2;
        } else {
            log::warn!("post-anthesis: DayCor={day_cor} at DAP {}, stomatal closure track skipped", state.dap);
        }
    }

    state.fpost = combine(tmax1, tmax2, state.fpost_upp, state.fpost_dwn);
    log::trace!(
        "post-anthesis: sCor1={:.5} sCor2={:.5} upp={:.5} dwn={:.5} Fpost={:.5}",
        state.s_cor1,
        state.s_cor2,
        state.fpost_upp,
        state.fpost_dwn,
        state.fpost
    );
    Ok(())
}

// Weight the two factors by the share of the longer window covered by the shorter one
fn combine(tmax1: i64, tmax2: i64, fpost_upp: f64, fpost_dwn: f64) -> f64 {
    let (t1, t2) = (tmax1 as f64, tmax2 as f64);
    match (tmax1, tmax2) {
        (0, 0) => 1.0,
        (_, 0) => fpost_upp,
        (0, _) => fpost_dwn,
        _ if tmax1 <= tmax2 => fpost_dwn * ((t1 * fpost_upp) + (t2 - t1)) / t2,
        _ => fpost_upp * ((t2 * fpost_dwn) + (t1 - t2)) / t1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flowering_state(crop: &CropParameters, hi_t: i64) -> CropRunningState {
        let mut state = CropRunningState::new(1);
        state.cc = 0.8;
        state.dap = crop.hi_start_cd + 1 + hi_t;
        state
    }

    #[test]
    fn no_windows_means_no_adjustment() {
        let mut crop = CropParameters::new();
        crop.canopy_dev_end_cd = crop.hi_start_cd;
        crop.yld_form_cd = 0;
        let mut state = flowering_state(&crop, 3);
        state.fpost = 0.4;
        hi_adj_post_anthesis(&crop, &StressCoefficients::default(), &mut state).unwrap();
        assert_eq!(state.fpost, 1.0);
    }

    #[test]
    fn unstressed_season_keeps_factor_at_one() {
        let crop = CropParameters::new();
        let ksw = StressCoefficients::default();
        let mut state = flowering_state(&crop, 1);
        for _ in 0..60 {
            hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
            assert_relative_eq!(state.fpost, 1.0, epsilon = 1e-9);
            state.dap += 1;
        }
    }

    #[test]
    fn expansion_stress_raises_and_stomatal_stress_lowers() {
        let crop = CropParameters::new();
        let ksw = StressCoefficients {
            exp: 0.5,
            ..StressCoefficients::default()
        };
        let mut state = flowering_state(&crop, 1);
        hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
        assert_relative_eq!(state.fpost_upp, 1.0 + 0.5 / crop.a_hi, epsilon = 1e-12);
        assert!(state.fpost > 1.0);

        let ksw = StressCoefficients {
            sto: 0.5,
            ..StressCoefficients::default()
        };
        let mut state = flowering_state(&crop, 1);
        hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
        let d_cor = 0.5f64.powf(0.1) * (1.0 - 0.5 / crop.b_hi);
        assert_relative_eq!(state.fpost_dwn, d_cor, epsilon = 1e-12);
        assert!(state.fpost < 1.0);
    }

    #[test]
    fn blends_by_shorter_window() {
        let crop = CropParameters::new();
        let ksw = StressCoefficients {
            exp: 0.2,
            sto: 0.6,
            ..StressCoefficients::default()
        };
        let mut state = flowering_state(&crop, 1);
        hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
        let (t1, t2) = (8.0, 45.0);
        let expected = state.fpost_dwn * (t1 * state.fpost_upp + (t2 - t1)) / t2;
        assert_relative_eq!(state.fpost, expected, epsilon = 1e-12);
    }

    #[test]
    fn longer_expansion_window_swaps_roles() {
        assert_relative_eq!(combine(10, 4, 1.2, 0.9), 1.2 * (4.0 * 0.9 + 6.0) / 10.0);
        assert_relative_eq!(combine(4, 10, 1.2, 0.9), 0.9 * (4.0 * 1.2 + 6.0) / 10.0);
        assert_eq!(combine(4, 0, 1.2, 0.9), 1.2);
        assert_eq!(combine(0, 4, 1.2, 0.9), 0.9);
    }

    #[test]
    fn corrections_freeze_after_their_windows() {
        let crop = CropParameters::new();
        let ksw = StressCoefficients {
            exp: 0.3,
            sto: 0.3,
            ..StressCoefficients::default()
        };
        let mut state = flowering_state(&crop, crop.expansion_window() + 1);
        hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
        assert_eq!(state.s_cor1, 0.0);
        assert!(state.s_cor2 > 0.0);

        let mut state = flowering_state(&crop, crop.yld_form_cd + 1);
        hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
        assert_eq!(state.s_cor2, 0.0);
        assert_eq!(state.fpost, 1.0);
    }

    #[test]
    fn constrained_pre_anthesis_blocks_corrections() {
        let crop = CropParameters::new();
        let ksw = StressCoefficients {
            exp: 0.3,
            sto: 0.3,
            ..StressCoefficients::default()
        };
        let mut state = flowering_state(&crop, 2);
        state.fpre = 0.9;
        hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
        assert_eq!(state.s_cor1, 0.0);
        assert_eq!(state.s_cor2, 0.0);
        assert_eq!(state.fpost, 1.0);
    }

    #[test]
    fn day_before_window_leaves_both_tracks_untouched() {
        let crop = CropParameters::new();
        let mut state = flowering_state(&crop, 0);
        hi_adj_post_anthesis(&crop, &StressCoefficients::default(), &mut state).unwrap();
        assert_eq!(state.s_cor1, 0.0);
        assert_eq!(state.s_cor2, 0.0);
        assert_eq!(state.fpost_upp, 1.0);
        assert_eq!(state.fpost_dwn, 1.0);
        assert_relative_eq!(state.fpost, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unstressed_season_starting_before_window_stays_neutral() {
        let crop = CropParameters::new();
        let ksw = StressCoefficients::default();
        let mut state = flowering_state(&crop, -3);
        for _ in 0..60 {
            hi_adj_post_anthesis(&crop, &ksw, &mut state).unwrap();
            assert_relative_eq!(state.fpost, 1.0, epsilon = 1e-9);
            state.dap += 1;
        }
        assert_relative_eq!(state.s_cor1, 1.0, epsilon = 1e-9);
        assert_relative_eq!(state.s_cor2, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_window_is_rejected() {
        let mut crop = CropParameters::new();
        crop.yld_form_cd = -1;
        let mut state = flowering_state(&crop, 1);
        assert!(hi_adj_post_anthesis(&crop, &StressCoefficients::default(), &mut state).is_err());
    }
}
