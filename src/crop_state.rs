use crate::crop_params::CropParameters;
use nalgebra::DVector;

/// Running crop state, created at sowing and advanced once per simulated day.
///
/// The stress routines take `&mut CropRunningState` and update it in place;
/// the caller owns it for the whole season.
#[derive(Clone, Debug)]
pub struct CropRunningState {
    pub b: f64,              // Cumulative biomass [t/ha]
    pub b_ns: f64,           // Cumulative biomass without stress [t/ha]
    pub cc: f64,             // Canopy cover [-]
    pub dap: i64,            // Days after planting
    pub z_root: f64,         // Rooting depth [m]
    pub th: DVector<f64>,    // Water content per compartment [m³/m³]
    pub delayed_cds: i64,    // Calendar days of delayed development
    pub s_cor1: f64,         // Leaf expansion correction accumulator
    pub s_cor2: f64,         // Stomatal closure correction accumulator
    pub fpost_upp: f64,      // Post-anthesis factor from leaf expansion
    pub fpost_dwn: f64,      // Post-anthesis factor from stomatal closure
    pub fpre: f64,           // Pre-anthesis HI factor
    pub fpol: f64,           // Pollination HI factor
    pub fpost: f64,          // Post-anthesis HI factor
    pub t_early_sen: f64,    // Days in early senescence
    pub pre_adj: bool,       // Pre-anthesis factor already fixed for the season
}

impl CropRunningState {
    pub fn new(n_compartments: usize) -> Self {
        CropRunningState {
            b: 0.0,
            b_ns: 0.0,
            cc: 0.0,
            dap: 0,
            z_root: 0.0,
            th: DVector::zeros(n_compartments),
            delayed_cds: 0,
            s_cor1: 0.0,
            s_cor2: 0.0,
            fpost_upp: 1.0,
            fpost_dwn: 1.0,
            fpre: 1.0,
            fpol: 0.0,
            fpost: 1.0,
            t_early_sen: 0.0,
            pre_adj: false,
        }
    }

    // Calendar days since the start of yield formation (0 on the first day)
    pub fn hi_t(&self, crop: &CropParameters) -> i64 {
        self.dap - self.delayed_cds - crop.hi_start_cd - 1
    }

    // Combined multiplier applied to the reference harvest index
    pub fn hi_adjustment(&self) -> f64 {
        self.fpre * self.fpol * self.fpost
    }
}
