use crate::config::SiteConfig;
use crate::crop_state::CropRunningState;
use crate::daily_inputs::DailyInputs;
use crate::error::{Result, StressError};
use crate::irrigation::pre_irrigation;
use crate::pollination::hi_adj_pollination;
use crate::post_anthesis::hi_adj_post_anthesis;
use crate::pre_anthesis::hi_adj_pre_anthesis;
use crate::water_stress::{StressCoefficients, water_stress};
use nalgebra::DVector;

// Outcome of one simulated day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyRecord {
    pub dap: i64,
    pub pre_irr: f64, // Pre-irrigation applied [mm]
    pub ksw: StressCoefficients,
    pub fpre: f64,
    pub fpol: f64,
    pub fpost: f64,
}

// Replays a season of daily inputs through the stress and harvest index routines
pub struct StressSimulation {
    site: SiteConfig,
    inputs: DailyInputs,
    state: CropRunningState,
}

impl StressSimulation {
    // Starts at sowing with every compartment at field capacity
    pub fn new(site: SiteConfig, inputs: DailyInputs) -> Self {
        let mut state = CropRunningState::new(site.soil.n_compartments());
        state.th = site.soil.th_fc.clone();
        // Crops without a flowering stage cannot lose yield to failed pollination
        if site.crop.flowering_cd == 0 {
            state.fpol = 1.0;
        }
        StressSimulation {
            site,
            inputs,
            state,
        }
    }

    // Replace the initial water content of each compartment [m³/m³]
    pub fn with_water_content(mut self, th: Vec<f64>) -> Result<Self> {
        if th.len() != self.site.soil.n_compartments() {
            return Err(StressError::invalid(
                "th",
                th.len() as f64,
                "water content length differs from number of compartments",
            ));
        }
        self.state.th = DVector::from_vec(th);
        Ok(self)
    }

    pub fn state(&self) -> &CropRunningState {
        &self.state
    }

    // Advance the crop by one day: pre-irrigation, water stress, then the HI factors due today
    fn step(&mut self, day: usize) -> Result<DailyRecord> {
        let crop = &self.site.crop;
        let today = self.inputs.day(day);

        let state = &mut self.state;
        state.dap += 1;
        state.cc = today.cc;
        state.b = today.b;
        state.b_ns = today.b_ns;
        state.z_root = today.z_root;
        state.t_early_sen = today.t_early_sen;
        state.delayed_cds = today.delayed_cds;

        let pre_irr = pre_irrigation(&self.site.soil, crop, state, true, &self.site.irrigation)?;
        let ksw = water_stress(crop, state.t_early_sen, today.dr, today.taw, today.et0, true)?;

        let hi_t = state.hi_t(crop);
        if hi_t >= 0 && !state.pre_adj {
            state.fpre = hi_adj_pre_anthesis(state.b, state.b_ns, state.cc, crop.dhi_pre)?;
            state.pre_adj = true;
        }
        if hi_t > 0 && hi_t <= crop.flowering_cd {
            state.fpol = hi_adj_pollination(
                state.cc,
                state.fpol,
                crop.flowering_cd as f64,
                crop.cc_min,
                crop.exc,
                &ksw,
                &today.kst,
                hi_t as f64,
            )?;
        }
        if hi_t > 0 {
            hi_adj_post_anthesis(crop, &ksw, state)?;
        }

        log::debug!(
            "DAP {}: HIt={hi_t} PreIrr={pre_irr:.2} Ksw.exp={:.3} Ksw.sto={:.3} Fpre={:.4} Fpol={:.4} Fpost={:.4}",
            state.dap,
            ksw.exp,
            ksw.sto,
            state.fpre,
            state.fpol,
            state.fpost
        );

        Ok(DailyRecord {
            dap: state.dap,
            pre_irr,
            ksw,
            fpre: state.fpre,
            fpol: state.fpol,
            fpost: state.fpost,
        })
    }

    // Run every day of the inputs and return one record per day
    pub fn run(&mut self) -> Result<Vec<DailyRecord>> {
        self.site.validate()?;
        let n_days = self.inputs.n_days();
        let mut records = Vec::with_capacity(n_days);
        for day in 0..n_days {
            records.push(self.step(day)?);
        }
        log::debug!(
            "season finished after {n_days} days, HI adjustment {:.4}",
            self.state.hi_adjustment()
        );
        Ok(records)
    }
}
