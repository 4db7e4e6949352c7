mod config;
mod crop_params;
mod crop_state;
mod daily_inputs;
mod error;
mod irrigation;
mod pollination;
mod post_anthesis;
mod pre_anthesis;
mod simulation;
mod soil_profile;
mod water_stress;

pub use config::SiteConfig;
pub use crop_params::{CropParameters, EXPANSION, POLLINATION, SENESCENCE, STOMATAL};
pub use crop_state::CropRunningState;
pub use daily_inputs::{DailyInputs, DayInputs};
pub use error::{Result, StressError};
pub use irrigation::{IrrigationManagementConfig, IrrigationMethod, pre_irrigation};
pub use pollination::{fractional_flowering, hi_adj_pollination};
pub use post_anthesis::hi_adj_post_anthesis;
pub use pre_anthesis::hi_adj_pre_anthesis;
pub use simulation::{DailyRecord, StressSimulation};
pub use soil_profile::SoilProfile;
pub use water_stress::{StressCoefficients, TemperatureStress, water_stress, water_stress_coefficients};
