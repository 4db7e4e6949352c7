use crate::error::{Result, StressError};
use crate::water_stress::TemperatureStress;
use serde::Deserialize;

// Daily values produced by the canopy, biomass and soil water models
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DailyInputs {
    pub cc: Vec<f64>,     // Canopy cover [-]
    pub b: Vec<f64>,      // Cumulative biomass [t/ha]
    pub b_ns: Vec<f64>,   // Cumulative biomass without stress [t/ha]
    pub dr: Vec<f64>,     // Root zone depletion [mm]
    pub taw: Vec<f64>,    // Root zone total available water [mm]
    pub et0: Vec<f64>,    // Reference evapotranspiration [mm/day]
    pub z_root: Vec<f64>, // Rooting depth [m]
    #[serde(default)]
    pub pol_c: Vec<f64>, // Cold stress on pollination [-]
    #[serde(default)]
    pub pol_h: Vec<f64>, // Heat stress on pollination [-]
    #[serde(default)]
    pub t_early_sen: Vec<f64>, // Days in early senescence
    #[serde(default)]
    pub delayed_cds: Vec<i64>, // Calendar days of delayed development
}

// Values for one simulated day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayInputs {
    pub cc: f64,
    pub b: f64,
    pub b_ns: f64,
    pub dr: f64,
    pub taw: f64,
    pub et0: f64,
    pub z_root: f64,
    pub kst: TemperatureStress,
    pub t_early_sen: f64,
    pub delayed_cds: i64,
}

impl DailyInputs {
    pub fn new() -> Self {
        DailyInputs::default()
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let inputs: DailyInputs = toml::from_str(toml_str)?;
        if inputs.n_days() == 0 {
            return Err(StressError::invalid("cc", 0.0, "daily inputs cover no days"));
        }
        Ok(inputs)
    }

    // Number of days covered by the canopy cover series
    pub fn n_days(&self) -> usize {
        self.cc.len()
    }

    // Value for day `day` (0-based); days past the end reuse the last value
    pub(crate) fn get_daily_value<T: Copy>(&self, day: usize, values: &[T], fallback: T) -> T {
        if day < values.len() {
            values[day]
        } else {
            *values.last().unwrap_or(&fallback)
        }
    }

    pub fn day(&self, day: usize) -> DayInputs {
        DayInputs {
            cc: self.get_daily_value(day, &self.cc, 0.0),
            b: self.get_daily_value(day, &self.b, 0.0),
            b_ns: self.get_daily_value(day, &self.b_ns, 0.0),
            dr: self.get_daily_value(day, &self.dr, 0.0),
            taw: self.get_daily_value(day, &self.taw, 0.0),
            et0: self.get_daily_value(day, &self.et0, 5.0),
            z_root: self.get_daily_value(day, &self.z_root, 0.0),
            kst: TemperatureStress {
                pol_c: self.get_daily_value(day, &self.pol_c, 1.0),
                pol_h: self.get_daily_value(day, &self.pol_h, 1.0),
            },
            t_early_sen: self.get_daily_value(day, &self.t_early_sen, 0.0),
            delayed_cds: self.get_daily_value(day, &self.delayed_cds, 0),
        }
    }
}
