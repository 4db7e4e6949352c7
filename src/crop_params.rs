use crate::error::{Result, StressError};
use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Deserializer};

// Index of each stress type in the threshold vectors
pub const EXPANSION: usize = 0;
pub const STOMATAL: usize = 1;
pub const SENESCENCE: usize = 2;
pub const POLLINATION: usize = 3;

// Crop parameters for water stress and harvest index adjustment (one per variety)
#[derive(Clone, Debug, Deserialize)]
pub struct CropParameters {
    #[serde(deserialize_with = "vector4")]
    pub p_up: Vector4<f64>, // Depletion fractions where stress begins [-]
    #[serde(deserialize_with = "vector4")]
    pub p_lo: Vector4<f64>, // Depletion fractions where stress is total [-]
    #[serde(deserialize_with = "vector3")]
    pub fshape_w: Vector3<f64>, // Shape factors for expansion, stomatal, senescence curves [-]
    pub et_adj: bool,           // Adjust thresholds for reference ET
    pub beta: f64,              // Senescence threshold reduction after early senescence [%]
    pub exc: f64,               // Excess of potential fruits [%]
    pub cc_min: f64,            // Minimum canopy cover for pollination [-]
    pub z_min: f64,             // Minimum effective rooting depth [m]
    pub flowering_cd: i64,      // Duration of flowering [calendar days]
    pub canopy_dev_end_cd: i64, // End of canopy development [calendar days]
    pub hi_start_cd: i64,       // Start of yield formation [calendar days]
    pub hi_end_cd: i64,         // End of yield formation [calendar days]
    pub yld_form_cd: i64,       // Duration of yield formation [calendar days]
    pub a_hi: f64,              // HI sensitivity to restricted leaf expansion [-]
    pub b_hi: f64,              // HI sensitivity to stomatal closure [-]
    pub dhi_pre: f64,           // Maximum pre-anthesis HI increase [%]
}

impl CropParameters {
    pub fn new() -> Self {
        // Generic cereal with a short flowering window
        let hi_start_cd = 80;
        let flowering_cd = 15;
        let yld_form_cd = 45;
        CropParameters {
            p_up: Vector4::new(0.2, 0.65, 0.7, 0.85),
            p_lo: Vector4::new(0.65, 1.0, 1.0, 1.0),
            fshape_w: Vector3::new(5.0, 2.5, 2.5),
            et_adj: true,
            beta: 15.0,
            exc: 100.0,
            cc_min: 0.1,
            z_min: 0.3,
            flowering_cd,
            canopy_dev_end_cd: hi_start_cd + 8,
            hi_start_cd,
            hi_end_cd: hi_start_cd + yld_form_cd,
            yld_form_cd,
            a_hi: 10.0,
            b_hi: 7.0,
            dhi_pre: 5.0,
        }
    }

    // Window of the leaf expansion correction [calendar days]
    pub fn expansion_window(&self) -> i64 {
        self.canopy_dev_end_cd - self.hi_start_cd
    }

    // Window of the stomatal closure correction [calendar days]
    pub fn stomatal_window(&self) -> i64 {
        self.yld_form_cd
    }

    // Checks the parameters the harvest-index routines divide by
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("p_up", &self.p_up), ("p_lo", &self.p_lo)] {
            if let Some(p) = v.iter().find(|p| !p.is_finite()) {
                return Err(StressError::invalid(name, *p, "threshold must be finite"));
            }
        }
        if let Some(s) = self.fshape_w.iter().find(|s| !s.is_finite()) {
            return Err(StressError::invalid("fshape_w", *s, "shape factor must be finite"));
        }
        if self.expansion_window() < 0 {
            return Err(StressError::invalid(
                "canopy_dev_end_cd - hi_start_cd",
                self.expansion_window() as f64,
                "leaf expansion window cannot be negative",
            ));
        }
        if self.yld_form_cd < 0 {
            return Err(StressError::invalid(
                "yld_form_cd",
                self.yld_form_cd as f64,
                "yield formation window cannot be negative",
            ));
        }
        if self.flowering_cd < 0 {
            return Err(StressError::invalid(
                "flowering_cd",
                self.flowering_cd as f64,
                "flowering duration cannot be negative",
            ));
        }
        Ok(())
    }
}

impl Default for CropParameters {
    fn default() -> Self {
        Self::new()
    }
}

fn vector4<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vector4<f64>, D::Error> {
    let values = <[f64; 4]>::deserialize(deserializer)?;
    Ok(Vector4::from(values))
}

fn vector3<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vector3<f64>, D::Error> {
    let values = <[f64; 3]>::deserialize(deserializer)?;
    Ok(Vector3::from(values))
}
