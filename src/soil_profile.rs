use crate::error::StressError;
use nalgebra::DVector;
use serde::Deserialize;

// Compartment layout as written in the TOML tables
#[derive(Deserialize)]
struct CompartmentTable {
    dz: Vec<f64>,
    th_wp: Vec<f64>,
    th_fc: Vec<f64>,
}

// Soil profile discretised into compartments, top to bottom
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "CompartmentTable")]
pub struct SoilProfile {
    pub dz: DVector<f64>,    // Compartment thickness [m]
    pub dzsum: DVector<f64>, // Depth to the bottom of each compartment [m]
    pub th_wp: DVector<f64>, // Water content at wilting point [m³/m³]
    pub th_fc: DVector<f64>, // Water content at field capacity [m³/m³]
}

impl SoilProfile {
    // This function creates a profile from compartment thicknesses and water content limits
    pub fn new(dz: Vec<f64>, th_wp: Vec<f64>, th_fc: Vec<f64>) -> Result<Self, StressError> {
        if dz.is_empty() {
            return Err(StressError::invalid("dz", 0.0, "profile needs at least one compartment"));
        }
        if th_wp.len() != dz.len() {
            return Err(StressError::invalid(
                "th_wp",
                th_wp.len() as f64,
                "length differs from number of compartments",
            ));
        }
        if th_fc.len() != dz.len() {
            return Err(StressError::invalid(
                "th_fc",
                th_fc.len() as f64,
                "length differs from number of compartments",
            ));
        }
        if let Some(t) = dz.iter().find(|t| **t <= 0.0 || !t.is_finite()) {
            return Err(StressError::invalid("dz", *t, "compartment thickness must be positive"));
        }

        // Cumulative depths are kept at centimetre precision
        let mut depth = 0.0;
        let dzsum = dz
            .iter()
            .map(|t| {
                depth += t;
                (depth * 100.0).round() / 100.0
            })
            .collect::<Vec<_>>();

        Ok(SoilProfile {
            dz: DVector::from_vec(dz),
            dzsum: DVector::from_vec(dzsum),
            th_wp: DVector::from_vec(th_wp),
            th_fc: DVector::from_vec(th_fc),
        })
    }

    // Uniform profile of `n` equal compartments
    pub fn uniform(n: usize, dz: f64, th_wp: f64, th_fc: f64) -> Result<Self, StressError> {
        SoilProfile::new(vec![dz; n], vec![th_wp; n], vec![th_fc; n])
    }

    pub fn n_compartments(&self) -> usize {
        self.dz.len()
    }

    // First compartment whose bottom reaches `depth`, None if the profile is too shallow
    pub fn compartment_at_depth(&self, depth: f64) -> Option<usize> {
        self.dzsum.iter().position(|z| *z >= depth)
    }

    // Water content at `pct` percent of the available range of compartment `i`
    pub(crate) fn water_content_at(&self, i: usize, pct: f64) -> f64 {
        self.th_wp[i] + (pct / 100.0) * (self.th_fc[i] - self.th_wp[i])
    }
}

impl TryFrom<CompartmentTable> for SoilProfile {
    type Error = StressError;

    fn try_from(table: CompartmentTable) -> Result<Self, Self::Error> {
        SoilProfile::new(table.dz, table.th_wp, table.th_fc)
    }
}
