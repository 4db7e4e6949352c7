use crate::crop_params::CropParameters;
use crate::crop_state::CropRunningState;
use crate::error::{Result, StressError};
use crate::soil_profile::SoilProfile;
use serde::Deserialize;

// Irrigation methods, written as their integer code in configuration files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum IrrigationMethod {
    Rainfed,        // 0
    SoilMoisture,   // 1: soil moisture threshold
    FixedInterval,  // 2
    Schedule,       // 3: predefined schedule
    NetIrrigation,  // 4: root zone kept above a moisture target
    ConstantDepth,  // 5
}

impl TryFrom<u8> for IrrigationMethod {
    type Error = StressError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(IrrigationMethod::Rainfed),
            1 => Ok(IrrigationMethod::SoilMoisture),
            2 => Ok(IrrigationMethod::FixedInterval),
            3 => Ok(IrrigationMethod::Schedule),
            4 => Ok(IrrigationMethod::NetIrrigation),
            5 => Ok(IrrigationMethod::ConstantDepth),
            _ => Err(StressError::invalid(
                "irrigation_method",
                f64::from(code),
                "unknown irrigation method code",
            )),
        }
    }
}

// Irrigation management parameters
#[derive(Clone, Debug, Deserialize)]
pub struct IrrigationManagementConfig {
    pub irrigation_method: IrrigationMethod,
    pub net_irr_smt: f64, // Net irrigation target [% of available water]
}

impl IrrigationManagementConfig {
    pub fn new() -> Self {
        IrrigationManagementConfig {
            irrigation_method: IrrigationMethod::Rainfed,
            net_irr_smt: 80.0,
        }
    }

    pub fn net_irrigation(net_irr_smt: f64) -> Self {
        IrrigationManagementConfig {
            irrigation_method: IrrigationMethod::NetIrrigation,
            net_irr_smt,
        }
    }
}

impl Default for IrrigationManagementConfig {
    fn default() -> Self {
        Self::new()
    }
}

/**
Tops up the root zone on the first day after planting in net irrigation mode.

Every compartment above the one containing the root depth is raised to the
net irrigation target; water content is never lowered.

# Returns
The pre-irrigation depth applied today in mm (0 outside net irrigation mode,
outside the growing season, or on any day but the first).
*/
pub fn pre_irrigation(
    prof: &SoilProfile,
    crop: &CropParameters,
    state: &mut CropRunningState,
    growing_season: bool,
    irr_mngt: &IrrigationManagementConfig,
) -> Result<f64> {
    if !growing_season
        || irr_mngt.irrigation_method != IrrigationMethod::NetIrrigation
        || state.dap != 1
    {
        return Ok(0.0);
    }

    if state.th.len() != prof.n_compartments() {
        return Err(StressError::invalid(
            "th",
            state.th.len() as f64,
            "water content length differs from number of compartments",
        ));
    }

    let root_depth = (state.z_root.max(crop.z_min) * 100.0).round() / 100.0;
    let comp_rz = prof.compartment_at_depth(root_depth).ok_or_else(|| {
        StressError::invalid("z_root", root_depth, "root zone extends below the soil profile")
    })?;

    // The compartment holding the root tip is left alone
    let mut pre_irr = 0.0;
    for ii in 0..comp_rz {
        let th_crit = prof.water_content_at(ii, irr_mngt.net_irr_smt);
        if state.th[ii] < th_crit {
            pre_irr += (th_crit - state.th[ii]) * 1000.0 * prof.dz[ii];
            state.th[ii] = th_crit;
        }
    }

    log::trace!("pre-irrigation: root depth {root_depth:.2} m, {comp_rz} compartments, {pre_irr:.2} mm");
    Ok(pre_irr)
}
