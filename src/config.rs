use crate::crop_params::CropParameters;
use crate::error::{Result, StressError};
use crate::irrigation::IrrigationManagementConfig;
use crate::soil_profile::SoilProfile;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Read-only inputs of one field: crop variety, soil profile and irrigation management.
///
/// ```toml
/// [crop]
/// p_up = [0.2, 0.65, 0.7, 0.85]
/// # ...
///
/// [soil]
/// dz = [0.1, 0.1, 0.1]
/// th_wp = [0.1, 0.1, 0.1]
/// th_fc = [0.3, 0.3, 0.3]
///
/// [irrigation]
/// irrigation_method = 4
/// net_irr_smt = 80.0
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct SiteConfig {
    pub crop: CropParameters,
    pub soil: SoilProfile,
    #[serde(default)]
    pub irrigation: IrrigationManagementConfig,
}

impl SiteConfig {
    pub fn new(crop: CropParameters, soil: SoilProfile, irrigation: IrrigationManagementConfig) -> Self {
        SiteConfig {
            crop,
            soil,
            irrigation,
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|source| StressError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml_str)
    }

    pub fn validate(&self) -> Result<()> {
        self.crop.validate()?;
        if !(0.0..=100.0).contains(&self.irrigation.net_irr_smt) {
            return Err(StressError::invalid(
                "net_irr_smt",
                self.irrigation.net_irr_smt,
                "target must be a percentage",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irrigation::IrrigationMethod;

    const SITE: &str = r#"
[crop]
p_up = [0.2, 0.65, 0.7, 0.85]
p_lo = [0.65, 1.0, 1.0, 1.0]
fshape_w = [5.0, 2.5, 2.5]
et_adj = true
beta = 15.0
exc = 100.0
cc_min = 0.1
z_min = 0.3
flowering_cd = 15
canopy_dev_end_cd = 88
hi_start_cd = 80
hi_end_cd = 125
yld_form_cd = 45
a_hi = 10.0
b_hi = 7.0
dhi_pre = 5.0

[soil]
dz = [0.1, 0.1, 0.2]
th_wp = [0.1, 0.1, 0.12]
th_fc = [0.3, 0.3, 0.32]

[irrigation]
irrigation_method = 4
net_irr_smt = 70.0
"#;

    #[test]
    fn parses_site_tables() {
        let site = SiteConfig::from_toml_str(SITE).unwrap();
        assert_eq!(site.crop.p_up[3], 0.85);
        assert_eq!(site.crop.fshape_w[0], 5.0);
        assert_eq!(site.crop.expansion_window(), 8);
        assert_eq!(site.soil.n_compartments(), 3);
        assert_eq!(site.soil.dzsum[2], 0.4);
        assert_eq!(site.irrigation.irrigation_method, IrrigationMethod::NetIrrigation);
    }

    #[test]
    fn irrigation_table_is_optional() {
        let site_str = SITE.split("[irrigation]").next().unwrap();
        let site = SiteConfig::from_toml_str(site_str).unwrap();
        assert_eq!(site.irrigation.irrigation_method, IrrigationMethod::Rainfed);
    }

    #[test]
    fn wrong_threshold_count_is_a_parse_error() {
        let broken = SITE.replace("p_lo = [0.65, 1.0, 1.0, 1.0]", "p_lo = [0.65, 1.0, 1.0]");
        assert!(matches!(SiteConfig::from_toml_str(&broken), Err(StressError::Toml(_))));
    }

    #[test]
    fn unknown_irrigation_code_is_rejected() {
        let broken = SITE.replace("irrigation_method = 4", "irrigation_method = 9");
        assert!(SiteConfig::from_toml_str(&broken).is_err());
    }

    #[test]
    fn mismatched_compartments_are_rejected() {
        let broken = SITE.replace("th_fc = [0.3, 0.3, 0.32]", "th_fc = [0.3, 0.3]");
        assert!(SiteConfig::from_toml_str(&broken).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        match SiteConfig::from_file("does/not/exist.toml") {
            Err(StressError::Io { path, .. }) => assert!(path.ends_with("exist.toml")),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
