//! Layered configuration for the CLI.
//!
//! Precedence, highest first:
//! 1. `DCF_<SECTION>__<KEY>` environment variables
//! 2. the TOML file passed with `--config`
//! 3. built-in defaults
//!
//! ```bash
//! export DCF_DEFAULTS__WACC=0.09
//! export DCF_SENSITIVITY__WACC_RANGE__STEP=0.005
//! ```

use std::path::Path;

use dcf_core::scenarios::sensitivity::{
    default_terminal_growth_range, default_wacc_range, SweepRange,
};
use dcf_core::valuation::ValuationInputs;
use dcf_core::{Money, Rate};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DcfConfig {
    /// Values used when a flag or prompt answer is omitted
    #[serde(default)]
    pub defaults: ValuationDefaults,

    /// Sweep ranges for `dcf sensitivity`
    #[serde(default)]
    pub sensitivity: SensitivityDefaults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValuationDefaults {
    pub free_cash_flow: Money,
    pub growth_rate: Rate,
    pub wacc: Rate,
    pub projection_years: u32,
    pub terminal_growth: Rate,
}

impl Default for ValuationDefaults {
    fn default() -> Self {
        Self {
            free_cash_flow: dec!(100),
            growth_rate: dec!(0.05),
            wacc: dec!(0.10),
            projection_years: 5,
            terminal_growth: dec!(0.02),
        }
    }
}

impl ValuationDefaults {
    pub fn inputs(&self) -> ValuationInputs {
        ValuationInputs {
            free_cash_flow: self.free_cash_flow,
            growth_rate: self.growth_rate,
            wacc: self.wacc,
            projection_years: self.projection_years,
            terminal_growth: self.terminal_growth,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensitivityDefaults {
    pub wacc_range: SweepRange,
    pub terminal_growth_range: SweepRange,
}

impl Default for SensitivityDefaults {
    fn default() -> Self {
        Self {
            wacc_range: default_wacc_range(),
            terminal_growth_range: default_terminal_growth_range(),
        }
    }
}

impl DcfConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(format!("Config file {} does not exist", path.display()).into());
            }
            config = config.add_source(config::File::from(path));
        }

        config = config.add_source(
            config::Environment::with_prefix("DCF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built = config.build()?;
        tracing::debug!(?path, "loaded configuration");
        Ok(built.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_case() {
        let inputs = ValuationDefaults::default().inputs();
        assert_eq!(inputs.free_cash_flow, dec!(100));
        assert_eq!(inputs.projection_years, 5);
        assert_eq!(inputs.terminal_growth, dec!(0.02));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let path = Path::new("/nonexistent/dcf-config.toml");
        assert!(DcfConfig::load(Some(path)).is_err());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("dcf-cli-test-{}.toml", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "[defaults]").unwrap();
            writeln!(file, "free_cash_flow = \"250\"").unwrap();
            writeln!(file, "growth_rate = \"0.05\"").unwrap();
            writeln!(file, "wacc = \"0.09\"").unwrap();
            writeln!(file, "projection_years = 7").unwrap();
            writeln!(file, "terminal_growth = \"0.02\"").unwrap();
        }

        let loaded = DcfConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.defaults.free_cash_flow, dec!(250));
        assert_eq!(loaded.defaults.wacc, dec!(0.09));
        assert_eq!(loaded.defaults.projection_years, 7);
        assert_eq!(loaded.sensitivity.wacc_range, default_wacc_range());
    }
}
