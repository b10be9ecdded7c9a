use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MatrixError;
use crate::utils::{DEFAULT_PRECISION, MAX_PRECISION};

/// Engine wide settings. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Decimal places kept by rounded operations.
    pub precision: u32,
    pub random_min: f64,
    pub random_max: f64,
    /// Decimal places of randomly generated cells.
    pub random_decimals: u32,
    /// Largest square matrix accepted for a determinant.
    pub max_determinant_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            precision: DEFAULT_PRECISION,
            random_min: -100.0,
            random_max: 100.0,
            random_decimals: 1,
            max_determinant_size: 10,
        }
    }
}

impl EngineConfig {
    /// Bounds must be finite, ordered, and no further apart than an f64 can hold.
    pub fn validate(&self) -> crate::error::Result<()> {
        let (min, max) = (self.random_min, self.random_max);
        if !(min <= max) || !(max - min).is_finite() {
            return Err(MatrixError::InvalidRange { min, max });
        }
        for precision in [self.precision, self.random_decimals] {
            if precision > MAX_PRECISION {
                return Err(MatrixError::PrecisionTooHigh {
                    precision,
                    max: MAX_PRECISION,
                });
            }
        }
        Ok(())
    }
}

pub fn load_engine_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: EngineConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", path.as_ref().display()))?;
    info!("loaded engine config from {}", path.as_ref().display());
    Ok(config)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: EngineConfig = serde_json::from_str(r#"{ "precision": 4 }"#).unwrap();
        assert_eq!(config.precision, 4);
        assert_eq!(config.random_min, -100.0);
        assert_eq!(config.max_determinant_size, 10);
    }

    #[test]
    fn test_validate() {
        assert!(EngineConfig::default().validate().is_ok());
        let inverted = EngineConfig {
            random_min: 5.0,
            random_max: -5.0,
            ..EngineConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(MatrixError::InvalidRange {
                min: 5.0,
                max: -5.0
            })
        );

        let overflowing = EngineConfig {
            random_min: -1e308,
            random_max: 1e308,
            ..EngineConfig::default()
        };
        assert!(matches!(
            overflowing.validate(),
            Err(MatrixError::InvalidRange { .. })
        ));
        let unbounded = EngineConfig {
            random_max: f64::INFINITY,
            ..EngineConfig::default()
        };
        assert!(unbounded.validate().is_err());
        let nan = EngineConfig {
            random_min: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(nan.validate().is_err());

        let precise = EngineConfig {
            precision: 16,
            ..EngineConfig::default()
        };
        assert_eq!(
            precise.validate(),
            Err(MatrixError::PrecisionTooHigh {
                precision: 16,
                max: 15
            })
        );
        let decimals = EngineConfig {
            random_decimals: u32::MAX,
            ..EngineConfig::default()
        };
        assert!(decimals.validate().is_err());
        assert!(EngineConfig {
            precision: 15,
            random_decimals: 15,
            ..EngineConfig::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_load_engine_config() {
        let path = std::env::temp_dir().join(format!("matrix_calc_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "precision": 6, "random_decimals": 0 }"#).unwrap();
        let config = load_engine_config(&path).unwrap();
        assert_eq!(config.precision, 6);
        assert_eq!(config.random_decimals, 0);

        std::fs::write(&path, "{ not json").unwrap();
        let error = load_engine_config(&path).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config"));

        std::fs::write(&path, r#"{ "random_min": 1, "random_max": 0 }"#).unwrap();
        assert!(load_engine_config(&path).is_err());
        std::fs::remove_file(&path).unwrap();

        let error = load_engine_config(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to read config"));
    }
}
