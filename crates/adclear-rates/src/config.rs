//! Operator configuration file management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{RatesError, Result};

/// A source of locally configured settlement parameters.
pub trait OperatorConfigSource {
    /// The operator fee rate as a fraction in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// - [`RatesError::MissingConfiguration`] if the rate is not set (no
    ///   silent default: an operator must state its cut explicitly)
    fn operator_fee_rate(&self) -> Result<f64>;
}

/// Complete settlement configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Fee settings.
    #[serde(default)]
    pub fees: FeesConfig,
    /// Reporting settings.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Fee configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeesConfig {
    /// Operator fee fraction. No default; settlement refuses to run
    /// without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_rate: Option<f64>,
}

/// Reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Reporting currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

impl SettlementConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: SettlementConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            tracing::info!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("ADCLEAR_DATA_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".adclear").join("config.toml"))
            .unwrap_or_else(|_| PathBuf::from("/tmp/adclear/config.toml"))
    }
}

impl OperatorConfigSource for SettlementConfig {
    fn operator_fee_rate(&self) -> Result<f64> {
        self.fees
            .operator_rate
            .ok_or_else(|| RatesError::MissingConfiguration("fees.operator_rate".to_string()))
    }
}
