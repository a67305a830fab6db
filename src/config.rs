use serde::{Deserialize, Serialize};

use crate::{
    aamva::{DEFAULT_AAMVA_VERSION, DEFAULT_JURISDICTION_VERSION},
    barcode::BarcodeConfig,
    document::Versions,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generator configuration.
///
/// Every field is optional in its serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// AAMVA version number written in the file header.
    #[serde(default = "Config::aamva_version_default")]
    pub aamva_version: u8,

    /// Jurisdiction version number written in the file header.
    #[serde(default = "Config::jurisdiction_version_default")]
    pub jurisdiction_version: u8,

    #[serde(default)]
    pub barcode: BarcodeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aamva_version: Self::aamva_version_default(),
            jurisdiction_version: Self::jurisdiction_version_default(),
            barcode: BarcodeConfig::default(),
        }
    }
}

impl Config {
    fn aamva_version_default() -> u8 {
        DEFAULT_AAMVA_VERSION
    }

    fn jurisdiction_version_default() -> u8 {
        DEFAULT_JURISDICTION_VERSION
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.aamva_version > 99 || self.jurisdiction_version > 99 {
            return Err(ConfigError::Invalid(
                "version numbers are written with 2 digits".to_owned(),
            ));
        }

        self.barcode.check().map_err(ConfigError::Invalid)
    }

    pub fn versions(&self) -> Versions {
        Versions {
            aamva: self.aamva_version,
            jurisdiction: self.jurisdiction_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn overrides() {
        let config =
            Config::from_json_str(r#"{"aamva_version": 10, "barcode": {"scale": 3}}"#).unwrap();
        assert_eq!(config.aamva_version, 10);
        assert_eq!(config.jurisdiction_version, 0);
        assert_eq!(config.barcode.scale, 3);
        assert_eq!(config.barcode.columns, 14);
        assert_eq!(config.versions().aamva, 10);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            Config::from_json_str(r#"{"aamva_version": 100}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"aamva_version": "six"}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"barcode": {"columns": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
    }
}
